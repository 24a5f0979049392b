//! Per-contract decoding state

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::abi::SelectorTable;

/// Contract address used as a cache key
///
/// Normalized to a trimmed, lowercase, "0x"-prefixed string so differently
/// cased spellings of the same address share one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ContractAddress(String);

impl ContractAddress {
    pub fn new(address: &str) -> Self {
        let trimmed = address.trim();
        let payload = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        Self(format!("0x{}", payload.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContractAddress {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The parameter that made a contract undecodable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsupportedParam {
    pub method: String,
    pub param: String,
    pub kind: String,
}

impl fmt::Display for UnsupportedParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parameter '{}' of '{}' has unsupported type '{}'",
            self.param, self.method, self.kind
        )
    }
}

/// Decoding state of one contract
///
/// Transitions:
/// - `Unparsed -> Parsed` when every state-mutating method only uses supported types
/// - `Unparsed -> Unsupported` when any parameter anywhere is unsupported
/// - `Parsed -> Unparsed` when a payload's selector is not in the table
///
/// `Unsupported` only changes through explicit re-registration.
#[derive(Debug, Clone, Default)]
pub enum ContractEntry {
    #[default]
    Unparsed,
    Unsupported(UnsupportedParam),
    Parsed(Arc<SelectorTable>),
}

impl ContractEntry {
    pub fn is_unparsed(&self) -> bool {
        matches!(self, Self::Unparsed)
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    /// The selector table, if parsed
    pub fn table(&self) -> Option<&Arc<SelectorTable>> {
        match self {
            Self::Parsed(table) => Some(table),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_normalization() {
        let lower = ContractAddress::new("0xabcdef0000000000000000000000000000000001");
        let upper = ContractAddress::new(" 0XABCDEF0000000000000000000000000000000001 ");
        let bare = ContractAddress::new("abcdef0000000000000000000000000000000001");

        assert_eq!(lower, upper);
        assert_eq!(lower, bare);
        assert_eq!(lower.as_str(), "0xabcdef0000000000000000000000000000000001");
    }

    #[test]
    fn test_entry_default_is_unparsed() {
        let entry = ContractEntry::default();
        assert!(entry.is_unparsed());
        assert!(entry.table().is_none());
    }

    #[test]
    fn test_unsupported_display() {
        let param = UnsupportedParam {
            method: "submit".to_string(),
            param: "order".to_string(),
            kind: "tuple".to_string(),
        };
        assert_eq!(
            param.to_string(),
            "parameter 'order' of 'submit' has unsupported type 'tuple'"
        );
    }
}
