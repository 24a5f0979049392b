//! Selector table - per-contract method signatures by selector

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use alloy_primitives::keccak256;
use serde::{Serialize, Serializer};

use crate::domain::contract::ContractAddress;

/// 4-byte function selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    /// Compute the selector of a canonical signature (e.g. "transfer(address,uint256)")
    pub fn from_signature(signature: &str) -> Self {
        let hash = keccak256(signature.as_bytes());
        Self([hash[0], hash[1], hash[2], hash[3]])
    }

    /// Parse exactly 8 hex characters, with or without a "0x" prefix
    pub fn from_hex(selector_hex: &str) -> Option<Self> {
        let normalized = selector_hex
            .strip_prefix("0x")
            .or_else(|| selector_hex.strip_prefix("0X"))
            .unwrap_or(selector_hex);

        if normalized.len() != 8 {
            return None;
        }

        let bytes = hex::decode(normalized).ok()?;
        let selector: [u8; 4] = bytes.try_into().ok()?;
        Some(Self(selector))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Structured lookup key for one method of one contract
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    pub contract: ContractAddress,
    pub selector: Selector,
}

impl MethodKey {
    pub fn new(contract: ContractAddress, selector: Selector) -> Self {
        Self { contract, selector }
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.contract, self.selector)
    }
}

/// A method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    /// Parameter name as declared (may be empty)
    pub name: String,
    /// Canonical Solidity type (e.g. "address", "uint256[]")
    pub kind: String,
}

/// A state-mutating method ready for decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodEntry {
    pub selector: Selector,
    /// Declared function name
    pub name: String,
    /// Canonical signature text, also used as the display name
    pub signature: String,
    /// Input parameters in declared order
    pub inputs: Vec<ParamSpec>,
}

impl MethodEntry {
    /// Build an entry from a name and its parameters, deriving the signature and selector
    pub fn new(name: impl Into<String>, inputs: Vec<ParamSpec>) -> Self {
        let name = name.into();
        let types: Vec<&str> = inputs.iter().map(|param| param.kind.as_str()).collect();
        let signature = format!("{}({})", name, types.join(","));
        let selector = Selector::from_signature(&signature);

        Self {
            selector,
            name,
            signature,
            inputs,
        }
    }

    /// Name shown next to decoded arguments, e.g. "transfer(address,uint256)"
    pub fn display_name(&self) -> &str {
        &self.signature
    }

    /// Parameter types in declared order
    pub fn types(&self) -> Vec<String> {
        self.inputs.iter().map(|param| param.kind.clone()).collect()
    }

    /// Parameter names in declared order, `arg{n}` for unnamed parameters
    pub fn param_names(&self) -> Vec<String> {
        self.inputs
            .iter()
            .enumerate()
            .map(|(idx, param)| {
                if param.name.trim().is_empty() {
                    format!("arg{}", idx)
                } else {
                    param.name.clone()
                }
            })
            .collect()
    }
}

/// Methods of one contract indexed by selector
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectorTable {
    methods: HashMap<Selector, MethodEntry>,
}

impl SelectorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a method
    ///
    /// First method for a given selector wins. Returns false if the
    /// selector was already taken.
    pub fn insert(&mut self, method: MethodEntry) -> bool {
        match self.methods.entry(method.selector) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(method);
                true
            }
        }
    }

    pub fn get(&self, selector: Selector) -> Option<&MethodEntry> {
        self.methods.get(&selector)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// All methods, ordered by selector
    pub fn methods(&self) -> Vec<&MethodEntry> {
        let mut methods: Vec<&MethodEntry> = self.methods.values().collect();
        methods.sort_by_key(|method| method.selector);
        methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer() -> MethodEntry {
        MethodEntry::new(
            "transfer",
            vec![
                ParamSpec {
                    name: "to".to_string(),
                    kind: "address".to_string(),
                },
                ParamSpec {
                    name: "amount".to_string(),
                    kind: "uint256".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_selector_from_signature() {
        assert_eq!(
            Selector::from_signature("transfer(address,uint256)"),
            Selector([0xa9, 0x05, 0x9c, 0xbb])
        );
        assert_eq!(
            Selector::from_signature("approve(address,uint256)"),
            Selector([0x09, 0x5e, 0xa7, 0xb3])
        );
    }

    #[test]
    fn test_selector_hex() {
        let selector = Selector::from_hex("0xa9059cbb").unwrap();
        assert_eq!(selector, Selector([0xa9, 0x05, 0x9c, 0xbb]));
        assert_eq!(selector.to_string(), "0xa9059cbb");
        assert_eq!(Selector::from_hex("A9059CBB"), Some(selector));
        assert!(Selector::from_hex("0xa9059c").is_none());
        assert!(Selector::from_hex("0xzz059cbb").is_none());
    }

    #[test]
    fn test_method_entry() {
        let method = transfer();
        assert_eq!(method.signature, "transfer(address,uint256)");
        assert_eq!(method.display_name(), "transfer(address,uint256)");
        assert_eq!(method.selector, Selector([0xa9, 0x05, 0x9c, 0xbb]));
        assert_eq!(method.types(), vec!["address", "uint256"]);
        assert_eq!(method.param_names(), vec!["to", "amount"]);
    }

    #[test]
    fn test_unnamed_params() {
        let method = MethodEntry::new(
            "set",
            vec![ParamSpec {
                name: String::new(),
                kind: "bool".to_string(),
            }],
        );
        assert_eq!(method.param_names(), vec!["arg0"]);
    }

    #[test]
    fn test_first_wins() {
        let mut table = SelectorTable::new();
        let first = transfer();
        let mut second = transfer();
        second.inputs[0].name = "recipient".to_string();

        assert!(table.insert(first));
        assert!(!table.insert(second));

        assert_eq!(table.len(), 1);
        let found = table.get(Selector([0xa9, 0x05, 0x9c, 0xbb])).unwrap();
        assert_eq!(found.inputs[0].name, "to");
    }

    #[test]
    fn test_selector_serializes_as_hex() {
        let json = serde_json::to_value(transfer()).unwrap();
        assert_eq!(json["selector"], "0xa9059cbb");
        assert_eq!(json["inputs"][1]["kind"], "uint256");
    }
}
