//! Value decoder trait and decode result types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key used for the synthetic row reporting a failed decode
pub const DECODE_FAILED_KEY: &str = "decodeFailed";

/// One decoded argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedRow {
    /// Parameter name (or "arg{n}" if unnamed)
    pub key: String,
    /// Decoded value as a formatted string
    pub value: String,
}

impl DecodedRow {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Why a decode produced a `decodeFailed` row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailure {
    UnsupportedDatatype,
    AbiMismatch,
    MalformedPayload,
}

impl DecodeFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedDatatype => "Unsupported Datatype",
            Self::AbiMismatch => "ABI Mismatch",
            Self::MalformedPayload => "Malformed Payload",
        }
    }

    fn from_value(value: &str) -> Option<Self> {
        match value {
            "Unsupported Datatype" => Some(Self::UnsupportedDatatype),
            "ABI Mismatch" => Some(Self::AbiMismatch),
            "Malformed Payload" => Some(Self::MalformedPayload),
            _ => None,
        }
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of decoding a call payload
///
/// `function` is empty whenever nothing was decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCall {
    /// Decoded arguments in declared parameter order
    pub rows: Vec<DecodedRow>,
    /// Display name of the called function, e.g. "transfer(address,uint256)"
    pub function: String,
}

impl DecodedCall {
    /// A single `decodeFailed` row with an empty function name
    pub fn failed(failure: DecodeFailure) -> Self {
        Self {
            rows: vec![DecodedRow::new(DECODE_FAILED_KEY, failure.as_str())],
            function: String::new(),
        }
    }

    /// The failure this result reports, if it is a synthetic failure row
    pub fn failure(&self) -> Option<DecodeFailure> {
        match self.rows.as_slice() {
            [row] if row.key == DECODE_FAILED_KEY && self.function.is_empty() => {
                DecodeFailure::from_value(&row.value)
            }
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.function.is_empty()
    }
}

/// Trait for the low-level ABI value decoding
///
/// This abstracts over the actual decoding library so the call decoder
/// only deals with type strings and formatted values.
pub trait ValueDecoder: Send + Sync {
    /// Decode an ABI-encoded argument block
    ///
    /// # Arguments
    /// * `types` - Canonical parameter types in declared order
    /// * `data` - The argument bytes (selector already stripped)
    ///
    /// # Returns
    /// * `Ok(values)` - One formatted value per type, in order
    /// * `Err(...)` - If a type is unknown or the data does not fit the types
    fn decode_values(&self, types: &[String], data: &[u8]) -> anyhow::Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_row() {
        let call = DecodedCall::failed(DecodeFailure::AbiMismatch);
        assert_eq!(call.rows, vec![DecodedRow::new("decodeFailed", "ABI Mismatch")]);
        assert!(call.function.is_empty());
        assert_eq!(call.failure(), Some(DecodeFailure::AbiMismatch));
    }

    #[test]
    fn test_success_is_not_failure() {
        let call = DecodedCall {
            rows: vec![DecodedRow::new("to", "0x01")],
            function: "burn(address)".to_string(),
        };
        assert_eq!(call.failure(), None);
        assert!(!call.is_empty());
        assert!(DecodedCall::default().is_empty());
    }

    #[test]
    fn test_json_shape() {
        let call = DecodedCall::failed(DecodeFailure::UnsupportedDatatype);
        let json = serde_json::to_string(&call).unwrap();
        assert_eq!(
            json,
            r#"{"rows":[{"key":"decodeFailed","value":"Unsupported Datatype"}],"function":""}"#
        );
    }
}
