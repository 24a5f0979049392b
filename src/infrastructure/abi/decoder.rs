//! Value decoder implementation using alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue};
use anyhow::{Context, Result};

use crate::domain::abi::ValueDecoder;

/// Value decoder implementation using alloy-dyn-abi
#[derive(Debug, Default, Clone, Copy)]
pub struct AlloyValueDecoder;

impl AlloyValueDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ValueDecoder for AlloyValueDecoder {
    fn decode_values(&self, types: &[String], data: &[u8]) -> Result<Vec<String>> {
        let types: Vec<DynSolType> = types
            .iter()
            .map(|kind| {
                kind.parse::<DynSolType>()
                    .with_context(|| format!("failed to parse type '{}'", kind))
            })
            .collect::<Result<Vec<_>>>()?;

        if types.is_empty() {
            return Ok(Vec::new());
        }

        // Arguments are encoded as a parameter list, not as a single tuple value
        let decoded = DynSolType::Tuple(types)
            .abi_decode_params(data)
            .context("failed to decode argument block")?;

        let values = match decoded {
            DynSolValue::Tuple(values) => values,
            other => vec![other],
        };

        Ok(values.iter().map(format_value).collect())
    }
}

/// Format a DynSolValue for display
///
/// Integers are decimal, addresses checksummed, byte strings hex and
/// strings raw. Values are never truncated.
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => {
            let bytes = &word.as_slice()[..(*size).min(32)];
            format!("0x{}", hex::encode(bytes))
        }
        DynSolValue::Address(addr) => addr.to_checksum(None),
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Array(arr) | DynSolValue::FixedArray(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        DynSolValue::Tuple(fields) => {
            let items: Vec<String> = fields.iter().map(format_value).collect();
            format!("({})", items.join(", "))
        }
    }
}
