//! Signature builder - turns ABI text into a contract's selector table

use std::sync::Arc;

use alloy_json_abi::{Function, JsonAbi, StateMutability};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::abi::types::{canonical_type, is_supported};
use crate::domain::abi::{MethodEntry, ParamSpec, SelectorTable};
use crate::domain::{AbiError, ContractAddress, ContractEntry, UnsupportedParam};

/// Builds `ContractEntry` values from ABI JSON
pub struct SignatureBuilder;

impl SignatureBuilder {
    /// Parse ABI text and classify the contract
    ///
    /// Returns `Parsed` when every state-mutating method only uses supported
    /// parameter types, `Unsupported` as soon as one parameter anywhere does
    /// not. Constant (`view`/`pure`) methods are ignored.
    pub fn build(address: &ContractAddress, abi_text: &str) -> Result<ContractEntry, AbiError> {
        let items: Vec<Value> = Self::abi_items(abi_text)?
            .into_iter()
            .filter(|item| !Self::is_constant_item(item))
            .collect();

        // Types alloy cannot parse would otherwise fail the whole ABI
        if let Some(param) = items.iter().find_map(Self::unsupported_item) {
            warn!(contract = %address, %param, "contract marked unsupported");
            return Ok(ContractEntry::Unsupported(param));
        }

        let abi: JsonAbi = serde_json::from_value(Value::Array(items))?;
        Ok(Self::build_from_abi(address, &abi))
    }

    /// Classify an already parsed ABI
    pub fn build_from_abi(address: &ContractAddress, abi: &JsonAbi) -> ContractEntry {
        let mut table = SelectorTable::new();

        for function in abi.functions() {
            if Self::is_constant(function) {
                continue;
            }

            let method = match Self::method_entry(function) {
                Ok(method) => method,
                Err(param) => {
                    warn!(contract = %address, %param, "contract marked unsupported");
                    return ContractEntry::Unsupported(param);
                }
            };

            let signature = method.signature.clone();
            let selector = method.selector;
            if !table.insert(method) {
                debug!(
                    contract = %address,
                    %selector,
                    %signature,
                    "duplicate selector ignored"
                );
            }
        }

        debug!(contract = %address, methods = table.len(), "selector table built");
        ContractEntry::Parsed(Arc::new(table))
    }

    /// Parse ABI text - either a raw array or an artifact with an "abi" field
    pub fn parse_abi(abi_text: &str) -> Result<JsonAbi, AbiError> {
        let items = Self::abi_items(abi_text)?;
        Ok(serde_json::from_value(Value::Array(items))?)
    }

    fn abi_items(abi_text: &str) -> Result<Vec<Value>, AbiError> {
        let value: Value = serde_json::from_str(abi_text)?;

        match value {
            Value::Array(items) => Ok(items),
            Value::Object(mut artifact) => match artifact.remove("abi") {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(AbiError::MissingAbi),
            },
            _ => Err(AbiError::MissingAbi),
        }
    }

    /// Functions default to `"type": "function"` when the field is missing
    fn is_function_item(item: &Value) -> bool {
        item.get("type")
            .and_then(Value::as_str)
            .map_or(true, |kind| kind == "function")
    }

    /// A view/pure function, including legacy `"constant": true` items
    fn is_constant_item(item: &Value) -> bool {
        if !Self::is_function_item(item) {
            return false;
        }

        match item.get("stateMutability").and_then(Value::as_str) {
            Some(mutability) => matches!(mutability, "view" | "pure"),
            None => item.get("constant").and_then(Value::as_bool).unwrap_or(false),
        }
    }

    /// First input of a function item whose declared type is not decodable
    fn unsupported_item(item: &Value) -> Option<UnsupportedParam> {
        if !Self::is_function_item(item) {
            return None;
        }

        let text = |value: &Value, key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        item.get("inputs")?
            .as_array()?
            .iter()
            .find(|param| {
                let kind = param.get("type").and_then(Value::as_str).unwrap_or_default();
                !is_supported(kind)
            })
            .map(|param| UnsupportedParam {
                method: text(item, "name"),
                param: text(param, "name"),
                kind: text(param, "type"),
            })
    }

    /// Validate a function's inputs and derive its selector
    fn method_entry(function: &Function) -> Result<MethodEntry, UnsupportedParam> {
        let mut inputs = Vec::with_capacity(function.inputs.len());

        for param in &function.inputs {
            if !is_supported(&param.ty) {
                return Err(UnsupportedParam {
                    method: function.name.clone(),
                    param: param.name.clone(),
                    kind: param.ty.clone(),
                });
            }

            inputs.push(ParamSpec {
                name: param.name.clone(),
                kind: canonical_type(&param.ty).into_owned(),
            });
        }

        Ok(MethodEntry::new(function.name.clone(), inputs))
    }

    fn is_constant(function: &Function) -> bool {
        matches!(
            function.state_mutability,
            StateMutability::View | StateMutability::Pure
        )
    }
}
