//! JSON Export

use anyhow::Result;
use serde::Serialize;

use crate::domain::abi::{DecodedCall, MethodEntry};

/// Exportable selector entry (flattens parameters to "type name" strings)
#[derive(Serialize)]
struct ExportableMethod<'a> {
    selector: String,
    signature: &'a str,
    params: Vec<String>,
}

impl<'a> From<&'a MethodEntry> for ExportableMethod<'a> {
    fn from(method: &'a MethodEntry) -> Self {
        let params = method
            .inputs
            .iter()
            .zip(method.param_names())
            .map(|(param, name)| format!("{} {}", param.kind, name))
            .collect();

        Self {
            selector: method.selector.to_string(),
            signature: &method.signature,
            params,
        }
    }
}

pub(super) fn call_json(call: &DecodedCall) -> Result<String> {
    Ok(serde_json::to_string_pretty(call)?)
}

pub(super) fn selectors_json(methods: &[MethodEntry]) -> Result<String> {
    let exportable: Vec<ExportableMethod<'_>> = methods.iter().map(ExportableMethod::from).collect();
    Ok(serde_json::to_string_pretty(&exportable)?)
}
