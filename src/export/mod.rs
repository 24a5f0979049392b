//! Export Module
//!
//! Renders decode results and selector tables for the CLI.
//!
//! - Table → aligned plain text
//! - JSON → pretty-printed objects
//! - CSV → one record per row

mod csv_export;
mod json_export;

use anyhow::Result;
use clap::ValueEnum;
use serde::Deserialize;

use crate::domain::abi::{DecodedCall, MethodEntry};

/// Output format for rendered results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Render a decoded call
pub fn render_call(call: &DecodedCall, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(call_table(call)),
        OutputFormat::Json => json_export::call_json(call),
        OutputFormat::Csv => csv_export::call_csv(call),
    }
}

/// Render a contract's selector table
pub fn render_selectors(methods: &[MethodEntry], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(selectors_table(methods)),
        OutputFormat::Json => json_export::selectors_json(methods),
        OutputFormat::Csv => csv_export::selectors_csv(methods),
    }
}

fn call_table(call: &DecodedCall) -> String {
    let width = call.rows.iter().map(|row| row.key.len()).max().unwrap_or(0);
    let mut out = String::new();

    if !call.function.is_empty() {
        out.push_str(&call.function);
        out.push('\n');
    }
    for row in &call.rows {
        out.push_str(&format!("  {:<width$}  {}\n", row.key, row.value, width = width));
    }

    out
}

fn selectors_table(methods: &[MethodEntry]) -> String {
    methods
        .iter()
        .map(|method| {
            let params = method.param_names().join(", ");
            format!("{}  {}  [{}]\n", method.selector, method.signature, params)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::{DecodeFailure, DecodedRow, ParamSpec};

    fn transfer_call() -> DecodedCall {
        DecodedCall {
            rows: vec![
                DecodedRow::new("to", "0x1234567890123456789012345678901234567890"),
                DecodedRow::new("amount", "1000"),
            ],
            function: "transfer(address,uint256)".to_string(),
        }
    }

    #[test]
    fn test_call_table() {
        let out = render_call(&transfer_call(), OutputFormat::Table).unwrap();
        assert_eq!(
            out,
            "transfer(address,uint256)\n  to      0x1234567890123456789012345678901234567890\n  amount  1000\n"
        );
    }

    #[test]
    fn test_failed_call_table() {
        let call = DecodedCall::failed(DecodeFailure::AbiMismatch);
        let out = render_call(&call, OutputFormat::Table).unwrap();
        assert_eq!(out, "  decodeFailed  ABI Mismatch\n");
    }

    #[test]
    fn test_selectors_table() {
        let method = MethodEntry::new(
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
        );
        let out = render_selectors(&[method], OutputFormat::Table).unwrap();
        assert_eq!(out, "0xa9059cbb  transfer(address,uint256)  [to, amount]\n");
    }

    #[test]
    fn test_output_format_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            output: OutputFormat,
        }
        let parsed: Wrapper = toml::from_str(r#"output = "csv""#).unwrap();
        assert_eq!(parsed.output, OutputFormat::Csv);
    }
}
