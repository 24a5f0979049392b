//! CSV Export

use anyhow::{Context, Result};

use crate::domain::abi::{DecodedCall, MethodEntry};

/// Write decoded rows as `function,key,value` records
pub(super) fn call_csv(call: &DecodedCall) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record(["function", "key", "value"])?;
    for row in &call.rows {
        wtr.write_record([call.function.as_str(), row.key.as_str(), row.value.as_str()])?;
    }

    into_string(wtr)
}

/// Write a selector table as `selector,signature,params` records
pub(super) fn selectors_csv(methods: &[MethodEntry]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record(["selector", "signature", "params"])?;
    for method in methods {
        wtr.write_record([
            method.selector.to_string(),
            method.signature.clone(),
            method.param_names().join(";"),
        ])?;
    }

    into_string(wtr)
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|err| err.into_error())
        .context("flush csv output")?;
    String::from_utf8(bytes).context("csv output is not utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::DecodedRow;

    #[test]
    fn test_call_csv_quotes_values() {
        let call = DecodedCall {
            rows: vec![
                DecodedRow::new("ids", "[1, 2]"),
                DecodedRow::new("memo", "hello"),
            ],
            function: "batch(uint256[],string)".to_string(),
        };

        let out = call_csv(&call).unwrap();
        assert_eq!(
            out,
            "function,key,value\n\"batch(uint256[],string)\",ids,\"[1, 2]\"\n\"batch(uint256[],string)\",memo,hello\n"
        );
    }
}
