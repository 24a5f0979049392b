//! Call decoder - resolves a payload's selector and decodes its arguments

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::abi::{DecodedCall, DecodedRow, MethodEntry, MethodKey, Selector, ValueDecoder};
use crate::domain::{AbiError, ContractAddress, ContractEntry, DecodeError};
use crate::infrastructure::abi::{AlloyValueDecoder, SignatureBuilder};
use crate::store::ContractCache;

/// Number of leading payload characters skipped before the selector ("0x")
const PREFIX_LEN: usize = 2;
/// Hex characters of the 4-byte selector
const SELECTOR_HEX_LEN: usize = 8;

const SELECTOR_END: usize = PREFIX_LEN + SELECTOR_HEX_LEN;

/// Decodes contract call payloads against registered ABIs
///
/// The cache is injected so several decoders (or the host application) can
/// share one view of which contracts are registered.
pub struct CallDecoder<D = AlloyValueDecoder> {
    cache: Arc<ContractCache>,
    values: D,
}

impl CallDecoder {
    /// Create a decoder with a private cache and the alloy value decoder
    pub fn new() -> Self {
        Self::with_cache(Arc::new(ContractCache::new()))
    }

    /// Create a decoder over a shared cache
    pub fn with_cache(cache: Arc<ContractCache>) -> Self {
        Self::with_parts(cache, AlloyValueDecoder::new())
    }
}

impl Default for CallDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ValueDecoder> CallDecoder<D> {
    pub fn with_parts(cache: Arc<ContractCache>, values: D) -> Self {
        Self { cache, values }
    }

    pub fn cache(&self) -> &Arc<ContractCache> {
        &self.cache
    }

    /// Register an ABI for an address unless one is already cached
    ///
    /// An address that is already `Parsed` or `Unsupported` keeps its entry
    /// and `abi_text` is not looked at.
    pub fn register(&self, address: &str, abi_text: &str) -> Result<ContractEntry, AbiError> {
        self.register_address(&ContractAddress::new(address), abi_text)
    }

    /// Replace the cached entry for an address with one built from `abi_text`
    ///
    /// This is the way out of `Unsupported`.
    pub fn reregister(&self, address: &str, abi_text: &str) -> Result<ContractEntry, AbiError> {
        let address = ContractAddress::new(address);
        self.cache
            .rebuild(&address, || SignatureBuilder::build(&address, abi_text))
    }

    /// Drop an address back to `Unparsed`, returning its previous state
    pub fn invalidate(&self, address: &str) -> ContractEntry {
        self.cache.invalidate(&ContractAddress::new(address))
    }

    /// Current state of an address
    pub fn state(&self, address: &str) -> ContractEntry {
        self.cache.state(&ContractAddress::new(address))
    }

    /// Registered methods of an address, ordered by selector
    pub fn selectors(&self, address: &str) -> Vec<MethodEntry> {
        match self.state(address) {
            ContractEntry::Parsed(table) => table.methods().into_iter().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Look up one method of one contract
    pub fn method(&self, key: &MethodKey) -> Option<MethodEntry> {
        self.cache
            .state(&key.contract)
            .table()
            .and_then(|table| table.get(key.selector).cloned())
    }

    /// Register (if needed) and decode in one step
    ///
    /// Never fails: every error becomes a single `decodeFailed` row.
    pub fn decode_call(&self, address: &str, abi_text: &str, payload: &str) -> DecodedCall {
        let address = ContractAddress::new(address);
        let result = self
            .register_address(&address, abi_text)
            .map_err(|source| DecodeError::InvalidAbi {
                contract: address.clone(),
                source,
            })
            .and_then(|entry| self.decode_entry(&address, entry, payload));

        Self::into_decoded(result)
    }

    /// Decode against whatever is cached for the address
    ///
    /// Never fails: every error becomes a single `decodeFailed` row.
    pub fn decode(&self, address: &str, payload: &str) -> DecodedCall {
        Self::into_decoded(self.try_decode(address, payload))
    }

    /// Decode against whatever is cached for the address, keeping the error
    pub fn try_decode(&self, address: &str, payload: &str) -> Result<DecodedCall, DecodeError> {
        let address = ContractAddress::new(address);
        let entry = self.cache.state(&address);
        self.decode_entry(&address, entry, payload)
    }

    fn register_address(
        &self,
        address: &ContractAddress,
        abi_text: &str,
    ) -> Result<ContractEntry, AbiError> {
        self.cache
            .get_or_build(address, || SignatureBuilder::build(address, abi_text))
    }

    fn decode_entry(
        &self,
        address: &ContractAddress,
        entry: ContractEntry,
        payload: &str,
    ) -> Result<DecodedCall, DecodeError> {
        // Nothing to decode
        if payload.len() < SELECTOR_END {
            return Ok(DecodedCall::default());
        }

        let table = match entry {
            ContractEntry::Parsed(table) => table,
            ContractEntry::Unsupported(param) => {
                return Err(DecodeError::Unsupported {
                    contract: address.clone(),
                    param,
                })
            }
            ContractEntry::Unparsed => return Err(DecodeError::NotRegistered(address.clone())),
        };

        let selector_hex = payload.get(PREFIX_LEN..SELECTOR_END).unwrap_or_default();
        let Some(method) = Selector::from_hex(selector_hex).and_then(|selector| table.get(selector))
        else {
            // The cached ABI may be stale; let the next call register a new one
            self.cache.invalidate_if_stale(address, &table);
            return Err(DecodeError::SelectorMismatch {
                contract: address.clone(),
                selector: selector_hex.to_string(),
            });
        };

        debug!(
            method = %MethodKey::new(address.clone(), method.selector),
            signature = %method.signature,
            "decoding call"
        );

        let malformed = |reason: String| DecodeError::MalformedArgs {
            function: method.signature.clone(),
            reason,
        };

        let args_hex = payload.get(SELECTOR_END..).unwrap_or_default();
        let data = hex::decode(args_hex).map_err(|err| malformed(err.to_string()))?;
        let values = self
            .values
            .decode_values(&method.types(), &data)
            .map_err(|err| malformed(format!("{:#}", err)))?;

        if values.len() != method.inputs.len() {
            return Err(malformed(format!(
                "expected {} values, decoded {}",
                method.inputs.len(),
                values.len()
            )));
        }

        let rows = method
            .param_names()
            .into_iter()
            .zip(values)
            .map(|(key, value)| DecodedRow { key, value })
            .collect();

        Ok(DecodedCall {
            rows,
            function: method.display_name().to_string(),
        })
    }

    fn into_decoded(result: Result<DecodedCall, DecodeError>) -> DecodedCall {
        result.unwrap_or_else(|err| {
            warn!(error = %err, "decode failed");
            DecodedCall::failed(err.failure())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::DecodeFailure;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ADDRESS: &str = "0x00000000000000000000000000000000000000aa";

    const ABI: &str = r#"[
        {"type":"function","name":"burn","stateMutability":"nonpayable",
         "inputs":[{"name":"amount","type":"uint256"}],"outputs":[]},
        {"type":"function","name":"pause","stateMutability":"nonpayable",
         "inputs":[],"outputs":[]}
    ]"#;

    /// Returns one fixed value per type and counts invocations
    #[derive(Default)]
    struct StubDecoder {
        calls: AtomicUsize,
    }

    impl ValueDecoder for StubDecoder {
        fn decode_values(&self, types: &[String], _data: &[u8]) -> anyhow::Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(types.iter().map(|kind| format!("<{}>", kind)).collect())
        }
    }

    fn stub_decoder() -> CallDecoder<StubDecoder> {
        CallDecoder::with_parts(Arc::new(ContractCache::new()), StubDecoder::default())
    }

    fn burn_payload() -> String {
        format!("0x{}{}", hex::encode(Selector::from_signature("burn(uint256)").0), "00".repeat(32))
    }

    #[test]
    fn test_injected_value_decoder() {
        let decoder = stub_decoder();
        let call = decoder.decode_call(ADDRESS, ABI, &burn_payload());

        assert_eq!(call.function, "burn(uint256)");
        assert_eq!(call.rows, vec![DecodedRow::new("amount", "<uint256>")]);
        assert_eq!(decoder.values.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_short_payload_is_empty() {
        let decoder = stub_decoder();
        for payload in ["", "0x", "0x01", "0x1234567"] {
            let call = decoder.decode_call(ADDRESS, ABI, payload);
            assert!(call.is_empty(), "payload {:?}", payload);
        }
        assert_eq!(decoder.values.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_mismatch_skips_value_decoder() {
        let decoder = stub_decoder();
        let call = decoder.decode_call(ADDRESS, ABI, "0xdeadbeef");

        assert_eq!(call.failure(), Some(DecodeFailure::AbiMismatch));
        assert_eq!(decoder.values.calls.load(Ordering::SeqCst), 0);
        assert!(decoder.state(ADDRESS).is_unparsed());
    }

    #[test]
    fn test_non_hex_selector_is_mismatch() {
        let decoder = stub_decoder();
        let call = decoder.decode_call(ADDRESS, ABI, "0xzzzzzzzz");
        assert_eq!(call.failure(), Some(DecodeFailure::AbiMismatch));
    }

    #[test]
    fn test_zero_arg_method() {
        let decoder = stub_decoder();
        let payload = format!("0x{}", hex::encode(Selector::from_signature("pause()").0));
        let call = decoder.decode_call(ADDRESS, ABI, &payload);

        assert!(call.rows.is_empty());
        assert_eq!(call.function, "pause()");
    }

    #[test]
    fn test_odd_length_args_are_malformed() {
        let decoder = stub_decoder();
        let payload = format!("{}0", burn_payload());
        let call = decoder.decode_call(ADDRESS, ABI, &payload);

        assert_eq!(call.failure(), Some(DecodeFailure::MalformedPayload));
        // Selector matched, so the entry stays registered
        assert!(decoder.state(ADDRESS).is_parsed());
    }

    #[test]
    fn test_invalid_abi_reported_as_mismatch() {
        let decoder = stub_decoder();
        let call = decoder.decode_call(ADDRESS, "{not json", &burn_payload());

        assert_eq!(call.failure(), Some(DecodeFailure::AbiMismatch));
        assert!(decoder.state(ADDRESS).is_unparsed());
    }

    #[test]
    fn test_method_lookup_by_key() {
        let decoder = stub_decoder();
        decoder.register(ADDRESS, ABI).unwrap();

        let key = MethodKey::new(
            ContractAddress::new(ADDRESS),
            Selector::from_signature("burn(uint256)"),
        );
        let method = decoder.method(&key).unwrap();
        assert_eq!(method.name, "burn");

        let missing = MethodKey::new(ContractAddress::new(ADDRESS), Selector([0; 4]));
        assert!(decoder.method(&missing).is_none());
    }

    #[test]
    fn test_selectors_sorted() {
        let decoder = stub_decoder();
        decoder.register(ADDRESS, ABI).unwrap();

        let selectors: Vec<Selector> = decoder
            .selectors(ADDRESS)
            .iter()
            .map(|method| method.selector)
            .collect();
        let mut sorted = selectors.clone();
        sorted.sort();

        assert_eq!(selectors.len(), 2);
        assert_eq!(selectors, sorted);
    }
}
