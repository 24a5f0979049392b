//! ABI domain models and contracts
//!
//! This module defines the types for selector tables and decode results,
//! independent of the underlying implementation (alloy-json-abi, alloy-dyn-abi).

mod decoder;
mod registry;
pub mod types;

pub use decoder::{DecodeFailure, DecodedCall, DecodedRow, ValueDecoder, DECODE_FAILED_KEY};
pub use registry::{MethodEntry, MethodKey, ParamSpec, Selector, SelectorTable};
