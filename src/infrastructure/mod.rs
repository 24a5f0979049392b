//! Infrastructure layer - External library integrations
//!
//! This layer contains:
//! - ABI JSON parsing and selector derivation using alloy-json-abi
//! - Argument decoding using alloy-dyn-abi

pub mod abi;

pub use abi::{AlloyValueDecoder, SignatureBuilder};
