//! Contract call decoding
//!
//! Given a contract's ABI and a raw call payload, identify the called
//! function and recover its arguments as named, printable values.
//!
//! ```no_run
//! use abiscope::CallDecoder;
//!
//! let abi = std::fs::read_to_string("Token.json").unwrap();
//! let decoder = CallDecoder::new();
//! let call = decoder.decode_call("0x00000000000000000000000000000000000000aa", &abi, "0xa9059cbb...");
//! for row in &call.rows {
//!     println!("{} = {}", row.key, row.value);
//! }
//! ```

pub mod config;
pub mod core;
pub mod domain;
pub mod export;
pub mod infrastructure;
pub mod store;

pub use crate::core::CallDecoder;
pub use crate::domain::abi::{
    DecodeFailure, DecodedCall, DecodedRow, MethodEntry, MethodKey, ParamSpec, Selector,
    SelectorTable, ValueDecoder, DECODE_FAILED_KEY,
};
pub use crate::domain::{AbiError, ContractAddress, ContractEntry, DecodeError, UnsupportedParam};
pub use crate::export::OutputFormat;
pub use crate::infrastructure::{AlloyValueDecoder, SignatureBuilder};
pub use crate::store::ContractCache;
