//! Domain layer - contract decoding state and result types

pub mod abi;
pub mod contract;
pub mod error;

pub use contract::{ContractAddress, ContractEntry, UnsupportedParam};
pub use error::{AbiError, DecodeError};
