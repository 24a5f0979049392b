//! Error types for ABI registration and payload decoding

use thiserror::Error;

use super::abi::DecodeFailure;
use super::contract::{ContractAddress, UnsupportedParam};

/// ABI text could not be turned into a method list
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("ABI is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ABI JSON must be an array or an object with an `abi` array")]
    MissingAbi,
}

/// Reasons a payload could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("no decodable ABI registered for {0}")]
    NotRegistered(ContractAddress),

    #[error("contract {contract} is not decodable: {param}")]
    Unsupported {
        contract: ContractAddress,
        param: UnsupportedParam,
    },

    #[error("selector {selector} not found for {contract}")]
    SelectorMismatch {
        contract: ContractAddress,
        selector: String,
    },

    #[error("invalid ABI for {contract}: {source}")]
    InvalidAbi {
        contract: ContractAddress,
        #[source]
        source: AbiError,
    },

    #[error("malformed argument block for {function}: {reason}")]
    MalformedArgs { function: String, reason: String },
}

impl DecodeError {
    /// The `decodeFailed` row value this error is reported as
    pub fn failure(&self) -> DecodeFailure {
        match self {
            Self::NotRegistered(_) | Self::Unsupported { .. } => DecodeFailure::UnsupportedDatatype,
            Self::SelectorMismatch { .. } | Self::InvalidAbi { .. } => DecodeFailure::AbiMismatch,
            Self::MalformedArgs { .. } => DecodeFailure::MalformedPayload,
        }
    }
}
