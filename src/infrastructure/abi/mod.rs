//! ABI infrastructure - Alloy-based signature building and value decoding

mod builder;
mod decoder;

pub use builder::SignatureBuilder;
pub use decoder::{format_value, AlloyValueDecoder};
