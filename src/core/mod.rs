//! Decoding entry points

pub mod call_decoder;

pub use call_decoder::CallDecoder;
