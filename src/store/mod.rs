//! Caches for decoding metadata

mod contract_cache;

pub use contract_cache::ContractCache;
