//! In-memory cache of per-contract decoding state
//!
//! Every read and every read-modify-write runs under one mutex, so two
//! callers never race to build the same address and an invalidation never
//! tears a table another caller is using (tables are shared behind `Arc`).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::domain::abi::SelectorTable;
use crate::domain::{ContractAddress, ContractEntry};

/// Cache of contract decoding state keyed by address
#[derive(Debug, Default)]
pub struct ContractCache {
    entries: Mutex<HashMap<ContractAddress, ContractEntry>>,
}

impl ContractCache {
    pub fn new() -> Self {
        Self::default()
    }

    // The map holds plain values, so a panic elsewhere cannot leave it half-updated
    fn lock(&self) -> MutexGuard<'_, HashMap<ContractAddress, ContractEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state of an address (`Unparsed` if never seen)
    pub fn state(&self, address: &ContractAddress) -> ContractEntry {
        self.lock().get(address).cloned().unwrap_or_default()
    }

    /// Return the cached entry, building and storing it if the address is `Unparsed`
    ///
    /// The check and the insert happen under the same lock. A failed build
    /// leaves the cache untouched.
    pub fn get_or_build<F, E>(&self, address: &ContractAddress, build: F) -> Result<ContractEntry, E>
    where
        F: FnOnce() -> Result<ContractEntry, E>,
    {
        let mut entries = self.lock();
        if let Some(entry) = entries.get(address).filter(|entry| !entry.is_unparsed()) {
            debug!(contract = %address, "using cached contract entry");
            return Ok(entry.clone());
        }

        let entry = build()?;
        info!(
            contract = %address,
            parsed = entry.is_parsed(),
            "registered contract"
        );
        entries.insert(address.clone(), entry.clone());
        Ok(entry)
    }

    /// Replace whatever is cached for an address with a freshly built entry
    ///
    /// A failed build leaves the address `Unparsed`.
    pub fn rebuild<F, E>(&self, address: &ContractAddress, build: F) -> Result<ContractEntry, E>
    where
        F: FnOnce() -> Result<ContractEntry, E>,
    {
        let mut entries = self.lock();
        match build() {
            Ok(entry) => {
                info!(contract = %address, parsed = entry.is_parsed(), "re-registered contract");
                entries.insert(address.clone(), entry.clone());
                Ok(entry)
            }
            Err(err) => {
                entries.insert(address.clone(), ContractEntry::Unparsed);
                Err(err)
            }
        }
    }

    /// Drop an address back to `Unparsed`, returning its previous state
    pub fn invalidate(&self, address: &ContractAddress) -> ContractEntry {
        let mut entries = self.lock();
        match entries.get_mut(address) {
            Some(entry) => std::mem::take(entry),
            None => ContractEntry::Unparsed,
        }
    }

    /// Drop an address back to `Unparsed` if it still holds `table`
    ///
    /// Used when a payload's selector is missing from `table`. If another
    /// caller already replaced the table, the newer one is kept. Returns
    /// whether the entry was invalidated.
    pub fn invalidate_if_stale(&self, address: &ContractAddress, table: &Arc<SelectorTable>) -> bool {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(address) else {
            return false;
        };
        if !entry.table().is_some_and(|current| Arc::ptr_eq(current, table)) {
            return false;
        }

        *entry = ContractEntry::Unparsed;
        debug!(contract = %address, "invalidated stale selector table");
        true
    }

    /// Number of addresses seen, including ones currently `Unparsed`
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
