use crate::errors::{Result, VanityError};
use crate::record::RawRecord;
use crate::store::KeyStore;
use async_trait::async_trait;
use std::collections::HashMap;

/// In-memory store fake. Keys are listed in insertion order; the resolver
/// applies its own ordering on top.
#[derive(Default)]
pub struct MemoryKeyStore {
    keys: Vec<String>,
    records: HashMap<String, RawRecord>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        MemoryKeyStore::default()
    }

    pub fn insert(&mut self, key: &str, record: RawRecord) {
        self.keys.push(key.to_string());
        self.records.insert(key.to_string(), record);
    }

    /// Registers a key in the listing without a backing value, as if the
    /// value was deleted between the listing and the fetch.
    pub fn insert_dangling(&mut self, key: &str) {
        self.keys.push(key.to_string());
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.keys.clone())
    }

    async fn get_record(&self, key: &str) -> Result<RawRecord> {
        self.records
            .get(key)
            .cloned()
            .ok_or_else(|| VanityError::KeyNotFound(key.to_string()))
    }
}

/// Store fake whose every call fails, for exercising the outage path.
pub struct UnavailableKeyStore;

#[async_trait]
impl KeyStore for UnavailableKeyStore {
    async fn list_keys(&self) -> Result<Vec<String>> {
        Err(VanityError::StoreUnavailable("store offline".into()))
    }

    async fn get_record(&self, key: &str) -> Result<RawRecord> {
        let _ = key;
        Err(VanityError::StoreUnavailable("store offline".into()))
    }
}
