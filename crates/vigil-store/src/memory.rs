//! MemoryStore: concurrent in-memory key/value store via DashMap.

use dashmap::DashMap;
use vigil_core::errors::StoreError;
use vigil_core::traits::IResilienceStore;

/// Thread-safe in-memory store. Lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop everything, like clearing the browser storage scope.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl IResilienceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
