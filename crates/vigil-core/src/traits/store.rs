use crate::errors::StoreError;

/// Reload-survivable key/value storage, scoped to one client instance.
///
/// Values are plain strings so the stored state stays human-inspectable JSON.
pub trait IResilienceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
