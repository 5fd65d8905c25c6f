use vigil_core::errors::StoreError;
use vigil_core::traits::IResilienceStore;

/// Reads come back empty, every write hits the quota.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl IResilienceStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::QuotaExceeded {
            key: key.to_string(),
        })
    }
}
