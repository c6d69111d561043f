use dashmap::DashMap;

use crate::errors::SessionError;
use crate::session::SessionMedium;

/// Process-local medium; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    inner: DashMap<String, String>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl SessionMedium for MemoryMedium {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.inner.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.inner.remove(key);
        Ok(())
    }
}
