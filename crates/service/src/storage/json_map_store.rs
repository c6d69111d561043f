use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use dashmap::DashMap;
use tracing::warn;

use crate::errors::SessionError;
use crate::session::SessionMedium;

/// JSON file-backed string map.
///
/// Holds the map in memory and rewrites the whole file after every change.
/// A missing file is created empty; an unreadable one is logged and replaced.
#[derive(Debug)]
pub struct JsonMapStore {
    inner: DashMap<String, String>,
    file_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonMapStore {
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, SessionError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::Io(e.to_string()))?;
        }

        let inner = DashMap::new();
        match std::fs::read(&file_path) {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, String>>(&bytes) {
                Ok(map) => {
                    for (k, v) in map {
                        inner.insert(k, v);
                    }
                }
                Err(e) => warn!(path = %file_path.display(), error = %e, "session file unreadable; starting empty"),
            },
            Err(_) => {
                std::fs::write(&file_path, b"{}").map_err(|e| SessionError::Io(e.to_string()))?;
            }
        }

        Ok(Self { inner, file_path, write_lock: Mutex::new(()) })
    }

    fn save(&self) -> Result<(), SessionError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| SessionError::Io("session file lock poisoned".into()))?;
        let snapshot: BTreeMap<String, String> = self
            .inner
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let data = serde_json::to_vec_pretty(&snapshot).map_err(|e| SessionError::Encode(e.to_string()))?;
        std::fs::write(&self.file_path, data).map_err(|e| SessionError::Io(e.to_string()))
    }
}

impl SessionMedium for JsonMapStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.inner.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        if self.inner.remove(key).is_none() {
            return Ok(());
        }
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_map_store_persists_across_reopen() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::open(&tmp)?;
        assert!(store.get("tenantSlug").is_none());

        store.set("tenantSlug", "acme")?;
        store.set("user", "{\"id\":\"1\"}")?;
        store.remove("user")?;
        store.remove("never-there")?;

        let reopened = JsonMapStore::open(&tmp)?;
        assert_eq!(reopened.get("tenantSlug").as_deref(), Some("acme"));
        assert!(reopened.get("user").is_none());

        let _ = std::fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn corrupt_file_starts_empty() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&tmp, b"not json")?;
        let store = JsonMapStore::open(&tmp)?;
        assert!(store.get("anything").is_none());
        store.set("k", "v")?;
        assert_eq!(JsonMapStore::open(&tmp)?.get("k").as_deref(), Some("v"));
        let _ = std::fs::remove_file(&tmp);
        Ok(())
    }
}
