//! Persistent key/value storage.
//!
//! - Web: `localStorage`
//! - Desktop: one JSON file per key in the platform config directory:
//!   - Linux: `~/.config/spacedash/`
//!   - macOS: `~/Library/Application Support/spacedash/`
//!   - Windows: `%APPDATA%\spacedash\`
//!
//! Writes are best effort. A failed write only costs a cache hit later.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};

pub trait Storage: Send + Sync {
    fn load_raw(&self, key: &str) -> Option<String>;

    /// Returns `true` if the value was stored.
    fn save_raw(&self, key: &str, value: &str) -> bool;

    fn remove(&self, key: &str);

    fn save<T: Serialize>(&self, key: &str, value: &T) -> bool
    where
        Self: Sized,
    {
        match serde_json::to_string(value) {
            Ok(json) => self.save_raw(key, &json),
            Err(_) => false,
        }
    }

    /// `None` if the key is absent or no longer deserializes.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T>
    where
        Self: Sized,
    {
        let json = self.load_raw(key)?;
        serde_json::from_str(&json).ok()
    }
}

/// In-memory storage for tests and for platforms without persistent storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load_raw(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn save_raw(&self, key: &str, value: &str) -> bool {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value.to_string());
                true
            }
            Err(_) => false,
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

// =========================================
// Web (WASM) implementation
// =========================================

/// `window.localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformStorage;

#[cfg(target_arch = "wasm32")]
impl PlatformStorage {
    pub fn new() -> Self {
        Self
    }

    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for PlatformStorage {
    fn load_raw(&self, key: &str) -> Option<String> {
        Self::local_storage()?.get_item(key).ok()?
    }

    fn save_raw(&self, key: &str, value: &str) -> bool {
        Self::local_storage()
            .map(|storage| storage.set_item(key, value).is_ok())
            .unwrap_or(false)
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

// =========================================
// Desktop (native) implementation
// =========================================

/// JSON files in a directory, one per key.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct PlatformStorage {
    dir: Option<std::path::PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for PlatformStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PlatformStorage {
    /// Storage under the user's config directory.
    pub fn new() -> Self {
        Self {
            dir: dirs::config_dir().map(|dir| dir.join("spacedash")),
        }
    }

    pub fn in_dir(dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    fn file_path(&self, key: &str) -> Option<std::path::PathBuf> {
        let dir = self.dir.as_ref()?;
        if !dir.exists() {
            std::fs::create_dir_all(dir).ok()?;
        }
        let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        Some(dir.join(format!("{safe_key}.json")))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Storage for PlatformStorage {
    fn load_raw(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.file_path(key)?).ok()
    }

    fn save_raw(&self, key: &str, value: &str) -> bool {
        let Some(path) = self.file_path(key) else {
            return false;
        };
        std::fs::write(path, value).is_ok()
    }

    fn remove(&self, key: &str) {
        if let Some(path) = self.file_path(key) {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trips_typed_values() {
        let storage = MemoryStorage::new();
        assert!(storage.save("spaces", &vec!["a".to_string(), "b".to_string()]));
        assert_eq!(
            storage.load::<Vec<String>>("spaces"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        storage.remove("spaces");
        assert_eq!(storage.load::<Vec<String>>("spaces"), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn file_storage_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PlatformStorage::in_dir(dir.path());

        assert!(storage.save_raw("cache:user/profile", "{}"));
        assert!(dir.path().join("cache_user_profile.json").exists());
        assert_eq!(storage.load_raw("cache:user/profile").as_deref(), Some("{}"));
    }
}
