//! `localStorage` adapter for the lead store

use leadscout_core::{KeyValueStore, MemoryStore, StorageError};
use wasm_bindgen::JsValue;

/// Snapshot storage for the dashboard
///
/// Falls back to memory when `localStorage` is unavailable (private
/// browsing, disabled storage), so reviews still work for the session.
pub enum BrowserStore {
    Local(web_sys::Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    /// Open `window.localStorage`, or a memory store if that fails
    pub fn open() -> Self {
        match local_storage() {
            Ok(storage) => BrowserStore::Local(storage),
            Err(err) => {
                web_sys::console::warn_1(
                    &format!("localStorage unavailable, reviews will not persist: {}", err).into(),
                );
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, BrowserStore::Local(_))
    }
}

fn local_storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("No window".into()))?;
    window
        .local_storage()
        .map_err(|e| StorageError::Unavailable(js_error_message(&e)))?
        .ok_or_else(|| StorageError::Unavailable("No localStorage".into()))
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            BrowserStore::Local(storage) => storage
                .get_item(key)
                .map_err(|e| StorageError::Read(js_error_message(&e))),
            BrowserStore::Memory(memory) => memory.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            BrowserStore::Local(storage) => storage
                .set_item(key, value)
                .map_err(|e| StorageError::Write(js_error_message(&e))),
            BrowserStore::Memory(memory) => memory.set(key, value),
        }
    }
}

/// Best-effort text for a thrown JS value (DOMException, Error or string)
pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }

    js_sys::Reflect::get(value, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}


#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use leadscout_core::{LeadStatus, LeadStore};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const KEY: &str = "leadscout-test-snapshot";

    #[wasm_bindgen_test]
    fn test_opens_local_storage() {
        assert!(BrowserStore::open().is_persistent());
    }

    #[wasm_bindgen_test]
    fn test_snapshot_survives_new_store() {
        let mut store = LeadStore::new(BrowserStore::open(), KEY);
        store.reset();
        store.adopt_source(Ok("Name,Company\nAda,Analytical".to_string()));
        store.set_status("lead-1", LeadStatus::Approved);

        let mut reopened = LeadStore::new(BrowserStore::open(), KEY);
        assert!(reopened.restore());
        assert_eq!(reopened.get("lead-1").unwrap().status, LeadStatus::Approved);

        reopened.reset();
    }
}
