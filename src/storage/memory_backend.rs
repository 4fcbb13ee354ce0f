use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::errors::{LedgerError, Result};

use super::KeyValueStore;

/// Process-local storage in the spirit of browser `localStorage`.
///
/// Clones share the same map, so a host can keep one handle for inspection while the
/// store owns another. An optional quota bounds the total bytes of all values.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: Arc::default(),
            quota: Some(quota),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items
            .read()
            .map(|items| items.contains_key(key))
            .unwrap_or(false)
    }
}

fn poisoned() -> LedgerError {
    LedgerError::Storage("memory store lock poisoned".into())
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        if let Some(quota) = self.quota {
            let others: usize = items
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(_, stored)| stored.len())
                .sum();
            let needed = others + value.len();
            if needed > quota {
                return Err(LedgerError::QuotaExceeded { needed, quota });
            }
        }
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_observe_each_others_writes() {
        let store = MemoryStore::new();
        let view = store.clone();
        store.set_item("k", "v").unwrap();
        assert_eq!(view.get_item("k").unwrap().as_deref(), Some("v"));
        view.remove_item("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn quota_counts_every_key_but_allows_overwrites() {
        let store = MemoryStore::with_quota(10);
        store.set_item("a", "12345").unwrap();
        store.set_item("a", "1234567890").unwrap();
        let err = store.set_item("b", "x").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::QuotaExceeded {
                needed: 11,
                quota: 10
            }
        ));
        assert!(!store.contains_key("b"));
    }

    #[test]
    fn item_size_reports_bytes_not_chars() {
        let store = MemoryStore::new();
        store.set_item("k", "€").unwrap();
        assert_eq!(store.item_size("k").unwrap(), Some(3));
        assert_eq!(store.item_size("missing").unwrap(), None);
    }
}
