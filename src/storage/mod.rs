pub mod json_backend;
pub mod memory_backend;
pub mod persistence;

use crate::errors::Result;

/// String key-value storage supplied by the host shell (device storage, browser local
/// storage, ...). The ledger keeps one document per key and treats the backend as a
/// passive mirror of its in-memory state.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Byte length of the stored value, if any.
    fn item_size(&self, key: &str) -> Result<Option<usize>> {
        Ok(self.get_item(key)?.map(|value| value.len()))
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }

    fn item_size(&self, key: &str) -> Result<Option<usize>> {
        (**self).item_size(key)
    }
}

pub use json_backend::JsonFileStore;
pub use memory_backend::MemoryStore;
pub use persistence::{
    format_storage_size, LedgerDocument, DOCUMENT_VERSION, EMPTY_STORAGE_SIZE,
};
