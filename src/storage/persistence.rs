//! The persisted ledger document and helpers around it.
//!
//! Layout (compact JSON, one key):
//!
//! ```text
//! {"state":{"transactions":[..],"categories":[..],"accounts":[..],"notes":[..]},"version":1}
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::ledger::Ledger;

/// Newest document layout this build reads and the one it writes.
pub const DOCUMENT_VERSION: u32 = 1;

/// Size reported when nothing is persisted.
pub const EMPTY_STORAGE_SIZE: &str = "0 KB";

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerDocument {
    pub state: Ledger,
    #[serde(default)]
    pub version: u32,
}

impl LedgerDocument {
    pub fn new(state: Ledger) -> Self {
        Self {
            state,
            version: DOCUMENT_VERSION,
        }
    }

    /// Serializes a ledger snapshot without cloning it.
    pub fn encode(ledger: &Ledger) -> Result<String> {
        #[derive(Serialize)]
        struct Borrowed<'a> {
            state: &'a Ledger,
            version: u32,
        }
        Ok(serde_json::to_string(&Borrowed {
            state: ledger,
            version: DOCUMENT_VERSION,
        })?)
    }

    /// Parses a stored document, rejecting layouts newer than [`DOCUMENT_VERSION`].
    pub fn decode(raw: &str) -> Result<Ledger> {
        let document: LedgerDocument = serde_json::from_str(raw)?;
        if document.version > DOCUMENT_VERSION {
            return Err(LedgerError::UnsupportedVersion {
                found: document.version,
                supported: DOCUMENT_VERSION,
            });
        }
        Ok(document.state)
    }
}

/// Human-readable byte count: `"512 B"`, `"1.50 KB"`, `"2.00 MB"` (base 1024).
pub fn format_storage_size(bytes: usize) -> String {
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} B")
    } else if value < MIB {
        format!("{:.2} KB", value / KIB)
    } else {
        format!("{:.2} MB", value / MIB)
    }
}
