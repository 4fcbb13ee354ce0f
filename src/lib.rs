#![doc(test(attr(deny(warnings))))]

//! Finance Core keeps a personal ledger of transactions, categories, accounts and
//! notes in memory and mirrors it into a key-value backend as a single document.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::{LedgerStore, StoreOptions, StoreWarning};
pub use crate::errors::{LedgerError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}
