//! C ABI over [`LedgerStore`] for mobile and desktop shells.
//!
//! Every fallible call returns an `i32` status: `0` on success, otherwise the
//! [`FfiErrorCategory`] of the failure. The message of the last failure on the calling
//! thread is available through [`ffi_last_error_message`].
//!
//! Pointer contract for every `unsafe` function here: handles must come from
//! `ffi_store_open_*` and not be used after `ffi_store_free`; string arguments must be
//! NUL-terminated UTF-8 or null where documented; out-pointers must be valid for writes.
//! Strings returned through out-pointers are owned by the caller and released with
//! [`ffi_string_free`].
#![allow(clippy::missing_safety_doc)]

use std::{
    cell::RefCell,
    ffi::{CStr, CString},
    os::raw::{c_char, c_double, c_int},
    ptr,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::de::DeserializeOwned;

use crate::core::validation::{check_amount, optional_text, require_name};
use crate::core::{LedgerStore, StoreOptions};
use crate::domain::{
    Account, Category, NewAccount, NewCategory, NewNote, NewTransaction, Note, RecordId,
    Transaction, TransactionKind,
};
use crate::errors::LedgerError;
use crate::storage::{JsonFileStore, MemoryStore};

/// Semantic version of the Rust core (mirrors `Cargo.toml`).
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Semantic version of the FFI surface. Bumps when ABI/contract changes.
pub const FFI_VERSION: &str = "1.0.0";

/// Error categories surfaced across the FFI boundary.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCategory {
    Ok = 0,
    Validation = 1,
    Persistence = 2,
    Internal = 3,
}

impl From<FfiErrorCategory> for i32 {
    fn from(value: FfiErrorCategory) -> Self {
        value as i32
    }
}

/// Record collection addressed by `ffi_store_update` and `ffi_store_remove`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiEntity {
    Category = 0,
    Account = 1,
    Transaction = 2,
    Note = 3,
}

impl TryFrom<c_int> for FfiEntity {
    type Error = FfiFailure;

    fn try_from(code: c_int) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(FfiEntity::Category),
            1 => Ok(FfiEntity::Account),
            2 => Ok(FfiEntity::Transaction),
            3 => Ok(FfiEntity::Note),
            other => Err(FfiFailure::validation(format!("unknown entity code {other}"))),
        }
    }
}

/// Totals reported by `ffi_store_stats`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FfiLedgerStats {
    pub income_total: c_double,
    pub expense_total: c_double,
    pub balance: c_double,
    pub transaction_count: u64,
}

/// Opaque store handle owned by the foreign caller.
pub struct FfiStoreHandle {
    store: Mutex<LedgerStore>,
}

impl FfiStoreHandle {
    fn into_raw(store: LedgerStore) -> *mut Self {
        Box::into_raw(Box::new(Self {
            store: Mutex::new(store),
        }))
    }
}

#[derive(Debug)]
pub struct FfiFailure {
    category: FfiErrorCategory,
    message: String,
}

impl FfiFailure {
    fn validation(message: impl Into<String>) -> Self {
        Self {
            category: FfiErrorCategory::Validation,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            category: FfiErrorCategory::Internal,
            message: message.into(),
        }
    }
}

impl From<LedgerError> for FfiFailure {
    fn from(err: LedgerError) -> Self {
        Self {
            category: classify_error(&err),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FfiFailure {
    fn from(err: serde_json::Error) -> Self {
        FfiFailure::validation(format!("record JSON rejected: {err}"))
    }
}

/// Maps a core error onto the category reported to foreign callers.
pub fn classify_error(err: &LedgerError) -> FfiErrorCategory {
    match err {
        LedgerError::InvalidInput(_) | LedgerError::Config(_) => FfiErrorCategory::Validation,
        other if other.is_persistence() => FfiErrorCategory::Persistence,
        _ => FfiErrorCategory::Internal,
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<FfiFailure>> = const { RefCell::new(None) };
}

fn finish(result: Result<(), FfiFailure>) -> c_int {
    match result {
        Ok(()) => {
            LAST_ERROR.with(|slot| slot.borrow_mut().take());
            FfiErrorCategory::Ok.into()
        }
        Err(failure) => {
            let code: c_int = failure.category.into();
            tracing::debug!(code, message = %failure.message, "ffi call failed");
            LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(failure));
            code
        }
    }
}

fn guarded(call: impl FnOnce() -> Result<(), FfiFailure>) -> c_int {
    finish(call())
}

unsafe fn lock<'a>(
    handle: *const FfiStoreHandle,
) -> Result<MutexGuard<'a, LedgerStore>, FfiFailure> {
    let handle = handle
        .as_ref()
        .ok_or_else(|| FfiFailure::validation("store handle pointer was null"))?;
    handle
        .store
        .lock()
        .map_err(|_| FfiFailure::internal("store lock poisoned"))
}

unsafe fn string_arg(ptr: *const c_char, what: &str) -> Result<String, FfiFailure> {
    if ptr.is_null() {
        return Err(FfiFailure::validation(format!("{what} pointer was null")));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(str::to_string)
        .map_err(|_| FfiFailure::validation(format!("{what} is not valid UTF-8")))
}

unsafe fn optional_string_arg(
    ptr: *const c_char,
    what: &str,
) -> Result<Option<String>, FfiFailure> {
    if ptr.is_null() {
        return Ok(None);
    }
    string_arg(ptr, what).map(|value| optional_text(Some(&value)))
}

unsafe fn write_out<T>(target: *mut T, value: T) {
    if !target.is_null() {
        *target = value;
    }
}

unsafe fn write_string(target: *mut *mut c_char, value: String) -> Result<(), FfiFailure> {
    if target.is_null() {
        return Err(FfiFailure::validation("output pointer was null"));
    }
    let cstring =
        CString::new(value).map_err(|_| FfiFailure::internal("string contained a NUL byte"))?;
    *target = cstring.into_raw();
    Ok(())
}

fn parse_record<T: DeserializeOwned>(json: &str) -> Result<T, FfiFailure> {
    Ok(serde_json::from_str(json)?)
}

/// Returns the core (Rust) semantic version as a C string.
#[no_mangle]
pub extern "C" fn ffi_core_version() -> *const c_char {
    static CORE: OnceLock<CString> = OnceLock::new();
    CORE.get_or_init(|| CString::new(CORE_VERSION).unwrap_or_default())
        .as_ptr()
}

/// Returns the FFI interface semantic version as a C string.
#[no_mangle]
pub extern "C" fn ffi_version() -> *const c_char {
    static FFI: OnceLock<CString> = OnceLock::new();
    FFI.get_or_init(|| CString::new(FFI_VERSION).unwrap_or_default())
        .as_ptr()
}

/// Opens (or creates) a file-backed store in `dir`.
#[no_mangle]
pub unsafe extern "C" fn ffi_store_open_dir(
    dir: *const c_char,
    out_handle: *mut *mut FfiStoreHandle,
) -> c_int {
    guarded(|| {
        if out_handle.is_null() {
            return Err(FfiFailure::validation("output handle pointer was null"));
        }
        let dir = string_arg(dir, "path")?;
        let backend = JsonFileStore::new(dir)?;
        let store = LedgerStore::open(Box::new(backend), StoreOptions::default());
        *out_handle = FfiStoreHandle::into_raw(store);
        Ok(())
    })
}

/// Opens a store that lives only as long as the handle.
#[no_mangle]
pub unsafe extern "C" fn ffi_store_open_memory(out_handle: *mut *mut FfiStoreHandle) -> c_int {
    guarded(|| {
        if out_handle.is_null() {
            return Err(FfiFailure::validation("output handle pointer was null"));
        }
        let store = LedgerStore::open(Box::new(MemoryStore::new()), StoreOptions::default());
        *out_handle = FfiStoreHandle::into_raw(store);
        Ok(())
    })
}

#[no_mangle]
pub unsafe extern "C" fn ffi_store_free(handle: *mut FfiStoreHandle) {
    if handle.is_null() {
        return;
    }
    drop(Box::from_raw(handle));
}

/// Adds a category. `description` may be null.
#[no_mangle]
pub unsafe extern "C" fn ffi_store_add_category(
    handle: *const FfiStoreHandle,
    name: *const c_char,
    description: *const c_char,
    out_id: *mut RecordId,
) -> c_int {
    guarded(|| {
        let name = require_name("name", &string_arg(name, "name")?)?;
        let description = optional_string_arg(description, "description")?;
        let category = lock(handle)?.add_category(NewCategory {
            owner: None,
            name,
            description,
        });
        write_out(out_id, category.id);
        Ok(())
    })
}

/// Adds an account. `description` may be null.
#[no_mangle]
pub unsafe extern "C" fn ffi_store_add_account(
    handle: *const FfiStoreHandle,
    name: *const c_char,
    description: *const c_char,
    out_id: *mut RecordId,
) -> c_int {
    guarded(|| {
        let name = require_name("name", &string_arg(name, "name")?)?;
        let description = optional_string_arg(description, "description")?;
        let account = lock(handle)?.add_account(NewAccount {
            owner: None,
            name,
            description,
        });
        write_out(out_id, account.id);
        Ok(())
    })
}

/// Adds a transaction. `kind` is `0` for income and `1` for expense.
#[no_mangle]
pub unsafe extern "C" fn ffi_store_add_transaction(
    handle: *const FfiStoreHandle,
    kind: c_int,
    amount: c_double,
    category_id: RecordId,
    account_id: RecordId,
    recurring: bool,
    out_id: *mut RecordId,
) -> c_int {
    guarded(|| {
        let kind = match kind {
            0 => TransactionKind::Income,
            1 => TransactionKind::Expense,
            other => {
                return Err(FfiFailure::validation(format!(
                    "unknown transaction kind {other}"
                )))
            }
        };
        let mut draft = NewTransaction::new(kind, check_amount(amount)?, category_id, account_id);
        draft.is_recursive = recurring;
        let txn = lock(handle)?.add_transaction(draft);
        write_out(out_id, txn.id);
        Ok(())
    })
}

/// Adds a note. `content` may be null for an empty body.
#[no_mangle]
pub unsafe extern "C" fn ffi_store_add_note(
    handle: *const FfiStoreHandle,
    title: *const c_char,
    content: *const c_char,
    out_id: *mut RecordId,
) -> c_int {
    guarded(|| {
        let title = require_name("title", &string_arg(title, "title")?)?;
        let content = if content.is_null() {
            String::new()
        } else {
            string_arg(content, "content")?
        };
        let note = lock(handle)?.add_note(NewNote::new(title, content));
        write_out(out_id, note.id);
        Ok(())
    })
}

/// Replaces a record from its JSON form (as found in the snapshot).
///
/// `out_found` receives whether a record with that id existed; it may be null.
#[no_mangle]
pub unsafe extern "C" fn ffi_store_update(
    handle: *const FfiStoreHandle,
    entity: c_int,
    record_json: *const c_char,
    out_found: *mut bool,
) -> c_int {
    guarded(|| {
        let entity = FfiEntity::try_from(entity)?;
        let json = string_arg(record_json, "record JSON")?;
        let found = match entity {
            FfiEntity::Category => {
                let mut category: Category = parse_record(&json)?;
                category.name = require_name("name", &category.name)?;
                lock(handle)?.update_category(category).is_some()
            }
            FfiEntity::Account => {
                let mut account: Account = parse_record(&json)?;
                account.name = require_name("name", &account.name)?;
                lock(handle)?.update_account(account).is_some()
            }
            FfiEntity::Transaction => {
                let txn: Transaction = parse_record(&json)?;
                check_amount(txn.amount)?;
                lock(handle)?.update_transaction(txn).is_some()
            }
            FfiEntity::Note => {
                let mut note: Note = parse_record(&json)?;
                note.title = require_name("title", &note.title)?;
                lock(handle)?.update_note(note).is_some()
            }
        };
        write_out(out_found, found);
        Ok(())
    })
}

/// Removes a record by id. Unknown ids succeed with `out_found` set to false.
#[no_mangle]
pub unsafe extern "C" fn ffi_store_remove(
    handle: *const FfiStoreHandle,
    entity: c_int,
    id: RecordId,
    out_found: *mut bool,
) -> c_int {
    guarded(|| {
        let entity = FfiEntity::try_from(entity)?;
        let mut store = lock(handle)?;
        let found = match entity {
            FfiEntity::Category => store.remove_category(id).is_some(),
            FfiEntity::Account => store.remove_account(id).is_some(),
            FfiEntity::Transaction => store.remove_transaction(id).is_some(),
            FfiEntity::Note => store.remove_note(id).is_some(),
        };
        write_out(out_found, found);
        Ok(())
    })
}

/// Moves a note to the trash (`trashed = true`) or restores it.
#[no_mangle]
pub unsafe extern "C" fn ffi_store_set_note_trashed(
    handle: *const FfiStoreHandle,
    id: RecordId,
    trashed: bool,
    out_found: *mut bool,
) -> c_int {
    guarded(|| {
        let mut store = lock(handle)?;
        let found = if trashed {
            store.trash_note(id).is_some()
        } else {
            store.restore_note(id).is_some()
        };
        write_out(out_found, found);
        Ok(())
    })
}

/// Writes the persisted-document JSON of the current state to `out_json`.
#[no_mangle]
pub unsafe extern "C" fn ffi_store_snapshot(
    handle: *const FfiStoreHandle,
    out_json: *mut *mut c_char,
) -> c_int {
    guarded(|| {
        let json = lock(handle)?.export_json()?;
        write_string(out_json, json)
    })
}

#[no_mangle]
pub unsafe extern "C" fn ffi_store_stats(
    handle: *const FfiStoreHandle,
    out_stats: *mut FfiLedgerStats,
) -> c_int {
    guarded(|| {
        if out_stats.is_null() {
            return Err(FfiFailure::validation("output stats pointer was null"));
        }
        let stats = lock(handle)?.get_stats();
        *out_stats = FfiLedgerStats {
            income_total: stats.income_total,
            expense_total: stats.expense_total,
            balance: stats.balance,
            transaction_count: stats.transaction_count as u64,
        };
        Ok(())
    })
}

/// Writes the human-readable size of the persisted document (e.g. `"1.20 KB"`).
#[no_mangle]
pub unsafe extern "C" fn ffi_store_storage_size(
    handle: *const FfiStoreHandle,
    out_size: *mut *mut c_char,
) -> c_int {
    guarded(|| {
        let size = lock(handle)?.storage_size();
        write_string(out_size, size)
    })
}

#[no_mangle]
pub unsafe extern "C" fn ffi_store_clear(handle: *const FfiStoreHandle) -> c_int {
    guarded(|| Ok(lock(handle)?.clear_storage()?))
}

/// Drains pending persistence warnings as a JSON array of messages.
#[no_mangle]
pub unsafe extern "C" fn ffi_store_take_warnings(
    handle: *const FfiStoreHandle,
    out_json: *mut *mut c_char,
) -> c_int {
    guarded(|| {
        let messages: Vec<String> = lock(handle)?
            .take_warnings()
            .iter()
            .map(ToString::to_string)
            .collect();
        write_string(out_json, serde_json::to_string(&messages).map_err(LedgerError::from)?)
    })
}

/// Category code of the last failure on this thread (`0` when the last call succeeded).
#[no_mangle]
pub extern "C" fn ffi_last_error_category() -> c_int {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|failure| failure.category.into())
            .unwrap_or(FfiErrorCategory::Ok.into())
    })
}

/// Copies the last failure message into `buffer` (NUL-terminated, truncated to fit).
///
/// Returns the number of bytes written without the terminator, or `0` when there is
/// no message or no room.
#[no_mangle]
pub unsafe extern "C" fn ffi_last_error_message(buffer: *mut c_char, length: usize) -> c_int {
    if buffer.is_null() || length == 0 {
        return 0;
    }
    LAST_ERROR.with(|slot| {
        let slot = slot.borrow();
        let Some(failure) = slot.as_ref() else {
            *buffer = 0;
            return 0;
        };
        let bytes = failure.message.as_bytes();
        let count = bytes.len().min(length - 1);
        ptr::copy_nonoverlapping(bytes.as_ptr().cast::<c_char>(), buffer, count);
        *buffer.add(count) = 0;
        count as c_int
    })
}

/// Releases a string previously returned by this library.
#[no_mangle]
pub unsafe extern "C" fn ffi_string_free(value: *mut c_char) {
    if value.is_null() {
        return;
    }
    drop(CString::from_raw(value));
}
