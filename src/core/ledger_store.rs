use std::cell::RefCell;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::{Config, DEFAULT_SESSION_KEY, DEFAULT_STORAGE_KEY};
use crate::domain::{
    Account, Category, NewAccount, NewCategory, NewNote, NewTransaction, Note, RecordId,
    SessionState, Transaction, TransactionFilter, UserProfile,
};
use crate::errors::{LedgerError, Result};
use crate::ledger::{Ledger, LedgerStats};
use crate::storage::{format_storage_size, KeyValueStore, LedgerDocument, EMPTY_STORAGE_SIZE};

use super::ids::IdGenerator;
use super::services::{
    AccountService, CategoryService, NoteService, RecordStamp, SummaryService, TransactionService,
};
use super::time::{Clock, SystemClock};

/// Where and how a [`LedgerStore`] keeps its documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub storage_key: String,
    pub session_key: String,
    /// Adds the default categories and accounts to empty collections at open.
    pub seed_sample_data: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.into(),
            session_key: DEFAULT_SESSION_KEY.into(),
            seed_sample_data: false,
        }
    }
}

impl From<&Config> for StoreOptions {
    fn from(config: &Config) -> Self {
        Self {
            storage_key: config.storage_key.clone(),
            session_key: config.session_key.clone(),
            seed_sample_data: config.seed_sample_data,
        }
    }
}

/// Non-fatal persistence problem. The in-memory state stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWarning {
    /// The stored document could not be read or parsed; the store started empty.
    HydrateFailed { key: String, reason: String },
    /// A mutation could not be written through to the backend.
    WriteFailed { key: String, reason: String },
    /// The backend could not report the size of the stored document.
    SizeUnavailable { key: String, reason: String },
}

impl fmt::Display for StoreWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreWarning::HydrateFailed { key, reason } => {
                write!(f, "could not load `{key}`, starting empty: {reason}")
            }
            StoreWarning::WriteFailed { key, reason } => {
                write!(f, "changes were not saved to `{key}`: {reason}")
            }
            StoreWarning::SizeUnavailable { key, reason } => {
                write!(f, "size of `{key}` is unavailable: {reason}")
            }
        }
    }
}

/// Owns the four record collections and mirrors them into a key-value backend.
///
/// Every mutation is applied in memory first and then written through as a single
/// document. A failed write is recorded as a [`StoreWarning`] instead of undoing the
/// mutation; hosts drain those with [`LedgerStore::take_warnings`].
pub struct LedgerStore {
    ledger: Ledger,
    session: SessionState,
    backend: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    ids: IdGenerator,
    options: StoreOptions,
    warnings: RefCell<Vec<StoreWarning>>,
}

impl LedgerStore {
    pub fn open(backend: Box<dyn KeyValueStore>, options: StoreOptions) -> Self {
        Self::with_clock(backend, Box::new(SystemClock), options)
    }

    /// Opens the store and hydrates it from `backend`.
    pub fn with_clock(
        backend: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        options: StoreOptions,
    ) -> Self {
        let mut warnings = Vec::new();
        let ledger = hydrate_ledger(backend.as_ref(), &options.storage_key, &mut warnings);
        let session = hydrate_session(backend.as_ref(), &options.session_key, &mut warnings);

        for problem in ledger.reference_warnings() {
            warn!(key = %options.storage_key, "{problem}");
        }

        let profile_id = session.profile.as_ref().map(|profile| profile.id);
        let highest = ledger.max_record_id().max(profile_id);
        let lowest = match (ledger.min_record_id(), profile_id) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let seed = options.seed_sample_data;
        let mut store = Self {
            ledger,
            session,
            backend,
            clock,
            ids: IdGenerator::seeded(lowest, highest),
            options,
            warnings: RefCell::new(warnings),
        };
        if seed {
            store.seed_sample_data();
        }
        info!(
            key = %store.options.storage_key,
            records = store.ledger.record_count(),
            "ledger store opened"
        );
        store
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    // ----- categories -----

    pub fn add_category(&mut self, draft: NewCategory) -> Category {
        let stamp = self.stamp();
        let category = CategoryService::add(&mut self.ledger, draft, stamp);
        self.persist();
        category
    }

    /// Replaces the stored category with the same id. Unknown ids are ignored.
    pub fn update_category(&mut self, category: Category) -> Option<Category> {
        let id = category.id;
        let now = self.clock.now();
        let updated = CategoryService::update(&mut self.ledger, category, now);
        self.finish_mutation("category", id, updated)
    }

    /// Removes the category. Transactions pointing at it are left alone.
    pub fn remove_category(&mut self, id: RecordId) -> Option<Category> {
        let removed = CategoryService::remove(&mut self.ledger, id);
        self.finish_mutation("category", id, removed)
    }

    pub fn list_categories(&self) -> &[Category] {
        CategoryService::list(&self.ledger)
    }

    pub fn category_name(&self, id: RecordId) -> &str {
        self.ledger.category_name(id)
    }

    // ----- accounts -----

    pub fn add_account(&mut self, draft: NewAccount) -> Account {
        let stamp = self.stamp();
        let account = AccountService::add(&mut self.ledger, draft, stamp);
        self.persist();
        account
    }

    pub fn update_account(&mut self, account: Account) -> Option<Account> {
        let id = account.id;
        let now = self.clock.now();
        let updated = AccountService::update(&mut self.ledger, account, now);
        self.finish_mutation("account", id, updated)
    }

    pub fn remove_account(&mut self, id: RecordId) -> Option<Account> {
        let removed = AccountService::remove(&mut self.ledger, id);
        self.finish_mutation("account", id, removed)
    }

    pub fn list_accounts(&self) -> &[Account] {
        AccountService::list(&self.ledger)
    }

    pub fn account_name(&self, id: RecordId) -> &str {
        self.ledger.account_name(id)
    }

    // ----- transactions -----

    pub fn add_transaction(&mut self, draft: NewTransaction) -> Transaction {
        let stamp = self.stamp();
        let transaction = TransactionService::add(&mut self.ledger, draft, stamp);
        self.persist();
        transaction
    }

    pub fn update_transaction(&mut self, transaction: Transaction) -> Option<Transaction> {
        let id = transaction.id;
        let now = self.clock.now();
        let updated = TransactionService::update(&mut self.ledger, transaction, now);
        self.finish_mutation("transaction", id, updated)
    }

    pub fn remove_transaction(&mut self, id: RecordId) -> Option<Transaction> {
        let removed = TransactionService::remove(&mut self.ledger, id);
        self.finish_mutation("transaction", id, removed)
    }

    pub fn list_transactions(&self) -> &[Transaction] {
        TransactionService::list(&self.ledger)
    }

    // ----- notes -----

    pub fn add_note(&mut self, draft: NewNote) -> Note {
        let stamp = self.stamp();
        let note = NoteService::add(&mut self.ledger, draft, stamp);
        self.persist();
        note
    }

    pub fn update_note(&mut self, note: Note) -> Option<Note> {
        let id = note.id;
        let now = self.clock.now();
        let updated = NoteService::update(&mut self.ledger, note, now);
        self.finish_mutation("note", id, updated)
    }

    pub fn remove_note(&mut self, id: RecordId) -> Option<Note> {
        let removed = NoteService::remove(&mut self.ledger, id);
        self.finish_mutation("note", id, removed)
    }

    pub fn trash_note(&mut self, id: RecordId) -> Option<Note> {
        let now = self.clock.now();
        let trashed = NoteService::trash(&mut self.ledger, id, now);
        self.finish_mutation("note", id, trashed)
    }

    pub fn restore_note(&mut self, id: RecordId) -> Option<Note> {
        let now = self.clock.now();
        let restored = NoteService::restore(&mut self.ledger, id, now);
        self.finish_mutation("note", id, restored)
    }

    /// Notes that are not in the trash.
    pub fn list_notes(&self) -> Vec<&Note> {
        NoteService::list(&self.ledger)
    }

    pub fn list_trashed_notes(&self) -> Vec<&Note> {
        NoteService::list_trashed(&self.ledger)
    }

    // ----- aggregates -----

    pub fn get_stats(&self) -> LedgerStats {
        SummaryService::totals(&self.ledger)
    }

    pub fn income_total(&self) -> f64 {
        self.get_stats().income_total
    }

    pub fn expense_total(&self) -> f64 {
        self.get_stats().expense_total
    }

    pub fn balance(&self) -> f64 {
        self.get_stats().balance
    }

    pub fn recent_transactions(&self, limit: usize) -> Vec<&Transaction> {
        SummaryService::recent(&self.ledger, limit)
    }

    pub fn transactions_by_kind(&self, filter: TransactionFilter) -> Vec<&Transaction> {
        SummaryService::by_kind(&self.ledger, filter)
    }

    pub fn reference_warnings(&self) -> Vec<String> {
        self.ledger.reference_warnings()
    }

    // ----- maintenance -----

    /// Size of the persisted ledger document, e.g. `"1.23 KB"`.
    pub fn storage_size(&self) -> String {
        match self.backend.item_size(&self.options.storage_key) {
            Ok(Some(bytes)) => format_storage_size(bytes),
            Ok(None) => EMPTY_STORAGE_SIZE.to_string(),
            Err(err) => {
                warn!(key = %self.options.storage_key, error = %err, "storage size unavailable");
                self.warnings.borrow_mut().push(StoreWarning::SizeUnavailable {
                    key: self.options.storage_key.clone(),
                    reason: err.to_string(),
                });
                EMPTY_STORAGE_SIZE.to_string()
            }
        }
    }

    /// Deletes the persisted document and empties every collection.
    ///
    /// The backend is cleared first; if that fails the in-memory ledger is untouched.
    pub fn clear_storage(&mut self) -> Result<()> {
        self.backend.remove_item(&self.options.storage_key)?;
        let dropped = self.ledger.record_count();
        self.ledger.clear();
        info!(key = %self.options.storage_key, dropped, "ledger storage cleared");
        Ok(())
    }

    /// Persistence warnings gathered since the last call.
    pub fn take_warnings(&mut self) -> Vec<StoreWarning> {
        std::mem::take(self.warnings.get_mut())
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.borrow().is_empty()
    }

    /// Adds the default categories and accounts to whichever of the two is empty.
    /// Returns the number of records created.
    pub fn seed_sample_data(&mut self) -> usize {
        let mut added = 0;
        if self.ledger.categories.is_empty() {
            for (name, description) in SAMPLE_CATEGORIES {
                let stamp = self.stamp();
                let draft = NewCategory::new(*name).with_description(*description);
                CategoryService::add(&mut self.ledger, draft, stamp);
                added += 1;
            }
        }
        if self.ledger.accounts.is_empty() {
            for (name, description) in SAMPLE_ACCOUNTS {
                let stamp = self.stamp();
                let draft = NewAccount::new(*name).with_description(*description);
                AccountService::add(&mut self.ledger, draft, stamp);
                added += 1;
            }
        }
        if added > 0 {
            info!(added, "sample data seeded");
            self.persist();
        }
        added
    }

    /// JSON form of the persisted document for the current state.
    pub fn export_json(&self) -> Result<String> {
        LedgerDocument::encode(&self.ledger)
    }

    // ----- session -----

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn set_guest_mode(&mut self, guest: bool) -> &SessionState {
        self.session.guest = guest;
        if guest {
            self.session.profile = None;
        }
        self.persist_session();
        &self.session
    }

    /// Signs in with a local profile, keeping the id and creation time of an existing one.
    pub fn set_profile(&mut self, name: String, email: Option<String>) -> &SessionState {
        let now = self.clock.now();
        let profile = match self.session.profile.take() {
            Some(existing) => UserProfile {
                name,
                email,
                updated_at: now.max(existing.updated_at),
                ..existing
            },
            None => UserProfile {
                id: self.ids.next_id(now),
                name,
                email,
                created_at: now,
                updated_at: now,
            },
        };
        self.session = SessionState {
            guest: false,
            profile: Some(profile),
        };
        self.persist_session();
        &self.session
    }

    pub fn sign_out(&mut self) {
        self.session = SessionState::default();
        self.persist_session();
    }

    fn stamp(&mut self) -> RecordStamp {
        let at: DateTime<Utc> = self.clock.now();
        RecordStamp {
            id: self.ids.next_id(at),
            at,
        }
    }

    fn finish_mutation<T>(&mut self, kind: &str, id: RecordId, outcome: Option<T>) -> Option<T> {
        if outcome.is_some() {
            self.persist();
        } else {
            debug!(kind, id, "no record with this id; nothing changed");
        }
        outcome
    }

    fn persist(&mut self) {
        let key = &self.options.storage_key;
        let written = LedgerDocument::encode(&self.ledger)
            .and_then(|document| self.backend.set_item(key, &document));
        if let Err(err) = written {
            warn!(key = %key, error = %err, "failed to persist ledger");
            self.warnings.get_mut().push(StoreWarning::WriteFailed {
                key: key.clone(),
                reason: err.to_string(),
            });
        }
    }

    fn persist_session(&mut self) {
        let key = &self.options.session_key;
        let written = serde_json::to_string(&self.session)
            .map_err(LedgerError::from)
            .and_then(|document| self.backend.set_item(key, &document));
        if let Err(err) = written {
            warn!(key = %key, error = %err, "failed to persist session");
            self.warnings.get_mut().push(StoreWarning::WriteFailed {
                key: key.clone(),
                reason: err.to_string(),
            });
        }
    }
}

impl fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerStore")
            .field("options", &self.options)
            .field("records", &self.ledger.record_count())
            .field("pending_warnings", &self.warnings.borrow().len())
            .finish()
    }
}

const SAMPLE_CATEGORIES: &[(&str, &str)] = &[
    ("Food & Dining", "Meals, groceries, restaurants"),
    ("Transportation", "Gas, public transit, parking"),
    ("Salary", "Monthly income"),
];

const SAMPLE_ACCOUNTS: &[(&str, &str)] = &[
    ("Cash", "Physical cash"),
    ("Bank Account", "Main checking account"),
];

fn hydrate_ledger(
    backend: &dyn KeyValueStore,
    key: &str,
    warnings: &mut Vec<StoreWarning>,
) -> Ledger {
    let loaded = backend
        .get_item(key)
        .and_then(|raw| raw.map(|raw| LedgerDocument::decode(&raw)).transpose());
    match loaded {
        Ok(Some(ledger)) => ledger,
        Ok(None) => {
            info!(key, "no stored ledger; starting empty");
            Ledger::new()
        }
        Err(err) => {
            warn!(key, error = %err, "stored ledger unreadable; starting empty");
            warnings.push(StoreWarning::HydrateFailed {
                key: key.to_string(),
                reason: err.to_string(),
            });
            Ledger::new()
        }
    }
}

fn hydrate_session(
    backend: &dyn KeyValueStore,
    key: &str,
    warnings: &mut Vec<StoreWarning>,
) -> SessionState {
    let loaded = backend.get_item(key).and_then(|raw| {
        raw.map(|raw| serde_json::from_str::<SessionState>(&raw).map_err(LedgerError::from))
            .transpose()
    });
    match loaded {
        Ok(session) => session.unwrap_or_default(),
        Err(err) => {
            warn!(key, error = %err, "stored session unreadable; signed out");
            warnings.push(StoreWarning::HydrateFailed {
                key: key.to_string(),
                reason: err.to_string(),
            });
            SessionState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::ManualClock;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn store_at(start: DateTime<Utc>) -> (LedgerStore, MemoryStore, ManualClock) {
        let backend = MemoryStore::new();
        let clock = ManualClock::new(start);
        let store = LedgerStore::with_clock(
            Box::new(backend.clone()),
            Box::new(clock.clone()),
            StoreOptions::default(),
        );
        (store, backend, clock)
    }

    fn morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn ids_come_from_the_clock_and_stay_unique_within_a_tick() {
        let (mut store, _, _) = store_at(morning());
        let food = store.add_category(NewCategory::new("Food"));
        let cash = store.add_account(NewAccount::new("Cash"));
        assert_eq!(food.id, 1_735_723_800_000);
        assert_eq!(cash.id, food.id + 1);
        assert_eq!(food.created_at, food.updated_at);
    }

    #[test]
    fn every_mutation_is_written_through() {
        let (mut store, backend, _) = store_at(morning());
        assert!(backend.is_empty());
        let note = store.add_note(NewNote::new("Rent", "due on the 1st"));
        let raw = backend.get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"title\":\"Rent\""));

        store.remove_note(note.id).expect("present");
        let raw = backend.get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"notes\":[]"));
    }

    #[test]
    fn write_failure_keeps_memory_and_queues_warning() {
        let backend = MemoryStore::with_quota(16);
        let mut store = LedgerStore::open(Box::new(backend.clone()), StoreOptions::default());

        store.add_category(NewCategory::new("Food"));

        assert_eq!(store.list_categories().len(), 1);
        let warnings = store.take_warnings();
        assert!(matches!(warnings.as_slice(), [StoreWarning::WriteFailed { .. }]));
        assert!(store.take_warnings().is_empty());
        assert!(!backend.contains_key(DEFAULT_STORAGE_KEY));
    }

    struct UnsizedBackend;

    impl KeyValueStore for UnsizedBackend {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            Ok(())
        }

        fn remove_item(&self, _key: &str) -> Result<()> {
            Ok(())
        }

        fn item_size(&self, key: &str) -> Result<Option<usize>> {
            Err(LedgerError::Storage(format!("cannot stat {key}")))
        }
    }

    #[test]
    fn size_failure_reads_as_empty_through_a_shared_borrow() {
        let mut store = LedgerStore::open(Box::new(UnsizedBackend), StoreOptions::default());
        let shared = &store;
        assert_eq!(shared.storage_size(), EMPTY_STORAGE_SIZE);
        assert!(shared.has_warnings());

        let warnings = store.take_warnings();
        assert!(matches!(
            warnings.as_slice(),
            [StoreWarning::SizeUnavailable { key, .. }] if key == DEFAULT_STORAGE_KEY
        ));
    }

    #[test]
    fn updated_at_never_moves_backwards() {
        let (mut store, _, clock) = store_at(morning());
        let mut category = store.add_category(NewCategory::new("Food"));
        clock.set(morning() - Duration::hours(2));
        category.name = "Groceries".into();

        let stored = store.update_category(category.clone()).expect("present");
        assert_eq!(stored.created_at, morning());
        assert_eq!(stored.updated_at, morning());
        assert_eq!(stored.name, "Groceries");
    }

    #[test]
    fn unknown_ids_change_nothing() {
        let (mut store, backend, _) = store_at(morning());
        assert!(store.remove_account(42).is_none());
        assert!(store.trash_note(42).is_none());
        assert!(backend.is_empty());
    }

    #[test]
    fn sample_data_only_fills_empty_collections() {
        let (mut store, _, _) = store_at(morning());
        store.add_account(NewAccount::new("Wallet"));
        assert_eq!(store.seed_sample_data(), 3);
        assert_eq!(store.list_accounts().len(), 1);
        assert_eq!(store.seed_sample_data(), 0);
        assert_eq!(store.category_name(store.list_categories()[2].id), "Salary");
    }

    #[test]
    fn profile_survives_clear_storage() {
        let (mut store, backend, clock) = store_at(morning());
        store.set_profile("Ada".into(), Some("ada@example.com".into()));
        let first_id = store.session().profile.as_ref().map(|p| p.id);
        clock.advance(Duration::minutes(1));
        store.set_profile("Ada L.".into(), None);
        assert_eq!(store.session().profile.as_ref().map(|p| p.id), first_id);

        store.add_category(NewCategory::new("Food"));
        store.clear_storage().unwrap();
        assert!(backend.contains_key(DEFAULT_SESSION_KEY));
        assert_eq!(store.session().display_name(), "Ada L.");

        store.set_guest_mode(true);
        assert!(!store.session().is_signed_in());
        assert_eq!(store.session().display_name(), "Guest");
    }
}
