use chrono::{DateTime, Duration, TimeZone, Utc};
use finance_core::{
    core::services::{
        AccountService, CategoryService, NoteService, RecordStamp, SummaryService,
        TransactionService,
    },
    domain::{NewAccount, NewCategory, NewNote, NewTransaction, TransactionFilter},
    ledger::Ledger,
};

fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 10, 8, 0, 0).unwrap() + Duration::minutes(minute)
}

fn stamp(id: i64, minute: i64) -> RecordStamp {
    RecordStamp { id, at: at(minute) }
}

fn prepared_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    let bills = CategoryService::add(&mut ledger, NewCategory::new("Bills"), stamp(1, 0));
    let salary = CategoryService::add(&mut ledger, NewCategory::new("Salary"), stamp(2, 0));
    let checking = AccountService::add(&mut ledger, NewAccount::new("Checking"), stamp(3, 0));

    TransactionService::add(
        &mut ledger,
        NewTransaction::income(1800.0, salary.id, checking.id),
        stamp(4, 1),
    );
    TransactionService::add(
        &mut ledger,
        NewTransaction::expense(250.0, bills.id, checking.id).recurring(),
        stamp(5, 2),
    );
    ledger
}

#[test]
fn services_produce_summary_totals() {
    let ledger = prepared_ledger();
    let totals = SummaryService::totals(&ledger);
    assert_eq!(totals.income_total, 1800.0);
    assert_eq!(totals.expense_total, 250.0);
    assert_eq!(totals.balance, 1550.0);

    let expenses = SummaryService::by_kind(&ledger, TransactionFilter::Expense);
    assert_eq!(expenses.len(), 1);
    assert!(expenses[0].is_recursive);
    assert_eq!(SummaryService::recent(&ledger, 1)[0].id, 5);
}

#[test]
fn category_crud_roundtrip() {
    let mut ledger = Ledger::new();
    let category = CategoryService::add(&mut ledger, NewCategory::new("Subscriptions"), stamp(1, 0));

    let mut update = category.clone();
    update.name = "Subscriptions & Media".into();
    CategoryService::update(&mut ledger, update, at(5)).expect("category exists");

    let fetched = ledger.category(category.id).unwrap();
    assert_eq!(fetched.name, "Subscriptions & Media");
    assert_eq!(fetched.updated_at, at(5));

    CategoryService::remove(&mut ledger, category.id).expect("category exists");
    assert!(ledger.category(category.id).is_none());
    assert!(CategoryService::remove(&mut ledger, category.id).is_none());
}

#[test]
fn account_removal_leaves_transactions_in_place() {
    let mut ledger = prepared_ledger();
    AccountService::remove(&mut ledger, 3).expect("account exists");

    assert_eq!(TransactionService::list(&ledger).len(), 2);
    assert_eq!(ledger.account_name(3), "Unknown");
    assert_eq!(ledger.reference_warnings().len(), 2);
}

#[test]
fn note_trash_keeps_the_record_in_the_document() {
    let mut ledger = Ledger::new();
    let note = NoteService::add(&mut ledger, NewNote::new("Ideas", "cancel gym"), stamp(9, 0));

    NoteService::trash(&mut ledger, note.id, at(1)).expect("note exists");
    assert!(NoteService::list(&ledger).is_empty());
    assert_eq!(NoteService::list_trashed(&ledger).len(), 1);
    assert_eq!(ledger.notes.len(), 1);

    let mut edited = ledger.note(note.id).cloned().unwrap();
    edited.content = "cancel gym, keep pool".into();
    edited.deleted_at = None;
    let stored = NoteService::update(&mut ledger, edited, at(2)).expect("note exists");
    assert!(stored.is_trashed());

    NoteService::restore(&mut ledger, note.id, at(3)).expect("note exists");
    assert_eq!(NoteService::list(&ledger)[0].content, "cancel gym, keep pool");
}
