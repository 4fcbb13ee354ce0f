mod common;

use chrono::Duration;
use common::{epoch, memory_store, reopen_memory};
use finance_core::domain::{
    NewAccount, NewCategory, NewNote, NewTransaction, TransactionFilter, TransactionKind,
};
use finance_core::storage::KeyValueStore;

#[test]
fn rehydrated_store_reproduces_every_record() {
    let (mut store, backend, clock) = memory_store();
    let food = store.add_category(NewCategory::new("Food").with_description("Groceries"));
    let cash = store.add_account(NewAccount::new("Cash"));
    clock.advance(Duration::minutes(1));
    let lunch = store.add_transaction(NewTransaction::expense(12.5, food.id, cash.id));
    let pay = store.add_transaction(NewTransaction::income(900.0, food.id, cash.id).recurring());
    store.add_note(NewNote::new("Rent", "due on the 1st"));
    let trashed = store.add_note(NewNote::new("Old", "scratch"));
    store.trash_note(trashed.id);

    let mut edited = lunch.clone();
    edited.amount = 14.0;
    clock.advance(Duration::minutes(1));
    store.update_transaction(edited);
    store.remove_transaction(pay.id);

    let reopened = reopen_memory(&backend, &clock);
    assert_eq!(reopened.ledger(), store.ledger());
    assert_eq!(reopened.list_trashed_notes()[0].id, trashed.id);
    assert_eq!(reopened.list_transactions()[0].amount, 14.0);
}

#[test]
fn balance_is_income_minus_expenses() {
    let (mut store, _, _) = memory_store();
    store.add_transaction(NewTransaction::income(500.0, 1, 1));
    store.add_transaction(NewTransaction::expense(120.0, 1, 1));
    store.add_transaction(NewTransaction::expense(30.0, 1, 1));

    let stats = store.get_stats();
    assert_eq!(stats.income_total, 500.0);
    assert_eq!(stats.expense_total, 150.0);
    assert_eq!(stats.balance, 350.0);
    assert_eq!(stats.transaction_count, 3);
    assert_eq!(store.balance(), store.income_total() - store.expense_total());
}

#[test]
fn empty_ledger_reports_zero_totals() {
    let (store, _, _) = memory_store();
    let stats = store.get_stats();
    assert_eq!(stats.balance, 0.0);
    assert!(store.recent_transactions(5).is_empty());
}

#[test]
fn removing_unknown_id_leaves_lists_unchanged() {
    let (mut store, _, _) = memory_store();
    store.add_category(NewCategory::new("Food"));
    let before = store.list_categories().to_vec();

    assert!(store.remove_category(1).is_none());
    assert!(store.remove_note(1).is_none());
    assert_eq!(store.list_categories(), before.as_slice());
}

#[test]
fn update_keeps_identity_and_creation_time() {
    let (mut store, _, clock) = memory_store();
    let cash = store.add_account(NewAccount::new("Cash"));

    clock.advance(Duration::hours(1));
    let mut renamed = cash.clone();
    renamed.name = "Wallet".into();
    renamed.created_at = epoch() + Duration::days(30);
    let stored = store.update_account(renamed).expect("account exists");

    assert_eq!(stored.id, cash.id);
    assert_eq!(stored.created_at, cash.created_at);
    assert_eq!(stored.updated_at, epoch() + Duration::hours(1));

    clock.set(epoch() - Duration::days(1));
    let stored = store.update_account(stored.clone()).expect("account exists");
    assert_eq!(stored.updated_at, epoch() + Duration::hours(1));
}

#[test]
fn updating_unknown_id_is_a_silent_no_op() {
    let (mut store, backend, _) = memory_store();
    let cash = store.add_account(NewAccount::new("Cash"));
    store.remove_account(cash.id);
    let persisted = backend.get_item("finance-storage").unwrap();

    assert!(store.update_account(cash).is_none());
    assert!(store.list_accounts().is_empty());
    assert_eq!(backend.get_item("finance-storage").unwrap(), persisted);
    assert!(!store.has_warnings());
}

#[test]
fn recent_returns_newest_first() {
    let (mut store, _, clock) = memory_store();
    let t1 = store.add_transaction(NewTransaction::income(1.0, 1, 1));
    clock.advance(Duration::minutes(1));
    let t2 = store.add_transaction(NewTransaction::income(2.0, 1, 1));
    clock.advance(Duration::minutes(1));
    let t3 = store.add_transaction(NewTransaction::income(3.0, 1, 1));

    let recent: Vec<_> = store.recent_transactions(2).iter().map(|t| t.id).collect();
    assert_eq!(recent, vec![t3.id, t2.id]);
    assert_eq!(store.recent_transactions(10).len(), 3);
    assert_eq!(store.recent_transactions(10)[2].id, t1.id);
}

#[test]
fn equal_timestamps_keep_insertion_order() {
    let (mut store, _, _) = memory_store();
    let first = store.add_transaction(NewTransaction::income(1.0, 1, 1));
    let second = store.add_transaction(NewTransaction::income(2.0, 1, 1));
    assert_eq!(first.created_at, second.created_at);
    assert_ne!(first.id, second.id);

    let ids: Vec<_> = store.recent_transactions(2).iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn filtered_listing_matches_kind() {
    let (mut store, _, clock) = memory_store();
    store.add_transaction(NewTransaction::income(10.0, 1, 1));
    clock.advance(Duration::seconds(1));
    store.add_transaction(NewTransaction::expense(4.0, 1, 1));

    let expenses = store.transactions_by_kind(TransactionFilter::Expense);
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].kind, TransactionKind::Expense);
    assert_eq!(store.transactions_by_kind(TransactionFilter::All).len(), 2);
}

#[test]
fn deleting_a_category_orphans_but_keeps_transactions() {
    let (mut store, _, _) = memory_store();
    let food = store.add_category(NewCategory::new("Food"));
    let cash = store.add_account(NewAccount::new("Cash"));
    let txn = store.add_transaction(NewTransaction::expense(8.0, food.id, cash.id));

    assert_eq!(store.category_name(txn.category_id), "Food");
    store.remove_category(food.id);

    assert_eq!(store.list_transactions().len(), 1);
    assert_eq!(store.category_name(txn.category_id), "Unknown");
    assert_eq!(store.account_name(txn.account_id), "Cash");
    assert_eq!(store.reference_warnings().len(), 1);
}

#[test]
fn clear_storage_empties_everything() {
    let (mut store, backend, clock) = memory_store();
    store.seed_sample_data();
    store.add_transaction(NewTransaction::income(1.0, 1, 1));
    store.add_note(NewNote::new("n", "c"));
    assert_ne!(store.storage_size(), "0 KB");

    store.clear_storage().expect("clear succeeds");

    assert!(store.list_categories().is_empty());
    assert!(store.list_accounts().is_empty());
    assert!(store.list_transactions().is_empty());
    assert!(store.list_notes().is_empty());
    assert_eq!(store.storage_size(), "0 KB");
    assert!(reopen_memory(&backend, &clock).ledger().is_empty());
}

#[test]
fn ids_stay_fresh_after_reopen() {
    let (mut store, backend, clock) = memory_store();
    let first = store.add_note(NewNote::new("a", ""));
    assert_eq!(first.id, 1_735_723_800_000);

    let mut reopened = reopen_memory(&backend, &clock);
    let second = reopened.add_note(NewNote::new("b", ""));
    assert_eq!(second.id, first.id + 1);
}

#[test]
fn non_finite_amounts_do_not_cost_the_rest_of_the_ledger() {
    let (mut store, backend, clock) = memory_store();
    let food = store.add_category(NewCategory::new("Food"));
    store.add_transaction(NewTransaction::income(f64::NAN, food.id, 1));
    store.add_transaction(NewTransaction::expense(f64::INFINITY, food.id, 1));
    assert!(store.take_warnings().is_empty());

    let mut reopened = reopen_memory(&backend, &clock);
    assert!(reopened.take_warnings().is_empty());
    assert_eq!(reopened.list_categories().len(), 1);

    let amounts: Vec<f64> = reopened
        .list_transactions()
        .iter()
        .map(|txn| txn.amount)
        .collect();
    assert_eq!(amounts.len(), 2);
    assert!(amounts[0].is_nan());
    assert_eq!(amounts[1], f64::INFINITY);
}

#[test]
fn id_at_the_top_of_the_range_does_not_stall_new_records() {
    let backend = finance_core::storage::MemoryStore::new();
    backend
        .set_item(
            "finance-storage",
            r#"{"state":{"transactions":[],"categories":[{"id":9223372036854775807,"user_id":null,"name":"Top","description":null,"created_at":"2025-01-01T09:30:00Z","updated_at":"2025-01-01T09:30:00Z"}],"accounts":[],"notes":[]},"version":1}"#,
        )
        .unwrap();
    let clock = finance_core::core::ManualClock::new(epoch());
    let mut store = reopen_memory(&backend, &clock);
    assert!(store.take_warnings().is_empty());

    let first = store.add_category(NewCategory::new("Food"));
    let second = store.add_account(NewAccount::new("Cash"));
    assert_eq!(first.id, i64::MAX - 1);
    assert_eq!(second.id, i64::MAX - 2);
    assert_eq!(store.list_categories().len(), 2);
}
