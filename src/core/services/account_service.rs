use chrono::{DateTime, Utc};

use crate::domain::{Account, NewAccount, RecordId};
use crate::ledger::{remove_record, replace_record, Ledger};

use super::RecordStamp;

pub struct AccountService;

impl AccountService {
    pub fn add(ledger: &mut Ledger, draft: NewAccount, stamp: RecordStamp) -> Account {
        let account = Account::from_draft(draft, stamp.id, stamp.at);
        ledger.accounts.push(account.clone());
        account
    }

    pub fn update(ledger: &mut Ledger, account: Account, now: DateTime<Utc>) -> Option<Account> {
        replace_record(&mut ledger.accounts, account, now).cloned()
    }

    pub fn remove(ledger: &mut Ledger, id: RecordId) -> Option<Account> {
        remove_record(&mut ledger.accounts, id)
    }

    pub fn list(ledger: &Ledger) -> &[Account] {
        &ledger.accounts
    }
}
