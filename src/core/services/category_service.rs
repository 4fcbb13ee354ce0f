use chrono::{DateTime, Utc};

use crate::domain::{Category, NewCategory, RecordId};
use crate::ledger::{remove_record, replace_record, Ledger};

use super::RecordStamp;

pub struct CategoryService;

impl CategoryService {
    pub fn add(ledger: &mut Ledger, draft: NewCategory, stamp: RecordStamp) -> Category {
        let category = Category::from_draft(draft, stamp.id, stamp.at);
        ledger.categories.push(category.clone());
        category
    }

    /// Replaces the stored category with the same id. `None` when it does not exist.
    pub fn update(
        ledger: &mut Ledger,
        category: Category,
        now: DateTime<Utc>,
    ) -> Option<Category> {
        replace_record(&mut ledger.categories, category, now).cloned()
    }

    /// Removes the category. Transactions pointing at it are left alone.
    pub fn remove(ledger: &mut Ledger, id: RecordId) -> Option<Category> {
        remove_record(&mut ledger.categories, id)
    }

    pub fn list(ledger: &Ledger) -> &[Category] {
        &ledger.categories
    }
}
