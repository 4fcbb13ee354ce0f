//! Collection helpers shared by every record type.

use chrono::{DateTime, Utc};

use crate::domain::{Identifiable, RecordId, Timestamped};

/// Replaces the stored record carrying `incoming`'s id.
///
/// `created_at` is carried over from the stored record and `updated_at` never moves
/// backwards, even if the clock does. Returns the stored record after replacement,
/// or `None` when no record has that id.
pub fn replace_record<'a, T: Timestamped>(
    records: &'a mut [T],
    mut incoming: T,
    now: DateTime<Utc>,
) -> Option<&'a T> {
    let slot = records
        .iter_mut()
        .find(|record| record.id() == incoming.id())?;
    let created_at = slot.created_at();
    let updated_at = now.max(slot.updated_at()).max(created_at);
    incoming.restamp(created_at, updated_at);
    *slot = incoming;
    Some(&*slot)
}

/// Removes the record with `id`, returning it when present.
pub fn remove_record<T: Identifiable>(records: &mut Vec<T>, id: RecordId) -> Option<T> {
    let index = records.iter().position(|record| record.id() == id)?;
    Some(records.remove(index))
}
