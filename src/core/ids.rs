use chrono::{DateTime, Utc};

use crate::domain::RecordId;

/// Hands out record ids derived from the creation time in milliseconds.
///
/// Two creations inside the same millisecond (or a clock stepping backwards) would
/// collide on the raw timestamp, so every id is at least one above the previous one.
/// Once the top of the id range is taken, ids are handed out downwards from the
/// lowest id known to the generator.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last_issued: Option<RecordId>,
    lowest: Option<RecordId>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator that will never re-issue `floor` or anything below it.
    pub fn starting_after(floor: Option<RecordId>) -> Self {
        Self {
            last_issued: floor,
            lowest: floor,
        }
    }

    /// Generator that avoids every id in `lowest..=highest`.
    pub fn seeded(lowest: Option<RecordId>, highest: Option<RecordId>) -> Self {
        Self {
            last_issued: highest,
            lowest: lowest.or(highest),
        }
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> RecordId {
        let candidate = now.timestamp_millis();
        let id = match self.last_issued {
            Some(last) if candidate <= last => match last.checked_add(1) {
                Some(next) => next,
                None => return self.next_below(),
            },
            _ => candidate,
        };
        self.last_issued = Some(id);
        self.lowest = Some(self.lowest.map_or(id, |lowest| lowest.min(id)));
        id
    }

    pub fn last_issued(&self) -> Option<RecordId> {
        self.last_issued
    }

    fn next_below(&mut self) -> RecordId {
        let id = match self.lowest {
            Some(lowest) => lowest.saturating_sub(1),
            None => RecordId::MAX,
        };
        self.lowest = Some(id);
        id
    }
}
