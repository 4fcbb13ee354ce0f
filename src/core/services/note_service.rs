use chrono::{DateTime, Utc};

use crate::domain::{NewNote, Note, RecordId};
use crate::ledger::{remove_record, replace_record, Ledger};

use super::RecordStamp;

pub struct NoteService;

impl NoteService {
    pub fn add(ledger: &mut Ledger, draft: NewNote, stamp: RecordStamp) -> Note {
        let note = Note::from_draft(draft, stamp.id, stamp.at);
        ledger.notes.push(note.clone());
        note
    }

    /// Replaces title and content. The stored soft-delete marker is kept as is.
    pub fn update(ledger: &mut Ledger, mut note: Note, now: DateTime<Utc>) -> Option<Note> {
        note.deleted_at = ledger.note(note.id)?.deleted_at;
        replace_record(&mut ledger.notes, note, now).cloned()
    }

    /// Physically removes the note, trashed or not.
    pub fn remove(ledger: &mut Ledger, id: RecordId) -> Option<Note> {
        remove_record(&mut ledger.notes, id)
    }

    /// Marks the note deleted without dropping it from the document.
    pub fn trash(ledger: &mut Ledger, id: RecordId, now: DateTime<Utc>) -> Option<Note> {
        Self::set_marker(ledger, id, Some(now), now)
    }

    pub fn restore(ledger: &mut Ledger, id: RecordId, now: DateTime<Utc>) -> Option<Note> {
        Self::set_marker(ledger, id, None, now)
    }

    /// Notes without a delete marker, in insertion order.
    pub fn list(ledger: &Ledger) -> Vec<&Note> {
        ledger.notes.iter().filter(|note| !note.is_trashed()).collect()
    }

    pub fn list_trashed(ledger: &Ledger) -> Vec<&Note> {
        ledger.notes.iter().filter(|note| note.is_trashed()).collect()
    }

    fn set_marker(
        ledger: &mut Ledger,
        id: RecordId,
        marker: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<Note> {
        let note = ledger.notes.iter_mut().find(|note| note.id == id)?;
        note.deleted_at = marker;
        note.updated_at = now.max(note.updated_at);
        Some(note.clone())
    }
}
