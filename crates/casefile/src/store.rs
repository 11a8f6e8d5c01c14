//! In-memory evidence store.
//!
//! The store owns the working copy of the main storage document. All
//! mutations happen synchronously on the caller; persistence and rendering
//! are driven by the layers above.

use tracing::debug;

use crate::record::{
    fresh_id, Criminal, EvidenceSet, Photo, RecordCounts, RecordDraft, RecordId, RecordKind,
    TextNote, Video,
};

/// The in-memory evidence store: four ordered lists of typed records.
///
/// This is the source of truth for rendering. The remote document replaces
/// it wholesale on load; saves serialize it wholesale.
#[derive(Debug, Clone, Default)]
pub struct EvidenceStore {
    set: EvidenceSet,
}

impl EvidenceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an existing document.
    #[must_use]
    pub fn from_set(set: EvidenceSet) -> Self {
        Self { set }
    }

    /// Replace the entire document. No partial merge.
    pub fn replace(&mut self, set: EvidenceSet) {
        self.set = set;
    }

    /// Borrow the current document.
    #[must_use]
    pub fn set(&self) -> &EvidenceSet {
        &self.set
    }

    /// Count the records in each collection.
    #[must_use]
    pub fn counts(&self) -> RecordCounts {
        self.set.counts()
    }

    /// Create a record from a draft, assigning a fresh id and appending it
    /// to the matching collection. Returns the assigned id.
    pub fn create(&mut self, draft: RecordDraft) -> RecordId {
        let id = fresh_id();
        let kind = draft.kind();

        match draft {
            RecordDraft::Photo(d) => self.set.photos.push(Photo {
                id,
                title: d.title,
                description: d.description,
                url: d.url,
                date: d.date,
            }),
            RecordDraft::Video(d) => self.set.videos.push(Video {
                id,
                title: d.title,
                description: d.description,
                url: d.url,
                thumbnail: d.thumbnail,
                date: d.date,
            }),
            RecordDraft::Text(d) => self.set.text.push(TextNote {
                id,
                title: d.title,
                content: d.content,
                date: d.date,
            }),
            RecordDraft::Criminal(d) => self.set.criminals.push(Criminal {
                id,
                name: d.name,
                age: d.age,
                charges: d.charges,
                status: d.status,
                photo: d.photo,
                description: d.description,
                date: d.date,
            }),
        }

        debug!("created {} record with id {}", kind, id);
        id
    }

    /// Delete the record with the given id from the given collection.
    ///
    /// Returns `true` if a record was removed. Records in other collections
    /// are never touched, even when they share the same id.
    pub fn delete(&mut self, kind: RecordKind, id: RecordId) -> bool {
        let removed = match kind {
            RecordKind::Photo => {
                let before = self.set.photos.len();
                self.set.photos.retain(|r| r.id != id);
                before - self.set.photos.len()
            }
            RecordKind::Video => {
                let before = self.set.videos.len();
                self.set.videos.retain(|r| r.id != id);
                before - self.set.videos.len()
            }
            RecordKind::Text => {
                let before = self.set.text.len();
                self.set.text.retain(|r| r.id != id);
                before - self.set.text.len()
            }
            RecordKind::Criminal => {
                let before = self.set.criminals.len();
                self.set.criminals.retain(|r| r.id != id);
                before - self.set.criminals.len()
            }
        };

        if removed > 0 {
            debug!("deleted {} {} record(s) with id {}", removed, kind, id);
        }
        removed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PhotoDraft, TextDraft, VideoDraft};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn photo_draft(title: &str) -> RecordDraft {
        RecordDraft::Photo(PhotoDraft {
            title: title.to_string(),
            description: String::new(),
            url: String::new(),
            date: date(),
        })
    }

    #[test]
    fn test_create_appends_exactly_one() {
        let mut store = EvidenceStore::new();
        let id = store.create(photo_draft("scene"));

        assert_eq!(store.counts().photos, 1);
        assert_eq!(store.counts().total(), 1);
        assert_eq!(store.set().photos[0].id, id);
        assert_eq!(store.set().photos[0].title, "scene");
    }

    #[test]
    fn test_create_preserves_insertion_order() {
        let mut store = EvidenceStore::new();
        store.create(photo_draft("first"));
        store.create(photo_draft("second"));
        store.create(photo_draft("third"));

        let titles: Vec<&str> = store.set().photos.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[test]
    fn test_delete_removes_exactly_one_matching() {
        let mut store = EvidenceStore::new();
        let keep_a = store.create(photo_draft("keep a"));
        let gone = store.create(photo_draft("gone"));
        let keep_b = store.create(photo_draft("keep b"));

        assert!(store.delete(RecordKind::Photo, gone));
        assert_eq!(store.counts().photos, 2);
        let ids: Vec<i64> = store.set().photos.iter().map(|p| p.id).collect();
        assert_eq!(ids, [keep_a, keep_b]);
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let mut store = EvidenceStore::new();
        store.create(photo_draft("only"));

        assert!(!store.delete(RecordKind::Photo, 42));
        assert_eq!(store.counts().photos, 1);
    }

    #[test]
    fn test_delete_scoped_to_collection() {
        // Ids are only unique within their own collection; deleting a photo
        // id must not touch a video that happens to share it.
        let mut store = EvidenceStore::new();
        let mut set = EvidenceSet::default();
        set.photos.push(crate::record::Photo {
            id: 7,
            title: "photo".to_string(),
            description: String::new(),
            url: String::new(),
            date: date(),
        });
        set.videos.push(crate::record::Video {
            id: 7,
            title: "video".to_string(),
            description: String::new(),
            url: String::new(),
            thumbnail: String::new(),
            date: date(),
        });
        store.replace(set);

        assert!(store.delete(RecordKind::Photo, 7));
        assert_eq!(store.counts().photos, 0);
        assert_eq!(store.counts().videos, 1);
    }

    #[test]
    fn test_create_each_kind() {
        let mut store = EvidenceStore::new();
        store.create(photo_draft("p"));
        store.create(RecordDraft::Video(VideoDraft {
            title: "v".to_string(),
            description: String::new(),
            url: String::new(),
            thumbnail: String::new(),
            date: date(),
        }));
        store.create(RecordDraft::Text(TextDraft {
            title: "t".to_string(),
            content: "body".to_string(),
            date: date(),
        }));
        store.create(RecordDraft::Criminal(crate::record::CriminalDraft {
            name: "John Doe".to_string(),
            age: 34,
            charges: "burglary".to_string(),
            status: "at large".to_string(),
            photo: String::new(),
            description: String::new(),
            date: date(),
        }));

        let counts = store.counts();
        assert_eq!(counts.photos, 1);
        assert_eq!(counts.videos, 1);
        assert_eq!(counts.text, 1);
        assert_eq!(counts.criminals, 1);
    }

    #[test]
    fn test_replace_is_whole_document() {
        let mut store = EvidenceStore::new();
        store.create(photo_draft("stale"));

        store.replace(EvidenceSet::default());
        assert!(store.set().is_empty());
    }
}
