//! Core record types for casefile.
//!
//! This module defines the four evidence record kinds and the main storage
//! document that holds them. The JSON field names match the wire format of
//! the `/api/evidence` endpoint.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for a record, assigned at creation time.
///
/// Ids are the current Unix time in milliseconds. They are only meaningful
/// within their own collection and are not guaranteed unique under
/// concurrent clients.
pub type RecordId = i64;

/// Produce a fresh record id from the current wall clock.
#[must_use]
pub fn fresh_id() -> RecordId {
    Utc::now().timestamp_millis()
}

/// The kind of evidence record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Photographic evidence.
    Photo,
    /// Video evidence with a thumbnail.
    Video,
    /// Free-form text evidence.
    Text,
    /// A criminal profile.
    Criminal,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Photo => write!(f, "photo"),
            Self::Video => write!(f, "video"),
            Self::Text => write!(f, "text"),
            Self::Criminal => write!(f, "criminal"),
        }
    }
}

/// A photo evidence record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Record identifier.
    pub id: RecordId,
    /// Short title shown in listings.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// URL of the image.
    pub url: String,
    /// Date the evidence was recorded.
    pub date: NaiveDate,
}

/// A video evidence record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Record identifier.
    pub id: RecordId,
    /// Short title shown in listings.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// URL of the video.
    pub url: String,
    /// Thumbnail as a data URL, or empty when generation failed.
    pub thumbnail: String,
    /// Date the evidence was recorded.
    pub date: NaiveDate,
}

/// A text evidence record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNote {
    /// Record identifier.
    pub id: RecordId,
    /// Short title shown in listings.
    pub title: String,
    /// The document body.
    pub content: String,
    /// Date the evidence was recorded.
    pub date: NaiveDate,
}

/// A criminal profile record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criminal {
    /// Record identifier.
    pub id: RecordId,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Charges on file.
    pub charges: String,
    /// Case status, e.g. "at large" or "in custody".
    pub status: String,
    /// URL of a profile photo.
    pub photo: String,
    /// Free-form description.
    pub description: String,
    /// Date the profile was opened.
    pub date: NaiveDate,
}

/// The main storage document: all four record collections.
///
/// Exactly one of these is persisted remotely; load and save always move
/// the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceSet {
    /// Photo records, in insertion order.
    pub photos: Vec<Photo>,
    /// Video records, in insertion order.
    pub videos: Vec<Video>,
    /// Text records, in insertion order.
    pub text: Vec<TextNote>,
    /// Criminal profiles, in insertion order.
    pub criminals: Vec<Criminal>,
}

impl EvidenceSet {
    /// Count the records in each collection.
    #[must_use]
    pub fn counts(&self) -> RecordCounts {
        RecordCounts {
            photos: self.photos.len(),
            videos: self.videos.len(),
            text: self.text.len(),
            criminals: self.criminals.len(),
        }
    }

    /// Check whether all collections are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
            && self.videos.is_empty()
            && self.text.is_empty()
            && self.criminals.is_empty()
    }
}

/// Per-collection record counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    /// Number of photo records.
    pub photos: usize,
    /// Number of video records.
    pub videos: usize,
    /// Number of text records.
    pub text: usize,
    /// Number of criminal profiles.
    pub criminals: usize,
}

impl RecordCounts {
    /// Total number of records across all collections.
    #[must_use]
    pub fn total(&self) -> usize {
        self.photos + self.videos + self.text + self.criminals
    }
}

/// Fields for a photo record, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDraft {
    /// Short title shown in listings.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// URL of the image.
    pub url: String,
    /// Date the evidence was recorded.
    pub date: NaiveDate,
}

/// Fields for a video record, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDraft {
    /// Short title shown in listings.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// URL of the video.
    pub url: String,
    /// Thumbnail data URL. Empty when generation failed or was skipped.
    pub thumbnail: String,
    /// Date the evidence was recorded.
    pub date: NaiveDate,
}

/// Fields for a text record, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDraft {
    /// Short title shown in listings.
    pub title: String,
    /// The document body.
    pub content: String,
    /// Date the evidence was recorded.
    pub date: NaiveDate,
}

/// Fields for a criminal profile, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriminalDraft {
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Charges on file.
    pub charges: String,
    /// Case status.
    pub status: String,
    /// URL of a profile photo.
    pub photo: String,
    /// Free-form description.
    pub description: String,
    /// Date the profile was opened.
    pub date: NaiveDate,
}

/// A draft of any record kind, used by the store's `create` operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDraft {
    /// A photo draft.
    Photo(PhotoDraft),
    /// A video draft.
    Video(VideoDraft),
    /// A text draft.
    Text(TextDraft),
    /// A criminal profile draft.
    Criminal(CriminalDraft),
}

impl RecordDraft {
    /// The kind of record this draft produces.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Photo(_) => RecordKind::Photo,
            Self::Video(_) => RecordKind::Video,
            Self::Text(_) => RecordKind::Text,
            Self::Criminal(_) => RecordKind::Criminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_record_kind_display() {
        assert_eq!(RecordKind::Photo.to_string(), "photo");
        assert_eq!(RecordKind::Video.to_string(), "video");
        assert_eq!(RecordKind::Text.to_string(), "text");
        assert_eq!(RecordKind::Criminal.to_string(), "criminal");
    }

    #[test]
    fn test_fresh_id_is_millis() {
        let before = Utc::now().timestamp_millis();
        let id = fresh_id();
        let after = Utc::now().timestamp_millis();
        assert!(id >= before && id <= after);
    }

    #[test]
    fn test_evidence_set_default_is_empty() {
        let set = EvidenceSet::default();
        assert!(set.is_empty());
        assert_eq!(set.counts().total(), 0);
    }

    #[test]
    fn test_evidence_set_counts() {
        let mut set = EvidenceSet::default();
        set.photos.push(Photo {
            id: 1,
            title: "scene".to_string(),
            description: String::new(),
            url: String::new(),
            date: date(),
        });
        set.text.push(TextNote {
            id: 2,
            title: "statement".to_string(),
            content: "witness statement".to_string(),
            date: date(),
        });

        let counts = set.counts();
        assert_eq!(counts.photos, 1);
        assert_eq!(counts.videos, 0);
        assert_eq!(counts.text, 1);
        assert_eq!(counts.criminals, 0);
        assert_eq!(counts.total(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_evidence_set_wire_field_names() {
        let set = EvidenceSet::default();
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.get("photos").is_some());
        assert!(json.get("videos").is_some());
        assert!(json.get("text").is_some());
        assert!(json.get("criminals").is_some());
    }

    #[test]
    fn test_evidence_set_tolerates_missing_fields() {
        // A document written before criminals existed must still load.
        let set: EvidenceSet =
            serde_json::from_str(r#"{"photos": [], "videos": [], "text": []}"#).unwrap();
        assert!(set.criminals.is_empty());
    }

    #[test]
    fn test_record_serialization_roundtrip() {
        let video = Video {
            id: 1_700_000_000_000,
            title: "cctv".to_string(),
            description: "rear entrance".to_string(),
            url: "https://example.com/cctv.mp4".to_string(),
            thumbnail: String::new(),
            date: date(),
        };
        let json = serde_json::to_string(&video).unwrap();
        assert!(json.contains("\"2024-03-15\""));
        let back: Video = serde_json::from_str(&json).unwrap();
        assert_eq!(video, back);
    }

    #[test]
    fn test_draft_kind() {
        let draft = RecordDraft::Text(TextDraft {
            title: "note".to_string(),
            content: String::new(),
            date: date(),
        });
        assert_eq!(draft.kind(), RecordKind::Text);
    }
}
