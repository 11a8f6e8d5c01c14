//! Persistence gateway for casefile.
//!
//! This module provides the `SQLite`-backed document store behind the HTTP
//! API. It holds exactly one `main_storage` document with the four record
//! collections as JSON columns; load and save always move the whole
//! document, upsert semantics.

pub mod schema;

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::EvidenceSet;

/// The `doc_type` value of the single stored document.
const MAIN_DOC: &str = "main_storage";

/// The single-document evidence store.
#[derive(Debug)]
pub struct DocumentStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl DocumentStore {
    /// Open or create a document store at the given path.
    ///
    /// Creates the parent directories and database file if they don't
    /// exist. Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL keeps concurrent readers out of the writer's way
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        schema::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the main storage document.
    ///
    /// On first access, when no document exists yet, an empty default
    /// document is created, persisted, and returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored collection cannot be
    /// parsed.
    pub fn load_main(&self) -> Result<EvidenceSet> {
        let row = self
            .conn
            .query_row(
                r"
                SELECT photos, videos, text_notes, criminals
                FROM evidence WHERE doc_type = ?1
                ",
                [MAIN_DOC],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((photos, videos, text, criminals)) => Ok(EvidenceSet {
                photos: serde_json::from_str(&photos)?,
                videos: serde_json::from_str(&videos)?,
                text: serde_json::from_str(&text)?,
                criminals: serde_json::from_str(&criminals)?,
            }),
            None => {
                info!("no main storage document yet, creating empty default");
                let set = EvidenceSet::default();
                self.save_main(&set)?;
                Ok(set)
            }
        }
    }

    /// Save the main storage document, replacing any existing one.
    ///
    /// Upsert semantics: the document is created if absent, otherwise all
    /// four collections are overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_main(&self, set: &EvidenceSet) -> Result<()> {
        self.conn.execute(
            r"
            INSERT OR REPLACE INTO evidence
                (doc_type, photos, videos, text_notes, criminals, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                MAIN_DOC,
                serde_json::to_string(&set.photos)?,
                serde_json::to_string(&set.videos)?,
                serde_json::to_string(&set.text)?,
                serde_json::to_string(&set.criminals)?,
                Utc::now().to_rfc3339(),
            ],
        )?;

        debug!(
            "saved main storage document ({} records)",
            set.counts().total()
        );
        Ok(())
    }
}
