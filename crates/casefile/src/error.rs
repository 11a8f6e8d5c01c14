//! Error types for casefile.
//!
//! This module defines all error types used throughout the casefile crate.
//! Sync-layer failures are expected to degrade silently at the call site;
//! only login and permission errors are surfaced to the user directly.

use std::path::PathBuf;
use thiserror::Error;

use crate::auth::LoginError;

/// The main error type for casefile operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The database schema is newer than this build understands.
    #[error("unsupported schema version: {message}")]
    SchemaVersion {
        /// Description of the version mismatch.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Auth Errors ===
    /// Login failed (unknown user or wrong password).
    #[error(transparent)]
    Login(#[from] LoginError),

    /// A mutation was attempted without edit permission.
    #[error("you must be logged in with edit permission to modify evidence")]
    Unauthorized,

    // === Sync Errors ===
    /// The remote document store could not be reached or answered badly.
    #[error("remote store error: {message}")]
    Remote {
        /// Description of the failure.
        message: String,
    },

    // === Thumbnail Errors ===
    /// Thumbnail capture failed. Callers degrade to an empty thumbnail.
    #[error("thumbnail capture failed: {message}")]
    Thumbnail {
        /// Description of the failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for casefile operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Remote {
            message: err.to_string(),
        }
    }
}

impl Error {
    /// Create a new remote store error.
    #[must_use]
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Create a new thumbnail capture error.
    #[must_use]
    pub fn thumbnail(message: impl Into<String>) -> Self {
        Self::Thumbnail {
            message: message.into(),
        }
    }

    /// Check if this error is a missing-permission rejection.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
