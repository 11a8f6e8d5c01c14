//! `casefile` - An evidence cataloging portal
//!
//! This library provides the core functionality for cataloging photo, video,
//! text, and criminal-profile evidence records in a single shared document,
//! synced between portal sessions through a small HTTP API.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod auth;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod portal;
pub mod record;
pub mod server;
pub mod storage;
pub mod store;
pub mod sync;
pub mod thumbnail;

pub use auth::{Account, AccountTable, AuthGate, LoginError, SessionUser};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use portal::Portal;
pub use record::{EvidenceSet, RecordCounts, RecordId, RecordKind};
pub use storage::DocumentStore;
pub use store::EvidenceStore;
pub use sync::{HttpRemote, RemoteStore, SyncClient};
