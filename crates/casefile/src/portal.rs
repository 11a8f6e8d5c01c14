//! The portal: application state tying the auth gate, the in-memory
//! evidence store, and the sync client together.
//!
//! Every mutating handler starts with an explicit guard check; an
//! unauthorized attempt is rejected before any side effect. Mutations apply
//! locally first, then persist fire-and-forget through the sync client.

use std::sync::Arc;

use tracing::warn;

use crate::auth::{AuthGate, SessionUser};
use crate::cache::LocalCache;
use crate::config::Config;
use crate::error::Result;
use crate::record::{
    CriminalDraft, PhotoDraft, RecordCounts, RecordDraft, RecordId, RecordKind, TextDraft,
    VideoDraft,
};
use crate::store::EvidenceStore;
use crate::sync::{HttpRemote, RemoteStore, SyncClient};
use crate::thumbnail::Thumbnailer;

/// Application state for one portal session.
#[derive(Debug)]
pub struct Portal {
    auth: AuthGate,
    store: EvidenceStore,
    sync: SyncClient,
    thumbnailer: Thumbnailer,
}

impl Portal {
    /// Open a portal against the configured remote API.
    ///
    /// Restores a saved session if one exists, then loads the evidence set
    /// (remote first, cache fallback).
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created.
    pub async fn open(config: &Config) -> Result<Self> {
        let cache = LocalCache::open(config.cache_dir())?;
        let remote: Arc<dyn RemoteStore> = Arc::new(HttpRemote::new(&config.remote.url));
        let sync = SyncClient::new(remote, cache);
        let auth = AuthGate::new(config.account_table());
        let thumbnailer = Thumbnailer::from_config(&config.thumbnail);
        Ok(Self::assemble(auth, sync, thumbnailer).await)
    }

    /// Assemble a portal from its parts, restoring any saved session and
    /// loading the evidence set.
    pub(crate) async fn assemble(
        mut auth: AuthGate,
        sync: SyncClient,
        thumbnailer: Thumbnailer,
    ) -> Self {
        if let Some(session) = sync.cache().load_session() {
            auth.restore(session);
        }
        let store = EvidenceStore::from_set(sync.load().await);
        Self {
            auth,
            store,
            sync,
            thumbnailer,
        }
    }

    /// Log in and persist the session to the cache.
    ///
    /// # Errors
    ///
    /// Returns the distinct login failure reasons from the auth gate.
    pub fn login(&mut self, username: &str, password: &str) -> Result<SessionUser> {
        let user = self.auth.login(username, password)?;
        if let Err(e) = self.sync.cache().save_session(&user) {
            warn!("could not persist session: {e}");
        }
        Ok(user)
    }

    /// Log out and clear the cached session.
    ///
    /// # Errors
    ///
    /// Returns an error if the cached session file cannot be removed.
    pub fn logout(&mut self) -> Result<()> {
        self.auth.logout();
        self.sync.cache().clear_session()
    }

    /// The current session user, if authenticated.
    #[must_use]
    pub fn current_user(&self) -> Option<&SessionUser> {
        self.auth.current_user()
    }

    /// Whether the current session may mutate evidence.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.auth.can_edit()
    }

    /// Borrow the working evidence set.
    #[must_use]
    pub fn evidence(&self) -> &crate::record::EvidenceSet {
        self.store.set()
    }

    /// Record counts for the status display.
    #[must_use]
    pub fn counts(&self) -> RecordCounts {
        self.store.counts()
    }

    /// Add a photo record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Unauthorized`] without side effect
    /// when the session lacks edit permission.
    pub async fn add_photo(&mut self, draft: PhotoDraft) -> Result<RecordId> {
        self.auth.require_edit()?;
        let id = self.store.create(RecordDraft::Photo(draft));
        self.persist().await;
        Ok(id)
    }

    /// Add a video record.
    ///
    /// When the draft carries no thumbnail, one is captured from the video
    /// URL; capture failure degrades to an empty thumbnail and never blocks
    /// the create.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Unauthorized`] without side effect
    /// when the session lacks edit permission.
    pub async fn add_video(&mut self, mut draft: VideoDraft) -> Result<RecordId> {
        self.auth.require_edit()?;
        if draft.thumbnail.is_empty() {
            draft.thumbnail = self.thumbnailer.capture(&draft.url).await;
        }
        let id = self.store.create(RecordDraft::Video(draft));
        self.persist().await;
        Ok(id)
    }

    /// Add a text record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Unauthorized`] without side effect
    /// when the session lacks edit permission.
    pub async fn add_text(&mut self, draft: TextDraft) -> Result<RecordId> {
        self.auth.require_edit()?;
        let id = self.store.create(RecordDraft::Text(draft));
        self.persist().await;
        Ok(id)
    }

    /// Add a criminal profile.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Unauthorized`] without side effect
    /// when the session lacks edit permission.
    pub async fn add_criminal(&mut self, draft: CriminalDraft) -> Result<RecordId> {
        self.auth.require_edit()?;
        let id = self.store.create(RecordDraft::Criminal(draft));
        self.persist().await;
        Ok(id)
    }

    /// Remove a record. Returns whether anything was removed.
    ///
    /// Confirmation is the caller's responsibility; by the time this runs
    /// the destructive intent is settled.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Unauthorized`] without side effect
    /// when the session lacks edit permission.
    pub async fn remove(&mut self, kind: RecordKind, id: RecordId) -> Result<bool> {
        self.auth.require_edit()?;
        let removed = self.store.delete(kind, id);
        if removed {
            self.persist().await;
        }
        Ok(removed)
    }

    /// Persist the working set through the sync client.
    ///
    /// The push itself is fire-and-forget; awaiting the handle only makes
    /// sure the attempt happens before a short-lived process exits.
    async fn persist(&self) {
        let handle = self.sync.save(self.store.set());
        let _ = handle.await;
    }
}
