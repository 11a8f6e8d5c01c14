//! Sync client: whole-document load/save against the remote store.
//!
//! The remote document is the single source of truth. `load` replaces the
//! working set wholesale or falls back to the local cache; `save` mirrors
//! the snapshot locally and pushes the document on a spawned task,
//! fire-and-forget. There is no partial merge and no retry: the last writer
//! to reach the remote store wins.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::cache::LocalCache;
use crate::error::Result;
use crate::record::EvidenceSet;

/// A remote holder of the main storage document.
///
/// The trait seam exists so the portal can be exercised without a network;
/// production uses [`HttpRemote`].
#[async_trait]
pub trait RemoteStore: Send + Sync + std::fmt::Debug {
    /// Fetch the whole document.
    async fn fetch(&self) -> Result<EvidenceSet>;

    /// Overwrite the whole document (upsert).
    async fn push(&self, set: &EvidenceSet) -> Result<()>;
}

/// The HTTP implementation of [`RemoteStore`], talking to
/// `GET/POST {base}/api/evidence`.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRemote {
    /// Create a remote for the given API base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/evidence", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn fetch(&self) -> Result<EvidenceSet> {
        let set = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json::<EvidenceSet>()
            .await?;
        Ok(set)
    }

    async fn push(&self, set: &EvidenceSet) -> Result<()> {
        self.client
            .post(&self.endpoint)
            .json(set)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// The sync client: a remote store plus the local cache mirror.
#[derive(Debug)]
pub struct SyncClient {
    remote: Arc<dyn RemoteStore>,
    cache: LocalCache,
}

impl SyncClient {
    /// Create a sync client.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteStore>, cache: LocalCache) -> Self {
        Self { remote, cache }
    }

    /// Borrow the local cache.
    #[must_use]
    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Load the document: remote first, cached snapshot on failure, empty
    /// set when neither is available. Never fails; degradation is logged.
    pub async fn load(&self) -> EvidenceSet {
        match self.remote.fetch().await {
            Ok(set) => {
                debug!("loaded {} records from remote store", set.counts().total());
                set
            }
            Err(e) => {
                warn!("remote load failed, falling back to cached snapshot: {e}");
                self.cache.load_snapshot().unwrap_or_else(|| {
                    warn!("no cached snapshot available, starting empty");
                    EvidenceSet::default()
                })
            }
        }
    }

    /// Save the document: mirror the snapshot to the local cache, then push
    /// to the remote store on a spawned task.
    ///
    /// Fire-and-forget: a push failure is logged, not retried, and never
    /// surfaced to the caller. The returned handle lets short-lived
    /// processes await the attempt before exiting.
    pub fn save(&self, set: &EvidenceSet) -> tokio::task::JoinHandle<()> {
        if let Err(e) = self.cache.save_snapshot(set) {
            warn!("could not mirror snapshot to local cache: {e}");
        }

        let remote = Arc::clone(&self.remote);
        let set = set.clone();
        tokio::spawn(async move {
            if let Err(e) = remote.push(&set).await {
                error!("failed to save evidence to remote store: {e}");
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Remote store doubles shared by sync and portal tests.

    use std::sync::Mutex;

    use super::{async_trait, EvidenceSet, RemoteStore, Result};
    use crate::error::Error;

    /// An in-memory remote holding the document behind a mutex.
    #[derive(Debug, Default)]
    pub struct MemoryRemote {
        doc: Mutex<Option<EvidenceSet>>,
    }

    impl MemoryRemote {
        pub fn with_document(set: EvidenceSet) -> Self {
            Self {
                doc: Mutex::new(Some(set)),
            }
        }

        pub fn document(&self) -> Option<EvidenceSet> {
            self.doc.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RemoteStore for MemoryRemote {
        async fn fetch(&self) -> Result<EvidenceSet> {
            Ok(self.doc.lock().unwrap().clone().unwrap_or_default())
        }

        async fn push(&self, set: &EvidenceSet) -> Result<()> {
            *self.doc.lock().unwrap() = Some(set.clone());
            Ok(())
        }
    }

    /// A remote that always fails, standing in for an unreachable server.
    #[derive(Debug, Default)]
    pub struct FailingRemote;

    #[async_trait]
    impl RemoteStore for FailingRemote {
        async fn fetch(&self) -> Result<EvidenceSet> {
            Err(Error::remote("connection refused"))
        }

        async fn push(&self, _set: &EvidenceSet) -> Result<()> {
            Err(Error::remote("connection refused"))
        }
    }
}
