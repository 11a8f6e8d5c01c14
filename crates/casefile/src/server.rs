//! HTTP server hosting the evidence API.
//!
//! Two routes carry all traffic: `GET /api/evidence` returns the whole main
//! storage document (creating an empty one on first access) and
//! `POST /api/evidence` replaces it. Optionally the portal's static assets
//! are served from a configured directory.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{error, info};

use crate::config::Config;
use crate::error::Result;
use crate::record::EvidenceSet;
use crate::storage::DocumentStore;

/// Shared server state: the document store behind a lock.
#[derive(Debug, Clone)]
pub struct ServerState {
    store: Arc<Mutex<DocumentStore>>,
}

impl ServerState {
    /// Wrap a document store for sharing across handlers.
    #[must_use]
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

/// Build the API router.
///
/// When `assets_dir` is set, anything that isn't an API route falls through
/// to the static portal files.
pub fn router(state: ServerState, assets_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/api/evidence", get(get_evidence).post(post_evidence))
        .with_state(state)
        .layer(CorsLayer::permissive());

    if let Some(dir) = assets_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

/// Run the server until it is shut down.
///
/// # Errors
///
/// Returns an error if the database cannot be opened, the listen address
/// cannot be bound, or the server loop fails.
pub async fn serve(config: &Config) -> Result<()> {
    let store = DocumentStore::open(config.database_path())?;
    let state = ServerState::new(store);
    let app = router(state, config.server.assets_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn get_evidence(State(state): State<ServerState>) -> Response {
    let store = state.store.lock().await;
    match store.load_main() {
        Ok(set) => Json(set).into_response(),
        Err(e) => {
            error!("could not load evidence document: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Database error" })),
            )
                .into_response()
        }
    }
}

async fn post_evidence(
    State(state): State<ServerState>,
    Json(set): Json<EvidenceSet>,
) -> Response {
    let store = state.store.lock().await;
    match store.save_main(&set) {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => {
            error!("could not save evidence document: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Could not save data" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Photo;
    use chrono::NaiveDate;

    fn test_state() -> ServerState {
        ServerState::new(DocumentStore::open_in_memory().unwrap())
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn sample_set() -> EvidenceSet {
        let mut set = EvidenceSet::default();
        set.photos.push(Photo {
            id: 1_700_000_000_001,
            title: "scene".to_string(),
            description: String::new(),
            url: "https://example.com/p.jpg".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        });
        set
    }

    #[tokio::test]
    async fn test_get_first_access_returns_empty_document() {
        let response = get_evidence(State(test_state())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["photos"], json!([]));
        assert_eq!(body["videos"], json!([]));
        assert_eq!(body["text"], json!([]));
        assert_eq!(body["criminals"], json!([]));
    }

    #[tokio::test]
    async fn test_post_then_get_roundtrip() {
        let state = test_state();

        let response = post_evidence(State(state.clone()), Json(sample_set())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "success": true }));

        let response = get_evidence(State(state)).await;
        let body = body_json(response).await;
        assert_eq!(body["photos"][0]["title"], "scene");
    }

    #[tokio::test]
    async fn test_post_replaces_whole_document() {
        let state = test_state();
        post_evidence(State(state.clone()), Json(sample_set())).await;

        // An empty document wipes what was there before.
        post_evidence(State(state.clone()), Json(EvidenceSet::default())).await;

        let body = body_json(get_evidence(State(state)).await).await;
        assert_eq!(body["photos"], json!([]));
    }

    #[tokio::test]
    async fn test_router_serves_api_routes() {
        // Router construction with and without an assets directory.
        let _router = router(test_state(), None);

        let dir = tempfile::tempdir().unwrap();
        let _router = router(test_state(), Some(dir.path()));
    }
}
