//! HTTP surface of the megawatt display.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use megadisp_client::db::TelemetryStore;
use time::{OffsetDateTime, UtcOffset};

use crate::{
    pullers,
    resolver::resolve_source,
    snapshot::{DispatchFailure, ReadingSnapshot},
};

pub struct AppState<S> {
    pub store: Arc<S>,
    /// Offset ABT readings are stamped in.
    pub utc_offset: UtcOffset,
}

impl<S> AppState<S> {
    pub fn new(store: S, utc_offset: UtcOffset) -> Self {
        Self {
            store: Arc::new(store),
            utc_offset,
        }
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.utc_offset)
    }
}

pub fn router<S: TelemetryStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/api/megawatt", post(post_megawatt::<S>))
        .route("/health", get(health))
        .with_state(state)
}

/// `POST /api/megawatt` → 200 + snapshot, also when the snapshot is flagged.
///
/// Only a panicking pull answers 500.
async fn post_megawatt<S: TelemetryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Response {
    metrics::counter!("megawatt_requests_total").increment(1);

    let source = resolve_source(state.store.as_ref()).await;
    let now = state.now();
    let store = Arc::clone(&state.store);

    let pulled = tokio::spawn(async move { pullers::pull(store.as_ref(), source, now).await }).await;

    match pulled {
        Ok(outcome) => Json(ReadingSnapshot::from_pull(source, outcome)).into_response(),
        Err(e) => {
            tracing::error!(source = %source, error = %e, "reading pull aborted");
            metrics::counter!("megawatt_dispatch_panics_total").increment(1);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DispatchFailure::new(e.to_string())),
            )
                .into_response()
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}
