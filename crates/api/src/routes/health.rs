//! Liveness endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health
///
/// Reports `ok` when the database answers, `degraded` otherwise.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match datapage_db::health_check(&state.pool).await {
        Ok(()) => "ok",
        Err(err) => {
            tracing::error!(error = %err, "Health check database ping failed");
            "degraded"
        }
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
