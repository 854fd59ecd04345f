//! Route definitions, grouped by resource.

pub mod data;
pub mod form;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// All API routes, mounted under `/api` by the router builder.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(form::router()).merge(data::router())
}
