//! Route definitions for the aggregated data views.

use axum::routing::get;
use axum::Router;

use crate::handlers::map_data;
use crate::state::AppState;

/// Routes mounted at `/data`.
///
/// ```text
/// GET /data/map -> get_map_data
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/data/map", get(map_data::get_map_data))
}
