//! Handler for the `/data/map` aggregation endpoint.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use datapage_core::error::CoreError;
use datapage_core::map_data::{build_map_data, MapFilter};
use datapage_core::response_view::filter_public_responses;
use datapage_core::types::DbId;
use datapage_db::repositories::{FormRepo, ResponseQuery, ResponseRepo};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::{parse_date_param, require_lang};
use crate::state::AppState;

/// Query parameters for `GET /data/map`.
#[derive(Debug, Deserialize)]
pub struct MapQuery {
    pub lang: Option<String>,
    pub form_id: Option<DbId>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Use this location item instead of the form's first one.
    pub location_item_id: Option<DbId>,
    /// Keep only responses that answered this item...
    pub item_id: Option<DbId>,
    /// ...with this option.
    pub option_id: Option<DbId>,
}

/// GET /api/data/map
///
/// Public active responses placed on the map and bucketed into one-week
/// intervals for timeline playback. An empty `data` object means no
/// response could be placed; an unmappable form (`no-location-item`) or
/// an oversized range (`interval-too-small`) is an error.
pub async fn get_map_data(
    State(state): State<AppState>,
    params: Result<Query<MapQuery>, QueryRejection>,
) -> AppResult<Json<serde_json::Value>> {
    let Query(params) = params
        .map_err(|_| CoreError::InvalidParameters("Malformed query parameters".into()))?;
    let lang = require_lang(params.lang.as_deref())?;
    let form_id = params
        .form_id
        .filter(|id| *id > 0)
        .ok_or_else(|| CoreError::InvalidParameters("form_id must be a positive integer".into()))?;
    let from = parse_date_param(params.from.as_deref(), "from")?;
    let to = parse_date_param(params.to.as_deref(), "to")?;

    let items = FormRepo::items(&state.pool, form_id, Some(lang)).await?;
    let options = FormRepo::options(&state.pool, form_id, Some(lang)).await?;

    let mut query = ResponseQuery::active(form_id, lang);
    query.from = from;
    query.to = to;
    let responses = filter_public_responses(ResponseRepo::list(&state.pool, &query).await?);

    let filter = MapFilter {
        location_item_id: params.location_item_id,
        item_id: params.item_id,
        option_id: params.option_id,
    };

    match build_map_data(items, options, responses, &filter)? {
        Some(data) => Ok(Json(json!({ "data": data }))),
        None => Ok(Json(json!({ "data": {} }))),
    }
}
