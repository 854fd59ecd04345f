//! Handlers for the `/form/response` resources: listing, submission, and
//! status transitions.

use std::time::Duration;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use datapage_core::error::CoreError;
use datapage_core::response_view::filter_public_responses;
use datapage_core::submission::SubmissionItems;
use datapage_core::types::{permission, Status};
use datapage_core::write_plan::plan_responses;
use datapage_db::repositories::{FormRepo, ResponseQuery, ResponseRepo};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::{coerce_db_id, parse_date_param, require_lang};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / payload types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /form/responses`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub lang: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Administrators may ask for any status; ignored for the public.
    pub status: Option<i32>,
}

/// Query parameters for `GET /form/response`.
#[derive(Debug, Deserialize)]
pub struct GetQuery {
    pub lang: Option<String>,
    pub id: Option<serde_json::Value>,
    pub status: Option<i32>,
}

/// Body of `POST /form/response`. `items` is either one response's item
/// list or a batch of lists.
#[derive(Debug, Deserialize)]
pub struct CreateResponsePayload {
    #[serde(default)]
    pub form_id: Option<serde_json::Value>,
    #[serde(default)]
    pub items: Option<SubmissionItems>,
}

/// Body of the status-transition endpoints.
#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

/// Result of a status transition.
#[derive(Debug, Serialize)]
pub struct StatusResult {
    pub id: datapage_core::types::DbId,
    pub status: &'static str,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /api/form/responses
///
/// Responses on the active form. Administrators see every status (or the
/// one they ask for); everyone else sees active responses with
/// hidden-from-public answers stripped.
pub async fn list_responses(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<serde_json::Value>> {
    let Query(params) = params
        .map_err(|_| CoreError::InvalidParameters("Malformed query parameters".into()))?;
    let lang = require_lang(params.lang.as_deref())?;
    let from = parse_date_param(params.from.as_deref(), "from")?;
    let to = parse_date_param(params.to.as_deref(), "to")?;

    let Some(form) = FormRepo::find_active(&state.pool, lang).await? else {
        return Ok(Json(json!({ "data": [] })));
    };

    let is_admin = auth.with_permission(permission::ADMINISTRATOR).is_some();
    let mut query = if is_admin {
        ResponseQuery {
            status: params.status,
            ..ResponseQuery::all(form.id, lang)
        }
    } else {
        ResponseQuery::active(form.id, lang)
    };
    query.from = from;
    query.to = to;

    let mut responses = ResponseRepo::list(&state.pool, &query).await?;
    if !is_admin {
        responses = filter_public_responses(responses);
    }

    Ok(Json(json!({ "data": responses })))
}

/// GET /api/form/response
///
/// A single response by id, under the same visibility rules as the
/// listing. Responds with an empty list when the id matches nothing.
pub async fn get_response(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    params: Result<Query<GetQuery>, QueryRejection>,
) -> AppResult<Json<serde_json::Value>> {
    let Query(params) = params
        .map_err(|_| CoreError::InvalidParameters("Malformed query parameters".into()))?;
    let lang = require_lang(params.lang.as_deref())?;
    let id = coerce_db_id(params.id.as_ref(), "id")?;

    let Some(form) = FormRepo::find_active(&state.pool, lang).await? else {
        return Ok(Json(json!({ "data": [] })));
    };

    let is_admin = auth.with_permission(permission::ADMINISTRATOR).is_some();
    let mut query = if is_admin {
        ResponseQuery {
            status: params.status,
            ..ResponseQuery::all(form.id, lang)
        }
    } else {
        ResponseQuery::active(form.id, lang)
    };
    query.id = Some(id);

    let mut responses = ResponseRepo::list(&state.pool, &query).await?;
    if !is_admin {
        responses = filter_public_responses(responses);
    }

    match responses.into_iter().next() {
        Some(response) => Ok(Json(json!({ "data": response }))),
        None => Ok(Json(json!({ "data": [] }))),
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// POST /api/form/response
///
/// Validate and persist one response or a batch of responses as a single
/// atomic unit. An empty `data` object acknowledges acceptance.
///
/// Shape errors (`invalid-parameters`) and required-field failures
/// (`empty-fields`) are rejected before any write is attempted; any
/// row-level failure aborts the whole unit.
pub async fn create_response(
    State(state): State<AppState>,
    payload: Result<Json<CreateResponsePayload>, JsonRejection>,
) -> AppResult<Json<serde_json::Value>> {
    let Json(payload) = payload
        .map_err(|_| CoreError::InvalidParameters("Request body must be a JSON object".into()))?;

    let items = payload
        .items
        .ok_or_else(|| CoreError::InvalidParameters("items is required".into()))?;
    if items.has_empty_list() {
        return Err(CoreError::InvalidParameters("items must not be empty".into()).into());
    }
    let form_id = coerce_db_id(payload.form_id.as_ref(), "form_id")?;

    let catalog = FormRepo::items(&state.pool, form_id, None).await?;
    let plan = plan_responses(form_id, &catalog, &items.into_batches())?;

    // One deadline per unit of work; an abandoned transaction rolls back.
    let deadline = Duration::from_secs(state.config.write_deadline_secs);
    match tokio::time::timeout(deadline, ResponseRepo::create_batch(&state.pool, &plan)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(CoreError::Internal(format!(
                "Response write for form {form_id} exceeded the {}s deadline",
                state.config.write_deadline_secs
            ))
            .into());
        }
    }

    Ok(Json(json!({ "data": {} })))
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// PUT /api/form/response/approve
///
/// Set a response's status to active. Administrators only.
pub async fn approve_response(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<StatusPayload>, JsonRejection>,
) -> AppResult<Json<DataResponse<StatusResult>>> {
    auth.require(permission::ADMINISTRATOR)?;
    update_response_status(&state, payload, Status::Active).await
}

/// DELETE /api/form/response
///
/// Set a response's status to deleted. Administrators only. Responses are
/// never structurally removed, only status-flagged.
pub async fn delete_response(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<StatusPayload>, JsonRejection>,
) -> AppResult<Json<DataResponse<StatusResult>>> {
    auth.require(permission::ADMINISTRATOR)?;
    update_response_status(&state, payload, Status::Deleted).await
}

async fn update_response_status(
    state: &AppState,
    payload: Result<Json<StatusPayload>, JsonRejection>,
    status: Status,
) -> AppResult<Json<DataResponse<StatusResult>>> {
    let Json(payload) = payload
        .map_err(|_| CoreError::InvalidParameters("Request body must be a JSON object".into()))?;
    let id = coerce_db_id(payload.id.as_ref(), "id")?;

    let found = ResponseRepo::update_status(&state.pool, id, status).await?;
    if !found {
        return Err(CoreError::NotFound {
            entity: "Response",
            id,
        }
        .into());
    }

    Ok(Json(DataResponse {
        data: StatusResult {
            id,
            status: status.name(),
        },
    }))
}
