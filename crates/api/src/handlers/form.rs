//! Handlers for the `/form` resource.

use axum::extract::{Query, State};
use axum::Json;
use datapage_core::hierarchy::{build_form_hierarchy, SectionNode};
use datapage_db::repositories::FormRepo;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::require_lang;
use crate::state::AppState;

/// Query parameters for `GET /form`.
#[derive(Debug, Deserialize)]
pub struct FormQuery {
    pub lang: Option<String>,
}

/// GET /api/form
///
/// The active form assembled into its nested hierarchy. Single-section
/// forms have the section layer collapsed and their items promoted to
/// the top level. Responds with an empty object when no form is active.
pub async fn get_form_hierarchy(
    State(state): State<AppState>,
    Query(params): Query<FormQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let lang = require_lang(params.lang.as_deref())?;

    let Some(form) = FormRepo::find_active(&state.pool, lang).await? else {
        return Ok(Json(json!({ "data": {} })));
    };

    let sections: Vec<SectionNode> = FormRepo::sections(&state.pool, form.id, Some(lang))
        .await?
        .into_iter()
        .map(SectionNode::from)
        .collect();
    let items = FormRepo::items(&state.pool, form.id, Some(lang)).await?;
    let options = FormRepo::options(&state.pool, form.id, Some(lang)).await?;

    let hierarchy = build_form_hierarchy(form.into(), sections, items, options);

    Ok(Json(json!({ "data": hierarchy })))
}
