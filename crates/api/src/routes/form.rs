//! Route definitions for the `/form` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{form, response};
use crate::state::AppState;

/// Routes mounted at `/form`.
///
/// ```text
/// GET    /form                  -> get_form_hierarchy
/// GET    /form/responses        -> list_responses
/// GET    /form/response         -> get_response
/// POST   /form/response         -> create_response
/// DELETE /form/response         -> delete_response (admin)
/// PUT    /form/response/approve -> approve_response (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/form", get(form::get_form_hierarchy))
        .route("/form/responses", get(response::list_responses))
        .route(
            "/form/response",
            get(response::get_response)
                .post(response::create_response)
                .delete(response::delete_response),
        )
        .route("/form/response/approve", put(response::approve_response))
}
