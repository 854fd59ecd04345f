//! Session-token authentication extractors.
//!
//! Session validity is an external concern; this module only performs
//! the lookup (token → user row) and exposes the rank comparison.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use datapage_core::error::CoreError;
use datapage_core::types::{permission, DbId};
use datapage_db::repositories::UserRepo;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from a session token in the
/// `x-session-token` header or the `session_token` query parameter.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication; use [`OptionalAuthUser`] where an anonymous caller is
/// served a reduced view instead of an error.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub email: String,
    /// Permission rank; lower is higher (owner 1, administrator 50).
    pub permission: i32,
}

impl AuthUser {
    /// Fail with [`CoreError::PermissionDenied`] unless the user's rank
    /// satisfies `required`.
    pub fn require(&self, required: i32) -> Result<(), CoreError> {
        if permission::allows(self.permission, required) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied)
        }
    }
}

/// Pull the session token out of the request: header first, then the
/// `session_token` query parameter.
fn session_token(parts: &Parts) -> Option<String> {
    if let Some(token) = parts
        .headers
        .get("x-session-token")
        .and_then(|value| value.to_str().ok())
    {
        return Some(token.to_string());
    }

    parts.uri.query().and_then(|query| {
        query.split('&').find_map(|pair| {
            pair.strip_prefix("session_token=")
                .filter(|token| !token.is_empty())
                .map(str::to_string)
        })
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts).ok_or(AppError::Core(CoreError::InvalidToken))?;

        let user = UserRepo::find_by_session_token(&state.pool, &token)
            .await?
            .ok_or(AppError::Core(CoreError::InvalidToken))?;

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
            permission: user.permission,
        })
    }
}

/// Like [`AuthUser`] but never rejects: a missing, unknown, or expired
/// token yields `None` and the handler serves the public view.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    /// The user, when present and satisfying the required rank.
    pub fn with_permission(&self, required: i32) -> Option<&AuthUser> {
        self.0
            .as_ref()
            .filter(|user| permission::allows(user.permission, required))
    }
}

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts) else {
            return Ok(OptionalAuthUser(None));
        };

        let user = UserRepo::find_by_session_token(&state.pool, &token)
            .await
            .unwrap_or_else(|err| {
                tracing::error!(error = %err, "Session lookup failed, serving public view");
                None
            });

        Ok(OptionalAuthUser(user.map(|user| AuthUser {
            user_id: user.id,
            email: user.email,
            permission: user.permission,
        })))
    }
}
