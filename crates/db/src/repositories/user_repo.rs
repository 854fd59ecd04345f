//! Session-token lookup against the `users` and `user_tokens` tables.
//!
//! Token issuance and invalidation belong to the authentication
//! collaborator; this core only answers "which user holds this token".

use sqlx::PgPool;

use crate::models::user::UserRow;

/// Token type discriminator for session tokens.
const SESSION_TOKEN_TYPE: i32 = 1;

/// Sessions expire this many hours after the token is created.
const SESSION_TIMEOUT_HOURS: i32 = 24;

/// Provides the external session lookup.
pub struct UserRepo;

impl UserRepo {
    /// Resolve a session token to its user.
    ///
    /// Only live tokens count: session-typed, not invalidated, and
    /// younger than the session timeout.
    pub async fn find_by_session_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        sqlx::query_as::<_, UserRow>(
            "SELECT u.id, u.email, u.first_name, u.last_name, u.permission
             FROM users u
             JOIN user_tokens t ON t.user_id = u.id
             WHERE t.token = $1
               AND t.token_type = $2
               AND t.status = 1
               AND t.created_at > NOW() - ($3 * INTERVAL '1 hour')",
        )
        .bind(token)
        .bind(SESSION_TOKEN_TYPE)
        .bind(SESSION_TIMEOUT_HOURS)
        .fetch_optional(pool)
        .await
    }
}
