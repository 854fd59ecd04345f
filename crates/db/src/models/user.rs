//! User rows, as returned by the session-token lookup.

use datapage_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table, without the password hash.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRow {
    pub id: DbId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub permission: i32,
}
