use datapage_core::error::CoreError;

/// Error type for repository operations that both query the database and
/// convert rows into domain types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// A stored row failed domain conversion (unknown item type,
    /// malformed settings JSON, row-count mismatch at commit time).
    #[error(transparent)]
    Core(#[from] CoreError),
}
