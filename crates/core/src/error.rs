use crate::types::DbId;

/// Domain error taxonomy.
///
/// Every failure the HTTP layer can surface maps to exactly one variant;
/// the API layer attaches the stable machine-readable code. The two
/// map-aggregation failures that used to be plain strings are typed
/// variants like everything else.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A request field is missing or malformed. Raised before any write.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A required form item has no satisfying response item.
    #[error("Required fields are empty")]
    EmptyFields,

    /// The authenticated user's rank does not satisfy the endpoint.
    #[error("Permission denied")]
    PermissionDenied,

    /// The session token is missing, unknown, or expired.
    #[error("Invalid session token")]
    InvalidToken,

    /// The form has no location-choice item to place responses on a map.
    #[error("No location item found")]
    NoLocationItem,

    /// The bucket width is too small for the response date range.
    #[error("Date interval is too small for specified range of responses")]
    IntervalTooSmall,

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Internal error: {0}")]
    Internal(String),
}
