/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Lifecycle status of a form or a response row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Deleted,
    Active,
    Draft,
    Revision,
}

impl Status {
    /// Numeric value as stored in the `status` columns.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Deleted => -1,
            Self::Active => 1,
            Self::Draft => 2,
            Self::Revision => 3,
        }
    }

    /// Parse a stored status value. Unknown values return `None`.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            -1 => Some(Self::Deleted),
            1 => Some(Self::Active),
            2 => Some(Self::Draft),
            3 => Some(Self::Revision),
            _ => None,
        }
    }

    /// Stable name used in API payloads.
    pub fn name(self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::Active => "active",
            Self::Draft => "draft",
            Self::Revision => "revision",
        }
    }
}

/// Permission ranks. A *lower* number is a *higher* rank: the owner is 1,
/// an administrator 50, a plain user 1000.
pub mod permission {
    pub const OWNER: i32 = 1;
    pub const ADMINISTRATOR: i32 = 50;
    pub const EDITOR: i32 = 100;
    pub const ASSISTANT: i32 = 150;
    pub const USER: i32 = 1000;

    /// Whether a user with `held` rank satisfies a `required` rank.
    pub fn allows(held: i32, required: i32) -> bool {
        held <= required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for status in [Status::Deleted, Status::Active, Status::Draft, Status::Revision] {
            assert_eq!(Status::from_i32(status.as_i32()), Some(status));
        }
    }

    #[test]
    fn status_unknown_value() {
        assert_eq!(Status::from_i32(0), None);
        assert_eq!(Status::from_i32(42), None);
    }

    #[test]
    fn permission_lower_number_outranks() {
        assert!(permission::allows(permission::OWNER, permission::ADMINISTRATOR));
        assert!(permission::allows(permission::ADMINISTRATOR, permission::ADMINISTRATOR));
        assert!(!permission::allows(permission::USER, permission::ADMINISTRATOR));
    }
}
