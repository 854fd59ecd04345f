//! Response rows and their joined item rows.

use datapage_core::error::CoreError;
use datapage_core::item::{ItemSettings, OptionSettings};
use datapage_core::response_view::ResponseItemView;
use datapage_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from `form_responses`.
#[derive(Debug, Clone, FromRow)]
pub struct ResponseRow {
    pub id: DbId,
    pub form_id: DbId,
    pub status: i32,
    pub datetime: Option<String>,
    pub created_at: Timestamp,
}

/// A response item joined with its item settings, bound option settings,
/// and language-resolved text value.
#[derive(Debug, Clone, FromRow)]
pub struct ResponseItemRow {
    pub response_id: DbId,
    pub item_id: DbId,
    pub option_id: Option<DbId>,
    pub value: Option<String>,
    pub item_settings: serde_json::Value,
    pub option_settings: Option<serde_json::Value>,
}

impl TryFrom<ResponseItemRow> for ResponseItemView {
    type Error = CoreError;

    fn try_from(row: ResponseItemRow) -> Result<Self, Self::Error> {
        let item_settings: ItemSettings =
            serde_json::from_value(row.item_settings).map_err(|e| {
                CoreError::Internal(format!("Malformed settings for item {}: {e}", row.item_id))
            })?;
        let option_settings: Option<OptionSettings> = row
            .option_settings
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| {
                CoreError::Internal(format!(
                    "Malformed option settings on response item for item {}: {e}",
                    row.item_id
                ))
            })?;
        Ok(ResponseItemView {
            item_id: row.item_id,
            option_id: row.option_id,
            value: row.value,
            item_settings,
            option_settings,
        })
    }
}
