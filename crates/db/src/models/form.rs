//! Form, section, item and option rows.

use datapage_core::error::CoreError;
use datapage_core::hierarchy::{FormNode, ItemNode, OptionNode, SectionNode};
use datapage_core::item::{ItemSettings, ItemType, OptionSettings};
use datapage_core::types::DbId;
use sqlx::FromRow;

/// The active form with its language-resolved texts.
#[derive(Debug, Clone, FromRow)]
pub struct FormRow {
    pub id: DbId,
    pub status: i32,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<FormRow> for FormNode {
    fn from(row: FormRow) -> Self {
        FormNode {
            id: row.id,
            title: row.title,
            description: row.description,
        }
    }
}

/// A section row with its language-resolved texts.
#[derive(Debug, Clone, FromRow)]
pub struct SectionRow {
    pub id: DbId,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<SectionRow> for SectionNode {
    fn from(row: SectionRow) -> Self {
        SectionNode {
            id: row.id,
            title: row.title,
            description: row.description,
            items: Vec::new(),
        }
    }
}

/// An item row. `parent_id` is stored as 0 for top-level items.
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    pub id: DbId,
    pub section_id: DbId,
    pub parent_id: DbId,
    pub item_type: String,
    pub settings: serde_json::Value,
    pub label: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<ItemRow> for ItemNode {
    type Error = CoreError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let item_type = ItemType::parse(&row.item_type)?;
        let settings: ItemSettings = serde_json::from_value(row.settings).map_err(|e| {
            CoreError::Internal(format!("Malformed settings for item {}: {e}", row.id))
        })?;
        Ok(ItemNode {
            id: row.id,
            section_id: row.section_id,
            parent_id: (row.parent_id > 0).then_some(row.parent_id),
            item_type,
            settings,
            label: row.label,
            description: row.description,
            options: Vec::new(),
            items: Vec::new(),
        })
    }
}

/// An option row with its language-resolved label.
#[derive(Debug, Clone, FromRow)]
pub struct OptionRow {
    pub id: DbId,
    pub item_id: DbId,
    pub value: i32,
    pub settings: serde_json::Value,
    pub label: Option<String>,
}

impl TryFrom<OptionRow> for OptionNode {
    type Error = CoreError;

    fn try_from(row: OptionRow) -> Result<Self, Self::Error> {
        let settings: OptionSettings = serde_json::from_value(row.settings).map_err(|e| {
            CoreError::Internal(format!("Malformed settings for option {}: {e}", row.id))
        })?;
        Ok(OptionNode {
            id: row.id,
            item_id: row.item_id,
            value: row.value,
            settings,
            label: row.label,
        })
    }
}
