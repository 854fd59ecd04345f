//! Read-only repository for the form definition tables.
//!
//! Forms are authored out-of-band; this core only reads them. All texts
//! are resolved against the requested language via the translation
//! tables.

use datapage_core::hierarchy::{ItemNode, OptionNode};
use datapage_core::types::{DbId, Status};
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::form::{FormRow, ItemRow, OptionRow, SectionRow};

/// Provides lookups for the active form and its flat row sets.
pub struct FormRepo;

impl FormRepo {
    /// The single active form, with texts in the given language.
    pub async fn find_active(pool: &PgPool, lang: &str) -> Result<Option<FormRow>, sqlx::Error> {
        sqlx::query_as::<_, FormRow>(
            "SELECT f.id, f.status, ft.title, ft.description
             FROM forms f
             LEFT JOIN form_translations ft ON ft.form_id = f.id AND ft.lang = $2
             WHERE f.status = $1
             ORDER BY f.id
             LIMIT 1",
        )
        .bind(Status::Active.as_i32())
        .bind(lang)
        .fetch_optional(pool)
        .await
    }

    /// A form's sections in authored order.
    pub async fn sections(
        pool: &PgPool,
        form_id: DbId,
        lang: Option<&str>,
    ) -> Result<Vec<SectionRow>, sqlx::Error> {
        sqlx::query_as::<_, SectionRow>(
            "SELECT s.id, st.title, st.description
             FROM form_sections s
             LEFT JOIN form_section_translations st ON st.section_id = s.id AND st.lang = $2
             WHERE s.form_id = $1
             ORDER BY s.sort_order, s.id",
        )
        .bind(form_id)
        .bind(lang)
        .fetch_all(pool)
        .await
    }

    /// A form's items in authored order, converted to domain nodes.
    pub async fn items(
        pool: &PgPool,
        form_id: DbId,
        lang: Option<&str>,
    ) -> Result<Vec<ItemNode>, DbError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT i.id, i.section_id, i.parent_id, i.type AS item_type, i.settings,
                    it.label, it.description
             FROM form_items i
             LEFT JOIN form_item_translations it ON it.item_id = i.id AND it.lang = $2
             WHERE i.form_id = $1
             ORDER BY i.sort_order, i.id",
        )
        .bind(form_id)
        .bind(lang)
        .fetch_all(pool)
        .await?;

        rows.into_iter()
            .map(|row| ItemNode::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// A form's options in authored order, converted to domain nodes.
    pub async fn options(
        pool: &PgPool,
        form_id: DbId,
        lang: Option<&str>,
    ) -> Result<Vec<OptionNode>, DbError> {
        let rows = sqlx::query_as::<_, OptionRow>(
            "SELECT o.id, o.item_id, o.value, o.settings, ot.label
             FROM form_item_options o
             LEFT JOIN form_item_option_translations ot ON ot.option_id = o.id AND ot.lang = $2
             WHERE o.form_id = $1
             ORDER BY o.sort_order, o.id",
        )
        .bind(form_id)
        .bind(lang)
        .fetch_all(pool)
        .await?;

        rows.into_iter()
            .map(|row| OptionNode::try_from(row).map_err(DbError::from))
            .collect()
    }
}
