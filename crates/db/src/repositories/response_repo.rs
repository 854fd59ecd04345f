//! Repository for responses and their item/translation children.

use std::collections::HashMap;

use chrono::NaiveDate;
use datapage_core::error::CoreError;
use datapage_core::response_view::{ResponseItemView, ResponseView};
use datapage_core::types::{DbId, Status};
use datapage_core::write_plan::{WriteCounts, WritePlan};
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::response::{ResponseItemRow, ResponseRow};

/// Filters for response listing. `None` fields are not applied.
#[derive(Debug, Clone)]
pub struct ResponseQuery<'a> {
    pub form_id: DbId,
    pub lang: &'a str,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<i32>,
    pub id: Option<DbId>,
}

impl<'a> ResponseQuery<'a> {
    /// All responses of a form, any status, in the given language.
    pub fn all(form_id: DbId, lang: &'a str) -> Self {
        Self {
            form_id,
            lang,
            from: None,
            to: None,
            status: None,
            id: None,
        }
    }

    /// Active responses only (the public view).
    pub fn active(form_id: DbId, lang: &'a str) -> Self {
        Self {
            status: Some(Status::Active.as_i32()),
            ..Self::all(form_id, lang)
        }
    }
}

/// Provides listing, status transitions, and the atomic batch write for
/// responses.
pub struct ResponseRepo;

impl ResponseRepo {
    /// List responses newest-first, each with its items attached.
    ///
    /// Text answers resolve to the translation in the requested language;
    /// answers without one fall back to the raw stored value.
    pub async fn list(
        pool: &PgPool,
        query: &ResponseQuery<'_>,
    ) -> Result<Vec<ResponseView>, DbError> {
        let rows = sqlx::query_as::<_, ResponseRow>(
            "SELECT r.id, r.form_id, r.status, r.datetime, r.created_at
             FROM form_responses r
             WHERE r.form_id = $1
               AND ($2::int IS NULL OR r.status = $2)
               AND ($3::date IS NULL OR r.created_at::date >= $3)
               AND ($4::date IS NULL OR r.created_at::date <= $4)
               AND ($5::bigint IS NULL OR r.id = $5)
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .bind(query.form_id)
        .bind(query.status)
        .bind(query.from)
        .bind(query.to)
        .bind(query.id)
        .fetch_all(pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = rows.iter().map(|row| row.id).collect();
        let item_rows = sqlx::query_as::<_, ResponseItemRow>(
            "SELECT ri.response_id, ri.item_id, ri.option_id,
                    COALESCE(rt.value, ri.value) AS value,
                    i.settings AS item_settings,
                    o.settings AS option_settings
             FROM form_response_items ri
             JOIN form_items i ON i.id = ri.item_id
             LEFT JOIN form_item_options o ON o.id = ri.option_id
             LEFT JOIN form_response_item_translations rt
                    ON rt.response_item_id = ri.id AND rt.lang = $2
             WHERE ri.response_id = ANY($1)
             ORDER BY ri.response_id, ri.id",
        )
        .bind(&ids)
        .bind(query.lang)
        .fetch_all(pool)
        .await?;

        let mut grouped: HashMap<DbId, Vec<ResponseItemView>> = HashMap::new();
        for row in item_rows {
            let response_id = row.response_id;
            let view = ResponseItemView::try_from(row)?;
            grouped.entry(response_id).or_default().push(view);
        }

        Ok(rows
            .into_iter()
            .map(|row| ResponseView {
                id: row.id,
                form_id: row.form_id,
                status: row.status,
                datetime: row.datetime,
                created_at: row.created_at,
                items: grouped.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }

    /// Change a response's status. Returns `false` when the id is unknown.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: Status,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE form_responses SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_i32())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist a planned batch as one atomic unit.
    ///
    /// Every row of the plan is inserted inside a single transaction while
    /// the persisted counts are tallied. Commit is issued only when the
    /// persisted counts equal the plan's expected counts; any mismatch or
    /// row error rolls the whole unit back.
    pub async fn create_batch(pool: &PgPool, plan: &WritePlan) -> Result<(), DbError> {
        let expected = plan.expected_counts();
        let mut persisted = WriteCounts::default();

        tracing::debug!(
            form_id = plan.form_id,
            responses = expected.responses,
            items = expected.items,
            translations = expected.translations,
            "Persisting response batch"
        );

        let mut tx = pool.begin().await?;

        for response in &plan.responses {
            let response_id: DbId = sqlx::query_scalar(
                "INSERT INTO form_responses (form_id, datetime) VALUES ($1, $2) RETURNING id",
            )
            .bind(plan.form_id)
            .bind(&response.datetime)
            .fetch_one(&mut *tx)
            .await?;
            persisted.responses += 1;

            for item in &response.items {
                let response_item_id: DbId = sqlx::query_scalar(
                    "INSERT INTO form_response_items
                         (response_id, form_id, item_id, option_id, value)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING id",
                )
                .bind(response_id)
                .bind(plan.form_id)
                .bind(item.item_id)
                .bind(item.option_id)
                .bind(&item.value)
                .fetch_one(&mut *tx)
                .await?;
                persisted.items += 1;

                for translation in &item.translations {
                    sqlx::query(
                        "INSERT INTO form_response_item_translations
                             (response_item_id, lang, value)
                         VALUES ($1, $2, $3)",
                    )
                    .bind(response_item_id)
                    .bind(&translation.lang)
                    .bind(&translation.text)
                    .execute(&mut *tx)
                    .await?;
                    persisted.translations += 1;
                }
            }
        }

        if persisted != expected {
            tx.rollback().await?;
            return Err(CoreError::Internal(format!(
                "Response write count mismatch: planned {expected:?}, persisted {persisted:?}"
            ))
            .into());
        }

        tx.commit().await?;
        Ok(())
    }
}
