//! Write planning for response persistence.
//!
//! A submission is turned into an explicit plan of every row the writer
//! will insert — one response row per response, one item row per answered
//! item, one translation row per supplied language. Items with no
//! option/value/translation are skipped outright; they never produce
//! empty rows. The plan's expected counts are the commit gate: the writer
//! commits only when the persisted counts match them exactly.

use crate::error::CoreError;
use crate::hierarchy::ItemNode;
use crate::item::AnswerKind;
use crate::sanitize::strip_html_tags;
use crate::submission::{extract_translations, scalar_value, SubmittedItem};
use crate::types::DbId;
use crate::validation::{check_required_fields, extract_datetime_value};

/// One translation row to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTranslation {
    pub lang: String,
    pub text: String,
}

/// One response item row to insert, with its translation rows.
#[derive(Debug, Clone)]
pub struct PlannedItem {
    pub item_id: DbId,
    pub option_id: Option<DbId>,
    pub value: Option<String>,
    pub translations: Vec<PlannedTranslation>,
}

/// One response row to insert, with its item rows.
#[derive(Debug, Clone)]
pub struct ResponsePlan {
    /// The extracted datetime-item value, stored on the response row.
    pub datetime: Option<String>,
    pub items: Vec<PlannedItem>,
}

/// The full unit of work for one submission (single or batch).
#[derive(Debug, Clone)]
pub struct WritePlan {
    pub form_id: DbId,
    pub responses: Vec<ResponsePlan>,
}

/// Row counts, computed from the plan up front and tallied again during
/// persistence. Commit requires equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteCounts {
    pub responses: usize,
    pub items: usize,
    pub translations: usize,
}

impl WritePlan {
    /// The counts the writer must have persisted before it may commit.
    pub fn expected_counts(&self) -> WriteCounts {
        let mut counts = WriteCounts {
            responses: self.responses.len(),
            ..WriteCounts::default()
        };
        for response in &self.responses {
            counts.items += response.items.len();
            for item in &response.items {
                counts.translations += item.translations.len();
            }
        }
        counts
    }
}

/// Validate a batch of responses and plan its rows.
///
/// Fails with [`CoreError::EmptyFields`] before anything is planned when
/// any response in the batch misses a required item — no partial
/// acceptance.
pub fn plan_responses(
    form_id: DbId,
    catalog: &[ItemNode],
    batches: &[Vec<SubmittedItem>],
) -> Result<WritePlan, CoreError> {
    if batches.iter().any(|items| !check_required_fields(catalog, items)) {
        return Err(CoreError::EmptyFields);
    }

    let responses = batches
        .iter()
        .map(|items| plan_response(catalog, items))
        .collect();

    Ok(WritePlan { form_id, responses })
}

fn plan_response(catalog: &[ItemNode], submitted: &[SubmittedItem]) -> ResponsePlan {
    let datetime = extract_datetime_value(catalog, submitted)
        .map(|value| strip_html_tags(&value));

    let items = submitted
        .iter()
        .filter_map(|answer| {
            let item = catalog.iter().find(|item| item.id == answer.item_id)?;
            plan_item(item.item_type.answer_kind(), answer)
        })
        .collect();

    ResponsePlan { datetime, items }
}

/// Plan a single answered item, or `None` when the answer is empty and no
/// row should be written.
fn plan_item(kind: AnswerKind, answer: &SubmittedItem) -> Option<PlannedItem> {
    match kind {
        AnswerKind::Option => {
            if !answer.has_option() {
                return None;
            }
            Some(PlannedItem {
                item_id: answer.item_id,
                option_id: answer.option_id,
                value: None,
                translations: Vec::new(),
            })
        }
        AnswerKind::Value => {
            let value = scalar_value(answer.value.as_ref())?;
            Some(PlannedItem {
                item_id: answer.item_id,
                option_id: None,
                value: Some(strip_html_tags(&value)),
                translations: Vec::new(),
            })
        }
        AnswerKind::Translations => {
            let translations: Vec<PlannedTranslation> =
                extract_translations(answer.value.as_ref())
                    .into_iter()
                    .map(|(lang, text)| PlannedTranslation {
                        lang,
                        text: strip_html_tags(&text),
                    })
                    .collect();
            if translations.is_empty() {
                return None;
            }
            Some(PlannedItem {
                item_id: answer.item_id,
                option_id: None,
                value: None,
                translations,
            })
        }
    }
}
