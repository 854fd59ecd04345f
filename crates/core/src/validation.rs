//! Required-field validation of submitted responses against the form's
//! item catalogue.
//!
//! The flat item list of the form is authoritative: an answer referencing
//! an unknown item fails, and every item marked required must have a
//! satisfying answer. The per-type rule lives on [`ItemType::answer_kind`]
//! so the write planner applies exactly the same classification.

use crate::hierarchy::ItemNode;
use crate::item::{AnswerKind, ItemType};
use crate::submission::{scalar_value, translation_count, SubmittedItem};
use crate::types::DbId;

/// Whether one answer satisfies its item's per-type rule.
///
/// - option items: a positive `option_id`
/// - value items: a non-null scalar (numeric `0` counts as present)
/// - text items: at least one valid `{lang, text}` translation
pub fn answer_satisfies(item_type: ItemType, submitted: &SubmittedItem) -> bool {
    match item_type.answer_kind() {
        AnswerKind::Option => submitted.has_option(),
        AnswerKind::Value => scalar_value(submitted.value.as_ref()).is_some(),
        AnswerKind::Translations => translation_count(submitted.value.as_ref()) > 0,
    }
}

/// Validate one response's item list against the catalogue.
///
/// Returns `false` when any answer references an unknown item, or when
/// any required catalogue item lacks a satisfying answer.
pub fn check_required_fields(catalog: &[ItemNode], submitted: &[SubmittedItem]) -> bool {
    let find = |id: DbId| catalog.iter().find(|item| item.id == id);

    if submitted.iter().any(|answer| find(answer.item_id).is_none()) {
        return false;
    }

    catalog
        .iter()
        .filter(|item| item.settings.required)
        .all(|item| {
            submitted
                .iter()
                .find(|answer| answer.item_id == item.id)
                .is_some_and(|answer| answer_satisfies(item.item_type, answer))
        })
}

/// Extract the value of the form's datetime item from a response, to be
/// stored as the response's top-level timestamp.
pub fn extract_datetime_value(catalog: &[ItemNode], submitted: &[SubmittedItem]) -> Option<String> {
    let datetime_item = catalog
        .iter()
        .find(|item| item.item_type == ItemType::Datetime)?;
    let answer = submitted
        .iter()
        .find(|answer| answer.item_id == datetime_item.id)?;
    scalar_value(answer.value.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemSettings;
    use serde_json::json;

    fn catalog_item(id: DbId, item_type: ItemType, required: bool) -> ItemNode {
        ItemNode {
            id,
            section_id: 1,
            parent_id: None,
            item_type,
            settings: ItemSettings {
                required,
                ..ItemSettings::default()
            },
            label: None,
            description: None,
            options: Vec::new(),
            items: Vec::new(),
        }
    }

    fn answer(item_id: DbId, option_id: Option<DbId>, value: Option<serde_json::Value>) -> SubmittedItem {
        SubmittedItem {
            item_id,
            option_id,
            value,
        }
    }

    // -- per-type rules --

    #[test]
    fn required_choice_without_option_fails() {
        let catalog = vec![catalog_item(1, ItemType::Choice, true)];
        assert!(!check_required_fields(&catalog, &[answer(1, None, None)]));
    }

    #[test]
    fn required_choice_with_zero_option_fails() {
        let catalog = vec![catalog_item(1, ItemType::Choice, true)];
        assert!(!check_required_fields(&catalog, &[answer(1, Some(0), None)]));
    }

    #[test]
    fn required_choice_with_option_passes() {
        let catalog = vec![catalog_item(1, ItemType::Choice, true)];
        assert!(check_required_fields(&catalog, &[answer(1, Some(7), None)]));
    }

    #[test]
    fn required_number_with_zero_passes() {
        let catalog = vec![catalog_item(1, ItemType::Number, true)];
        assert!(check_required_fields(&catalog, &[answer(1, None, Some(json!(0)))]));
    }

    #[test]
    fn required_number_with_null_fails() {
        let catalog = vec![catalog_item(1, ItemType::Number, true)];
        assert!(!check_required_fields(&catalog, &[answer(1, None, Some(json!(null)))]));
    }

    #[test]
    fn required_datetime_with_empty_string_fails() {
        let catalog = vec![catalog_item(1, ItemType::Datetime, true)];
        assert!(!check_required_fields(&catalog, &[answer(1, None, Some(json!("")))]));
    }

    #[test]
    fn required_text_needs_valid_translation() {
        let catalog = vec![catalog_item(1, ItemType::Text, true)];
        assert!(check_required_fields(
            &catalog,
            &[answer(1, None, Some(json!({ "lang": "en", "text": "ok" })))],
        ));
        assert!(!check_required_fields(
            &catalog,
            &[answer(1, None, Some(json!("plain string")))],
        ));
    }

    // -- catalogue rules --

    #[test]
    fn unknown_item_id_fails() {
        let catalog = vec![catalog_item(1, ItemType::Text, false)];
        assert!(!check_required_fields(&catalog, &[answer(99, None, None)]));
    }

    #[test]
    fn omitted_required_item_fails() {
        let catalog = vec![
            catalog_item(1, ItemType::Choice, true),
            catalog_item(2, ItemType::Text, false),
        ];
        // Only the optional item is answered.
        let submitted = [answer(2, None, Some(json!({ "lang": "en", "text": "hi" })))];
        assert!(!check_required_fields(&catalog, &submitted));
    }

    #[test]
    fn optional_items_may_be_empty() {
        let catalog = vec![
            catalog_item(1, ItemType::Choice, false),
            catalog_item(2, ItemType::Number, false),
        ];
        assert!(check_required_fields(
            &catalog,
            &[answer(1, None, None), answer(2, None, None)],
        ));
    }

    #[test]
    fn mixed_response_with_zero_number_passes() {
        // A required text item satisfied with one translation plus a
        // required number item answered with 0 must be accepted.
        let catalog = vec![
            catalog_item(1, ItemType::Text, true),
            catalog_item(2, ItemType::Number, true),
        ];
        let submitted = [
            answer(1, None, Some(json!({ "lang": "en", "text": "ok" }))),
            answer(2, None, Some(json!(0))),
        ];
        assert!(check_required_fields(&catalog, &submitted));
    }

    // -- datetime extraction --

    #[test]
    fn datetime_value_extracted() {
        let catalog = vec![
            catalog_item(1, ItemType::Number, false),
            catalog_item(2, ItemType::Datetime, false),
        ];
        let submitted = [
            answer(1, None, Some(json!(3))),
            answer(2, None, Some(json!("2014-08-01 10:00:00"))),
        ];
        assert_eq!(
            extract_datetime_value(&catalog, &submitted),
            Some("2014-08-01 10:00:00".to_string())
        );
    }

    #[test]
    fn datetime_absent_when_form_has_none() {
        let catalog = vec![catalog_item(1, ItemType::Number, false)];
        let submitted = [answer(1, None, Some(json!(3)))];
        assert_eq!(extract_datetime_value(&catalog, &submitted), None);
    }

    #[test]
    fn datetime_absent_when_not_answered() {
        let catalog = vec![catalog_item(2, ItemType::Datetime, false)];
        assert_eq!(extract_datetime_value(&catalog, &[]), None);
    }
}
