//! Submitted response payloads.
//!
//! A submission is either one response (a flat item list) or a batch
//! (a list of item lists); the shape is decided by whether the first
//! element is itself a list. Text answers arrive inside `value` as either
//! a single `{lang, text}` object or an array of them.

use serde::Deserialize;
use serde_json::Value;

use crate::types::DbId;

/// One submitted answer, referencing a form item.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedItem {
    pub item_id: DbId,
    #[serde(default)]
    pub option_id: Option<DbId>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl SubmittedItem {
    /// Whether a positive option id was supplied.
    pub fn has_option(&self) -> bool {
        self.option_id.is_some_and(|id| id > 0)
    }
}

/// The `items` field of a submission: one response or a batch of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubmissionItems {
    Single(Vec<SubmittedItem>),
    Batch(Vec<Vec<SubmittedItem>>),
}

impl SubmissionItems {
    /// Normalize to batch form: a single response becomes a batch of one.
    pub fn into_batches(self) -> Vec<Vec<SubmittedItem>> {
        match self {
            Self::Single(items) => vec![items],
            Self::Batch(batches) => batches,
        }
    }

    /// A submission with no responses, or with an empty response, is a
    /// shape error.
    pub fn has_empty_list(&self) -> bool {
        match self {
            Self::Single(items) => items.is_empty(),
            Self::Batch(batches) => batches.is_empty() || batches.iter().any(Vec::is_empty),
        }
    }
}

/// Extract the scalar value of a number/datetime/location-search answer
/// as its storable text. Absent, null, empty-string, and non-scalar
/// values all count as "no value".
///
/// A numeric `0` IS a value.
pub fn scalar_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract the valid `{lang, text}` translations of a text answer.
///
/// A single object yields one translation; an array yields all of them,
/// but only when *every* element carries a `lang` — one malformed element
/// invalidates the whole set. Anything else yields none. `text` defaults
/// to the empty string when missing.
pub fn extract_translations(value: Option<&Value>) -> Vec<(String, String)> {
    fn one(value: &Value) -> Option<(String, String)> {
        let object = value.as_object()?;
        let lang = object.get("lang")?.as_str()?;
        if lang.is_empty() {
            return None;
        }
        let text = object.get("text").and_then(Value::as_str).unwrap_or("");
        Some((lang.to_string(), text.to_string()))
    }

    match value {
        Some(object @ Value::Object(_)) => one(object).into_iter().collect(),
        Some(Value::Array(elements)) => {
            let translations: Vec<_> = elements.iter().filter_map(one).collect();
            if translations.len() == elements.len() {
                translations
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    }
}

/// Number of valid translations in a text answer. This is the same
/// function used to decide whether translation rows are persisted.
pub fn translation_count(value: Option<&Value>) -> usize {
    extract_translations(value).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    // -- submission shape --

    #[test]
    fn single_shape_deserializes() {
        let items: SubmissionItems =
            serde_json::from_value(json!([{ "item_id": 1, "option_id": 2 }])).unwrap();
        assert_matches!(items, SubmissionItems::Single(ref list) if list.len() == 1);
    }

    #[test]
    fn batch_shape_deserializes() {
        let items: SubmissionItems = serde_json::from_value(json!([
            [{ "item_id": 1, "value": "a" }],
            [{ "item_id": 1, "value": "b" }]
        ]))
        .unwrap();
        assert_matches!(items, SubmissionItems::Batch(ref batches) if batches.len() == 2);
    }

    #[test]
    fn empty_list_detected() {
        let empty: SubmissionItems = serde_json::from_value(json!([])).unwrap();
        assert!(empty.has_empty_list());

        let empty_inner: SubmissionItems =
            serde_json::from_value(json!([[{ "item_id": 1 }], []])).unwrap();
        assert!(empty_inner.has_empty_list());
    }

    #[test]
    fn single_normalizes_to_batch_of_one() {
        let items: SubmissionItems = serde_json::from_value(json!([{ "item_id": 1 }])).unwrap();
        assert_eq!(items.into_batches().len(), 1);
    }

    // -- scalar_value --

    #[test]
    fn scalar_zero_is_a_value() {
        assert_eq!(scalar_value(Some(&json!(0))), Some("0".to_string()));
    }

    #[test]
    fn scalar_string_kept() {
        assert_eq!(
            scalar_value(Some(&json!("2014-08-01"))),
            Some("2014-08-01".to_string())
        );
    }

    #[test]
    fn scalar_absent_forms() {
        assert_eq!(scalar_value(None), None);
        assert_eq!(scalar_value(Some(&Value::Null)), None);
        assert_eq!(scalar_value(Some(&json!(""))), None);
        assert_eq!(scalar_value(Some(&json!("   "))), None);
        assert_eq!(scalar_value(Some(&json!({"lang": "en"}))), None);
    }

    // -- translations --

    #[test]
    fn translation_object_counts_one() {
        let value = json!({ "lang": "en", "text": "hello" });
        assert_eq!(translation_count(Some(&value)), 1);
        assert_eq!(
            extract_translations(Some(&value)),
            vec![("en".to_string(), "hello".to_string())]
        );
    }

    #[test]
    fn translation_array_counts_all() {
        let value = json!([
            { "lang": "en", "text": "hello" },
            { "lang": "de", "text": "hallo" }
        ]);
        assert_eq!(translation_count(Some(&value)), 2);
    }

    #[test]
    fn translation_array_with_invalid_element_counts_zero() {
        let value = json!([{ "lang": "en", "text": "hello" }, { "text": "no lang" }]);
        assert_eq!(translation_count(Some(&value)), 0);
        assert!(extract_translations(Some(&value)).is_empty());
    }

    #[test]
    fn translation_missing_lang_counts_zero() {
        assert_eq!(translation_count(Some(&json!({ "text": "hello" }))), 0);
        assert_eq!(translation_count(Some(&json!({ "lang": "" }))), 0);
    }

    #[test]
    fn translation_plain_string_counts_zero() {
        assert_eq!(translation_count(Some(&json!("hello"))), 0);
        assert_eq!(translation_count(None), 0);
    }

    #[test]
    fn translation_missing_text_defaults_empty() {
        let value = json!({ "lang": "en" });
        assert_eq!(
            extract_translations(Some(&value)),
            vec![("en".to_string(), String::new())]
        );
    }
}
