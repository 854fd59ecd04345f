//! HTTP handlers, grouped by resource.

pub mod form;
pub mod map_data;
pub mod response;

use chrono::NaiveDate;
use datapage_core::error::CoreError;
use datapage_core::types::DbId;

/// Validate the two-letter language parameter every read endpoint takes.
pub(crate) fn require_lang(lang: Option<&str>) -> Result<&str, CoreError> {
    lang.filter(|lang| lang.len() == 2 && lang.chars().all(|c| c.is_ascii_alphabetic()))
        .ok_or_else(|| {
            CoreError::InvalidParameters("lang must be a two-letter language code".into())
        })
}

/// Parse an optional `YYYY-MM-DD` date parameter.
pub(crate) fn parse_date_param(
    value: Option<&str>,
    field: &str,
) -> Result<Option<NaiveDate>, CoreError> {
    value
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                CoreError::InvalidParameters(format!("{field} must be a YYYY-MM-DD date"))
            })
        })
        .transpose()
}

/// Coerce a JSON id field to a positive [`DbId`]. Clients send ids both
/// as numbers and as numeric strings.
pub(crate) fn coerce_db_id(
    value: Option<&serde_json::Value>,
    field: &str,
) -> Result<DbId, CoreError> {
    let id = match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };

    id.filter(|id| *id > 0).ok_or_else(|| {
        CoreError::InvalidParameters(format!("{field} must be a positive integer"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lang_must_be_two_letters() {
        assert!(require_lang(Some("en")).is_ok());
        assert!(require_lang(Some("EN")).is_ok());
        assert!(require_lang(Some("eng")).is_err());
        assert!(require_lang(Some("e1")).is_err());
        assert!(require_lang(None).is_err());
    }

    #[test]
    fn date_param_formats() {
        assert!(parse_date_param(Some("2014-08-01"), "from").is_ok());
        assert!(parse_date_param(None, "from").unwrap().is_none());
        assert!(parse_date_param(Some("08/01/2014"), "from").is_err());
        assert!(parse_date_param(Some("2014-13-01"), "from").is_err());
    }

    #[test]
    fn id_coercion_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_db_id(Some(&json!(3)), "form_id").unwrap(), 3);
        assert_eq!(coerce_db_id(Some(&json!("12")), "form_id").unwrap(), 12);
        assert!(coerce_db_id(Some(&json!(0)), "form_id").is_err());
        assert!(coerce_db_id(Some(&json!(-4)), "form_id").is_err());
        assert!(coerce_db_id(Some(&json!("abc")), "form_id").is_err());
        assert!(coerce_db_id(None, "form_id").is_err());
    }
}
