//! Form item types and their settings.
//!
//! The item `type` column is a closed set. Modeling it as an enum puts the
//! per-type answer rule in one place ([`ItemType::answer_kind`]) so the
//! validator and the write planner cannot drift apart.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The closed set of form item types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    Text,
    Number,
    Scale,
    Choice,
    LocationChoice,
    LocationSearch,
    Datetime,
}

/// What a response item is expected to carry for a given item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerKind {
    /// An `option_id` referencing one of the item's options.
    Option,
    /// A scalar `value` (stored as text).
    Value,
    /// One `{lang, text}` translation per language.
    Translations,
}

impl ItemType {
    /// Parse the stored `type` column value.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "scale" => Ok(Self::Scale),
            "choice" => Ok(Self::Choice),
            "location-choice" => Ok(Self::LocationChoice),
            "location-search" => Ok(Self::LocationSearch),
            "datetime" => Ok(Self::Datetime),
            other => Err(CoreError::Internal(format!("Unknown form item type: {other}"))),
        }
    }

    /// Stable name as stored in the `type` column.
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Scale => "scale",
            Self::Choice => "choice",
            Self::LocationChoice => "location-choice",
            Self::LocationSearch => "location-search",
            Self::Datetime => "datetime",
        }
    }

    /// The answer rule for this item type, shared by validation and
    /// write planning.
    pub fn answer_kind(self) -> AnswerKind {
        match self {
            Self::Scale | Self::Choice | Self::LocationChoice => AnswerKind::Option,
            Self::Number | Self::Datetime | Self::LocationSearch => AnswerKind::Value,
            Self::Text => AnswerKind::Translations,
        }
    }
}

/// Per-item settings stored as JSON in `form_items.settings`.
///
/// Unknown keys are preserved so authoring tools can attach their own
/// metadata without this core knowing about it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemSettings {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub hidden_from_public: bool,
    #[serde(default)]
    pub hidden_from_map: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Per-option settings stored as JSON in `form_item_options.settings`.
///
/// Location-choice options carry their map coordinates here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl OptionSettings {
    /// Coordinates, if both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        for t in [
            ItemType::Text,
            ItemType::Number,
            ItemType::Scale,
            ItemType::Choice,
            ItemType::LocationChoice,
            ItemType::LocationSearch,
            ItemType::Datetime,
        ] {
            assert_eq!(ItemType::parse(t.name()).unwrap(), t);
        }
    }

    #[test]
    fn parse_unknown_type_fails() {
        assert!(ItemType::parse("dropdown").is_err());
    }

    #[test]
    fn answer_kinds() {
        assert_eq!(ItemType::Choice.answer_kind(), AnswerKind::Option);
        assert_eq!(ItemType::Scale.answer_kind(), AnswerKind::Option);
        assert_eq!(ItemType::LocationChoice.answer_kind(), AnswerKind::Option);
        assert_eq!(ItemType::Number.answer_kind(), AnswerKind::Value);
        assert_eq!(ItemType::Datetime.answer_kind(), AnswerKind::Value);
        assert_eq!(ItemType::LocationSearch.answer_kind(), AnswerKind::Value);
        assert_eq!(ItemType::Text.answer_kind(), AnswerKind::Translations);
    }

    #[test]
    fn item_settings_defaults() {
        let settings: ItemSettings = serde_json::from_str("{}").unwrap();
        assert!(!settings.required);
        assert!(!settings.hidden_from_public);
        assert!(!settings.hidden_from_map);
    }

    #[test]
    fn item_settings_preserves_unknown_keys() {
        let settings: ItemSettings =
            serde_json::from_str(r#"{"required": true, "placeholder": "age"}"#).unwrap();
        assert!(settings.required);
        assert_eq!(settings.extra["placeholder"], "age");
    }

    #[test]
    fn option_coordinates_require_both() {
        let both: OptionSettings = serde_json::from_str(r#"{"lat": 1.0, "lng": 2.0}"#).unwrap();
        assert_eq!(both.coordinates(), Some((1.0, 2.0)));

        let partial: OptionSettings = serde_json::from_str(r#"{"lat": 1.0}"#).unwrap();
        assert_eq!(partial.coordinates(), None);
    }
}
