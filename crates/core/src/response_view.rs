//! Read-side response shapes.

use serde::Serialize;

use crate::item::{ItemSettings, OptionSettings};
use crate::types::{DbId, Timestamp};

/// One persisted answer as served to clients. Text answers carry the
/// language-resolved translation in `value`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseItemView {
    pub item_id: DbId,
    pub option_id: Option<DbId>,
    pub value: Option<String>,
    pub item_settings: ItemSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_settings: Option<OptionSettings>,
}

/// A persisted response with its answers.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseView {
    pub id: DbId,
    pub form_id: DbId,
    pub status: i32,
    pub datetime: Option<String>,
    pub created_at: Timestamp,
    pub items: Vec<ResponseItemView>,
}

/// Strip answers flagged `hidden_from_public` from each response.
///
/// Only the individual hidden answers are removed; the responses
/// themselves are kept.
pub fn filter_public_responses(mut responses: Vec<ResponseView>) -> Vec<ResponseView> {
    for response in &mut responses {
        response
            .items
            .retain(|item| !item.item_settings.hidden_from_public);
    }
    responses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(item_id: DbId, hidden: bool) -> ResponseItemView {
        ResponseItemView {
            item_id,
            option_id: None,
            value: None,
            item_settings: ItemSettings {
                hidden_from_public: hidden,
                ..ItemSettings::default()
            },
            option_settings: None,
        }
    }

    fn response(id: DbId, items: Vec<ResponseItemView>) -> ResponseView {
        ResponseView {
            id,
            form_id: 1,
            status: 1,
            datetime: None,
            created_at: Timestamp::default(),
            items,
        }
    }

    #[test]
    fn hidden_items_stripped_response_kept() {
        let responses = filter_public_responses(vec![response(
            1,
            vec![item(1, true), item(2, false), item(3, true)],
        )]);
        assert_eq!(responses.len(), 1);
        let ids: Vec<DbId> = responses[0].items.iter().map(|i| i.item_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn first_item_is_also_stripped() {
        let responses =
            filter_public_responses(vec![response(1, vec![item(1, true), item(2, false)])]);
        let ids: Vec<DbId> = responses[0].items.iter().map(|i| i.item_id).collect();
        assert_eq!(ids, vec![2]);
    }
}
