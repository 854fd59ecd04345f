//! Assembly of flat form rows into the nested hierarchy served to clients.
//!
//! Items self-reference through `parent_id`, so a section's items form a
//! tree of data-driven depth. Construction is arena-style: one pass builds
//! a `parent -> children` index, then the nested view is materialized by
//! walking the index from the root. Input row order is preserved at every
//! level.

use std::collections::HashMap;

use serde::Serialize;

use crate::item::{ItemSettings, ItemType, OptionSettings};
use crate::types::DbId;

/// Sentinel parent id meaning "top-level within the section".
const ROOT_PARENT: DbId = 0;

/// An option row attached to an item, with its language-resolved label.
#[derive(Debug, Clone, Serialize)]
pub struct OptionNode {
    pub id: DbId,
    pub item_id: DbId,
    pub value: i32,
    pub settings: OptionSettings,
    pub label: Option<String>,
}

/// An item row with its options and (after nesting) its child items.
#[derive(Debug, Clone, Serialize)]
pub struct ItemNode {
    pub id: DbId,
    pub section_id: DbId,
    /// `None` for top-level items.
    pub parent_id: Option<DbId>,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub settings: ItemSettings,
    pub label: Option<String>,
    pub description: Option<String>,
    pub options: Vec<OptionNode>,
    /// Child items. Omitted from JSON when empty so leaf nodes serialize
    /// without an `items` key.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemNode>,
}

/// A section row with its nested item tree.
#[derive(Debug, Clone, Serialize)]
pub struct SectionNode {
    pub id: DbId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub items: Vec<ItemNode>,
}

/// The active form row with its language-resolved texts.
#[derive(Debug, Clone, Serialize)]
pub struct FormNode {
    pub id: DbId,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// The assembled hierarchy.
///
/// Multi-section forms carry `sections`; forms with exactly one section
/// have the section layer collapsed and its items promoted to `items`.
#[derive(Debug, Clone, Serialize)]
pub struct FormHierarchy {
    pub id: DbId,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SectionNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ItemNode>>,
}

/// Attach each option to its item, preserving option row order.
///
/// Options referencing an unknown item are dropped.
pub fn attach_options(items: &mut [ItemNode], options: Vec<OptionNode>) {
    let index: HashMap<DbId, usize> = items
        .iter()
        .enumerate()
        .map(|(pos, item)| (item.id, pos))
        .collect();

    for option in options {
        if let Some(&pos) = index.get(&option.item_id) {
            items[pos].options.push(option);
        }
    }
}

/// Nest a flat item list into a tree via `parent_id`.
///
/// Items whose `parent_id` references a nonexistent item never attach;
/// their whole subtree silently drops out of the result.
pub fn nest_items(flat: Vec<ItemNode>) -> Vec<ItemNode> {
    let mut children: HashMap<DbId, Vec<usize>> = HashMap::new();
    for (pos, item) in flat.iter().enumerate() {
        let parent = item.parent_id.unwrap_or(ROOT_PARENT);
        children.entry(parent).or_default().push(pos);
    }

    let mut arena: Vec<Option<ItemNode>> = flat.into_iter().map(Some).collect();
    take_children(ROOT_PARENT, &children, &mut arena)
}

fn take_children(
    parent: DbId,
    children: &HashMap<DbId, Vec<usize>>,
    arena: &mut [Option<ItemNode>],
) -> Vec<ItemNode> {
    let Some(positions) = children.get(&parent) else {
        return Vec::new();
    };

    let mut nested = Vec::with_capacity(positions.len());
    for &pos in positions {
        if let Some(mut node) = arena[pos].take() {
            node.items = take_children(node.id, children, arena);
            nested.push(node);
        }
    }
    nested
}

/// Assemble the full hierarchy from flat rows.
///
/// Items are grouped into their sections in input order, options attached
/// by `item_id`, then each section's items are nested. A single-section
/// form has the section layer collapsed.
pub fn build_form_hierarchy(
    form: FormNode,
    sections: Vec<SectionNode>,
    mut items: Vec<ItemNode>,
    options: Vec<OptionNode>,
) -> FormHierarchy {
    attach_options(&mut items, options);

    let mut assembled: Vec<SectionNode> = sections
        .into_iter()
        .map(|mut section| {
            let own: Vec<ItemNode> = items
                .iter()
                .filter(|item| item.section_id == section.id)
                .cloned()
                .collect();
            section.items = nest_items(own);
            section
        })
        .collect();

    if assembled.len() == 1 {
        let only = assembled.remove(0);
        FormHierarchy {
            id: form.id,
            title: form.title,
            description: form.description,
            sections: None,
            items: Some(only.items),
        }
    } else {
        FormHierarchy {
            id: form.id,
            title: form.title,
            description: form.description,
            sections: Some(assembled),
            items: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: DbId, section_id: DbId, parent_id: Option<DbId>) -> ItemNode {
        ItemNode {
            id,
            section_id,
            parent_id,
            item_type: ItemType::Text,
            settings: ItemSettings::default(),
            label: None,
            description: None,
            options: Vec::new(),
            items: Vec::new(),
        }
    }

    fn option(id: DbId, item_id: DbId) -> OptionNode {
        OptionNode {
            id,
            item_id,
            value: 1,
            settings: OptionSettings::default(),
            label: None,
        }
    }

    fn section(id: DbId) -> SectionNode {
        SectionNode {
            id,
            title: None,
            description: None,
            items: Vec::new(),
        }
    }

    fn form() -> FormNode {
        FormNode {
            id: 1,
            title: Some("Survey".into()),
            description: None,
        }
    }

    // -- nest_items --

    #[test]
    fn nest_flat_list_preserves_order() {
        let tree = nest_items(vec![item(3, 1, None), item(1, 1, None), item(2, 1, None)]);
        let ids: Vec<DbId> = tree.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn nest_children_under_parent() {
        let tree = nest_items(vec![
            item(1, 1, None),
            item(2, 1, Some(1)),
            item(3, 1, Some(2)),
        ]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].items.len(), 1);
        assert_eq!(tree[0].items[0].id, 2);
        assert_eq!(tree[0].items[0].items[0].id, 3);
    }

    #[test]
    fn nest_leaf_has_empty_children() {
        let tree = nest_items(vec![item(1, 1, None)]);
        assert!(tree[0].items.is_empty());
    }

    #[test]
    fn nest_orphaned_subtree_drops() {
        // Item 2 references a parent that does not exist; item 3 hangs
        // off item 2, so the whole subtree disappears.
        let tree = nest_items(vec![
            item(1, 1, None),
            item(2, 1, Some(99)),
            item(3, 1, Some(2)),
        ]);
        let ids: Vec<DbId> = tree.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn nest_leaf_omits_items_key_in_json() {
        let tree = nest_items(vec![item(1, 1, None), item(2, 1, Some(1))]);
        let json = serde_json::to_value(&tree).expect("serializes");
        // Parent has children, leaf does not serialize an `items` key.
        assert!(json[0].get("items").is_some());
        assert!(json[0]["items"][0].get("items").is_none());
    }

    // -- attach_options --

    #[test]
    fn options_attach_to_exactly_one_item() {
        let mut items = vec![item(1, 1, None), item(2, 1, None)];
        attach_options(
            &mut items,
            vec![option(10, 2), option(11, 1), option(12, 2)],
        );
        assert_eq!(items[0].options.len(), 1);
        assert_eq!(items[0].options[0].id, 11);
        let ids: Vec<DbId> = items[1].options.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![10, 12]);
    }

    #[test]
    fn option_for_unknown_item_drops() {
        let mut items = vec![item(1, 1, None)];
        attach_options(&mut items, vec![option(10, 99)]);
        assert!(items[0].options.is_empty());
    }

    // -- build_form_hierarchy --

    #[test]
    fn items_group_into_their_sections() {
        let hierarchy = build_form_hierarchy(
            form(),
            vec![section(1), section(2)],
            vec![item(1, 1, None), item(2, 2, None), item(3, 1, None)],
            Vec::new(),
        );
        let sections = hierarchy.sections.expect("multi-section form");
        let first: Vec<DbId> = sections[0].items.iter().map(|i| i.id).collect();
        let second: Vec<DbId> = sections[1].items.iter().map(|i| i.id).collect();
        assert_eq!(first, vec![1, 3]);
        assert_eq!(second, vec![2]);
    }

    #[test]
    fn single_section_collapses() {
        let hierarchy = build_form_hierarchy(
            form(),
            vec![section(1)],
            vec![item(1, 1, None), item(2, 1, Some(1))],
            Vec::new(),
        );
        assert!(hierarchy.sections.is_none());
        let items = hierarchy.items.as_ref().expect("promoted items");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].items[0].id, 2);

        let json = serde_json::to_value(&hierarchy).expect("serializes");
        assert!(json.get("sections").is_none());
        assert!(json.get("items").is_some());
    }

    #[test]
    fn multi_section_keeps_sections_key() {
        let hierarchy = build_form_hierarchy(
            form(),
            vec![section(1), section(2)],
            Vec::new(),
            Vec::new(),
        );
        let json = serde_json::to_value(&hierarchy).expect("serializes");
        assert!(json.get("sections").is_some());
        assert!(json.get("items").is_none());
    }

    #[test]
    fn single_section_with_no_items_serializes_empty_list() {
        let hierarchy = build_form_hierarchy(form(), vec![section(1)], Vec::new(), Vec::new());
        let json = serde_json::to_value(&hierarchy).expect("serializes");
        assert_eq!(json["items"], serde_json::json!([]));
    }
}
