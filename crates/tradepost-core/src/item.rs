//! Item instances and item trees
//!
//! An offer is a flat list of items forming a tree: one root (the weapon
//! base, a carton of milk, ...) and any number of children attached to a
//! parent through a named slot.

use crate::identity::{ItemId, SlotId, TemplateId};
use serde::{Deserialize, Serialize};

/// A concrete item instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique id of this instance
    #[serde(rename = "_id")]
    pub id: ItemId,
    /// Template this item is an instance of
    #[serde(rename = "_tpl")]
    pub tpl: TemplateId,
    /// Item this one is attached to or inserted into
    #[serde(rename = "parentId", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ItemId>,
    /// Slot on the parent this item fills
    #[serde(rename = "slotId", default, skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<SlotId>,
    /// Stack and stock properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upd: Option<Upd>,
}

/// Stack and stock properties of an item (`upd` in the host format)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Upd {
    /// Number of items in the stack (stock count for an offer root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_objects_count: Option<u64>,
    /// Whether the trader never runs out of this offer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlimited_count: Option<bool>,
    /// Maximum number a player can buy per restock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_restriction_max: Option<u64>,
}

impl Item {
    /// Create a root item (no parent)
    pub fn root(id: impl Into<ItemId>, tpl: impl Into<TemplateId>) -> Self {
        Self {
            id: id.into(),
            tpl: tpl.into(),
            parent_id: None,
            slot_id: None,
            upd: None,
        }
    }

    /// Create an item attached to `parent` through `slot`
    pub fn child(
        id: impl Into<ItemId>,
        tpl: impl Into<TemplateId>,
        parent: impl Into<ItemId>,
        slot: impl Into<SlotId>,
    ) -> Self {
        Self {
            id: id.into(),
            tpl: tpl.into(),
            parent_id: Some(parent.into()),
            slot_id: Some(slot.into()),
            upd: None,
        }
    }

    /// Attach stack/stock properties
    pub fn with_upd(mut self, upd: Upd) -> Self {
        self.upd = Some(upd);
        self
    }

    /// Check whether this item has no parent
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl Upd {
    /// Stock properties for a trader offer root
    pub fn stock(count: u64, unlimited: bool) -> Self {
        Self {
            stack_objects_count: Some(count),
            unlimited_count: Some(unlimited),
            buy_restriction_max: None,
        }
    }

    /// Limit how many a player can buy per restock
    pub fn with_buy_restriction(mut self, max: u64) -> Self {
        self.buy_restriction_max = Some(max);
        self
    }
}

/// Return the root of an item tree if the tree starts with one
pub fn tree_root(items: &[Item]) -> Option<&Item> {
    items.first().filter(|item| item.is_root())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_json_shape() {
        let item = Item::child("b", "5a6b60158dc32e000a31138b", "a", "mod_barrel");
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"_id":"b","_tpl":"5a6b60158dc32e000a31138b","parentId":"a","slotId":"mod_barrel"}"#
        );
    }

    #[test]
    fn test_root_omits_parent_fields() {
        let item = Item::root("a", "5a7ae0c351dfba0017554310").with_upd(Upd::stock(10, false));
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("parentId"));
        assert!(json.contains(r#""upd":{"StackObjectsCount":10,"UnlimitedCount":false}"#));
    }

    #[test]
    fn test_tree_root() {
        let items = vec![Item::root("a", "t"), Item::child("b", "t", "a", "s")];
        assert_eq!(tree_root(&items).map(|i| i.id.as_str()), Some("a"));
        assert!(tree_root(&items[1..]).is_none());
        assert!(tree_root(&[]).is_none());
    }
}
