//! Referential integrity checks for item trees and assortments
//!
//! Nothing here is fatal. The host accepts corrupt trees silently, so the
//! checker only reports what it finds and callers decide what to do.

use crate::assort::LoyaltyLevel;
use crate::identity::{ItemId, SlotId, TemplateId};
use crate::item::Item;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// An informational finding about broken item references
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// The tree has no item without a parent
    NoRoot,
    /// More than one item has no parent
    MultipleRoots(Vec<ItemId>),
    /// The same id appears more than once
    DuplicateItemId(ItemId),
    /// An id is already used elsewhere in the host database
    IdCollision(ItemId),
    /// A parent id that no item in the tree carries
    DanglingParent { item: ItemId, parent: ItemId },
    /// A child listed before its parent
    ForwardReference { item: ItemId, parent: ItemId },
    /// A child without a slot id
    MissingSlot(ItemId),
    /// A slot the parent's template does not expose
    UnknownSlot {
        item: ItemId,
        slot: SlotId,
        parent_tpl: TemplateId,
    },
    /// A barter scheme entry for an item not in the assortment
    UnknownBarterItem(ItemId),
    /// A loyalty unlock for an item not in the assortment
    UnknownLoyaltyItem { item: ItemId, level: LoyaltyLevel },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::NoRoot => write!(f, "item tree has no root"),
            IntegrityWarning::MultipleRoots(ids) => {
                let ids: Vec<&str> = ids.iter().map(ItemId::as_str).collect();
                write!(f, "item tree has multiple roots: {}", ids.join(", "))
            }
            IntegrityWarning::DuplicateItemId(id) => write!(f, "duplicate item id {}", id),
            IntegrityWarning::IdCollision(id) => write!(f, "item id {} already in use", id),
            IntegrityWarning::DanglingParent { item, parent } => {
                write!(f, "item {} references missing parent {}", item, parent)
            }
            IntegrityWarning::ForwardReference { item, parent } => {
                write!(f, "item {} appears before its parent {}", item, parent)
            }
            IntegrityWarning::MissingSlot(id) => write!(f, "item {} has a parent but no slot", id),
            IntegrityWarning::UnknownSlot {
                item,
                slot,
                parent_tpl,
            } => write!(f, "item {} uses slot {} not exposed by template {}", item, slot, parent_tpl),
            IntegrityWarning::UnknownBarterItem(id) => {
                write!(f, "barter scheme references missing item {}", id)
            }
            IntegrityWarning::UnknownLoyaltyItem { item, level } => {
                write!(f, "loyalty level {} references missing item {}", level, item)
            }
        }
    }
}

/// Static item template reference data
pub trait TemplateCatalog {
    /// Slots exposed by a template, or `None` if the template is unknown
    fn slots(&self, tpl: &TemplateId) -> Option<&[SlotId]>;
}

/// In-memory template catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    templates: IndexMap<TemplateId, Vec<SlotId>>,
}

impl StaticCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a template and its slots
    pub fn with_template<S: Into<SlotId>>(
        mut self,
        tpl: impl Into<TemplateId>,
        slots: impl IntoIterator<Item = S>,
    ) -> Self {
        self.templates
            .insert(tpl.into(), slots.into_iter().map(Into::into).collect());
        self
    }
}

impl TemplateCatalog for StaticCatalog {
    fn slots(&self, tpl: &TemplateId) -> Option<&[SlotId]> {
        self.templates.get(tpl).map(Vec::as_slice)
    }
}

/// Check the tree invariants of a single offer
///
/// Slots are only checked against templates the catalog knows about.
pub fn check_item_tree(items: &[Item], catalog: Option<&dyn TemplateCatalog>) -> Vec<IntegrityWarning> {
    let mut warnings = Vec::new();

    let roots: Vec<ItemId> = items.iter().filter(|i| i.is_root()).map(|i| i.id.clone()).collect();
    match roots.len() {
        0 => warnings.push(IntegrityWarning::NoRoot),
        1 => {}
        _ => warnings.push(IntegrityWarning::MultipleRoots(roots)),
    }

    let templates: HashMap<&ItemId, &TemplateId> = items.iter().map(|i| (&i.id, &i.tpl)).collect();
    let mut seen: HashSet<&ItemId> = HashSet::new();

    for item in items {
        if !seen.insert(&item.id) {
            warnings.push(IntegrityWarning::DuplicateItemId(item.id.clone()));
        }

        let Some(parent) = &item.parent_id else {
            continue;
        };

        match templates.get(parent) {
            None => warnings.push(IntegrityWarning::DanglingParent {
                item: item.id.clone(),
                parent: parent.clone(),
            }),
            Some(_) if !seen.contains(parent) => warnings.push(IntegrityWarning::ForwardReference {
                item: item.id.clone(),
                parent: parent.clone(),
            }),
            Some(_) => {}
        }

        let Some(slot) = &item.slot_id else {
            warnings.push(IntegrityWarning::MissingSlot(item.id.clone()));
            continue;
        };

        if let (Some(catalog), Some(parent_tpl)) = (catalog, templates.get(parent)) {
            if let Some(slots) = catalog.slots(parent_tpl) {
                if !slots.contains(slot) {
                    warnings.push(IntegrityWarning::UnknownSlot {
                        item: item.id.clone(),
                        slot: slot.clone(),
                        parent_tpl: (*parent_tpl).clone(),
                    });
                }
            }
        }
    }

    warnings
}

/// Report ids in `items` that already exist in `existing`
pub fn check_collisions<'a>(
    items: &[Item],
    existing: impl IntoIterator<Item = &'a ItemId>,
) -> Vec<IntegrityWarning> {
    let existing: HashSet<&ItemId> = existing.into_iter().collect();
    items
        .iter()
        .filter(|item| existing.contains(&item.id))
        .map(|item| IntegrityWarning::IdCollision(item.id.clone()))
        .collect()
}
