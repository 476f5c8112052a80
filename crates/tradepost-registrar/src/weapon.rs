//! Weapon blueprints: item trees described by part keys
//!
//! A blueprint names each part with a local key and refers to parents by
//! key. Building it allocates real ids and resolves the keys, so the output
//! is always in parent-before-child order.

use crate::error::{Error, Result};
use std::collections::HashMap;
use tradepost_core::{IdAllocator, Item, ItemId, SlotId, TemplateId};

/// One part of a weapon blueprint
#[derive(Debug, Clone, PartialEq)]
pub struct PartSpec {
    /// Local name of the part, unique within the blueprint
    pub key: &'static str,
    /// Item template of the part
    pub tpl: TemplateId,
    /// Key of the part this one attaches to
    pub parent: Option<&'static str>,
    /// Slot on the parent
    pub slot: Option<SlotId>,
}

impl PartSpec {
    /// The weapon base
    pub fn base(key: &'static str, tpl: &str) -> Self {
        Self {
            key,
            tpl: TemplateId::new(tpl),
            parent: None,
            slot: None,
        }
    }

    /// A part attached to `parent` through `slot`
    pub fn attached(key: &'static str, tpl: &str, parent: &'static str, slot: &str) -> Self {
        Self {
            key,
            tpl: TemplateId::new(tpl),
            parent: Some(parent),
            slot: Some(SlotId::new(slot)),
        }
    }
}

/// A validated weapon item tree
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponBlueprint {
    parts: Vec<PartSpec>,
}

impl WeaponBlueprint {
    /// Validate parts into a blueprint
    ///
    /// The first part must be the only one without a parent, every other
    /// part needs a slot and a parent declared before it, and keys must be
    /// unique.
    pub fn new(parts: Vec<PartSpec>) -> Result<Self> {
        let Some(first) = parts.first() else {
            return Err(Error::InvalidBlueprint("no parts".to_string()));
        };
        if first.parent.is_some() {
            return Err(Error::InvalidBlueprint(format!(
                "first part {} must not have a parent",
                first.key
            )));
        }

        let mut declared: Vec<&str> = Vec::with_capacity(parts.len());
        for (index, part) in parts.iter().enumerate() {
            if declared.contains(&part.key) {
                return Err(Error::InvalidBlueprint(format!("duplicate part key {}", part.key)));
            }
            if index > 0 {
                let Some(parent) = part.parent else {
                    return Err(Error::InvalidBlueprint(format!(
                        "part {} has no parent",
                        part.key
                    )));
                };
                if !declared.contains(&parent) {
                    return Err(Error::InvalidBlueprint(format!(
                        "part {} attaches to undeclared part {}",
                        part.key, parent
                    )));
                }
                if part.slot.is_none() {
                    return Err(Error::InvalidBlueprint(format!("part {} has no slot", part.key)));
                }
            }
            declared.push(part.key);
        }

        Ok(Self { parts })
    }

    /// Glock 17 with its stock barrel, receiver, compensator, grip, sights and magazine
    pub fn glock_17() -> Self {
        Self {
            parts: vec![
                PartSpec::base("base", "5a7ae0c351dfba0017554310"),
                PartSpec::attached("barrel", "5a6b60158dc32e000a31138b", "base", "mod_barrel"),
                PartSpec::attached("receiver", "5a9685b1a2750c0032157104", "base", "mod_reciever"),
                PartSpec::attached("compensator", "5a7b32a2e899ef00135e345a", "receiver", "mod_muzzle"),
                PartSpec::attached("pistol_grip", "5a7b4960e899ef197b331a2d", "base", "mod_pistol_grip"),
                PartSpec::attached("rear_sight", "5a6f5d528dc32e00094b97d9", "receiver", "mod_sight_rear"),
                PartSpec::attached("front_sight", "5a6f58f68dc32e000a311390", "receiver", "mod_sight_front"),
                PartSpec::attached("magazine", "630769c4962d0247b029dc60", "base", "mod_magazine"),
            ],
        }
    }

    /// Parts in build order
    pub fn parts(&self) -> &[PartSpec] {
        &self.parts
    }

    /// Number of items the blueprint builds
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always false for a validated blueprint
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Allocate ids and build the item tree
    ///
    /// Ids are taken from `ids` in part order and not checked for uniqueness.
    pub fn build(&self, ids: &mut dyn IdAllocator) -> Vec<Item> {
        let mut allocated: HashMap<&str, ItemId> = HashMap::with_capacity(self.parts.len());
        let mut items = Vec::with_capacity(self.parts.len());

        for part in &self.parts {
            let id = ids.allocate();
            allocated.insert(part.key, id.clone());

            // Validation guarantees the parent key was allocated already
            let parent_id = part.parent.and_then(|key| allocated.get(key).cloned());
            items.push(Item {
                id,
                tpl: part.tpl.clone(),
                parent_id,
                slot_id: part.slot.clone(),
                upd: None,
            });
        }

        items
    }
}
