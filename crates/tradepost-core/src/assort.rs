//! Trader assortments: offers, barter costs and loyalty unlocks

use crate::identity::{ItemId, TemplateId};
use crate::integrity::IntegrityWarning;
use crate::item::Item;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Loyalty tier gating which offers a player can see
pub type LoyaltyLevel = u8;

/// Template id of the host's rouble currency item
pub const ROUBLES_TPL: &str = "5449016a4bdc2d6f028b456f";

/// One component of an offer's price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarterCost {
    /// How many of the template are required
    pub count: f64,
    /// Currency or barter item template
    #[serde(rename = "_tpl")]
    pub tpl: TemplateId,
}

impl BarterCost {
    /// Create a barter cost component
    pub fn new(tpl: impl Into<TemplateId>, count: f64) -> Self {
        Self {
            count,
            tpl: tpl.into(),
        }
    }

    /// A price in roubles
    pub fn roubles(count: f64) -> Self {
        Self::new(ROUBLES_TPL, count)
    }
}

/// The offers a trader sells
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssortmentTable {
    /// Timestamp (seconds) of the next stock refresh
    #[serde(rename = "nextResupply")]
    pub next_resupply: i64,
    /// All items of all offers, each offer as a contiguous tree
    pub items: Vec<Item>,
    /// Price of each offer, keyed by the offer's root item id
    pub barter_scheme: IndexMap<ItemId, Vec<BarterCost>>,
    /// Offer root ids unlocked at each loyalty level
    pub loyal_level_items: IndexMap<LoyaltyLevel, Vec<ItemId>>,
}

impl AssortmentTable {
    /// Create an empty assortment, ready to have offers added
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the assortment has no offers and no mappings
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.barter_scheme.is_empty() && self.loyal_level_items.is_empty()
    }

    /// Check whether an item id is present in the item sequence
    pub fn contains_item(&self, id: &ItemId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Append an offer without any validation
    ///
    /// `root` must be the id of the first item of `items`.
    pub fn push_offer(
        &mut self,
        root: ItemId,
        items: Vec<Item>,
        cost: Vec<BarterCost>,
        level: LoyaltyLevel,
    ) {
        self.items.extend(items);
        self.barter_scheme.insert(root.clone(), cost);
        self.loyal_level_items.entry(level).or_default().push(root);
    }

    /// Loyalty level an offer is unlocked at, if any
    pub fn loyalty_level_of(&self, root: &ItemId) -> Option<LoyaltyLevel> {
        self.loyal_level_items
            .iter()
            .find(|(_, ids)| ids.contains(root))
            .map(|(level, _)| *level)
    }

    /// Report barter and loyalty entries that point at missing items
    pub fn check_references(&self) -> Vec<IntegrityWarning> {
        let known: HashSet<&ItemId> = self.items.iter().map(|item| &item.id).collect();
        let mut warnings = Vec::new();

        for id in self.barter_scheme.keys() {
            if !known.contains(id) {
                warnings.push(IntegrityWarning::UnknownBarterItem(id.clone()));
            }
        }
        for (level, ids) in &self.loyal_level_items {
            for id in ids {
                if !known.contains(id) {
                    warnings.push(IntegrityWarning::UnknownLoyaltyItem {
                        item: id.clone(),
                        level: *level,
                    });
                }
            }
        }

        warnings
    }
}

/// Offers unlocked by quest progress, keyed by item id with the quest id as value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestAssortmentTable {
    pub started: IndexMap<ItemId, String>,
    pub success: IndexMap<ItemId, String>,
    pub fail: IndexMap<ItemId, String>,
}

impl QuestAssortmentTable {
    /// Create an empty quest assortment
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether no quest unlocks are defined
    pub fn is_empty(&self) -> bool {
        self.started.is_empty() && self.success.is_empty() && self.fail.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pistol() -> Vec<Item> {
        vec![
            Item::root("base", "5a7ae0c351dfba0017554310"),
            Item::child("mag", "630769c4962d0247b029dc60", "base", "mod_magazine"),
        ]
    }

    #[test]
    fn test_new_is_empty() {
        let assort = AssortmentTable::new();
        assert!(assort.is_empty());
        assert_eq!(assort.next_resupply, 0);
        assert!(QuestAssortmentTable::new().is_empty());
    }

    #[test]
    fn test_push_offer() {
        let mut assort = AssortmentTable::new();
        assort.push_offer(ItemId::new("base"), pistol(), vec![BarterCost::roubles(20000.0)], 1);

        assert_eq!(assort.items.len(), 2);
        assert!(assort.contains_item(&ItemId::new("mag")));
        assert_eq!(assort.loyalty_level_of(&ItemId::new("base")), Some(1));
        assert_eq!(assort.barter_scheme[&ItemId::new("base")][0].tpl.as_str(), ROUBLES_TPL);
        assert!(assort.check_references().is_empty());
    }

    #[test]
    fn test_check_references_reports_missing_items() {
        let mut assort = AssortmentTable::new();
        assort.barter_scheme.insert(ItemId::new("ghost"), vec![BarterCost::roubles(1.0)]);
        assort.loyal_level_items.insert(2, vec![ItemId::new("phantom")]);

        let warnings = assort.check_references();
        assert_eq!(
            warnings,
            vec![
                IntegrityWarning::UnknownBarterItem(ItemId::new("ghost")),
                IntegrityWarning::UnknownLoyaltyItem {
                    item: ItemId::new("phantom"),
                    level: 2,
                },
            ]
        );
    }

    #[test]
    fn test_assort_json_keys() {
        let mut assort = AssortmentTable::new();
        assort.push_offer(ItemId::new("base"), pistol(), vec![BarterCost::roubles(5.0)], 3);

        let json = serde_json::to_string(&assort).unwrap();
        assert!(json.starts_with(r#"{"nextResupply":0,"#));
        assert!(json.contains(r#""loyal_level_items":{"3":["base"]}"#));

        let back: AssortmentTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, assort);
    }
}
