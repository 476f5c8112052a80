//! Host-owned database tables

use crate::identity::{ItemId, TraderId};
use crate::locale::LocaleTables;
use crate::trader::TraderRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The subset of the host database the registrar writes into
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatabaseTables {
    /// Trader records keyed by trader id
    pub traders: IndexMap<TraderId, TraderRecord>,
    /// Locale tables
    pub locales: LocaleTables,
}

impl DatabaseTables {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Create tables with empty locale tables for the given languages
    pub fn with_languages<L: Into<crate::LanguageCode>>(languages: impl IntoIterator<Item = L>) -> Self {
        Self {
            traders: IndexMap::new(),
            locales: LocaleTables::with_languages(languages),
        }
    }

    /// Get a trader record
    pub fn trader(&self, id: &TraderId) -> Option<&TraderRecord> {
        self.traders.get(id)
    }

    /// Get a mutable trader record
    pub fn trader_mut(&mut self, id: &TraderId) -> Option<&mut TraderRecord> {
        self.traders.get_mut(id)
    }

    /// Ids of every item in every trader's assortment
    pub fn item_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.traders
            .values()
            .flat_map(|record| record.assort.items.iter().map(|item| &item.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assort::BarterCost;
    use crate::item::Item;
    use crate::trader::TraderBase;

    #[test]
    fn test_item_ids_spans_traders() {
        let mut tables = DatabaseTables::with_languages(["en"]);
        for (trader, item) in [("t1", "a"), ("t2", "b")] {
            let mut record = TraderRecord::new(TraderBase::new(trader));
            record.assort.push_offer(
                ItemId::new(item),
                vec![Item::root(item, "tpl")],
                vec![BarterCost::roubles(1.0)],
                1,
            );
            tables.traders.insert(TraderId::new(trader), record);
        }

        let ids: Vec<&str> = tables.item_ids().map(ItemId::as_str).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(tables.trader(&TraderId::new("t2")).is_some());
        assert_eq!(tables.locales.language_count(), 1);
    }
}
