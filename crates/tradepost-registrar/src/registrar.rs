//! Trader registration
//!
//! Every operation takes the host table it writes into as an explicit
//! `&mut` argument and returns once the write is done. Operations are not
//! transactional with respect to each other: a failure after
//! `register_trader` leaves the trader registered.

use crate::config::RegistrarConfig;
use crate::error::Result;
use crate::weapon::WeaponBlueprint;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tradepost_core::{
    check_collisions, check_item_tree, tree_root, BarterCost, DatabaseTables, Error as CoreError,
    IdAllocator, IntegrityWarning, Item, ItemId, LocaleTables, LoyaltyLevel, RefreshSchedule,
    RefreshWindow, Serializer, SerializerKind, TraderBase, TraderConfig, TraderId, TraderLocale,
    TraderRecord,
};

/// What to do when an id is already present in the host tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Write anyway: a trader record is replaced whole, a colliding item
    /// is inserted next to the existing one. Collisions are logged.
    #[default]
    Overwrite,
    /// Fail with `DuplicateTrader` / `DuplicateItem` and write nothing
    Reject,
}

/// Builds and registers the records that make a trader functional
#[derive(Debug, Clone)]
pub struct TraderRegistrar<S = SerializerKind> {
    serializer: S,
    policy: DuplicatePolicy,
}

impl TraderRegistrar<SerializerKind> {
    /// Create a registrar copying metadata through JSON
    pub fn new() -> Self {
        Self::with_serializer(SerializerKind::Json)
    }

    /// Create a registrar from configuration
    pub fn from_config(config: &RegistrarConfig) -> Self {
        Self::with_serializer(config.serializer).with_policy(config.duplicate_policy)
    }
}

impl Default for TraderRegistrar<SerializerKind> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Serializer> TraderRegistrar<S> {
    /// Create a registrar copying metadata through `serializer`
    pub fn with_serializer(serializer: S) -> Self {
        Self {
            serializer,
            policy: DuplicatePolicy::default(),
        }
    }

    /// Set the duplicate id policy
    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current duplicate id policy
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Append a refresh schedule for `trader` to the trader config
    ///
    /// Fails with `InvalidRange` if `min_seconds > max_seconds`. Repeated
    /// calls append repeated entries.
    pub fn schedule_refresh(
        &self,
        trader: &TraderBase,
        min_seconds: u64,
        max_seconds: u64,
        config: &mut TraderConfig,
    ) -> Result<RefreshSchedule> {
        let window = RefreshWindow::new(min_seconds, max_seconds)?;
        Ok(self.schedule_refresh_window(trader, window, config))
    }

    /// Append a refresh schedule from an already validated window
    pub fn schedule_refresh_window(
        &self,
        trader: &TraderBase,
        window: RefreshWindow,
        config: &mut TraderConfig,
    ) -> RefreshSchedule {
        let schedule = RefreshSchedule {
            trader_id: trader.id.clone(),
            seconds: window,
        };
        config.update_time.push(schedule.clone());
        debug!(
            trader = %trader.id,
            min = window.min(),
            max = window.max(),
            "scheduled trader refresh"
        );
        schedule
    }

    /// Insert a trader record with empty assortments into `tables.traders`
    ///
    /// The stored base is a deep copy made through the serializer, so later
    /// changes to `trader` do not reach the registered record.
    pub fn register_trader(&self, trader: &TraderBase, tables: &mut DatabaseTables) -> Result<()> {
        let exists = tables.traders.contains_key(&trader.id);
        if exists && self.policy == DuplicatePolicy::Reject {
            return Err(CoreError::DuplicateTrader(trader.id.clone()).into());
        }

        let base = self.serializer.deep_copy(trader)?;
        let record = TraderRecord::new(base);

        if exists {
            warn!(trader = %trader.id, "overwriting registered trader");
        }
        tables.traders.insert(trader.id.clone(), record);
        info!(trader = %trader.id, "registered trader");
        Ok(())
    }

    /// Build the Glock 17 offer tree with ids from `ids`
    ///
    /// Returns 8 items, root first, every parent before its children.
    /// Uniqueness of the ids is the allocator's responsibility.
    pub fn build_weapon_item_tree(&self, ids: &mut dyn IdAllocator) -> Vec<Item> {
        WeaponBlueprint::glock_17().build(ids)
    }

    /// Write the trader's display strings into every language
    ///
    /// All entries are built before the first write and writing cannot fail,
    /// so either every language is updated or none is. Returns the number of
    /// keys written.
    pub fn register_locales(
        &self,
        trader: &TraderBase,
        locales: &mut LocaleTables,
        locale: &TraderLocale,
    ) -> usize {
        let entries = locale.entries(&trader.id);
        let mut written = 0;

        for table in locales.global.values_mut() {
            for (key, text) in &entries {
                table.insert(key.clone(), text.clone());
                written += 1;
            }
        }

        debug!(
            trader = %trader.id,
            languages = locales.global.len(),
            keys = written,
            "registered trader locales"
        );
        written
    }

    /// Append an offer to a registered trader's assortment
    ///
    /// `items` must start with its root. The root gets the barter cost and
    /// the loyalty unlock. Tree defects are logged, not rejected. Duplicate
    /// ids, whether repeated inside `items` or already used anywhere in
    /// `tables`, fail only under [`DuplicatePolicy::Reject`].
    pub fn add_offer(
        &self,
        trader: &TraderId,
        items: Vec<Item>,
        cost: Vec<BarterCost>,
        level: LoyaltyLevel,
        tables: &mut DatabaseTables,
    ) -> Result<ItemId> {
        if !tables.traders.contains_key(trader) {
            return Err(CoreError::TraderNotFound(trader.clone()).into());
        }
        let root = tree_root(&items)
            .map(|item| item.id.clone())
            .ok_or_else(|| CoreError::InvalidItemTree("offer must start with its root item".to_string()))?;

        let defects = check_item_tree(&items, None);
        if self.policy == DuplicatePolicy::Reject {
            let repeated = defects.iter().find_map(|warning| match warning {
                IntegrityWarning::DuplicateItemId(id) => Some(id.clone()),
                _ => None,
            });
            if let Some(id) = repeated {
                return Err(CoreError::DuplicateItem(id).into());
            }
        }
        for warning in &defects {
            warn!(trader = %trader, %warning, "offer item tree defect");
        }

        let collisions = check_collisions(&items, tables.item_ids());
        if let Some(IntegrityWarning::IdCollision(id)) = collisions.first() {
            if self.policy == DuplicatePolicy::Reject {
                return Err(CoreError::DuplicateItem(id.clone()).into());
            }
        }
        for warning in &collisions {
            warn!(trader = %trader, %warning, "offer id collision");
        }

        let record = tables
            .trader_mut(trader)
            .ok_or_else(|| CoreError::TraderNotFound(trader.clone()))?;
        let count = items.len();
        record.assort.push_offer(root.clone(), items, cost, level);

        info!(trader = %trader, root = %root, items = count, level, "added offer");
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tradepost_core::{JsonSerializer, LanguageCode, SequentialIdAllocator, Value};

    fn trader(id: &str) -> TraderBase {
        TraderBase::new(id).with_name("Cat").with_nickname("Kitty")
    }

    #[test]
    fn test_schedule_refresh_appends() {
        let registrar = TraderRegistrar::new();
        let mut config = TraderConfig::new();
        let t1 = trader("T1");

        let schedule = registrar.schedule_refresh(&t1, 3600, 7200, &mut config).unwrap();
        assert_eq!(schedule.trader_id.as_str(), "T1");
        assert_eq!(config.update_time, vec![schedule.clone()]);

        registrar.schedule_refresh(&t1, 3600, 7200, &mut config).unwrap();
        assert_eq!(config.update_time.len(), 2);
        assert_eq!(config.schedules_for(&t1.id).count(), 2);
    }

    #[test]
    fn test_schedule_refresh_rejects_inverted_range() {
        let registrar = TraderRegistrar::new();
        let mut config = TraderConfig::new();

        let err = registrar
            .schedule_refresh(&trader("T1"), 7200, 3600, &mut config)
            .unwrap_err();
        assert!(matches!(
            err.as_core(),
            Some(CoreError::InvalidRange { min: 7200, max: 3600 })
        ));
        assert!(config.update_time.is_empty());
    }

    #[test]
    fn test_register_trader_stores_independent_copy() {
        let registrar = TraderRegistrar::with_serializer(JsonSerializer);
        let mut tables = DatabaseTables::new();
        let mut base = trader("T1").with_field("currency", "RUB");

        registrar.register_trader(&base, &mut tables).unwrap();
        base.nickname = "Changed".to_string();

        let record = tables.trader(&TraderId::new("T1")).unwrap();
        assert_eq!(record.base.nickname, "Kitty");
        assert_eq!(record.base.extra.get("currency"), Some(&Value::from("RUB")));
        assert!(record.assort.is_empty());
        assert!(record.questassort.is_empty());
    }

    #[test]
    fn test_register_trader_overwrites_whole_record() {
        let registrar = TraderRegistrar::new();
        let mut tables = DatabaseTables::new();

        registrar.register_trader(&trader("T1"), &mut tables).unwrap();
        let mut ids = SequentialIdAllocator::new("g");
        let items = registrar.build_weapon_item_tree(&mut ids);
        registrar
            .add_offer(&TraderId::new("T1"), items, vec![BarterCost::roubles(1.0)], 1, &mut tables)
            .unwrap();

        let replacement = TraderBase::new("T1").with_name("Dog");
        registrar.register_trader(&replacement, &mut tables).unwrap();

        let record = tables.trader(&TraderId::new("T1")).unwrap();
        assert_eq!(tables.traders.len(), 1);
        assert_eq!(record.base, replacement);
        assert!(record.assort.is_empty());
    }

    #[test]
    fn test_register_trader_reject_policy() {
        let registrar = TraderRegistrar::new().with_policy(DuplicatePolicy::Reject);
        let mut tables = DatabaseTables::new();

        registrar.register_trader(&trader("T1"), &mut tables).unwrap();
        let err = registrar.register_trader(&trader("T1"), &mut tables).unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::DuplicateTrader(_))));
    }

    #[test]
    fn test_register_trader_rejects_unserializable_metadata() {
        let registrar = TraderRegistrar::new();
        let mut tables = DatabaseTables::new();
        let base = trader("T1").with_field("ratio", f64::INFINITY);

        let err = registrar.register_trader(&base, &mut tables).unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::Serialization(_))));
        assert!(tables.traders.is_empty());
    }

    #[test]
    fn test_register_locales_writes_every_language() {
        let registrar = TraderRegistrar::new();
        let mut tables = DatabaseTables::with_languages(["en", "fr", "ru"]);
        let locale = TraderLocale::new("Cat Trader", "Cat", "Kitty", "Cat shop", "Guns");

        let written = registrar.register_locales(&trader("T1"), &mut tables.locales, &locale);

        assert_eq!(written, 15);
        for lang in ["en", "fr", "ru"] {
            let lang = LanguageCode::new(lang);
            assert_eq!(tables.locales.global[&lang].len(), 5);
            assert_eq!(tables.locales.get(&lang, "T1 Nickname"), Some("Kitty"));
            assert_eq!(tables.locales.get(&lang, "T1 FullName"), Some("Cat Trader"));
        }
    }

    #[test]
    fn test_register_locales_without_languages() {
        let registrar = TraderRegistrar::new();
        let mut locales = LocaleTables::new();
        let written = registrar.register_locales(&trader("T1"), &mut locales, &TraderLocale::default());
        assert_eq!(written, 0);
    }

    #[test]
    fn test_add_offer_requires_trader_and_root() {
        let registrar = TraderRegistrar::new();
        let mut tables = DatabaseTables::new();
        let mut ids = SequentialIdAllocator::new("g");
        let items = registrar.build_weapon_item_tree(&mut ids);

        let err = registrar
            .add_offer(&TraderId::new("T1"), items.clone(), vec![], 1, &mut tables)
            .unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::TraderNotFound(_))));

        registrar.register_trader(&trader("T1"), &mut tables).unwrap();
        let err = registrar
            .add_offer(&TraderId::new("T1"), items[1..].to_vec(), vec![], 1, &mut tables)
            .unwrap_err();
        assert!(matches!(err, Error::Core(CoreError::InvalidItemTree(_))));
    }

    #[test]
    fn test_add_offer_collisions_follow_policy() {
        let mut tables = DatabaseTables::new();
        let t1 = TraderId::new("T1");
        let overwrite = TraderRegistrar::new();
        overwrite.register_trader(&trader("T1"), &mut tables).unwrap();

        // Same allocator prefix twice: every id collides
        let first = overwrite.build_weapon_item_tree(&mut SequentialIdAllocator::new("g"));
        let second = overwrite.build_weapon_item_tree(&mut SequentialIdAllocator::new("g"));

        overwrite
            .add_offer(&t1, first, vec![BarterCost::roubles(100.0)], 1, &mut tables)
            .unwrap();

        let reject = TraderRegistrar::new().with_policy(DuplicatePolicy::Reject);
        let err = reject
            .add_offer(&t1, second.clone(), vec![BarterCost::roubles(100.0)], 1, &mut tables)
            .unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::DuplicateItem(id)) if id.as_str() == "g_0"));
        assert_eq!(tables.trader(&t1).unwrap().assort.items.len(), 8);

        overwrite
            .add_offer(&t1, second, vec![BarterCost::roubles(100.0)], 2, &mut tables)
            .unwrap();
        assert_eq!(tables.trader(&t1).unwrap().assort.items.len(), 16);
    }

    #[test]
    fn test_add_offer_repeated_id_within_offer() {
        let mut tables = DatabaseTables::new();
        let t1 = TraderId::new("T1");
        let mut items = TraderRegistrar::new().build_weapon_item_tree(&mut SequentialIdAllocator::new("g"));
        items[7].id = items[6].id.clone();

        let reject = TraderRegistrar::new().with_policy(DuplicatePolicy::Reject);
        reject.register_trader(&trader("T1"), &mut tables).unwrap();
        let err = reject
            .add_offer(&t1, items.clone(), vec![BarterCost::roubles(1.0)], 1, &mut tables)
            .unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::DuplicateItem(id)) if id.as_str() == "g_6"));
        assert!(tables.trader(&t1).unwrap().assort.is_empty());

        TraderRegistrar::new()
            .add_offer(&t1, items, vec![BarterCost::roubles(1.0)], 1, &mut tables)
            .unwrap();
        assert_eq!(tables.trader(&t1).unwrap().assort.items.len(), 8);
    }
}
