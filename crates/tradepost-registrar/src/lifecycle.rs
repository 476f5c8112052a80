//! Mod lifecycle hooks
//!
//! The host calls every mod's `pre_load` before its own data is finalized,
//! then every mod's `post_load`. Mods are owned by the [`ModLoader`] for the
//! whole session, so state a mod keeps in its fields is shared by both
//! phases. Anything a mod wants fresh per use is produced by a factory it
//! owns instead.

use crate::config::{OfferConfig, RegistrarConfig};
use crate::error::{Error, Result};
use crate::registrar::TraderRegistrar;
use tracing::{info, warn};
use tradepost_core::{
    BarterCost, DatabaseTables, IdAllocator, ItemId, ProcessIdAllocator, RefreshWindow,
    TraderConfig, TraderLocale, Upd,
};
use tradepost_script::TraderPackage;

/// The host state mods write into
#[derive(Debug, Clone, Default)]
pub struct Host {
    /// Database tables
    pub tables: DatabaseTables,
    /// Trader config
    pub trader_config: TraderConfig,
}

impl Host {
    /// Create a host with the given tables and an empty trader config
    pub fn new(tables: DatabaseTables) -> Self {
        Self {
            tables,
            trader_config: TraderConfig::new(),
        }
    }
}

/// A mod driven by host lifecycle hooks
pub trait Mod {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Called before the host finishes loading
    fn pre_load(&mut self, _host: &mut Host) -> Result<()> {
        Ok(())
    }

    /// Called after every mod's `pre_load` has run
    fn post_load(&mut self, _host: &mut Host) -> Result<()> {
        Ok(())
    }
}

/// Runs mod hooks in registration order
#[derive(Default)]
pub struct ModLoader {
    mods: Vec<Box<dyn Mod>>,
}

impl ModLoader {
    /// Create a loader with no mods
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mod
    pub fn register(&mut self, m: impl Mod + 'static) -> &mut Self {
        self.mods.push(Box::new(m));
        self
    }

    /// Number of registered mods
    pub fn len(&self) -> usize {
        self.mods.len()
    }

    /// Check if no mods are registered
    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    /// Run every `pre_load`, then every `post_load`
    ///
    /// Stops at the first failing hook. Writes made by earlier hooks stay.
    pub fn run(&mut self, host: &mut Host) -> Result<()> {
        for m in &mut self.mods {
            info!(name = m.name(), "pre_load");
            m.pre_load(host).map_err(|e| wrap(m.name(), "pre_load", e))?;
        }
        for m in &mut self.mods {
            info!(name = m.name(), "post_load");
            m.post_load(host).map_err(|e| wrap(m.name(), "post_load", e))?;
        }
        Ok(())
    }
}

fn wrap(name: &str, phase: &'static str, source: Error) -> Error {
    Error::Mod {
        name: name.to_string(),
        phase,
        source: Box::new(source),
    }
}

/// Produces a fresh id allocator for each item tree
pub type AllocatorFactory = Box<dyn FnMut() -> Box<dyn IdAllocator>>;

/// Every allocator draws from the process-wide sequence, so separate mods
/// writing into one host never hand out the same id.
fn process_id_factory() -> AllocatorFactory {
    Box::new(|| -> Box<dyn IdAllocator> { Box::new(ProcessIdAllocator::new()) })
}

/// Adds one trader selling a Glock 17
///
/// `pre_load` registers the trader, its refresh schedule and its locale
/// strings. `post_load` builds the weapon and offers it.
pub struct AddTraderMod {
    registrar: TraderRegistrar,
    package: TraderPackage,
    default_refresh: RefreshWindow,
    offer: OfferConfig,
    allocators: AllocatorFactory,
    offer_root: Option<ItemId>,
}

impl AddTraderMod {
    /// Create the mod for a loaded trader package
    pub fn new(package: TraderPackage, config: &RegistrarConfig) -> Self {
        Self {
            registrar: TraderRegistrar::from_config(config),
            package,
            default_refresh: config.refresh,
            offer: config.offer.clone(),
            allocators: process_id_factory(),
            offer_root: None,
        }
    }

    /// Replace the id allocator factory
    pub fn with_allocators(mut self, factory: impl FnMut() -> Box<dyn IdAllocator> + 'static) -> Self {
        self.allocators = Box::new(factory);
        self
    }

    /// Root item id of the weapon offer, once `post_load` has run
    pub fn offer_root(&self) -> Option<&ItemId> {
        self.offer_root.as_ref()
    }

    fn locale(&self) -> TraderLocale {
        self.package.locale.clone().unwrap_or_else(|| {
            let base = &self.package.base;
            TraderLocale::new(
                base.name.clone(),
                base.name.clone(),
                base.nickname.clone(),
                base.location.clone(),
                base.description.clone(),
            )
        })
    }
}

impl Mod for AddTraderMod {
    fn name(&self) -> &str {
        self.package.base.id.as_str()
    }

    fn pre_load(&mut self, host: &mut Host) -> Result<()> {
        let base = &self.package.base;
        self.registrar.register_trader(base, &mut host.tables)?;

        let window = self.package.refresh.unwrap_or(self.default_refresh);
        self.registrar
            .schedule_refresh_window(base, window, &mut host.trader_config);

        let locale = self.locale();
        self.registrar
            .register_locales(&self.package.base, &mut host.tables.locales, &locale);
        Ok(())
    }

    fn post_load(&mut self, host: &mut Host) -> Result<()> {
        let mut ids = (self.allocators)();
        let mut items = self.registrar.build_weapon_item_tree(ids.as_mut());

        let mut upd = Upd::stock(self.offer.stock, self.offer.unlimited);
        if let Some(max) = self.offer.buy_restriction {
            upd = upd.with_buy_restriction(max);
        }
        if let Some(root) = items.first_mut() {
            root.upd = Some(upd);
        }

        let trader = self.package.base.id.clone();
        let root = self.registrar.add_offer(
            &trader,
            items,
            vec![BarterCost::roubles(self.offer.price_roubles)],
            self.offer.loyalty_level,
            &mut host.tables,
        )?;

        if let Some(record) = host.tables.trader(&trader) {
            for warning in record.assort.check_references() {
                warn!(trader = %trader, %warning, "assortment reference defect");
            }
        }

        self.offer_root = Some(root);
        Ok(())
    }
}
