//! Tradepost Registrar - adds a custom trader to the host's tables
//!
//! This crate provides the registration operations and the mod that drives them:
//! - `TraderRegistrar`: refresh schedules, trader records, locale strings and offers
//! - `WeaponBlueprint`: item trees described by part keys, with a stock Glock 17
//! - `ModLoader` and the `Mod` trait: `pre_load` / `post_load` lifecycle hooks
//! - `AddTraderMod`: registers one loaded trader package and offers its weapon
//!
//! ## Example
//!
//! ```no_run
//! use tradepost_core::DatabaseTables;
//! use tradepost_registrar::{AddTraderMod, Host, ModLoader, RegistrarConfig};
//! use tradepost_script::Loader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut loader = Loader::new();
//! loader.load_directory("db")?;
//!
//! let config = RegistrarConfig::default();
//! let mut mods = ModLoader::new();
//! for package in loader.finish() {
//!     mods.register(AddTraderMod::new(package, &config));
//! }
//!
//! let mut host = Host::new(DatabaseTables::with_languages(["en", "ru"]));
//! mods.run(&mut host)?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod lifecycle;
mod registrar;
mod weapon;

pub use config::{OfferConfig, RegistrarConfig};
pub use error::{Error, Result};
pub use lifecycle::{AddTraderMod, AllocatorFactory, Host, Mod, ModLoader};
pub use registrar::{DuplicatePolicy, TraderRegistrar};
pub use weapon::{PartSpec, WeaponBlueprint};
