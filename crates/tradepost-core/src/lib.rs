//! Tradepost Core - typed records for game-server trader mods
//!
//! This crate provides the data model a trader registration works on:
//! - Identifiers for traders, items, templates, slots and languages
//! - Items, item trees and trader assortments
//! - Trader base profiles, validated at the boundary from untyped metadata
//! - Locale tables and trader refresh schedules
//! - Collaborator seams: id allocators, serializers, template catalogs
//! - Referential integrity checks reporting (not raising) broken references
//!
//! All host tables are plain in-memory values passed by `&mut`; nothing
//! here owns global state.

mod assort;
mod error;
mod identity;
mod ids;
pub mod integrity;
mod item;
mod locale;
mod schedule;
mod serializer;
mod tables;
mod trader;
mod value;

pub use assort::{AssortmentTable, BarterCost, LoyaltyLevel, QuestAssortmentTable, ROUBLES_TPL};
pub use error::{Error, Result};
pub use identity::{is_object_id, ItemId, LanguageCode, SlotId, TemplateId, TraderId, OBJECT_ID_LEN};
pub use ids::{IdAllocator, ObjectIdAllocator, ProcessIdAllocator, SequentialIdAllocator};
pub use integrity::{check_collisions, check_item_tree, IntegrityWarning, StaticCatalog, TemplateCatalog};
pub use item::{tree_root, Item, Upd};
pub use locale::{LocaleField, LocaleTable, LocaleTables, TraderLocale};
pub use schedule::{RefreshSchedule, RefreshWindow, TraderConfig};
pub use serializer::{JsonSerializer, RonSerializer, Serializer, SerializerKind};
pub use tables::DatabaseTables;
pub use trader::{TraderBase, TraderRecord};
pub use value::{Value, ValueMap};
