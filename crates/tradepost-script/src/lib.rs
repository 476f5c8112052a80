//! Tradepost Script - trader package loader
//!
//! Loads trader packages from disk. A package is a directory holding:
//! - `base.json` or `base.ron`: the trader's base profile
//! - `locale.ron` (optional): display strings for every language
//! - `refresh.ron` (optional): stock refresh window in seconds

mod error;
mod loader;

pub use error::{Error, Result};
pub use loader::{Format, Loader, TraderPackage, TraderPackages};
