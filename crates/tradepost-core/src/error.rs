//! Error types for tradepost-core

use crate::identity::{ItemId, TraderId};
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid refresh range: min {min}s is greater than max {max}s")]
    InvalidRange { min: u64, max: u64 },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid trader metadata: {0}")]
    Validation(String),

    #[error("Trader already registered: {0}")]
    DuplicateTrader(TraderId),

    #[error("Item id already in use: {0}")]
    DuplicateItem(ItemId),

    #[error("Trader not found: {0}")]
    TraderNotFound(TraderId),

    #[error("Invalid item tree: {0}")]
    InvalidItemTree(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
