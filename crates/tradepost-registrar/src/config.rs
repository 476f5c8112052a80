//! RON configuration for trader registration

use crate::error::{Error, Result};
use crate::registrar::DuplicatePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tradepost_core::{LoyaltyLevel, RefreshWindow, SerializerKind};

/// Root configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegistrarConfig {
    /// Refresh window used when a trader package has none
    #[serde(default = "default_refresh")]
    pub refresh: RefreshWindow,
    /// What to do when a trader or item id is already present
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    /// Format used to deep-copy trader metadata
    #[serde(default)]
    pub serializer: SerializerKind,
    /// How the demo weapon is offered
    #[serde(default)]
    pub offer: OfferConfig,
}

fn default_refresh() -> RefreshWindow {
    // 3600..=4000 always satisfies min <= max
    RefreshWindow::new(3600, 4000).unwrap_or_default()
}

/// Price and stock of a weapon offer
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OfferConfig {
    /// Price in roubles
    #[serde(default = "default_price")]
    pub price_roubles: f64,
    /// Loyalty level the offer unlocks at
    #[serde(default = "default_loyalty_level")]
    pub loyalty_level: LoyaltyLevel,
    /// Stock count
    #[serde(default = "default_stock")]
    pub stock: u64,
    /// Whether the stock never runs out
    #[serde(default)]
    pub unlimited: bool,
    /// Maximum a player can buy per restock
    #[serde(default)]
    pub buy_restriction: Option<u64>,
}

fn default_price() -> f64 {
    20000.0
}

fn default_loyalty_level() -> LoyaltyLevel {
    1
}

fn default_stock() -> u64 {
    99
}

impl Default for OfferConfig {
    fn default() -> Self {
        Self {
            price_roubles: default_price(),
            loyalty_level: default_loyalty_level(),
            stock: default_stock(),
            unlimited: false,
            buy_restriction: None,
        }
    }
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            refresh: default_refresh(),
            duplicate_policy: DuplicatePolicy::default(),
            serializer: SerializerKind::default(),
            offer: OfferConfig::default(),
        }
    }
}

impl RegistrarConfig {
    /// Parse configuration from a RON string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = ron::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if !config.offer.price_roubles.is_finite() || config.offer.price_roubles < 0.0 {
            return Err(Error::Config(format!(
                "invalid offer price: {}",
                config.offer.price_roubles
            )));
        }
        Ok(config)
    }

    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }
}
