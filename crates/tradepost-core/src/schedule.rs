//! Trader stock refresh schedules

use crate::error::{Error, Result};
use crate::identity::TraderId;
use serde::{Deserialize, Serialize};

/// Bounds, in seconds, between two stock refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct RefreshWindow {
    min: u64,
    max: u64,
}

#[derive(Deserialize)]
struct RawWindow {
    min: u64,
    max: u64,
}

impl TryFrom<RawWindow> for RefreshWindow {
    type Error = Error;

    fn try_from(raw: RawWindow) -> Result<Self> {
        Self::new(raw.min, raw.max)
    }
}

impl RefreshWindow {
    /// Create a refresh window; `min` must not exceed `max`
    pub fn new(min: u64, max: u64) -> Result<Self> {
        if min > max {
            return Err(Error::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Shortest time between refreshes
    pub fn min(&self) -> u64 {
        self.min
    }

    /// Longest time between refreshes
    pub fn max(&self) -> u64 {
        self.max
    }
}

impl Default for RefreshWindow {
    /// The host's default of one hour
    fn default() -> Self {
        Self {
            min: 3600,
            max: 3600,
        }
    }
}

/// One trader's entry in the trader config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSchedule {
    #[serde(rename = "traderId")]
    pub trader_id: TraderId,
    pub seconds: RefreshWindow,
}

/// The host's trader config
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TraderConfig {
    /// Refresh schedules in registration order; not deduplicated
    #[serde(rename = "updateTime")]
    pub update_time: Vec<RefreshSchedule>,
}

impl TraderConfig {
    /// Create an empty trader config
    pub fn new() -> Self {
        Self::default()
    }

    /// All schedule entries for a trader
    pub fn schedules_for<'a>(&'a self, trader: &'a TraderId) -> impl Iterator<Item = &'a RefreshSchedule> {
        self.update_time.iter().filter(move |s| &s.trader_id == trader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds() {
        let window = RefreshWindow::new(3600, 7200).unwrap();
        assert_eq!(window.min(), 3600);
        assert_eq!(window.max(), 7200);
        assert!(RefreshWindow::new(0, 0).is_ok());
        assert!(matches!(
            RefreshWindow::new(10, 5),
            Err(Error::InvalidRange { min: 10, max: 5 })
        ));
    }

    #[test]
    fn test_schedule_json_shape() {
        let schedule = RefreshSchedule {
            trader_id: TraderId::new("T1"),
            seconds: RefreshWindow::new(3600, 7200).unwrap(),
        };
        let json = serde_json::to_string(&schedule).unwrap();
        assert_eq!(json, r#"{"traderId":"T1","seconds":{"min":3600,"max":7200}}"#);
    }

    #[test]
    fn test_deserialize_rejects_inverted_window() {
        assert!(ron::from_str::<RefreshWindow>("(min: 60, max: 120)").is_ok());
        assert!(ron::from_str::<RefreshWindow>("(min: 120, max: 60)").is_err());
        assert!(serde_json::from_str::<RefreshWindow>(r#"{"min": -1, "max": 60}"#).is_err());
    }
}
