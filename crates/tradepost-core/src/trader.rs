//! Trader base profiles and registered trader records

use crate::assort::{AssortmentTable, QuestAssortmentTable};
use crate::error::{Error, Result};
use crate::identity::TraderId;
use crate::value::{Value, ValueMap};
use serde::{Deserialize, Serialize};

/// A trader's base profile (`base.json` in a trader package)
///
/// Deserializing always goes through [`TraderBase::from_value`], so a
/// `TraderBase` in hand has passed structural validation. Fields the
/// registrar does not interpret are kept in `extra` in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct TraderBase {
    /// Trader id
    #[serde(rename = "_id")]
    pub id: TraderId,
    /// Short display name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Nickname shown in trader lists
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nickname: String,
    /// Where the trader is found
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    /// Flavour text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Remaining opaque fields
    #[serde(flatten)]
    pub extra: ValueMap,
}

const PROFILE_FIELDS: [&str; 4] = ["name", "nickname", "location", "description"];

impl TraderBase {
    /// Create a base profile with only an id
    pub fn new(id: impl Into<TraderId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            nickname: String::new(),
            location: String::new(),
            description: String::new(),
            extra: ValueMap::new(),
        }
    }

    /// Set the short display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the nickname
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    /// Set an opaque field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Validate an untyped metadata blob into a base profile
    ///
    /// Requires a map with a non-empty, whitespace-free string `_id`. The
    /// profile fields must be strings when present.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut map = match value {
            Value::Map(map) => map,
            other => {
                return Err(Error::Validation(format!(
                    "expected a map, got {}",
                    other.type_name()
                )))
            }
        };

        let id = match map.shift_remove("_id") {
            Some(Value::String(id)) => id,
            Some(other) => {
                return Err(Error::Validation(format!(
                    "_id must be a string, got {}",
                    other.type_name()
                )))
            }
            None => return Err(Error::Validation("missing _id".to_string())),
        };
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(Error::Validation(format!("invalid trader id {:?}", id)));
        }

        let mut base = TraderBase::new(id);
        for field in PROFILE_FIELDS {
            let text = match map.shift_remove(field) {
                Some(Value::String(s)) => s,
                Some(Value::Null) | None => String::new(),
                Some(other) => {
                    return Err(Error::Validation(format!(
                        "{} must be a string, got {}",
                        field,
                        other.type_name()
                    )))
                }
            };
            match field {
                "name" => base.name = text,
                "nickname" => base.nickname = text,
                "location" => base.location = text,
                _ => base.description = text,
            }
        }
        base.extra = map;

        Ok(base)
    }

    /// Parse and validate a JSON trader base
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| Error::Validation(e.to_string()))?;
        Self::from_value(value)
    }
}

impl TryFrom<Value> for TraderBase {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

/// Everything the host needs to make a trader functional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderRecord {
    /// Offers the trader sells
    pub assort: AssortmentTable,
    /// Copy of the trader's base profile
    pub base: TraderBase,
    /// Quest-gated offers
    pub questassort: QuestAssortmentTable,
}

impl TraderRecord {
    /// Create a record with an empty assortment and quest assortment
    pub fn new(base: TraderBase) -> Self {
        Self {
            assort: AssortmentTable::new(),
            base,
            questassort: QuestAssortmentTable::new(),
        }
    }

    /// Id of the trader this record belongs to
    pub fn id(&self) -> &TraderId {
        &self.base.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_JSON: &str = r#"{
        "_id": "cat_trader",
        "name": "Cat",
        "surname": " ",
        "nickname": "Cat",
        "location": "Here in the cat shop",
        "currency": "RUB",
        "balance_rub": 5000000,
        "loyaltyLevels": [{"minLevel": 1, "minSalesSum": 0}]
    }"#;

    #[test]
    fn test_from_json() {
        let base = TraderBase::from_json(BASE_JSON).unwrap();
        assert_eq!(base.id.as_str(), "cat_trader");
        assert_eq!(base.nickname, "Cat");
        assert_eq!(base.location, "Here in the cat shop");
        assert!(base.description.is_empty());
        assert_eq!(base.extra.get("currency"), Some(&Value::from("RUB")));
        assert_eq!(base.extra.keys().next().map(String::as_str), Some("surname"));
    }

    #[test]
    fn test_serde_validates() {
        let err = serde_json::from_str::<TraderBase>(r#"{"name": "No id"}"#).unwrap_err();
        assert!(err.to_string().contains("missing _id"));

        let base: TraderBase = serde_json::from_str(BASE_JSON).unwrap();
        assert_eq!(base.name, "Cat");
    }

    #[test]
    fn test_rejects_malformed_metadata() {
        assert!(matches!(TraderBase::from_value(Value::Int(3)), Err(Error::Validation(_))));
        assert!(matches!(
            TraderBase::from_json(r#"{"_id": 12}"#),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            TraderBase::from_json(r#"{"_id": "has space"}"#),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            TraderBase::from_json(r#"{"_id": "t", "nickname": ["x"]}"#),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_serializes_profile_then_extra() {
        let base = TraderBase::new("t1").with_name("Cat").with_field("currency", "USD");
        let json = serde_json::to_string(&base).unwrap();
        assert_eq!(json, r#"{"_id":"t1","name":"Cat","currency":"USD"}"#);
    }

    #[test]
    fn test_record_starts_empty() {
        let record = TraderRecord::new(TraderBase::new("t1"));
        assert_eq!(record.id().as_str(), "t1");
        assert!(record.assort.is_empty());
        assert!(record.questassort.is_empty());
    }
}
