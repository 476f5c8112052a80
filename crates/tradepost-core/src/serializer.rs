//! Structural deep copies through a text serializer
//!
//! Registering a trader stores a copy of the caller's metadata that shares
//! nothing with it. The copy is made by serializing and parsing back, and is
//! only accepted when it compares equal to the input.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A text format able to round-trip metadata
pub trait Serializer {
    /// Serialize a value to text
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Parse a value from text
    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T>;

    /// Copy a value through the format
    ///
    /// Fails with [`Error::Serialization`] if the copy differs from the input,
    /// e.g. for floats the format cannot represent.
    fn deep_copy<T>(&self, value: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned + PartialEq,
    {
        let text = self.serialize(value)?;
        let copy: T = self.deserialize(&text)?;
        if &copy != value {
            return Err(Error::Serialization(
                "value does not survive a serialization round trip".to_string(),
            ));
        }
        Ok(copy)
    }
}

/// JSON serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| Error::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        serde_json::from_str(text).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// RON serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct RonSerializer;

impl Serializer for RonSerializer {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        ron::to_string(value).map_err(|e| Error::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        ron::from_str(text).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Serializer selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SerializerKind {
    #[default]
    Json,
    Ron,
}

impl Serializer for SerializerKind {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            SerializerKind::Json => JsonSerializer.serialize(value),
            SerializerKind::Ron => RonSerializer.serialize(value),
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        match self {
            SerializerKind::Json => JsonSerializer.deserialize(text),
            SerializerKind::Ron => RonSerializer.deserialize(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trader::TraderBase;
    use crate::value::Value;

    fn base() -> TraderBase {
        TraderBase::new("cat_trader")
            .with_name("Cat")
            .with_field("balance_rub", 5_000_000i64)
            .with_field("discount", 0.15f64)
            .with_field("items_buy", Value::from(vec!["weapon", "ammo"]))
    }

    #[test]
    fn test_json_deep_copy_is_equal_and_independent() {
        let original = base();
        let mut copy = JsonSerializer.deep_copy(&original).unwrap();
        assert_eq!(copy, original);

        copy.name.push_str(" (edited)");
        assert_eq!(original.name, "Cat");
    }

    #[test]
    fn test_ron_deep_copy() {
        let original = base();
        assert_eq!(RonSerializer.deep_copy(&original).unwrap(), original);
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let original = base().with_field("bad", f64::NAN);
        assert!(matches!(
            JsonSerializer.deep_copy(&original),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(
            SerializerKind::Ron.deep_copy(&original),
            Err(Error::Serialization(_))
        ));
    }
}
