//! Identity types for traders, items and templates
//!
//! All identifiers are strings in the host database. Wrapping them keeps a
//! trader id from being passed where an item id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id! {
    /// Identifier of a trader (the `_id` of its base profile)
    TraderId
}

string_id! {
    /// Identifier of a concrete item instance in an assortment
    ///
    /// Must be unique across the whole host database.
    ItemId
}

string_id! {
    /// Reference into the host's static item template catalog (`_tpl`)
    TemplateId
}

string_id! {
    /// Name of an attachment slot on a parent item (e.g. `mod_barrel`)
    SlotId
}

string_id! {
    /// Language code keying a locale table (e.g. `en`, `fr`)
    LanguageCode
}

impl TraderId {
    /// Locale key for one of the trader's display strings, e.g. `"<id> Nickname"`
    pub fn locale_key(&self, field: &str) -> String {
        format!("{} {}", self.0, field)
    }
}

/// Length of a host object id in hex characters
pub const OBJECT_ID_LEN: usize = 24;

/// Check whether a string has the host's object id shape (24 lowercase hex chars)
pub fn is_object_id(s: &str) -> bool {
    s.len() == OBJECT_ID_LEN && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
