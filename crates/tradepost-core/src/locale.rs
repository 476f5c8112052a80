//! Per-language display strings

use crate::identity::{LanguageCode, TraderId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Flat mapping from string key to display text for one language
pub type LocaleTable = IndexMap<String, String>;

/// All language tables known to the host
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocaleTables {
    /// Global strings, keyed by language
    pub global: IndexMap<LanguageCode, LocaleTable>,
}

impl LocaleTables {
    /// Create locale tables with no languages
    pub fn new() -> Self {
        Self::default()
    }

    /// Create locale tables with an empty table per language
    pub fn with_languages<L: Into<LanguageCode>>(languages: impl IntoIterator<Item = L>) -> Self {
        Self {
            global: languages
                .into_iter()
                .map(|lang| (lang.into(), LocaleTable::new()))
                .collect(),
        }
    }

    /// Number of languages
    pub fn language_count(&self) -> usize {
        self.global.len()
    }

    /// Look up a string in one language
    pub fn get(&self, language: &LanguageCode, key: &str) -> Option<&str> {
        self.global
            .get(language)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }
}

/// The display fields every trader has a locale key for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocaleField {
    FullName,
    FirstName,
    Nickname,
    Location,
    Description,
}

impl LocaleField {
    /// All fields, in the order they are written
    pub const ALL: [LocaleField; 5] = [
        LocaleField::FullName,
        LocaleField::FirstName,
        LocaleField::Nickname,
        LocaleField::Location,
        LocaleField::Description,
    ];

    /// Suffix used in the locale key
    pub fn suffix(self) -> &'static str {
        match self {
            LocaleField::FullName => "FullName",
            LocaleField::FirstName => "FirstName",
            LocaleField::Nickname => "Nickname",
            LocaleField::Location => "Location",
            LocaleField::Description => "Description",
        }
    }

    /// Locale key for this field of a trader, e.g. `"<id> Nickname"`
    pub fn key(self, trader: &TraderId) -> String {
        trader.locale_key(self.suffix())
    }
}

/// Display strings for a trader, written identically into every language
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TraderLocale {
    pub full_name: String,
    pub first_name: String,
    pub nickname: String,
    pub location: String,
    pub description: String,
}

impl TraderLocale {
    /// Create trader display strings
    pub fn new(
        full_name: impl Into<String>,
        first_name: impl Into<String>,
        nickname: impl Into<String>,
        location: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            first_name: first_name.into(),
            nickname: nickname.into(),
            location: location.into(),
            description: description.into(),
        }
    }

    /// Text for one field
    pub fn text(&self, field: LocaleField) -> &str {
        match field {
            LocaleField::FullName => &self.full_name,
            LocaleField::FirstName => &self.first_name,
            LocaleField::Nickname => &self.nickname,
            LocaleField::Location => &self.location,
            LocaleField::Description => &self.description,
        }
    }

    /// Key/value pairs for a trader, in write order
    pub fn entries(&self, trader: &TraderId) -> Vec<(String, String)> {
        LocaleField::ALL
            .iter()
            .map(|field| (field.key(trader), self.text(*field).to_string()))
            .collect()
    }
}
