//! Trader package loader

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use tradepost_core::{RefreshWindow, TraderBase, TraderId, TraderLocale, Value};

/// Text format of a definition file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Ron,
}

impl Format {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Format::Json),
            Some("ron") => Some(Format::Ron),
            _ => None,
        }
    }
}

/// Everything loaded for one trader
#[derive(Debug, Clone, PartialEq)]
pub struct TraderPackage {
    /// Validated base profile
    pub base: TraderBase,
    /// Display strings, if the package has them
    pub locale: Option<TraderLocale>,
    /// Refresh window, if the package overrides the default
    pub refresh: Option<RefreshWindow>,
}

impl TraderPackage {
    /// Create a package with only a base profile
    pub fn new(base: TraderBase) -> Self {
        Self {
            base,
            locale: None,
            refresh: None,
        }
    }

    /// Id of the packaged trader
    pub fn id(&self) -> &TraderId {
        &self.base.id
    }
}

/// Loaded trader packages, in load order
#[derive(Debug, Default)]
pub struct TraderPackages {
    packages: IndexMap<TraderId, TraderPackage>,
}

impl TraderPackages {
    /// Create an empty set of packages
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a package by trader id
    pub fn get(&self, id: &TraderId) -> Option<&TraderPackage> {
        self.packages.get(id)
    }

    /// Iterate packages in load order
    pub fn iter(&self) -> impl Iterator<Item = &TraderPackage> {
        self.packages.values()
    }

    /// Number of packages
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Check if no packages were loaded
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl IntoIterator for TraderPackages {
    type Item = TraderPackage;
    type IntoIter = indexmap::map::IntoValues<TraderId, TraderPackage>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.into_values()
    }
}

const BASE_FILES: [&str; 2] = ["base.json", "base.ron"];
const LOCALE_FILE: &str = "locale.ron";
const REFRESH_FILE: &str = "refresh.ron";

/// Loader for trader packages
pub struct Loader {
    packages: TraderPackages,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            packages: TraderPackages::new(),
        }
    }

    /// Parse and validate a trader base from a string
    ///
    /// RON bases use map syntax (`{"_id": "..."}`) like their JSON twins.
    pub fn parse_base(content: &str, format: Format) -> Result<TraderBase> {
        let value: Value = match format {
            Format::Json => serde_json::from_str(content)?,
            Format::Ron => ron::from_str(content)?,
        };
        Ok(TraderBase::from_value(value)?)
    }

    /// Parse trader display strings from a RON string
    pub fn parse_locale(content: &str) -> Result<TraderLocale> {
        Ok(ron::from_str(content)?)
    }

    /// Parse a refresh window from a RON string
    pub fn parse_refresh(content: &str) -> Result<RefreshWindow> {
        Ok(ron::from_str(content)?)
    }

    /// Add an already-built package
    pub fn add_package(&mut self, package: TraderPackage) -> Result<()> {
        let id = package.id().clone();
        if self.packages.packages.contains_key(&id) {
            return Err(Error::DuplicateDefinition(id.to_string()));
        }
        debug!(trader = %id, "added trader package");
        self.packages.packages.insert(id, package);
        Ok(())
    }

    /// Load one package directory
    pub fn load_package(&mut self, dir: impl AsRef<Path>) -> Result<TraderId> {
        let dir = dir.as_ref();

        let base_path = BASE_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| Error::MissingFile(format!("{}/base.json", dir.display())))?;
        let format = Format::from_path(&base_path)
            .ok_or_else(|| Error::InvalidSchema(format!("unknown format: {}", base_path.display())))?;
        let base = Self::parse_base(&fs::read_to_string(&base_path)?, format)?;

        let mut package = TraderPackage::new(base);

        let locale_path = dir.join(LOCALE_FILE);
        if locale_path.is_file() {
            package.locale = Some(Self::parse_locale(&fs::read_to_string(&locale_path)?)?);
        }

        let refresh_path = dir.join(REFRESH_FILE);
        if refresh_path.is_file() {
            package.refresh = Some(Self::parse_refresh(&fs::read_to_string(&refresh_path)?)?);
        }

        let id = package.id().clone();
        self.add_package(package)?;
        info!(trader = %id, path = %dir.display(), "loaded trader package");
        Ok(id)
    }

    /// Load every package below a directory
    ///
    /// A directory holding a base file is a package; any other directory is
    /// searched recursively.
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        if BASE_FILES.iter().any(|name| path.join(name).is_file()) {
            self.load_package(path)?;
            return Ok(());
        }

        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        // read_dir order is platform dependent
        entries.sort();

        for entry in entries {
            if entry.is_dir() {
                self.load_directory(&entry)?;
            }
        }

        Ok(())
    }

    /// Finish loading and return the packages
    pub fn finish(self) -> TraderPackages {
        self.packages
    }

    /// Get the current packages (for inspection during loading)
    pub fn packages(&self) -> &TraderPackages {
        &self.packages
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_JSON: &str = r#"{"_id": "cat_trader", "nickname": "Cat", "currency": "RUB"}"#;

    fn write_package(dir: &Path, base: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("base.json"), base).unwrap();
    }

    #[test]
    fn test_parse_base_ron() {
        let base = Loader::parse_base(r#"{"_id": "cat_trader", "name": "Cat", "balance_rub": 100}"#, Format::Ron)
            .unwrap();
        assert_eq!(base.id.as_str(), "cat_trader");
        assert_eq!(base.extra.get("balance_rub"), Some(&Value::Int(100)));
    }

    #[test]
    fn test_parse_base_rejects_missing_id() {
        let err = Loader::parse_base(r#"{"name": "Cat"}"#, Format::Json).unwrap_err();
        assert!(matches!(err, Error::Core(tradepost_core::Error::Validation(_))));
    }

    #[test]
    fn test_load_package_with_locale_and_refresh() {
        let dir = tempfile::tempdir().unwrap();
        write_package(dir.path(), BASE_JSON);
        fs::write(
            dir.path().join(LOCALE_FILE),
            r#"(full_name: "Cat Trader", first_name: "Cat", nickname: "Kitty", location: "Shop", description: "Guns")"#,
        )
        .unwrap();
        fs::write(dir.path().join(REFRESH_FILE), "(min: 3600, max: 4000)").unwrap();

        let mut loader = Loader::new();
        let id = loader.load_package(dir.path()).unwrap();
        let packages = loader.finish();
        let package = packages.get(&id).unwrap();

        assert_eq!(package.base.nickname, "Cat");
        assert_eq!(package.locale.as_ref().map(|l| l.nickname.as_str()), Some("Kitty"));
        assert_eq!(package.refresh.map(|r| r.max()), Some(4000));
    }

    #[test]
    fn test_inverted_refresh_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_package(dir.path(), BASE_JSON);
        fs::write(dir.path().join(REFRESH_FILE), "(min: 4000, max: 3600)").unwrap();

        assert!(Loader::new().load_package(dir.path()).is_err());
    }

    #[test]
    fn test_missing_base_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Loader::new().load_package(dir.path()).unwrap_err();
        assert!(matches!(err, Error::MissingFile(_)));
    }

    #[test]
    fn test_load_directory_recurses_and_rejects_duplicates() {
        let root = tempfile::tempdir().unwrap();
        write_package(&root.path().join("a"), r#"{"_id": "t1"}"#);
        write_package(&root.path().join("nested/b"), r#"{"_id": "t2"}"#);

        let mut loader = Loader::new();
        loader.load_directory(root.path()).unwrap();
        let ids: Vec<&str> = loader.packages().iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);

        write_package(&root.path().join("z"), r#"{"_id": "t1"}"#);
        let err = Loader::new().load_directory(root.path()).unwrap_err();
        assert!(matches!(err, Error::DuplicateDefinition(id) if id == "t1"));
    }
}
