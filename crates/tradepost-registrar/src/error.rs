//! Error types for tradepost-registrar

use thiserror::Error;

/// Result type for registrar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while registering a trader
#[derive(Debug, Error)]
pub enum Error {
    /// Record construction or validation error
    #[error(transparent)]
    Core(#[from] tradepost_core::Error),

    /// Package loading error
    #[error(transparent)]
    Script(#[from] tradepost_script::Error),

    /// Blueprint parts do not form a valid tree
    #[error("invalid weapon blueprint: {0}")]
    InvalidBlueprint(String),

    /// Configuration could not be read
    #[error("config error: {0}")]
    Config(String),

    /// A mod hook failed
    #[error("mod {name} failed during {phase}: {source}")]
    Mod {
        name: String,
        phase: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Get the core error if this wraps one
    pub fn as_core(&self) -> Option<&tradepost_core::Error> {
        match self {
            Error::Core(e) => Some(e),
            Error::Mod { source, .. } => source.as_core(),
            _ => None,
        }
    }
}
