//! Library error types.

use thiserror::Error;

/// Module lifecycle failures.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No factory is registered under this name.
    #[error("module '{0}' is not registered")]
    NotFound(String),
    /// A load for this name is already in progress. This is what a module
    /// loading itself from one of its own lifecycle hooks runs into.
    #[error("module '{0}' is already being loaded")]
    LoadInProgress(String),
    /// The factory ran but failed to produce an instance.
    #[error("module '{0}' failed to construct")]
    Construct(String, #[source] anyhow::Error),
}

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid TOML for our schema.
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A module priority that is neither an integer nor a string holding
    /// one.
    #[error("invalid priority for module '{name}': {value}")]
    InvalidPriority {
        /// The module whose priority is malformed.
        name: String,
        /// The offending value, rendered as TOML.
        value: String,
    },
}
