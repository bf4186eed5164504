//! Error types for config resolution and tool launching

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The packaged default is missing or structurally wrong. The installation is broken.
    #[error("Bundled default configuration is corrupt: {reason}")]
    BundledConfigCorrupt { reason: String },

    #[error("Failed reading config file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed parsing config file {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error(
        "Unsupported config file: {} (expected pyrightconfig.json or pyproject.toml)",
        path.display()
    )]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed writing materialized config: {0}")]
    Materialize(#[from] io::Error),
}

impl ConfigError {
    /// Whether a user config failing this way may be ignored in favor of the defaults.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unreadable { .. } | Self::Malformed { .. })
    }

    pub(crate) fn bundled(reason: impl Into<String>) -> Self {
        Self::BundledConfigCorrupt { reason: reason.into() }
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{program} is not installed.\n\nPlease install it with: {install_hint}")]
    ToolMissing { program: String, install_hint: String },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}
