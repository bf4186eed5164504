//! Configuration resolution
//!
//! Finds the user's pyright configuration, merges it over the bundled score defaults
//! and writes the result where the wrapped tool can read it. User values always win
//! over defaults (User > Bundled).

pub mod loader;
pub mod locator;
pub mod materialize;
pub mod merge;
pub mod resolver;

use std::fmt;
use std::path::{Path, PathBuf};

pub use loader::{load, load_bundled, LoadedConfig};
pub use locator::{find_config_file, find_config_file_from};
pub use materialize::{materialize, ConfigFormat, MaterializedConfig};
pub use merge::merge;
pub use resolver::{BundledDefault, ConfigResolver, Resolution, UserConfig};

/// Top-level config keys mapped to opaque JSON values.
pub type ConfigMapping = serde_json::Map<String, serde_json::Value>;

pub const PYRIGHT_CONFIG_FILE: &str = "pyrightconfig.json";
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Where a mapping came from. Diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    BundledDefault,
    PyrightJson,
    PyprojectPyright,
    PyprojectBasedpyright,
    /// A recognized file that carried no pyright settings.
    None,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::BundledDefault => write!(f, "bundled defaults"),
            ConfigSource::PyrightJson => write!(f, "pyrightconfig.json"),
            ConfigSource::PyprojectPyright => write!(f, "[tool.pyright]"),
            ConfigSource::PyprojectBasedpyright => write!(f, "[tool.basedpyright]"),
            ConfigSource::None => write!(f, "no pyright settings"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFileKind {
    PyrightJson,
    Pyproject,
}

impl ConfigFileKind {
    /// Recognize a config file by its exact filename.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(PYRIGHT_CONFIG_FILE) => Some(Self::PyrightJson),
            Some(PYPROJECT_FILE) => Some(Self::Pyproject),
            _ => None,
        }
    }
}

/// A config file path together with the loader branch it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub kind: ConfigFileKind,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        ConfigFileKind::from_path(&path).map(|kind| Self { path, kind })
    }
}
