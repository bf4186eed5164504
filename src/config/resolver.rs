//! Orchestrates locating, loading and merging into one final config

use super::loader::{self, LoadedConfig};
use super::{locator, merge, ConfigFile, ConfigMapping, ConfigSource};
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// The score defaults compiled into the binary.
pub const DEFAULT_PYPROJECT: &str = include_str!("default_pyproject.toml");

/// Where the bundled default config is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundledDefault {
    Embedded,
    /// A packager-supplied replacement, validated as strictly as the embedded file.
    File(PathBuf),
}

impl BundledDefault {
    /// Parse a fresh copy of the defaults. Every failure is fatal.
    pub fn load(&self) -> Result<ConfigMapping, ConfigError> {
        match self {
            BundledDefault::Embedded => loader::load_bundled(DEFAULT_PYPROJECT),
            BundledDefault::File(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    ConfigError::bundled(format!("cannot read {}: {e}", path.display()))
                })?;
                loader::load_bundled(&content)
            }
        }
    }
}

/// Outcome of looking for and loading the user config.
#[derive(Debug)]
pub enum UserConfig {
    Absent,
    Loaded { file: ConfigFile, source: ConfigSource },
    /// The file exists but could not be used, so only the defaults apply.
    Degraded { path: PathBuf, error: ConfigError },
}

impl UserConfig {
    pub fn path(&self) -> Option<&Path> {
        match self {
            UserConfig::Absent => None,
            UserConfig::Loaded { file, .. } => Some(&file.path),
            UserConfig::Degraded { path, .. } => Some(path),
        }
    }

    pub fn source(&self) -> ConfigSource {
        match self {
            UserConfig::Loaded { source, .. } => *source,
            UserConfig::Absent | UserConfig::Degraded { .. } => ConfigSource::None,
        }
    }
}

#[derive(Debug)]
pub struct Resolution {
    pub mapping: ConfigMapping,
    pub user: UserConfig,
}

#[derive(Debug, Clone)]
pub struct ConfigResolver {
    bundled: BundledDefault,
    start_dir: Option<PathBuf>,
}

impl ConfigResolver {
    /// Search for user config from the current directory.
    pub fn new(bundled: BundledDefault) -> Self {
        Self { bundled, start_dir: None }
    }

    /// Begin the upward search at `dir` instead of the current directory.
    pub fn with_start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    pub fn bundled_defaults(&self) -> Result<ConfigMapping, ConfigError> {
        self.bundled.load()
    }

    /// Merge the user config (explicit or discovered) over the bundled defaults.
    ///
    /// A broken bundled default and an unsupported explicit path are errors. A user
    /// file that cannot be read or parsed is logged and skipped.
    pub fn resolve(&self, explicit: Option<&Path>) -> Result<Resolution, ConfigError> {
        let defaults = self.bundled.load()?;

        let user_path = match (explicit, &self.start_dir) {
            (Some(path), _) => Some(path.to_path_buf()),
            (None, Some(dir)) => locator::find_config_file_from(dir).map(|file| file.path),
            (None, None) => locator::find_config_file().map(|file| file.path),
        };

        let (user_mapping, user) = match user_path {
            Some(path) => load_user(path)?,
            None => {
                tracing::debug!("No user config found, using {}", ConfigSource::BundledDefault);
                (ConfigMapping::new(), UserConfig::Absent)
            }
        };

        Ok(Resolution { mapping: merge(defaults, user_mapping), user })
    }
}

fn load_user(path: PathBuf) -> Result<(ConfigMapping, UserConfig), ConfigError> {
    match loader::load(&path) {
        Ok(LoadedConfig { file, mapping, source }) => {
            Ok((mapping, UserConfig::Loaded { file, source }))
        }
        Err(error) if error.is_recoverable() => {
            tracing::warn!("{}; continuing with default configuration", error);
            Ok((ConfigMapping::new(), UserConfig::Degraded { path, error }))
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    const SMALL_DEFAULT: &str =
        "[tool.basedpyright]\ntypeCheckingMode = \"standard\"\npythonVersion = \"3.9\"\n";

    fn small_default(dir: &Path) -> BundledDefault {
        let path = dir.join("bundled.toml");
        fs::write(&path, SMALL_DEFAULT).expect("write bundled");
        BundledDefault::File(path)
    }

    #[test]
    fn test_embedded_defaults_are_valid() {
        let defaults = BundledDefault::Embedded.load().expect("embedded");
        assert_eq!(defaults["typeCheckingMode"], json!("standard"));
        assert_eq!(defaults["reportMissingTypeStubs"], json!(false));
        assert_eq!(defaults["pythonPlatform"], json!("All"));
        assert_eq!(defaults.len(), 10);
    }

    #[test]
    fn test_user_json_overrides_default() {
        let tmp = TempDir::new().expect("tmp");
        let project = tmp.path().join("project");
        fs::create_dir_all(&project).expect("mkdir");
        fs::write(project.join("pyrightconfig.json"), r#"{"typeCheckingMode": "strict"}"#)
            .expect("write");

        let resolver = ConfigResolver::new(small_default(tmp.path())).with_start_dir(&project);
        let resolution = resolver.resolve(None).expect("resolve");

        assert_eq!(
            Value::Object(resolution.mapping),
            json!({"typeCheckingMode": "strict", "pythonVersion": "3.9"})
        );
        assert_eq!(resolution.user.source(), ConfigSource::PyrightJson);
        assert_eq!(resolution.user.path(), Some(project.join("pyrightconfig.json").as_path()));
    }

    #[test]
    fn test_invalid_json_degrades_to_defaults() {
        let tmp = TempDir::new().expect("tmp");
        let project = tmp.path().join("project");
        fs::create_dir_all(&project).expect("mkdir");
        fs::write(project.join("pyrightconfig.json"), "{ broken").expect("write");

        let resolver = ConfigResolver::new(small_default(tmp.path())).with_start_dir(&project);
        let resolution = resolver.resolve(None).expect("resolve");

        assert!(matches!(
            resolution.user,
            UserConfig::Degraded { error: ConfigError::Malformed { .. }, .. }
        ));
        assert_eq!(resolution.mapping, resolver.bundled_defaults().expect("defaults"));
    }

    #[test]
    fn test_explicit_path_skips_search() {
        let tmp = TempDir::new().expect("tmp");
        let project = tmp.path().join("project");
        let elsewhere = tmp.path().join("elsewhere");
        fs::create_dir_all(&project).expect("mkdir");
        fs::create_dir_all(&elsewhere).expect("mkdir");
        fs::write(project.join("pyrightconfig.json"), r#"{"typeCheckingMode": "strict"}"#)
            .expect("write");
        let explicit = elsewhere.join("pyproject.toml");
        fs::write(&explicit, "[tool.pyright]\ntypeCheckingMode = \"basic\"\n").expect("write");

        let resolver = ConfigResolver::new(small_default(tmp.path())).with_start_dir(&project);
        let resolution = resolver.resolve(Some(&explicit)).expect("resolve");

        assert_eq!(resolution.mapping["typeCheckingMode"], json!("basic"));
        assert_eq!(resolution.user.source(), ConfigSource::PyprojectPyright);
    }

    #[test]
    fn test_explicit_missing_file_degrades() {
        let tmp = TempDir::new().expect("tmp");
        let resolver = ConfigResolver::new(small_default(tmp.path())).with_start_dir(tmp.path());
        let missing = tmp.path().join("nope").join("pyrightconfig.json");

        let resolution = resolver.resolve(Some(&missing)).expect("resolve");
        assert!(matches!(
            resolution.user,
            UserConfig::Degraded { error: ConfigError::Unreadable { .. }, .. }
        ));
        assert_eq!(resolution.mapping.len(), 2);
    }

    #[test]
    fn test_explicit_unsupported_format_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        let ruff = tmp.path().join("ruff.toml");
        fs::write(&ruff, "line-length = 88\n").expect("write");

        let resolver = ConfigResolver::new(small_default(tmp.path())).with_start_dir(tmp.path());
        assert!(matches!(
            resolver.resolve(Some(&ruff)),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_corrupt_bundled_default_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        let bundled = tmp.path().join("bundled.toml");
        fs::write(&bundled, "[tool.pyright]\n").expect("write");
        let explicit = tmp.path().join("pyrightconfig.json");
        fs::write(&explicit, "{}").expect("write");

        let resolver = ConfigResolver::new(BundledDefault::File(bundled));
        assert!(matches!(
            resolver.resolve(Some(&explicit)),
            Err(ConfigError::BundledConfigCorrupt { .. })
        ));
    }

    #[test]
    fn test_missing_bundled_file_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        let resolver = ConfigResolver::new(BundledDefault::File(tmp.path().join("gone.toml")));

        let err = resolver.bundled_defaults().unwrap_err();
        assert!(matches!(err, ConfigError::BundledConfigCorrupt { .. }));
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_pyproject_without_settings_given_explicitly_keeps_defaults() {
        let tmp = TempDir::new().expect("tmp");
        let explicit = tmp.path().join("pyproject.toml");
        fs::write(&explicit, "[project]\nname = \"demo\"\n").expect("write");

        let resolver = ConfigResolver::new(small_default(tmp.path())).with_start_dir(tmp.path());
        let resolution = resolver.resolve(Some(&explicit)).expect("resolve");

        assert!(matches!(resolution.user, UserConfig::Loaded { .. }));
        assert_eq!(resolution.user.source(), ConfigSource::None);
        assert_eq!(resolution.mapping, resolver.bundled_defaults().expect("defaults"));
    }
}
