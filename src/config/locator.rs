//! Upward search for a user config file

use super::{ConfigFile, ConfigFileKind, PYPROJECT_FILE, PYRIGHT_CONFIG_FILE};
use std::fs;
use std::path::Path;

const PYPROJECT_MARKERS: [&str; 2] = ["[tool.pyright]", "[tool.basedpyright]"];

/// Search the current directory and its ancestors. Returns `None` when the working
/// directory itself cannot be determined.
pub fn find_config_file() -> Option<ConfigFile> {
    match std::env::current_dir() {
        Ok(cwd) => find_config_file_from(&cwd),
        Err(e) => {
            tracing::warn!("Cannot determine current directory, skipping config search: {}", e);
            None
        }
    }
}

/// Search `start` and every ancestor up to the filesystem root. The nearest directory
/// wins, and within a directory `pyrightconfig.json` beats `pyproject.toml`.
pub fn find_config_file_from(start: &Path) -> Option<ConfigFile> {
    for dir in start.ancestors() {
        let pyright_config = dir.join(PYRIGHT_CONFIG_FILE);
        if pyright_config.is_file() {
            tracing::debug!("Found {}", pyright_config.display());
            return Some(ConfigFile { path: pyright_config, kind: ConfigFileKind::PyrightJson });
        }

        let pyproject = dir.join(PYPROJECT_FILE);
        if pyproject.is_file() && has_pyright_section(&pyproject) {
            tracing::debug!("Found pyright settings in {}", pyproject.display());
            return Some(ConfigFile { path: pyproject, kind: ConfigFileKind::Pyproject });
        }
    }

    None
}

// Plain text check, the file is only parsed once selected.
fn has_pyright_section(pyproject: &Path) -> bool {
    match fs::read_to_string(pyproject) {
        Ok(content) => PYPROJECT_MARKERS.iter().any(|marker| content.contains(marker)),
        Err(e) => {
            tracing::warn!("Failed to read {}, skipping: {}", pyproject.display(), e);
            false
        }
    }
}
