//! Config file loading

use super::{ConfigFile, ConfigFileKind, ConfigMapping, ConfigSource};
use crate::error::ConfigError;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// A user config file after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub file: ConfigFile,
    pub mapping: ConfigMapping,
    pub source: ConfigSource,
}

/// Load a user config file, dispatching on its filename.
///
/// A `pyproject.toml` without pyright settings loads as an empty mapping with
/// [`ConfigSource::None`]; only the bundled default is required to carry them.
pub fn load(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let file = ConfigFile::new(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat { path: path.to_path_buf() })?;

    let content = fs::read_to_string(&file.path)
        .map_err(|source| ConfigError::Unreadable { path: file.path.clone(), source })?;

    let (mapping, source) = match file.kind {
        ConfigFileKind::PyrightJson => {
            (parse_pyright_json(&content, &file.path)?, ConfigSource::PyrightJson)
        }
        ConfigFileKind::Pyproject => parse_pyproject(&content, &file.path)?,
    };

    tracing::debug!(
        "Loaded {} key(s) from {} ({})",
        mapping.len(),
        file.path.display(),
        source
    );

    Ok(LoadedConfig { file, mapping, source })
}

/// Parse the bundled default, which must be exactly one `[tool]` table holding
/// `[tool.basedpyright]`. Anything else means the package was built wrong.
pub fn load_bundled(content: &str) -> Result<ConfigMapping, ConfigError> {
    let mut raw: toml::Table = toml::from_str(content)
        .map_err(|e| ConfigError::bundled(format!("invalid TOML syntax: {e}")))?;

    let Some(tool) = raw.remove("tool") else {
        return Err(ConfigError::bundled("missing [tool] section"));
    };
    if !raw.is_empty() {
        let extra: Vec<&str> = raw.keys().map(String::as_str).collect();
        return Err(ConfigError::bundled(format!(
            "unexpected sections outside [tool]: {}",
            extra.join(", ")
        )));
    }

    let toml::Value::Table(mut tool) = tool else {
        return Err(ConfigError::bundled("[tool] is not a table"));
    };

    match tool.remove("basedpyright") {
        Some(toml::Value::Table(section)) => Ok(table_to_mapping(section)),
        Some(_) => Err(ConfigError::bundled("[tool.basedpyright] is not a table")),
        None => Err(ConfigError::bundled("missing [tool.basedpyright] section")),
    }
}

fn parse_pyright_json(content: &str, path: &Path) -> Result<ConfigMapping, ConfigError> {
    let raw: Value = serde_json::from_str(content)
        .map_err(|e| malformed(path, format!("invalid JSON syntax: {e}")))?;

    match raw {
        Value::Object(map) => Ok(map),
        other => Err(malformed(
            path,
            format!("expected a JSON object at the top level, found {}", json_kind(&other)),
        )),
    }
}

/// `[tool.basedpyright]` wins over `[tool.pyright]` when both are present.
fn parse_pyproject(
    content: &str,
    path: &Path,
) -> Result<(ConfigMapping, ConfigSource), ConfigError> {
    let mut raw: toml::Table = toml::from_str(content)
        .map_err(|e| malformed(path, format!("invalid TOML syntax: {e}")))?;

    let mut tool = match raw.remove("tool") {
        Some(toml::Value::Table(tool)) => tool,
        Some(_) => return Err(malformed(path, "[tool] is not a table")),
        None => return Ok((ConfigMapping::new(), ConfigSource::None)),
    };

    let (key, source) = if tool.contains_key("basedpyright") {
        ("basedpyright", ConfigSource::PyprojectBasedpyright)
    } else if tool.contains_key("pyright") {
        ("pyright", ConfigSource::PyprojectPyright)
    } else {
        return Ok((ConfigMapping::new(), ConfigSource::None));
    };

    match tool.remove(key) {
        Some(toml::Value::Table(section)) => Ok((table_to_mapping(section), source)),
        _ => Err(malformed(path, format!("[tool.{key}] is not a table"))),
    }
}

fn table_to_mapping(table: toml::Table) -> ConfigMapping {
    table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect()
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        // JSON has no NaN or infinity
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(table_to_mapping(table)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn malformed(path: &Path, reason: impl Into<String>) -> ConfigError {
    ConfigError::Malformed { path: PathBuf::from(path), reason: reason.into() }
}
