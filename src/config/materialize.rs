//! Writing the resolved config to a temporary file for the wrapped tool

use super::ConfigMapping;
use crate::error::ConfigError;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::TempPath;

/// File format the wrapped tool reads its config in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn suffix(self) -> &'static str {
        match self {
            ConfigFormat::Json => ".json",
            ConfigFormat::Toml => ".toml",
        }
    }

    fn render(self, mapping: &ConfigMapping) -> io::Result<String> {
        match self {
            ConfigFormat::Json => {
                let mut text = serde_json::to_string_pretty(mapping)?;
                text.push('\n');
                Ok(text)
            }
            // TOML has no null, so a mapping holding one cannot be written
            ConfigFormat::Toml => toml::to_string(mapping)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
        }
    }
}

/// A resolved config on disk. The file is deleted when this is dropped, so keep it
/// alive until the tool reading it has exited.
#[derive(Debug)]
pub struct MaterializedConfig {
    path: TempPath,
}

impl MaterializedConfig {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serialize `mapping` into a new `<prefix>XXXXXX<suffix>` temp file.
pub fn materialize(
    mapping: &ConfigMapping,
    prefix: &str,
    format: ConfigFormat,
) -> Result<MaterializedConfig, ConfigError> {
    let text = format.render(mapping)?;
    let file = tempfile::Builder::new().prefix(prefix).suffix(format.suffix()).tempfile()?;

    let mut writer = BufWriter::new(file.as_file());
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    drop(writer);

    let path = file.into_temp_path();
    tracing::debug!("Materialized {} config key(s) to {}", mapping.len(), path.display());

    Ok(MaterializedConfig { path })
}
