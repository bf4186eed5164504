//! The external tools being wrapped

use crate::config::ConfigFormat;
use std::ffi::OsString;

/// How a wrapper binary talks to the tool it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tool {
    /// Name of our binary, used in help, version and temp file names.
    pub wrapper: &'static str,
    /// Executable looked up on `PATH`.
    pub program: &'static str,
    /// pip package providing `program`.
    pub package: &'static str,
    /// Flag that points the tool at the materialized config.
    pub config_flag: &'static str,
    /// Format the tool expects behind `config_flag`.
    pub config_format: ConfigFormat,
    /// Tool flags meaning the user already picked a config; nothing is injected then.
    pub own_config_flags: &'static [&'static str],
    /// Whether `-v` means `--version` for the wrapper. Off where the tool owns `-v`.
    pub short_version: bool,
    pub about: &'static str,
}

pub const PYRIGHT: Tool = Tool {
    wrapper: "score-pyright",
    program: "basedpyright",
    package: "basedpyright",
    config_flag: "--project",
    config_format: ConfigFormat::Json,
    own_config_flags: &["--project", "-p"],
    short_version: false,
    about: "score-pyright: A wrapper around basedpyright with score-specific defaults",
};

pub const RUFF: Tool = Tool {
    wrapper: "score-ruff",
    program: "ruff",
    package: "ruff",
    config_flag: "--config",
    config_format: ConfigFormat::Toml,
    own_config_flags: &[],
    short_version: true,
    about: "score-ruff: A wrapper around ruff with score-specific defaults",
};

impl Tool {
    pub fn install_hint(&self) -> String {
        format!("pip install {}", self.package)
    }

    pub fn temp_prefix(&self) -> String {
        format!("{}-config-", self.wrapper)
    }

    /// True when the tool arguments already select a config file or project.
    pub fn selects_own_config(&self, args: &[OsString]) -> bool {
        args.iter().filter_map(|arg| arg.to_str()).any(|arg| {
            self.own_config_flags.iter().any(|flag| {
                arg == *flag
                    || arg.strip_prefix(flag).is_some_and(|rest| {
                        rest.starts_with('=') || (!flag.starts_with("--") && !rest.is_empty())
                    })
            })
        })
    }
}
