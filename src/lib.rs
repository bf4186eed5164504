//! score-wrappers: run basedpyright and ruff with score defaults
//!
//! The user's own pyright configuration, found by walking up from the working
//! directory, always takes precedence over the bundled defaults.

pub mod cli;
pub mod config;
pub mod error;
pub mod launch;
pub mod tool;
