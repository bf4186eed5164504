//! Command-line interface shared by the wrapper binaries
//!
//! Resolves the configuration, writes it to a temp file and runs the wrapped tool
//! with it, propagating the tool's exit code.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{materialize, BundledDefault, ConfigMapping, ConfigResolver};
use crate::launch::run_tool;
use crate::tool::Tool;

mod args;

pub use args::{split_args, WrapperArgs};

pub fn run(tool: &Tool) -> Result<ExitCode> {
    init_logging();

    let (wrapper_argv, passthrough) = split_args(tool, std::env::args_os().skip(1));
    let args = args::parse(tool, wrapper_argv)?;
    let program =
        args.score_tool_bin.clone().map_or_else(|| OsString::from(tool.program), OsString::from);

    if args.help {
        println!("{}", args::command(tool).render_help());
        println!("--- {} help ---\n", tool.program);
        let tool_args: Vec<OsString> =
            std::iter::once(OsString::from("--help")).chain(passthrough).collect();
        return Ok(run_tool(tool, &program, &tool_args)?);
    }

    if args.version {
        println!("{} version {}", tool.wrapper, env!("CARGO_PKG_VERSION"));
        return Ok(run_tool(tool, &program, &[OsString::from("--version")])?);
    }

    let bundled =
        args.score_defaults.clone().map_or(BundledDefault::Embedded, BundledDefault::File);
    let resolver = ConfigResolver::new(bundled);

    if args.score_config {
        let defaults = resolver.bundled_defaults()?;
        println!("{} default configuration:", tool.wrapper);
        println!("{}", to_pretty_json(&defaults)?);
        return Ok(ExitCode::SUCCESS);
    }

    if args.print_config {
        let resolution = resolver.resolve(args.config.as_deref())?;
        let using = resolution
            .user
            .path()
            .map_or_else(|| "bundled defaults only".to_string(), |p| p.display().to_string());
        println!("{} resolved configuration (using {}):", tool.wrapper, using);
        println!("{}", to_pretty_json(&resolution.mapping)?);
        return Ok(ExitCode::SUCCESS);
    }

    if tool.selects_own_config(&passthrough) {
        tracing::debug!("{} already selects a config, passing arguments through", tool.program);
        return Ok(run_tool(tool, &program, &passthrough)?);
    }

    let resolution = resolver.resolve(args.config.as_deref())?;
    tracing::debug!(
        "Using {} config key(s), user source: {}",
        resolution.mapping.len(),
        resolution.user.source()
    );

    // Dropping `materialized` deletes the file, so it must outlive the tool
    let materialized =
        materialize(&resolution.mapping, &tool.temp_prefix(), tool.config_format)?;
    let tool_args: Vec<OsString> = [
        OsString::from(tool.config_flag),
        materialized.path().as_os_str().to_os_string(),
    ]
    .into_iter()
    .chain(passthrough)
    .collect();

    let code = run_tool(tool, &program, &tool_args)?;
    drop(materialized);
    Ok(code)
}

fn init_logging() {
    // RUST_LOG takes precedence; otherwise only warnings and errors are shown.
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn to_pretty_json(mapping: &ConfigMapping) -> Result<String> {
    serde_json::to_string_pretty(mapping).context("Failed to serialize configuration")
}
