//! Wrapper flags, separated from the arguments meant for the wrapped tool

use crate::tool::Tool;
use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

const VALUE_FLAGS: [&str; 3] = ["--config", "--score-defaults", "--score-tool-bin"];
const SWITCHES: [&str; 5] = ["-h", "--help", "--version", "--score-config", "--print-config"];

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct WrapperArgs {
    /// Show this help message, then the wrapped tool's help
    #[arg(short = 'h', long)]
    pub help: bool,

    /// Show version information, then the wrapped tool's version
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Path to pyrightconfig.json or pyproject.toml, instead of searching parent directories
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the score default configuration and exit
    #[arg(long)]
    pub score_config: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Read the default configuration from this file instead of the built-in one
    #[arg(long, env = "SCORE_DEFAULT_CONFIG", value_name = "PATH", hide = true)]
    pub score_defaults: Option<PathBuf>,

    /// Run this executable instead of the wrapped tool
    #[arg(long, env = "SCORE_TOOL_BIN", value_name = "PROGRAM", hide = true)]
    pub score_tool_bin: Option<PathBuf>,
}

/// The clap command for `tool`, named and described for that wrapper.
pub fn command(tool: &Tool) -> clap::Command {
    let cmd = WrapperArgs::command()
        .name(tool.wrapper)
        .bin_name(tool.wrapper)
        .about(tool.about)
        .after_help(format!("All other arguments are passed to {}", tool.program));

    if tool.short_version {
        cmd
    } else {
        cmd.mut_arg("version", |arg| arg.short(None::<char>))
    }
}

/// Parse the wrapper's share of the command line. Usage errors exit like any clap CLI.
pub fn parse(tool: &Tool, wrapper_args: Vec<OsString>) -> Result<WrapperArgs> {
    let argv = std::iter::once(OsString::from(tool.wrapper)).chain(wrapper_args);
    let matches = command(tool).get_matches_from(argv);
    Ok(WrapperArgs::from_arg_matches(&matches)?)
}

/// Split `argv` into (wrapper arguments, tool arguments), keeping the order of each.
///
/// Wrapper flags may appear anywhere before a literal `--`; everything else, and
/// everything from `--` on, belongs to the tool.
pub fn split_args<I>(tool: &Tool, argv: I) -> (Vec<OsString>, Vec<OsString>)
where
    I: IntoIterator<Item = OsString>,
{
    let mut wrapper = Vec::new();
    let mut passthrough = Vec::new();
    let mut argv = argv.into_iter();

    while let Some(arg) = argv.next() {
        let Some(text) = arg.to_str() else {
            passthrough.push(arg);
            continue;
        };

        if text == "--" {
            passthrough.push(arg);
            passthrough.extend(argv.by_ref());
            break;
        }

        let is_switch = SWITCHES.contains(&text) || (tool.short_version && text == "-v");
        let takes_value = VALUE_FLAGS.contains(&text);
        let inline_value = VALUE_FLAGS.iter().any(|flag| {
            text.strip_prefix(flag).is_some_and(|rest| rest.starts_with('='))
        });

        if takes_value {
            wrapper.push(arg);
            // A missing value is left for clap to report
            if let Some(value) = argv.next() {
                wrapper.push(value);
            }
        } else if is_switch || inline_value {
            wrapper.push(arg);
        } else {
            passthrough.push(arg);
        }
    }

    (wrapper, passthrough)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{PYRIGHT, RUFF};

    fn os(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_wrapper_flags_anywhere_before_double_dash() {
        let (wrapper, rest) = split_args(
            &RUFF,
            os(&["check", "--config", "pyproject.toml", ".", "--print-config", "--fix"]),
        );
        assert_eq!(wrapper, os(&["--config", "pyproject.toml", "--print-config"]));
        assert_eq!(rest, os(&["check", ".", "--fix"]));
    }

    #[test]
    fn test_inline_config_value() {
        let (wrapper, rest) = split_args(&RUFF, os(&["--config=custom/pyproject.toml", "check"]));
        assert_eq!(wrapper, os(&["--config=custom/pyproject.toml"]));
        assert_eq!(rest, os(&["check"]));
    }

    #[test]
    fn test_double_dash_ends_wrapper_flags() {
        let (wrapper, rest) = split_args(&RUFF, os(&["check", "--", "--help", "-v"]));
        assert!(wrapper.is_empty());
        assert_eq!(rest, os(&["check", "--", "--help", "-v"]));
    }

    #[test]
    fn test_short_version_only_for_ruff() {
        let (wrapper, _) = split_args(&RUFF, os(&["-v"]));
        assert_eq!(wrapper, os(&["-v"]));

        let (wrapper, rest) = split_args(&PYRIGHT, os(&["-v", "venvs"]));
        assert!(wrapper.is_empty());
        assert_eq!(rest, os(&["-v", "venvs"]));
    }

    #[test]
    fn test_lookalike_flags_pass_through() {
        let (wrapper, rest) =
            split_args(&PYRIGHT, os(&["--configs", "--help-me", "--project", "x"]));
        assert!(wrapper.is_empty());
        assert_eq!(rest, os(&["--configs", "--help-me", "--project", "x"]));
    }

    #[test]
    fn test_parse_wrapper_flags() {
        let args =
            parse(&RUFF, os(&["--config", "a/pyproject.toml", "--score-config"])).expect("parse");
        assert_eq!(args.config, Some(PathBuf::from("a/pyproject.toml")));
        assert!(args.score_config);
        assert!(!args.print_config);
        assert!(!args.help);
    }

    #[test]
    fn test_help_mentions_wrapper_and_tool() {
        let help = command(&PYRIGHT).render_help().to_string();
        assert!(help.contains("score-pyright"));
        assert!(help.contains("--print-config"));
        assert!(help.contains("passed to basedpyright"));
        assert!(!help.contains("SCORE_TOOL_BIN"));
    }

    #[test]
    fn test_command_is_well_formed() {
        command(&PYRIGHT).debug_assert();
        command(&RUFF).debug_assert();
    }
}
