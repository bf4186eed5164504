//! score-pyright: basedpyright with score defaults

use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    score_wrappers::cli::run(&score_wrappers::tool::PYRIGHT)
}
