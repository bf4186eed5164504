//! Running the wrapped tool as a child process

use crate::error::LaunchError;
use crate::tool::Tool;
use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::process::{Command, ExitCode, ExitStatus};
use std::sync::Once;

/// Run `program` with `args`, inheriting stdio, and return its exit code as ours.
///
/// Interrupts do not kill the wrapper: the tool decides how to react, and we return
/// once it has exited so callers can clean up.
pub fn run_tool(
    tool: &Tool,
    program: &OsStr,
    args: &[OsString],
) -> Result<ExitCode, LaunchError> {
    ignore_interrupts();

    // Our own output must land before the tool's
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();

    tracing::debug!("Running {} {:?}", program.to_string_lossy(), args);

    let status = Command::new(program).args(args).status().map_err(|source| {
        let program = program.to_string_lossy().into_owned();
        if source.kind() == io::ErrorKind::NotFound {
            LaunchError::ToolMissing { program, install_hint: tool.install_hint() }
        } else {
            LaunchError::Spawn { program, source }
        }
    })?;

    Ok(ExitCode::from(exit_code_of(status)))
}

fn ignore_interrupts() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        // SIGINT, SIGTERM and SIGHUP with the `termination` feature
        if let Err(e) = ctrlc::set_handler(|| {}) {
            tracing::warn!("Failed to install interrupt handler: {}", e);
        }
    });
}

/// Map a child's status to a process exit code. Signals follow the shell's 128+N.
fn exit_code_of(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return u8::try_from(code).unwrap_or(1);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return u8::try_from(128 + signal).unwrap_or(1);
        }
    }

    1
}
