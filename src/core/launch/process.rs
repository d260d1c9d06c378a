// ─── Process Launcher ───
// Runs a fully built server command line through the host shell.

use std::path::Path;
use std::process::Command;

#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;

use tracing::{info, warn};

use crate::core::error::{ManagerError, ManagerResult};

/// Executes a server command line. The core never inspects the outcome
/// beyond whether the process could be started.
pub trait ProcessLauncher {
    fn launch(&self, command_line: &str, working_dir: &Path) -> ManagerResult<()>;
}

/// Hands the command line to `sh -c` (`cmd /C` on Windows) and blocks
/// until the server exits, sharing this terminal's stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellLauncher;

impl ProcessLauncher for ShellLauncher {
    fn launch(&self, command_line: &str, working_dir: &Path) -> ManagerResult<()> {
        let mut cmd = shell_command(command_line);
        cmd.current_dir(working_dir);

        info!("Starting the server in {:?}", working_dir);
        let status = cmd.status().map_err(|e| ManagerError::CommandFailed {
            program: shell_program().to_string(),
            detail: e.to_string(),
        })?;

        match status.code() {
            Some(0) => info!("Server exited normally"),
            Some(code) => warn!("Server exited with code {}", code),
            None => warn!("Server terminated by signal"),
        }
        Ok(())
    }
}

fn shell_program() -> &'static str {
    if cfg!(target_os = "windows") {
        "cmd"
    } else {
        "sh"
    }
}

// cmd.exe does not understand the `\"` escaping `Command::arg` applies, so the
// line (which starts with a quoted Java path) is passed through untouched.
#[cfg(target_os = "windows")]
fn shell_command(command_line: &str) -> Command {
    let mut cmd = Command::new(shell_program());
    cmd.arg("/C").raw_arg(command_line);
    cmd
}

#[cfg(not(target_os = "windows"))]
fn shell_command(command_line: &str) -> Command {
    let mut cmd = Command::new(shell_program());
    cmd.arg("-c").arg(command_line);
    cmd
}
