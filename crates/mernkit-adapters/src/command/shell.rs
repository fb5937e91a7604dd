//! Shell command runner using std::process.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use mernkit_core::application::{ApplicationError, ApplicationResult, ports::CommandRunner};
use tracing::{debug, instrument};

/// Production command runner.
///
/// Runs each command through the platform shell (`sh -c` or `cmd /C`) and
/// blocks until it exits. Standard I/O is inherited unless `quiet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellCommandRunner {
    quiet: bool,
}

impl ShellCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the child's stdout and stderr.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    fn shell(command: &str) -> Command {
        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        }
        #[cfg(not(windows))]
        {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        }
    }
}

impl CommandRunner for ShellCommandRunner {
    #[instrument(skip(self), fields(cwd = %working_dir.display()))]
    fn run(&self, working_dir: &Path, command: &str) -> ApplicationResult<()> {
        let failure = |reason: String| ApplicationError::ExternalCommand {
            command: command.to_string(),
            working_dir: working_dir.to_path_buf(),
            reason,
        };

        let mut cmd = Self::shell(command);
        cmd.current_dir(working_dir).stdin(Stdio::inherit());
        if self.quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }

        let status = cmd
            .status()
            .map_err(|e| failure(format!("failed to start: {e}")))?;
        debug!(%status, "Command exited");

        if status.success() {
            Ok(())
        } else {
            Err(failure(describe_status(status)))
        }
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by signal".to_string(),
    }
}
