use super::{
    types::{ProcessRunner, RunStatus},
    utils::split_arguments,
};
use cb_core::ChainError;
use std::{path::Path, process::Command};

/// Plain process spawn through `std::process`. The argument string is split
/// with Windows-style quoting first.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandRunner;

impl ProcessRunner for CommandRunner {
    fn run_and_wait(&self, executable: &Path, arguments: &str) -> Result<RunStatus, ChainError> {
        let mut child = Command::new(executable)
            .args(split_arguments(arguments))
            .spawn()
            .map_err(|e| ChainError::LaunchFailed {
                path: executable.to_path_buf(),
                reason: e.to_string(),
            })?;

        log::debug!("{:?} -> PID: {}", executable, child.id());

        // Block until process exits
        let status = child.wait()?;
        Ok(status
            .code()
            .map(RunStatus::Exited)
            .unwrap_or(RunStatus::NoProcess))
    }
}

#[cfg(windows)]
pub type SystemRunner = super::win32::ShellRunner;
#[cfg(not(windows))]
pub type SystemRunner = CommandRunner;

/// Arguments this process was started with, ready to forward verbatim.
pub fn forwarded_arguments() -> String {
    #[cfg(windows)]
    {
        super::win32::raw_command_line()
            .map(|raw| super::utils::command_line_tail(&raw).to_string())
            .unwrap_or_default()
    }
    #[cfg(not(windows))]
    {
        super::utils::join_arguments(std::env::args().skip(1))
    }
}
