use cb_core::ChainError;
use std::path::Path;

/// How a launched process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Exited(i32),
    /// The OS gave back no process handle (e.g. the request was handed to an
    /// already running instance), so there was nothing to wait on.
    NoProcess,
}

/// Launch-and-wait. Implementations block without a timeout until the child exits.
pub trait ProcessRunner {
    fn run_and_wait(&self, executable: &Path, arguments: &str) -> Result<RunStatus, ChainError>;
}
