use super::types::{ProcessRunner, RunStatus};
use cb_core::ChainError;
use std::{io, mem, path::Path};
use windows::{
    core::{HSTRING, PCWSTR},
    Win32::{
        Foundation::CloseHandle,
        System::{
            Environment::GetCommandLineW,
            Threading::{GetExitCodeProcess, WaitForSingleObject, INFINITE},
        },
        UI::{
            Shell::{ShellExecuteExW, SEE_MASK_NOCLOSEPROCESS, SHELLEXECUTEINFOW},
            WindowsAndMessaging::SW_SHOWNORMAL,
        },
    },
};

/// Launches through the shell so `.msi` and other associated files open with
/// their registered handler, then waits on the process handle with no timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ProcessRunner for ShellRunner {
    fn run_and_wait(&self, executable: &Path, arguments: &str) -> Result<RunStatus, ChainError> {
        let file = HSTRING::from(executable.as_os_str());
        let params = HSTRING::from(arguments);

        let mut info = SHELLEXECUTEINFOW {
            cbSize: mem::size_of::<SHELLEXECUTEINFOW>() as u32,
            fMask: SEE_MASK_NOCLOSEPROCESS,
            lpFile: PCWSTR(file.as_ptr()),
            lpParameters: if arguments.is_empty() {
                PCWSTR::null()
            } else {
                PCWSTR(params.as_ptr())
            },
            nShow: SW_SHOWNORMAL.0,
            ..Default::default()
        };

        unsafe { ShellExecuteExW(&mut info) }.map_err(|e| ChainError::LaunchFailed {
            path: executable.to_path_buf(),
            reason: e.to_string(),
        })?;

        if info.hProcess.is_invalid() {
            return Ok(RunStatus::NoProcess);
        }

        let mut code = 0u32;
        unsafe {
            WaitForSingleObject(info.hProcess, INFINITE);
            let queried = GetExitCodeProcess(info.hProcess, &mut code);
            let _ = CloseHandle(info.hProcess);
            queried.map_err(|e| ChainError::Io(io::Error::other(e.to_string())))?;
        }

        Ok(RunStatus::Exited(code as i32))
    }
}

pub fn raw_command_line() -> Option<String> {
    unsafe { GetCommandLineW().to_string() }.ok()
}
