#![windows_subsystem = "windows"]

use cb_core::ChainError;
use std::process;

#[cfg(windows)]
fn run() -> Result<(), ChainError> {
    use cb_factory::{
        codec::ModuleResources,
        launcher::Launcher,
        probe::SystemRegistry,
        runner::{forwarded_arguments, SystemRunner},
    };
    use std::env;

    let resources = ModuleResources::default();
    let runner = SystemRunner::default();
    let temp_root = env::temp_dir();
    let launcher = Launcher::new(&resources, &SystemRegistry, &runner, &temp_root);

    let report = launcher.run(&forwarded_arguments(), |state| {
        log::debug!("-> {:?}", state)
    })?;

    log::info!(
        "done (prerequisite {}, primary {:?})",
        if report.prerequisite_launched { "launched" } else { "skipped" },
        report.primary_status
    );
    Ok(())
}

#[cfg(not(windows))]
fn run() -> Result<(), ChainError> {
    Err(ChainError::InvalidArguments(
        "The bootstrapper reads its payloads from Windows resources and only runs on Windows."
            .into(),
    ))
}

#[cfg(windows)]
fn report(error: &ChainError) {
    use windows::{
        core::{w, HSTRING},
        Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK},
    };

    unsafe {
        MessageBoxW(
            None,
            &HSTRING::from(error.to_string()),
            w!("Bootstrapper"),
            MB_OK | MB_ICONERROR,
        );
    }
}

#[cfg(not(windows))]
fn report(error: &ChainError) {
    eprintln!("❌ {}", error);
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        report(&e);
        process::exit(e.exit_code());
    }
}
