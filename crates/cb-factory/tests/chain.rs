//! Builder output fed straight into the launcher through the in-memory codec.

use cb_core::{ChainError, RegistryMarker};
use cb_factory::{
    builder::{build_bootstrapper, BuildArgs, BuildRequest, StubImage},
    codec::{MemoryImages, ResourceTable},
    launcher::{LaunchState, Launcher},
    probe::MemoryRegistry,
    runner::{ProcessRunner, RunStatus},
};
use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

const MARKER: &str = r"HKCU:Software\Acme\App:Installed";

/// Records launches; running `prereq.exe` optionally writes the marker the
/// way a real prerequisite installer would.
struct FakeInstallers<'r> {
    registry: &'r MemoryRegistry,
    prereq_writes_marker: bool,
    launched: RefCell<Vec<(PathBuf, String)>>,
}

impl ProcessRunner for FakeInstallers<'_> {
    fn run_and_wait(&self, executable: &Path, arguments: &str) -> Result<RunStatus, ChainError> {
        let bytes = fs::read(executable)?;
        if executable.ends_with("prereq.exe") {
            assert_eq!(bytes, b"MZ prereq");
            if self.prereq_writes_marker {
                self.registry
                    .set_marker(&MARKER.parse::<RegistryMarker>().unwrap());
            }
        }
        self.launched
            .borrow_mut()
            .push((executable.to_path_buf(), arguments.to_string()));
        Ok(RunStatus::Exited(0))
    }
}

impl FakeInstallers<'_> {
    fn names(&self) -> Vec<String> {
        self.launched
            .borrow()
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }
}

fn build(dir: &TempDir, verify: bool) -> ResourceTable {
    fs::write(dir.path().join("prereq.exe"), b"MZ prereq").unwrap();
    fs::write(dir.path().join("main.exe"), b"MZ main").unwrap();
    let stub = dir.path().join("cb-stub.exe");
    fs::write(&stub, b"MZ stub").unwrap();

    let args = BuildArgs {
        output: Some(PathBuf::from("boot.exe")),
        first: Some(PathBuf::from("prereq.exe")),
        second: Some(PathBuf::from("main.exe")),
        registry_spec: Some(MARKER.to_string()),
        verify,
        stub: None,
    };
    let request = BuildRequest::from_args(&args, dir.path()).unwrap();

    let mut images = MemoryImages::new();
    build_bootstrapper(&request, &StubImage::File(stub), &mut images, |_| {}).unwrap();
    images.take_image(&request.output).unwrap()
}

#[test]
fn absent_marker_runs_prerequisite_then_primary() {
    let dir = tempfile::tempdir().unwrap();
    let table = build(&dir, true);
    let registry = MemoryRegistry::new();
    let installers = FakeInstallers {
        registry: &registry,
        prereq_writes_marker: true,
        launched: RefCell::new(Vec::new()),
    };

    let temp = tempfile::tempdir().unwrap();
    let launcher = Launcher::new(&table, &registry, &installers, temp.path());
    let report = launcher.run(r#"/l*v "C:\logs\setup.log""#, |_| {}).unwrap();

    assert!(report.prerequisite_launched);
    assert_eq!(installers.names(), vec!["prereq.exe", "main.exe"]);
    for (_, args) in installers.launched.borrow().iter() {
        assert_eq!(args, r#"/l*v "C:\logs\setup.log""#);
    }
}

#[test]
fn absent_marker_after_prerequisite_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let table = build(&dir, true);
    let registry = MemoryRegistry::new();
    let installers = FakeInstallers {
        registry: &registry,
        prereq_writes_marker: false,
        launched: RefCell::new(Vec::new()),
    };

    let temp = tempfile::tempdir().unwrap();
    let mut last = None;
    let err = Launcher::new(&table, &registry, &installers, temp.path())
        .run("", |s| last = Some(s))
        .unwrap_err();

    assert_eq!(err.exit_code(), 1);
    assert_eq!(last, Some(LaunchState::Aborted));
    assert_eq!(installers.names(), vec!["prereq.exe"]);
}

#[test]
fn existing_marker_goes_straight_to_primary() {
    let dir = tempfile::tempdir().unwrap();
    let table = build(&dir, true);
    let registry = MemoryRegistry::new();
    registry.set_marker(&MARKER.parse().unwrap());
    let installers = FakeInstallers {
        registry: &registry,
        prereq_writes_marker: false,
        launched: RefCell::new(Vec::new()),
    };

    let temp = tempfile::tempdir().unwrap();
    let report = Launcher::new(&table, &registry, &installers, temp.path())
        .run("", |_| {})
        .unwrap();

    assert!(!report.prerequisite_launched);
    assert_eq!(installers.names(), vec!["main.exe"]);
}

#[test]
fn verify_off_ignores_missing_marker() {
    let dir = tempfile::tempdir().unwrap();
    let table = build(&dir, false);
    let registry = MemoryRegistry::new();
    let installers = FakeInstallers {
        registry: &registry,
        prereq_writes_marker: false,
        launched: RefCell::new(Vec::new()),
    };

    let temp = tempfile::tempdir().unwrap();
    let report = Launcher::new(&table, &registry, &installers, temp.path())
        .run("", |_| {})
        .unwrap();

    assert!(!report.plan.verify);
    assert_eq!(installers.names(), vec!["prereq.exe", "main.exe"]);
}
