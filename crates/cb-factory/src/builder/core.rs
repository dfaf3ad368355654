use super::{
    types::{BuildArgs, BuildRequest, BuildStatus, BuildSummary, StubImage},
    utils::{absolutize, display_name},
};
use crate::codec::{write_text, ResourceSink};
use cb_core::{ChainError, ResourceSlot, VERIFY_NO, VERIFY_YES};
use std::{
    fs,
    path::{Path, PathBuf},
};

impl BuildRequest {
    /// Checks the flags in the order the builder reports them: first, second, out, reg.
    /// Relative paths are resolved against `base`.
    pub fn from_args(args: &BuildArgs, base: &Path) -> Result<Self, ChainError> {
        let first = required_input(args.first.as_deref(), "first", base)?;
        let second = required_input(args.second.as_deref(), "second", base)?;

        let output = match args.output.as_deref() {
            Some(path) if !path.as_os_str().is_empty() => absolutize(path, base),
            _ => {
                return Err(ChainError::InvalidArguments(
                    "You have to specify '/out:' argument (output file).".into(),
                ))
            }
        };

        let spec = match args.registry_spec.as_deref() {
            Some(spec) if !spec.is_empty() => spec,
            _ => {
                return Err(ChainError::InvalidArguments(
                    "You have to specify '/reg:' argument (registry value for the prerequisite file)."
                        .into(),
                ))
            }
        };

        Ok(Self {
            output,
            first,
            second,
            marker: spec.parse()?,
            verify: args.verify,
        })
    }
}

fn required_input(path: Option<&Path>, flag: &str, base: &Path) -> Result<PathBuf, ChainError> {
    match path {
        Some(path) if !path.as_os_str().is_empty() => {
            let path = absolutize(path, base);
            if path.is_file() {
                Ok(path)
            } else {
                Err(ChainError::MissingInputFile(path))
            }
        }
        _ => Err(ChainError::InvalidArguments(format!(
            "The '{}' argument was not specified or is incorrect.",
            flag
        ))),
    }
}

impl StubImage {
    pub fn load(&self) -> Result<Vec<u8>, ChainError> {
        match self {
            StubImage::File(path) if path.is_file() => read_input(path),
            StubImage::File(path) => Err(ChainError::MissingInputFile(path.clone())),
            StubImage::Embedded(bytes) => Ok(bytes.clone()),
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>, ChainError> {
    fs::read(path).map_err(|e| {
        log::debug!("cannot read {:?}: {}", path, e);
        ChainError::MissingInputFile(path.to_path_buf())
    })
}

/// Writes the stub to the output path and the six slots into that copy.
///
/// Nothing is rolled back on failure: a partially written output stays on disk
/// and a fresh build overwrites it from scratch.
pub fn build_bootstrapper<W, F>(
    request: &BuildRequest,
    stub: &StubImage,
    sink: &mut W,
    mut callback: F,
) -> Result<BuildSummary, ChainError>
where
    W: ResourceSink + ?Sized,
    F: FnMut(BuildStatus),
{
    // 1. Load Data
    let prereq_data = read_input(&request.first)?;
    let primary_data = read_input(&request.second)?;
    let prerequisite_name = display_name(&request.first);
    let primary_name = display_name(&request.second);

    let template_bytes = stub.load()?;

    // 2. Fresh copy of the stub (truncates an existing output)
    callback(BuildStatus::CopyingStub(request.output.clone()));
    fs::write(&request.output, &template_bytes)?;

    // 3. One transaction per slot
    let output = request.output.as_path();
    let marker = request.marker.to_string();
    let verify = if request.verify { VERIFY_YES } else { VERIFY_NO };

    for slot in ResourceSlot::ALL {
        callback(BuildStatus::Writing(slot));
        match slot {
            ResourceSlot::PrereqData => sink.write(output, slot, &prereq_data)?,
            ResourceSlot::PrimaryData => sink.write(output, slot, &primary_data)?,
            ResourceSlot::PrereqName => write_text(sink, output, slot, &prerequisite_name)?,
            ResourceSlot::PrimaryName => write_text(sink, output, slot, &primary_name)?,
            ResourceSlot::Condition => write_text(sink, output, slot, &marker)?,
            ResourceSlot::Verify => write_text(sink, output, slot, verify)?,
        }
    }

    callback(BuildStatus::Finished(request.output.clone()));

    Ok(BuildSummary {
        output: request.output.clone(),
        prerequisite_name,
        primary_name,
        marker: request.marker.clone(),
        verify: request.verify,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{read_text, MemoryImages, ResourceSource};
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        stub: StubImage,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::write(dir.path().join("prereq.exe"), b"MZ prereq\0\0payload").unwrap();
            fs::write(dir.path().join("main.msi"), b"\xD0\xCF\x11\xE0 msi").unwrap();
            let stub = dir.path().join("cb-stub.exe");
            fs::write(&stub, b"MZ stub").unwrap();
            Self {
                dir,
                stub: StubImage::File(stub),
            }
        }

        fn args(&self) -> BuildArgs {
            BuildArgs {
                output: Some(PathBuf::from("boot.exe")),
                first: Some(PathBuf::from("prereq.exe")),
                second: Some(PathBuf::from("main.msi")),
                registry_spec: Some(r"HKCU:Software\Acme\App:Installed".into()),
                verify: true,
                stub: None,
            }
        }

        fn request(&self, args: &BuildArgs) -> Result<BuildRequest, ChainError> {
            BuildRequest::from_args(args, self.dir.path())
        }
    }

    #[test]
    fn writes_all_six_slots_into_a_stub_copy() {
        let fx = Fixture::new();
        let request = fx.request(&fx.args()).unwrap();
        let mut images = MemoryImages::new();
        let mut statuses = Vec::new();

        let summary =
            build_bootstrapper(&request, &fx.stub, &mut images, |s| statuses.push(s)).unwrap();

        assert_eq!(fs::read(&request.output).unwrap(), b"MZ stub");
        let table = images.image(&request.output).unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(
            table.read(ResourceSlot::PrereqData).unwrap(),
            b"MZ prereq\0\0payload"
        );
        assert_eq!(
            read_text(table, ResourceSlot::PrimaryName).unwrap(),
            "main.msi"
        );
        assert_eq!(
            read_text(table, ResourceSlot::Condition).unwrap(),
            r"HKCU:Software\Acme\App:Installed"
        );
        assert_eq!(read_text(table, ResourceSlot::Verify).unwrap(), "yes");

        assert_eq!(summary.prerequisite_name, "prereq.exe");
        assert_eq!(statuses.len(), 1 + ResourceSlot::ALL.len() + 1);
        assert_eq!(
            statuses[1..7],
            ResourceSlot::ALL.map(BuildStatus::Writing)
        );
    }

    #[test]
    fn verify_off_is_stored_as_no() {
        let fx = Fixture::new();
        let mut args = fx.args();
        args.verify = false;
        let request = fx.request(&args).unwrap();
        let mut images = MemoryImages::new();

        build_bootstrapper(&request, &fx.stub, &mut images, |_| {}).unwrap();

        let table = images.image(&request.output).unwrap();
        assert_eq!(read_text(table, ResourceSlot::Verify).unwrap(), "no");
    }

    #[test]
    fn existing_output_is_truncated() {
        let fx = Fixture::new();
        let request = fx.request(&fx.args()).unwrap();
        fs::write(&request.output, vec![0xAA; 4096]).unwrap();

        build_bootstrapper(&request, &fx.stub, &mut MemoryImages::new(), |_| {}).unwrap();
        assert_eq!(fs::read(&request.output).unwrap(), b"MZ stub");
    }

    #[test]
    fn validation_order_and_kinds() {
        let fx = Fixture::new();

        let mut args = fx.args();
        args.first = None;
        args.output = None;
        assert!(matches!(
            fx.request(&args),
            Err(ChainError::InvalidArguments(msg)) if msg.contains("'first'")
        ));

        let mut args = fx.args();
        args.second = Some(PathBuf::from("missing.msi"));
        match fx.request(&args) {
            Err(ChainError::MissingInputFile(path)) => {
                assert_eq!(path, fx.dir.path().join("missing.msi"))
            }
            other => panic!("unexpected: {:?}", other),
        }

        let mut args = fx.args();
        args.output = Some(PathBuf::new());
        assert!(matches!(
            fx.request(&args),
            Err(ChainError::InvalidArguments(msg)) if msg.contains("/out:")
        ));

        let mut args = fx.args();
        args.registry_spec = Some(String::new());
        assert!(matches!(
            fx.request(&args),
            Err(ChainError::InvalidArguments(msg)) if msg.contains("/reg:")
        ));
    }

    #[test]
    fn malformed_marker_is_rejected_at_build_time() {
        let fx = Fixture::new();
        let mut args = fx.args();
        args.registry_spec = Some(r"HKLM:SOFTWARE\Foo".into());

        let err = fx.request(&args).unwrap_err();
        assert!(matches!(err, ChainError::InvalidMarkerFormat { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn missing_stub_is_reported_before_any_write() {
        let fx = Fixture::new();
        let request = fx.request(&fx.args()).unwrap();
        let mut images = MemoryImages::new();

        let stub = StubImage::File(fx.dir.path().join("no-stub.exe"));
        let err = build_bootstrapper(&request, &stub, &mut images, |_| {}).unwrap_err();

        assert!(matches!(err, ChainError::MissingInputFile(_)));
        assert!(!request.output.exists());
    }

    struct FailingSink {
        fail_on: ResourceSlot,
        inner: MemoryImages,
    }

    impl ResourceSink for FailingSink {
        fn write(&mut self, image: &Path, slot: ResourceSlot, data: &[u8]) -> Result<(), ChainError> {
            if slot == self.fail_on {
                return Err(ChainError::ResourceWriteFailure {
                    slot,
                    image: image.to_path_buf(),
                    reason: "The process cannot access the file".into(),
                });
            }
            self.inner.write(image, slot, data)
        }
    }

    #[test]
    fn write_failure_leaves_earlier_slots_in_place() {
        let fx = Fixture::new();
        let request = fx.request(&fx.args()).unwrap();
        let mut sink = FailingSink {
            fail_on: ResourceSlot::Condition,
            inner: MemoryImages::new(),
        };

        let err = build_bootstrapper(&request, &fx.stub, &mut sink, |_| {}).unwrap_err();

        assert!(matches!(
            err,
            ChainError::ResourceWriteFailure {
                slot: ResourceSlot::Condition,
                ..
            }
        ));
        let table = sink.inner.image(&request.output).unwrap();
        assert_eq!(table.len(), 4);
        assert!(!table.contains(ResourceSlot::Verify));
    }

    #[test]
    fn embedded_stub_is_written_as_the_output() {
        let fx = Fixture::new();
        let request = fx.request(&fx.args()).unwrap();
        let stub = StubImage::Embedded(b"MZ embedded".to_vec());

        build_bootstrapper(&request, &stub, &mut MemoryImages::new(), |_| {}).unwrap();
        assert_eq!(fs::read(&request.output).unwrap(), b"MZ embedded");
    }
}
