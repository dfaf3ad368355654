use super::types::StubImage;
use anyhow::{Context, Result};
use std::{
    env,
    path::{Path, PathBuf},
};

#[cfg(windows)]
pub const STUB_FILE_NAME: &str = "cb-stub.exe";
#[cfg(not(windows))]
pub const STUB_FILE_NAME: &str = "cb-stub";

/// Stub packed into the builder image at build time, if any.
#[cfg(windows)]
pub fn embedded_stub() -> Option<Vec<u8>> {
    crate::codec::ModuleResources::default()
        .read_id(cb_core::STUB_RESOURCE_ID)
        .filter(|bytes| !bytes.is_empty())
}

#[cfg(not(windows))]
pub fn embedded_stub() -> Option<Vec<u8>> {
    None
}

/// Explicit stub path if given, else the embedded stub, else the stub next to
/// the running builder.
pub fn resolve_stub(explicit: Option<&Path>, embedded: Option<Vec<u8>>) -> Result<StubImage> {
    if let Some(path) = explicit {
        return Ok(StubImage::File(path.to_path_buf()));
    }
    if let Some(bytes) = embedded {
        return Ok(StubImage::Embedded(bytes));
    }

    let current_exe = env::current_exe().context("Failed to get exe path")?;
    let exe_dir = current_exe
        .parent()
        .context("Failed to get exe directory")?;
    Ok(StubImage::File(exe_dir.join(STUB_FILE_NAME)))
}

pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// File name component as shown to users and stored in the name slots.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_stub_wins() {
        let stub = resolve_stub(Some(Path::new("custom/stub.exe")), Some(b"MZ".to_vec())).unwrap();
        assert_eq!(stub, StubImage::File(PathBuf::from("custom/stub.exe")));
    }

    #[test]
    fn embedded_stub_beats_the_sibling_file() {
        let stub = resolve_stub(None, Some(b"MZ".to_vec())).unwrap();
        assert_eq!(stub, StubImage::Embedded(b"MZ".to_vec()));
    }

    #[test]
    fn default_stub_sits_next_to_the_builder() {
        let StubImage::File(stub) = resolve_stub(None, None).unwrap() else {
            panic!("expected a file stub");
        };
        assert_eq!(stub.file_name().unwrap(), STUB_FILE_NAME);
        assert_eq!(
            stub.parent(),
            env::current_exe().unwrap().parent()
        );
    }

    #[test]
    fn unpacked_builds_carry_no_embedded_stub() {
        assert!(embedded_stub().is_none());
    }

    #[test]
    fn relative_paths_join_the_base() {
        let base = env::temp_dir();
        assert_eq!(absolutize(Path::new("a.msi"), &base), base.join("a.msi"));
        assert_eq!(absolutize(&base, Path::new("ignored")), base);
    }

    #[test]
    fn display_name_is_the_last_component() {
        assert_eq!(display_name(&env::temp_dir().join("setup.msi")), "setup.msi");
    }
}
