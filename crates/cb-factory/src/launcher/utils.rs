use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub const PREREQ_FALLBACK_NAME: &str = "prerequisite.bin";
pub const PRIMARY_FALLBACK_NAME: &str = "primary.bin";

/// Each payload gets its own subdirectory so equal file names cannot collide.
pub const PREREQ_DIR: &str = "prereq";
pub const PRIMARY_DIR: &str = "primary";

/// Final path component of a stored display name, so a name can never point
/// outside the extraction directory.
pub fn payload_file_name(stored: &str, fallback: &str) -> String {
    let last = stored
        .rsplit(['\\', '/'])
        .next()
        .unwrap_or_default()
        .trim();

    match last {
        "" | "." | ".." => fallback.to_string(),
        name => name.to_string(),
    }
}

/// Writes `data` to `dir/name`, creating `dir` when absent and replacing an
/// existing file from an earlier run.
pub fn write_payload(dir: &Path, name: &str, data: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, data)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_plain_names() {
        assert_eq!(payload_file_name("dotnet.exe", "x"), "dotnet.exe");
        assert_eq!(payload_file_name("My App.msi", "x"), "My App.msi");
    }

    #[test]
    fn strips_directories() {
        assert_eq!(payload_file_name(r"..\..\Windows\evil.exe", "x"), "evil.exe");
        assert_eq!(payload_file_name("a/b/setup.msi", "x"), "setup.msi");
    }

    #[test]
    fn falls_back_on_unusable_names() {
        for stored in ["", "  ", "..", r"dir\", "."] {
            assert_eq!(
                payload_file_name(stored, PRIMARY_FALLBACK_NAME),
                PRIMARY_FALLBACK_NAME,
                "{:?}",
                stored
            );
        }
    }

    #[test]
    fn creates_directory_and_overwrites() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("ChainBoot");

        let first = write_payload(&dir, "a.exe", b"old contents").unwrap();
        let second = write_payload(&dir, "a.exe", b"new").unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read(second).unwrap(), b"new");
    }
}
