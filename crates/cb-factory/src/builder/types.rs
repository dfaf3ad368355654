use cb_core::{RegistryMarker, ResourceSlot};
use std::path::PathBuf;

/// Raw builder flags, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    pub output: Option<PathBuf>,
    pub first: Option<PathBuf>,
    pub second: Option<PathBuf>,
    pub registry_spec: Option<String>,
    pub verify: bool,
    /// Launcher stub to customise; defaults to the embedded one, then the one
    /// shipped next to the builder.
    pub stub: Option<PathBuf>,
}

/// Validated flags with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub output: PathBuf,
    pub first: PathBuf,
    pub second: PathBuf,
    pub marker: RegistryMarker,
    pub verify: bool,
}

/// Where the launcher stub comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubImage {
    File(PathBuf),
    Embedded(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    CopyingStub(PathBuf),
    Writing(ResourceSlot), // one per slot, in write order
    Finished(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub output: PathBuf,
    pub prerequisite_name: String,
    pub primary_name: String,
    pub marker: RegistryMarker,
    pub verify: bool,
}
