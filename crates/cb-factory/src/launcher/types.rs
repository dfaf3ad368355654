use crate::runner::RunStatus;
use cb_core::RegistryMarker;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Start,
    ResourceExtracted,
    FirstMaybeLaunched,
    Verified,
    SecondLaunched,
    Done,
    Aborted,
}

/// Everything one run needs, rebuilt from the resource table on every start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub first_executable: PathBuf,
    pub second_executable: PathBuf,
    pub marker: RegistryMarker,
    pub verify: bool,
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    pub plan: LaunchPlan,
    pub prerequisite_launched: bool,
    pub primary_status: RunStatus,
}
