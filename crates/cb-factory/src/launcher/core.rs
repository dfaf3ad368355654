use super::{
    types::{LaunchPlan, LaunchReport, LaunchState},
    utils::{
        payload_file_name, write_payload, PREREQ_DIR, PREREQ_FALLBACK_NAME, PRIMARY_DIR,
        PRIMARY_FALLBACK_NAME,
    },
};
use crate::{
    codec::{read_text, ResourceSource},
    probe::{marker_exists, RegistryView},
    runner::ProcessRunner,
};
use cb_core::{
    ChainError, RegistryMarker, ResourceSlot, TEMP_NAMESPACE, UNCONFIGURED_CONDITION, VERIFY_NO,
};
use std::path::{Path, PathBuf};

/// The runtime side of the bootstrapper: extract, maybe run the prerequisite,
/// optionally verify its marker, run the primary package.
pub struct Launcher<'a, S: ?Sized, G: ?Sized, P: ?Sized> {
    resources: &'a S,
    registry: &'a G,
    runner: &'a P,
    work_dir: PathBuf,
}

impl<'a, S, G, P> Launcher<'a, S, G, P>
where
    S: ResourceSource + ?Sized,
    G: RegistryView + ?Sized,
    P: ProcessRunner + ?Sized,
{
    /// Payloads are written under `<temp_root>/ChainBoot/`, one subdirectory each.
    pub fn new(resources: &'a S, registry: &'a G, runner: &'a P, temp_root: &Path) -> Self {
        Self {
            resources,
            registry,
            runner,
            work_dir: temp_root.join(TEMP_NAMESPACE),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Reads all six slots and writes both payloads to the work directory.
    pub fn extract(&self, arguments: &str) -> Result<LaunchPlan, ChainError> {
        let condition = match read_text(self.resources, ResourceSlot::Condition) {
            Ok(condition) if condition != UNCONFIGURED_CONDITION => condition,
            Ok(_) | Err(ChainError::ResourceNotFound(_)) => {
                return Err(ChainError::UnconfiguredResources)
            }
            Err(e) => return Err(e),
        };
        let marker: RegistryMarker = condition.parse()?;
        let verify = read_text(self.resources, ResourceSlot::Verify)? != VERIFY_NO;

        let first_executable = self.extract_payload(
            ResourceSlot::PrereqData,
            ResourceSlot::PrereqName,
            PREREQ_DIR,
            PREREQ_FALLBACK_NAME,
        )?;
        let second_executable = self.extract_payload(
            ResourceSlot::PrimaryData,
            ResourceSlot::PrimaryName,
            PRIMARY_DIR,
            PRIMARY_FALLBACK_NAME,
        )?;

        Ok(LaunchPlan {
            first_executable,
            second_executable,
            marker,
            verify,
            arguments: arguments.to_string(),
        })
    }

    fn extract_payload(
        &self,
        data_slot: ResourceSlot,
        name_slot: ResourceSlot,
        sub_dir: &str,
        fallback: &str,
    ) -> Result<PathBuf, ChainError> {
        let data = self.resources.read(data_slot)?;
        let name = payload_file_name(&read_text(self.resources, name_slot)?, fallback);
        let path = write_payload(&self.work_dir.join(sub_dir), &name, &data)?;

        log::debug!("extracted {} ({} bytes) to {:?}", data_slot, data.len(), path);
        Ok(path)
    }

    /// Runs the whole sequence. `on_state` sees every state entered, ending in
    /// either `Done` or `Aborted`.
    pub fn run<F>(&self, arguments: &str, mut on_state: F) -> Result<LaunchReport, ChainError>
    where
        F: FnMut(LaunchState),
    {
        let result = self.advance(arguments, &mut on_state);
        if let Err(e) = &result {
            log::debug!("aborted: {}", e);
            on_state(LaunchState::Aborted);
        }
        result
    }

    fn advance<F>(&self, arguments: &str, on_state: &mut F) -> Result<LaunchReport, ChainError>
    where
        F: FnMut(LaunchState),
    {
        on_state(LaunchState::Start);

        let plan = self.extract(arguments)?;
        on_state(LaunchState::ResourceExtracted);

        let prerequisite_launched = !marker_exists(self.registry, &plan.marker);
        if prerequisite_launched {
            log::info!("marker {} absent, running {:?}", plan.marker, plan.first_executable);
            // A prerequisite that fails to start is caught by the verify step, if enabled.
            match self
                .runner
                .run_and_wait(&plan.first_executable, &plan.arguments)
            {
                Ok(status) => log::debug!("prerequisite finished: {:?}", status),
                Err(e) => log::warn!("prerequisite did not run: {}", e),
            }
        } else {
            log::info!("marker {} present, prerequisite skipped", plan.marker);
        }
        on_state(LaunchState::FirstMaybeLaunched);

        if plan.verify && !marker_exists(self.registry, &plan.marker) {
            return Err(ChainError::PrerequisiteVerificationFailed(
                plan.marker.to_string(),
            ));
        }
        on_state(LaunchState::Verified);

        let primary_status = self
            .runner
            .run_and_wait(&plan.second_executable, &plan.arguments)?;
        log::debug!("primary finished: {:?}", primary_status);
        on_state(LaunchState::SecondLaunched);
        on_state(LaunchState::Done);

        Ok(LaunchReport {
            plan,
            prerequisite_launched,
            primary_status,
        })
    }
}
