use super::{
    core::build_bootstrapper,
    types::{BuildArgs, BuildRequest, BuildStatus, BuildSummary, StubImage},
    utils::{embedded_stub, resolve_stub},
};
use crate::codec::ResourceSink;
use anyhow::{Context, Result};
use cb_core::ResourceSlot;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;

/// Builds with the OS resource writer.
#[cfg(windows)]
pub fn run_cli(args: BuildArgs) -> Result<BuildSummary> {
    let mut sink = crate::codec::ImageResourceWriter::default();
    run_cli_with(args, &mut sink)
}

#[cfg(not(windows))]
pub fn run_cli(_args: BuildArgs) -> Result<BuildSummary> {
    anyhow::bail!("Resource injection uses the Windows update-resource API; run the builder on Windows.")
}

pub fn run_cli_with<W: ResourceSink + ?Sized>(args: BuildArgs, sink: &mut W) -> Result<BuildSummary> {
    println!("Building bootstrapper...");

    // 1. Setup Paths
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let request = BuildRequest::from_args(&args, &current_dir)?;
    let stub = resolve_stub(args.stub.as_deref(), embedded_stub())?;
    match &stub {
        StubImage::File(path) => log::debug!("stub: {:?}", path),
        StubImage::Embedded(bytes) => log::debug!("stub: embedded, {} bytes", bytes.len()),
    }
    log::debug!("request: {:?}", request);

    // 2. SETUP PROGRESS BAR
    let pb = ProgressBar::new(ResourceSlot::ALL.len() as u64 + 1);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("#>-"),
    );

    // 3. Execution
    let result = build_bootstrapper(&request, &stub, sink, |status| match status {
        BuildStatus::CopyingStub(path) => pb.set_message(format!("Copying stub to {:?}", path)),
        BuildStatus::Writing(slot) => {
            pb.inc(1);
            pb.set_message(format!("Writing {}", slot));
        }
        BuildStatus::Finished(_) => pb.inc(1),
    });

    let summary = match result {
        Ok(summary) => {
            pb.finish_and_clear();
            summary
        }
        Err(e) => {
            pb.abandon();
            return Err(e.into());
        }
    };

    print_summary(&summary);
    Ok(summary)
}

fn print_summary(summary: &BuildSummary) {
    println!();
    println!("✅ Success:");
    println!(
        "   Bootstrapper : {:?}",
        summary.output.file_name().unwrap_or_default()
    );
    println!("   Prerequisite : {}", summary.prerequisite_name);
    println!("   Primary      : {}", summary.primary_name);
    println!("   RegKey value : {}", summary.marker);
    println!(
        "   Post-verify  : {}",
        if summary.verify { "yes" } else { "no" }
    );
    println!();
    println!("Prerequisite will be installed if the registry key value (above) is not found at the installation time.");
}
