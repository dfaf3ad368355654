use cb_core::ChainError;
use cb_factory::builder;
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::{
    ffi::OsString,
    io::{self, Write},
    path::PathBuf,
    process,
};

const LONG_ABOUT: &str = "\
Builds a simple native bootstrapper for two deployment packages: a primary
setup and its prerequisite.

The prerequisite runs only when the registry marker given with /reg is absent.
Markers follow <ROOT>:<SubKey>:<ValueName>, ROOT being HKCU, HKLM, HKCR or HKU.
An empty ValueName means the key itself is the marker.

Examples:
  HKLM:SOFTWARE\\Microsoft\\.NETFramework\\v2.0.50727:   .NET v2.0
  HKLM:SOFTWARE\\Microsoft\\.NETFramework:              any version of .NET
  HKLM:SOFTWARE\\MyCompany\\MyProduct:InstallDir        InstallDir value";

#[derive(Parser, Debug)]
#[command(name = "cb-builder")]
#[command(version)]
#[command(about = "Chain Boot bootstrapper builder", long_about = LONG_ABOUT)]
#[command(override_usage = "cb-builder /out:<outFile> /first:<firstPath> /second:<secondPath> /reg:<ROOT>:<SubKeyPath>:<ValueName> [/verify:no]")]
struct Cli {
    /// Name of the bootstrapper file to produce
    #[arg(long, value_name = "outFile")]
    out: Option<PathBuf>,

    /// Setup to run first (the prerequisite)
    #[arg(long, value_name = "firstPath")]
    first: Option<PathBuf>,

    /// Setup to run second, after the prerequisite
    #[arg(long, value_name = "secondPath")]
    second: Option<PathBuf>,

    /// Registry marker whose presence means the prerequisite is already installed
    #[arg(long, value_name = "ROOT:SubKeyPath:ValueName")]
    reg: Option<String>,

    /// Check the marker again after running the prerequisite
    #[arg(long, value_parser = ["yes", "no"], default_value = "yes")]
    verify: String,

    /// Launcher stub to customise (default: cb-stub next to this builder)
    #[arg(long, env = "CHAINBOOT_STUB", value_name = "stubPath")]
    stub: Option<PathBuf>,
}

const SLASH_FLAGS: [&str; 6] = ["out", "first", "second", "reg", "verify", "stub"];

/// `/name:value` -> `--name=value`, `/help` and `/?` -> `--help`.
/// Anything else is passed through untouched.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let program = args.next();

    program
        .into_iter()
        .chain(args.map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "/help" || text == "/?" {
                return OsString::from("--help");
            }

            text.strip_prefix('/')
                .and_then(|rest| rest.split_once(':'))
                .filter(|(name, _)| SLASH_FLAGS.contains(name))
                .map(|(name, value)| OsString::from(format!("--{}={}", name, value)))
                .unwrap_or(arg)
        }))
        .collect()
}

/// Build errors go to stdout, like the rest of the builder's report.
/// Returns the exit code for the error.
fn report_build_error<W: Write>(out: &mut W, error: &anyhow::Error) -> i32 {
    let _ = writeln!(out, "❌ Build Error: {}", error);
    error
        .downcast_ref::<ChainError>()
        .map(ChainError::exit_code)
        .unwrap_or(1)
}

fn main() {
    env_logger::init();

    let args = normalize_args(std::env::args_os());
    if args.len() <= 1 {
        let _ = Cli::command().print_long_help();
        return;
    }

    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            process::exit(code);
        }
    };

    let args = builder::BuildArgs {
        output: cli.out,
        first: cli.first,
        second: cli.second,
        registry_spec: cli.reg,
        verify: cli.verify != "no",
        stub: cli.stub,
    };

    if let Err(e) = builder::run_cli(args) {
        let code = report_build_error(&mut io::stdout().lock(), &e);
        process::exit(code);
    }
}
