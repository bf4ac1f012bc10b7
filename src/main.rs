use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use log::debug;
use openbsd_pkg::commands::{self, Config, ConfigOverrides, ModuleReport};
use openbsd_pkg::package::{DesiredState, NameResolution};

/// openbsd-pkg - converge an OpenBSD package to a desired state
///
/// Uses pkg_info, pkg_add and pkg_delete. Prints a single JSON result object
/// on stdout and exits non-zero on failure.
///
/// Examples:
///   openbsd-pkg --name nmap --state latest
///   openbsd-pkg --name nmap-6.25 --state present --check
///   openbsd-pkg /path/to/args.json
#[derive(Parser, Debug)]
#[command(author, version = env!("OPENBSD_PKG_VERSION"), about)]
struct Cli {
    /// JSON file with module arguments (name, state, check_mode, ...)
    #[arg(value_name = "ARGS_FILE")]
    pub args_file: Option<PathBuf>,

    /// Package name; a "-<digit>" suffix selects an exact version
    #[arg(long, short = 'n', value_name = "NAME")]
    pub name: Option<String>,

    /// Desired package state: present (installed), latest or absent (removed)
    #[arg(long, short = 's', value_name = "STATE")]
    pub state: Option<DesiredState>,

    /// Report what would change without changing anything
    #[arg(long, alias = "dry-run")]
    pub check: bool,

    /// Log every package tool invocation with its output (also via OPENBSD_PKG_DEBUG)
    #[arg(long)]
    pub debug: bool,

    /// How to pick the installed package when several match the name
    #[arg(long, value_enum, value_name = "RULE")]
    pub name_resolution: Option<NameResolution>,
}

impl Cli {
    fn overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            args_file: self.args_file,
            name: self.name,
            state: self.state,
            check_mode: self.check,
            debug: self.debug,
            name_resolution: self.name_resolution,
        }
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let report = ModuleReport::invalid(e.to_string().trim());
                println!("{}", report.to_json()?);
                return Ok(ExitCode::FAILURE);
            }
        },
    };
    let runtime = openbsd_pkg::runtime::RealRuntime;

    // The debug switch may come from the args file, so load before logging starts
    let report = match Config::load(&runtime, cli.overrides()) {
        Ok(config) => {
            init_logging(config.debug);
            debug!("Loaded configuration: {:?}", config);
            commands::run(&runtime, &config)
        }
        Err(e) => {
            init_logging(false);
            ModuleReport::invalid(format!("{:#}", e))
        }
    };

    debug!("Report: {:?}", report);
    println!("{}", report.to_json()?);

    Ok(if report.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
