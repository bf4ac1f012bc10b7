//! Invocation configuration.
//!
//! The host hands parameters over in a JSON args file; explicit command
//! line values take precedence over the file. Debug logging can also be
//! switched on with `OPENBSD_PKG_DEBUG`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::ReconcilerOptions;
use crate::package::{DesiredState, NameResolution, PackageName};
use crate::runtime::Runtime;

pub const DEBUG_ENV: &str = "OPENBSD_PKG_DEBUG";

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub name: PackageName,
    pub state: DesiredState,
    pub check_mode: bool,
    pub debug: bool,
    pub name_resolution: NameResolution,
}

/// Values supplied on the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub args_file: Option<PathBuf>,
    pub name: Option<String>,
    pub state: Option<DesiredState>,
    pub check_mode: bool,
    pub debug: bool,
    pub name_resolution: Option<NameResolution>,
}

/// Parameters as they appear in the host's args file.
#[derive(Debug, Default, Deserialize)]
struct ModuleArgs {
    name: Option<String>,
    state: Option<DesiredState>,
    #[serde(default, alias = "_ansible_check_mode")]
    check_mode: bool,
    #[serde(default, alias = "_ansible_debug")]
    debug: bool,
    name_resolution: Option<NameResolution>,
}

impl Config {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, overrides: ConfigOverrides) -> Result<Self> {
        let args = match &overrides.args_file {
            Some(path) => {
                let content = runtime.read_to_string(path)?;
                serde_json::from_str::<ModuleArgs>(&content)
                    .with_context(|| format!("Invalid module arguments in {:?}", path))?
            }
            None => ModuleArgs::default(),
        };

        let name = overrides
            .name
            .or(args.name)
            .context("Missing required parameter: name")?
            .parse::<PackageName>()?;
        let state = overrides
            .state
            .or(args.state)
            .context("Missing required parameter: state")?;

        Ok(Self {
            name,
            state,
            check_mode: overrides.check_mode || args.check_mode,
            debug: overrides.debug || args.debug || debug_from_env(runtime),
            name_resolution: overrides
                .name_resolution
                .or(args.name_resolution)
                .unwrap_or_default(),
        })
    }

    pub fn reconciler_options(&self) -> ReconcilerOptions {
        ReconcilerOptions {
            dry_run: self.check_mode,
            debug: self.debug,
            name_resolution: self.name_resolution,
        }
    }

    #[cfg(test)]
    pub fn for_test(name: &str, state: DesiredState) -> Self {
        Self {
            name: name.parse().unwrap(),
            state,
            check_mode: false,
            debug: false,
            name_resolution: NameResolution::Last,
        }
    }
}

fn debug_from_env<R: Runtime>(runtime: &R) -> bool {
    match runtime.env_var(DEBUG_ENV) {
        Ok(value) => matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => false,
    }
}
