//! Module entry point: run a reconciliation and report it to the host.

use log::debug;

use crate::application::{Outcome, Reconciler};
use crate::runtime::Runtime;

pub mod config;
mod report;

pub use config::{Config, ConfigOverrides};
pub use report::ModuleReport;

/// Reconcile the configured package and build the host report.
///
/// A dry run that detects a change ends here with `changed` and no further
/// checks. Otherwise a non-zero return code becomes a failure whose message
/// is the tool's stderr, or its stdout when stderr is empty.
#[tracing::instrument(skip(runtime, config))]
pub fn run<R: Runtime>(runtime: &R, config: &Config) -> ModuleReport {
    debug!(
        "Reconciling {} to {} check_mode={}",
        config.name, config.state, config.check_mode
    );

    let reconciler = Reconciler::new(runtime, config.reconciler_options());
    let name = config.name.as_str();

    let outcome = match reconciler.reconcile(&config.name, config.state) {
        Ok(outcome) => outcome,
        Err(e) => return ModuleReport::failure(name, config.state, e.to_string()),
    };

    match outcome {
        Outcome::WouldChange(_) => ModuleReport::success(name, config.state, true),
        Outcome::Finished(result) => match result.into_checked() {
            Ok(result) => ModuleReport::success(name, config.state, result.changed),
            Err(e) => ModuleReport::failure(name, config.state, e.to_string()),
        },
    }
}
