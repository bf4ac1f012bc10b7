//! Package reconciliation - converge one package to a desired state.
//!
//! The package tools are known to exit 0 on some failures. Install and
//! upgrade therefore trust stderr over the exit code, while remove trusts
//! the exit code. Keep that asymmetry unless revalidated against the tools.

use log::{Level, debug, log, warn};

use crate::error::ReconcileError;
use crate::package::{DesiredState, NameResolution, OutputParser, PackageName, PkgCommand, PkgToolsParser};
use crate::runtime::{CommandLine, CommandOutput, Runtime};

/// Behaviour switches for a reconciliation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcilerOptions {
    /// Use the tools' no-op flags and stop at the first detected change.
    pub dry_run: bool,
    /// Log every tool invocation with its output at info level.
    pub debug: bool,
    pub name_resolution: NameResolution,
}

/// Result of a single reconciliation step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileResult {
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
    pub changed: bool,
    /// The mutating command that produced this result, if one ran.
    pub command: Option<CommandLine>,
}

impl ReconcileResult {
    /// Nothing to do; no command was run.
    pub fn unchanged() -> Self {
        Self::default()
    }

    fn from_output(command: CommandLine, output: CommandOutput, rc: i32, changed: bool) -> Self {
        Self {
            rc,
            stdout: output.stdout,
            stderr: output.stderr,
            changed,
            command: Some(command),
        }
    }

    /// Turn a non-zero return code into a tool invocation error.
    pub fn into_checked(self) -> Result<Self, ReconcileError> {
        if self.rc == 0 {
            return Ok(self);
        }
        let command = self
            .command
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        Err(ReconcileError::tool_failure(
            command,
            self.rc,
            &self.stdout,
            &self.stderr,
        ))
    }
}

/// Terminal state of a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// All steps ran; the result still needs its return code checked.
    Finished(ReconcileResult),
    /// Dry run found a pending change and stopped right there.
    WouldChange(ReconcileResult),
}

impl Outcome {
    pub fn changed(&self) -> bool {
        match self {
            Outcome::Finished(result) => result.changed,
            Outcome::WouldChange(_) => true,
        }
    }

    pub fn result(&self) -> &ReconcileResult {
        match self {
            Outcome::Finished(result) | Outcome::WouldChange(result) => result,
        }
    }
}

/// Reconciler for a single package using `pkg_info`, `pkg_add` and `pkg_delete`.
pub struct Reconciler<'a, R: Runtime, P: OutputParser = PkgToolsParser> {
    runtime: &'a R,
    parser: P,
    options: ReconcilerOptions,
}

impl<'a, R: Runtime> Reconciler<'a, R, PkgToolsParser> {
    pub fn new(runtime: &'a R, options: ReconcilerOptions) -> Self {
        Self::with_parser(runtime, PkgToolsParser, options)
    }
}

impl<'a, R: Runtime, P: OutputParser> Reconciler<'a, R, P> {
    pub fn with_parser(runtime: &'a R, parser: P, options: ReconcilerOptions) -> Self {
        Self {
            runtime,
            parser,
            options,
        }
    }

    /// Query, then run whichever branch the desired state calls for. Single pass.
    #[tracing::instrument(skip(self))]
    pub fn reconcile(&self, name: &PackageName, state: DesiredState) -> Result<Outcome, ReconcileError> {
        let installed = self.query_installed(name)?;
        debug!("{} installed={} desired={}", name, installed, state);

        match state {
            DesiredState::Present => self.ensure_present(name, installed),
            DesiredState::Latest => self.ensure_latest(name, installed),
            DesiredState::Absent => self.ensure_absent(name, installed),
        }
    }

    /// True iff `pkg_info -e` exits 0 for the name (or its `name-*` glob).
    #[tracing::instrument(skip(self))]
    pub fn query_installed(&self, name: &PackageName) -> Result<bool, ReconcileError> {
        let output = self.execute(&PkgCommand::query(name))?;
        Ok(output.success())
    }

    /// Full installed name (e.g. `nmap-6.01`) of the package, from the `pkg_info` listing.
    #[tracing::instrument(skip(self))]
    pub fn resolve_current_full_name(&self, name: &PackageName) -> Result<Option<String>, ReconcileError> {
        let command = PkgCommand::list();
        let output = self.execute(&command)?;
        if !output.success() {
            return Err(ReconcileError::tool_failure(
                command.to_string(),
                output.code,
                &output.stdout,
                &output.stderr,
            ));
        }

        let mut candidates = self.parser.installed_names(&output.stdout, name);
        candidates.dedup();

        if candidates.len() > 1 {
            match self.options.name_resolution {
                NameResolution::Last => {
                    warn!(
                        "{} matches several installed packages ({}); using the last one",
                        name,
                        candidates.join(", ")
                    );
                }
                NameResolution::Strict => {
                    return Err(ReconcileError::AmbiguousName {
                        name: name.to_string(),
                        candidates,
                    });
                }
            }
        }

        Ok(candidates.pop())
    }

    /// Install the package when missing.
    #[tracing::instrument(skip(self))]
    pub fn ensure_present(&self, name: &PackageName, installed: bool) -> Result<Outcome, ReconcileError> {
        if installed {
            debug!("{} is already installed", name);
            return Ok(Outcome::Finished(ReconcileResult::unchanged()));
        }

        let command = PkgCommand::install(name, self.options.dry_run);
        self.warn_if_unprivileged(&command);
        let output = self.execute(&command)?;

        // pkg_add exits 0 even when the package does not exist
        if !output.stderr.is_empty() {
            return Ok(Outcome::Finished(ReconcileResult::from_output(
                command, output, 1, false,
            )));
        }

        let result = ReconcileResult::from_output(command, output, 0, true);
        if self.options.dry_run {
            return Ok(Outcome::WouldChange(result));
        }
        Ok(Outcome::Finished(result))
    }

    /// Upgrade the package when installed, otherwise install it.
    #[tracing::instrument(skip(self))]
    pub fn ensure_latest(&self, name: &PackageName, installed: bool) -> Result<Outcome, ReconcileError> {
        if !installed {
            return self.ensure_present(name, installed);
        }

        let current = self.resolve_current_full_name(name)?.ok_or_else(|| {
            ReconcileError::UnexpectedOutput {
                command: PkgCommand::list().to_string(),
                detail: format!("no installed package matching '{}'", name.listing_prefix()),
            }
        })?;
        debug!("Current installed name of {} is {}", name, current);

        let command = PkgCommand::upgrade(name, self.options.dry_run);
        self.warn_if_unprivileged(&command);
        let output = self.execute(&command)?;

        let upgraded = self.parser.upgrade_applied(&output.stdout, &current);
        if upgraded && self.options.dry_run {
            let rc = output.code;
            return Ok(Outcome::WouldChange(ReconcileResult::from_output(
                command, output, rc, true,
            )));
        }

        // pkg_add -u exits 0 even when something went wrong; stderr should be empty on success
        let result = if output.stderr.is_empty() {
            let rc = output.code;
            ReconcileResult::from_output(command, output, rc, upgraded)
        } else {
            ReconcileResult::from_output(command, output, 1, false)
        };
        Ok(Outcome::Finished(result))
    }

    /// Remove the package when installed.
    #[tracing::instrument(skip(self))]
    pub fn ensure_absent(&self, name: &PackageName, installed: bool) -> Result<Outcome, ReconcileError> {
        if !installed {
            debug!("{} is not installed", name);
            return Ok(Outcome::Finished(ReconcileResult::unchanged()));
        }

        let command = PkgCommand::remove(name, self.options.dry_run);
        self.warn_if_unprivileged(&command);
        let output = self.execute(&command)?;

        let rc = output.code;
        let removed = output.success();
        let result = ReconcileResult::from_output(command, output, rc, removed);
        if removed && self.options.dry_run {
            return Ok(Outcome::WouldChange(result));
        }
        Ok(Outcome::Finished(result))
    }

    fn execute(&self, command: &CommandLine) -> Result<CommandOutput, ReconcileError> {
        let output = self
            .runtime
            .run(command)
            .map_err(|e| ReconcileError::Spawn {
                command: command.to_string(),
                reason: format!("{:#}", e),
            })?;

        let (level, line) = transcript(command, &output, self.options.debug);
        log!(level, "{}", line);
        Ok(output)
    }

    fn warn_if_unprivileged(&self, command: &CommandLine) {
        if !self.options.dry_run && !self.runtime.is_privileged() {
            warn!("Running '{}' without root privileges; it will likely fail", command);
        }
    }
}

/// Log level and line for a finished tool invocation. Debug mode adds the
/// captured output and raises the level so it shows with the default filter.
fn transcript(command: &CommandLine, output: &CommandOutput, debug: bool) -> (Level, String) {
    if debug {
        (
            Level::Info,
            format!(
                "{}: rc={} stdout={:?} stderr={:?}",
                command, output.code, output.stdout, output.stderr
            ),
        )
    } else {
        (Level::Debug, format!("{}: rc={}", command, output.code))
    }
}
