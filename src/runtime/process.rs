//! External command execution.

use std::fmt;
use std::process::Command;

use anyhow::{Context, Result};
use log::debug;

use super::RealRuntime;

/// A program and its argument vector, passed to the program without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, or -1 when the process was terminated by a signal.
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn run_impl(&self, command: &CommandLine) -> Result<CommandOutput> {
        debug!("Running {}", command);
        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .with_context(|| format!("Failed to execute {}", command.program))?;

        Ok(CommandOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;

    #[test]
    fn test_command_line_display() {
        let cmd = CommandLine::new("pkg_add", ["-I", "nmap"]);
        assert_eq!(cmd.to_string(), "pkg_add -I nmap");

        let bare = CommandLine::new("pkg_info", Vec::<String>::new());
        assert_eq!(bare.to_string(), "pkg_info");
    }

    #[test]
    fn test_command_output_success() {
        assert!(CommandOutput::new(0, "", "").success());
        assert!(!CommandOutput::new(1, "", "").success());
        assert!(!CommandOutput::new(-1, "", "").success());
    }

    #[cfg(unix)]
    #[test]
    fn test_real_runtime_captures_streams_and_code() {
        let runtime = RealRuntime;
        let cmd = CommandLine::new("sh", ["-c", "echo out; echo err >&2; exit 3"]);

        let output = runtime.run(&cmd).unwrap();

        assert_eq!(output.code, 3);
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[test]
    fn test_real_runtime_missing_program_is_error() {
        let runtime = RealRuntime;
        let cmd = CommandLine::new("definitely-not-a-real-program-xyz", ["-e"]);

        let err = runtime.run(&cmd).unwrap_err();
        assert!(err.to_string().contains("definitely-not-a-real-program-xyz"));
    }
}
