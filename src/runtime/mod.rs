//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over the few system
//! operations the reconciler needs, enabling dependency injection and
//! testability.
//!
//! # Structure
//!
//! - `process` - External command execution and captured output
//! - `env` - Environment variables and privilege information
//! - `fs` - File reads (module argument files)

mod env;
mod fs;
mod process;

use anyhow::Result;
use std::env as std_env;
use std::path::Path;

pub use process::{CommandLine, CommandOutput};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;

    // Processes
    /// Run a command to completion and capture its exit code, stdout and stderr.
    ///
    /// A non-zero exit code is not an error here; only failing to start the
    /// process is.
    fn run(&self, command: &CommandLine) -> Result<CommandOutput>;

    // Privilege
    fn is_privileged(&self) -> bool;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn run(&self, command: &CommandLine) -> Result<CommandOutput> {
        self.run_impl(command)
    }

    fn is_privileged(&self) -> bool {
        self.is_privileged_impl()
    }
}
