//! Reconciliation errors.

use thiserror::Error;

/// Ways a reconciliation attempt can fail. Every variant ends the attempt;
/// there is no local recovery.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A tool ran and reported failure.
    #[error("{message}")]
    ToolInvocation {
        command: String,
        rc: i32,
        message: String,
    },

    /// A tool could not be started at all.
    #[error("Failed to run '{command}': {reason}")]
    Spawn { command: String, reason: String },

    /// Tool output did not contain what the reconciler needed.
    #[error("Unexpected output from '{command}': {detail}")]
    UnexpectedOutput { command: String, detail: String },

    #[error("Package name '{name}' matches several installed packages: {}", .candidates.join(", "))]
    AmbiguousName {
        name: String,
        candidates: Vec<String>,
    },
}

impl ReconcileError {
    /// Message for a failed tool run: stderr, or stdout when stderr is empty.
    pub fn tool_failure(command: String, rc: i32, stdout: &str, stderr: &str) -> Self {
        let message = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        ReconcileError::ToolInvocation {
            command,
            rc,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failure_prefers_stderr() {
        let err = ReconcileError::tool_failure(
            "pkg_add -I nmap".into(),
            1,
            "some output\n",
            "Can't find nmap\n",
        );
        assert_eq!(err.to_string(), "Can't find nmap");
    }

    #[test]
    fn test_tool_failure_falls_back_to_stdout() {
        let err = ReconcileError::tool_failure("pkg_delete -I nmap".into(), 1, "nmap: not found\n", "");
        assert_eq!(err.to_string(), "nmap: not found");
    }

    #[test]
    fn test_ambiguous_name_message_lists_candidates() {
        let err = ReconcileError::AmbiguousName {
            name: "nmap".into(),
            candidates: vec!["nmap-6.01".into(), "nmap-zenmap-6.01".into()],
        };
        assert_eq!(
            err.to_string(),
            "Package name 'nmap' matches several installed packages: nmap-6.01, nmap-zenmap-6.01"
        );
    }
}
