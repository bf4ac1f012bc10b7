//! File system operations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_read_to_string() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file = dir.path().join("args.json");
        std::fs::write(&file, r#"{"name":"nmap"}"#).unwrap();

        assert_eq!(runtime.read_to_string(&file).unwrap(), r#"{"name":"nmap"}"#);
        assert!(runtime.read_to_string(&dir.path().join("missing")).is_err());
    }
}
