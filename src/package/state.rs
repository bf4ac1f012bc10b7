//! Desired package state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target state requested by the caller.
///
/// Every input path (command line, args file) parses through [`FromStr`],
/// so synonyms and case handling agree everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DesiredState {
    /// Installed, any version.
    Present,
    /// Installed and upgraded to the newest available version.
    Latest,
    /// Not installed.
    Absent,
}

impl DesiredState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DesiredState::Present => "present",
            DesiredState::Latest => "latest",
            DesiredState::Absent => "absent",
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesiredState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" | "installed" => Ok(DesiredState::Present),
            "latest" => Ok(DesiredState::Latest),
            "absent" | "removed" => Ok(DesiredState::Absent),
            other => anyhow::bail!(
                "Invalid state '{}'. Expected one of: present, installed, latest, absent, removed.",
                other
            ),
        }
    }
}

impl TryFrom<String> for DesiredState {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
