//! Package domain types: names, desired states, tool commands and output parsing.

mod command;
mod parser;
mod state;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use command::PkgCommand;
pub use parser::{OutputParser, PkgToolsParser};
pub use state::DesiredState;

/// How a package name is matched against installed packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Base name only, any installed version matches (`nmap` -> `nmap-*`).
    Prefix,
    /// Fully qualified name including version (`nmap-6.25`).
    Exact,
}

/// A package identifier as given by the caller.
///
/// A `-` immediately followed by a digit marks an embedded version and
/// switches matching from prefix to exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageName {
    name: String,
    mode: MatchMode,
}

impl PackageName {
    pub fn as_str(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub fn match_mode(&self) -> MatchMode {
        self.mode
    }

    #[cfg(test)]
    pub fn is_exact(&self) -> bool {
        self.mode == MatchMode::Exact
    }

    /// Argument for `pkg_info -e`: the name itself, or a `name-*` glob.
    pub fn query_pattern(&self) -> String {
        match self.mode {
            MatchMode::Exact => self.name.clone(),
            MatchMode::Prefix => format!("{}-*", self.name),
        }
    }

    /// Leading text a `pkg_info` listing line must start with to belong to this package.
    pub fn listing_prefix(&self) -> String {
        match self.mode {
            MatchMode::Exact => self.name.clone(),
            MatchMode::Prefix => format!("{}-", self.name),
        }
    }

    fn has_version(name: &str) -> bool {
        name.as_bytes()
            .windows(2)
            .any(|pair| pair[0] == b'-' && pair[1].is_ascii_digit())
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for PackageName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            anyhow::bail!("Package name must not be empty.");
        }
        if name.chars().any(char::is_whitespace) {
            anyhow::bail!("Invalid package name '{}': must not contain whitespace.", name);
        }
        let mode = if Self::has_version(name) {
            MatchMode::Exact
        } else {
            MatchMode::Prefix
        };
        Ok(Self {
            name: name.to_string(),
            mode,
        })
    }
}

/// Tie-break rule when several installed packages match a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NameResolution {
    /// The last matching line of the listing wins.
    #[default]
    Last,
    /// More than one distinct match is an error.
    Strict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_uses_prefix_match() {
        let name: PackageName = "nmap".parse().unwrap();
        assert_eq!(name.match_mode(), MatchMode::Prefix);
        assert!(!name.is_exact());
        assert_eq!(name.query_pattern(), "nmap-*");
        assert_eq!(name.listing_prefix(), "nmap-");
    }

    #[test]
    fn test_versioned_name_uses_exact_match() {
        let name: PackageName = "nmap-6.25".parse().unwrap();
        assert_eq!(name.match_mode(), MatchMode::Exact);
        assert_eq!(name.query_pattern(), "nmap-6.25");
        assert_eq!(name.listing_prefix(), "nmap-6.25");
    }

    #[test]
    fn test_dash_without_digit_is_not_a_version() {
        let name: PackageName = "py-setuptools".parse().unwrap();
        assert_eq!(name.match_mode(), MatchMode::Prefix);

        let name: PackageName = "gtk+3".parse().unwrap();
        assert_eq!(name.match_mode(), MatchMode::Prefix);
    }

    #[test]
    fn test_version_anywhere_in_name_is_exact() {
        let name: PackageName = "python-3.11.4p0".parse().unwrap();
        assert!(name.is_exact());

        let name: PackageName = "vim-9.0.1000-no_x11".parse().unwrap();
        assert!(name.is_exact());
    }

    #[test]
    fn test_name_is_trimmed() {
        let name: PackageName = "  nmap \n".parse().unwrap();
        assert_eq!(name.as_str(), "nmap");
        assert_eq!(name.to_string(), "nmap");
    }

    #[test]
    fn test_invalid_names() {
        assert!("".parse::<PackageName>().is_err());
        assert!("   ".parse::<PackageName>().is_err());
        assert!("nmap curl".parse::<PackageName>().is_err());
    }

    #[test]
    fn test_name_resolution_default_and_serde() {
        assert_eq!(NameResolution::default(), NameResolution::Last);
        let parsed: NameResolution = serde_json::from_str(r#""strict""#).unwrap();
        assert_eq!(parsed, NameResolution::Strict);
    }
}
