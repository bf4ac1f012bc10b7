//! Parsing of package tool output.
//!
//! The tools have no machine-readable output mode, so everything here is
//! text matching. It sits behind [`OutputParser`] so the strategy can be
//! replaced without touching process handling.

use log::warn;
use regex::Regex;

use super::PackageName;

pub trait OutputParser {
    /// First fields of the `pkg_info` listing lines that belong to `name`, in listing order.
    fn installed_names(&self, listing: &str, name: &PackageName) -> Vec<String>;

    /// Whether `pkg_add -u` output reports `current_full_name` as upgraded.
    fn upgrade_applied(&self, stdout: &str, current_full_name: &str) -> bool;
}

/// Parser for the output of OpenBSD `pkg_info` and `pkg_add`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PkgToolsParser;

impl PkgToolsParser {
    /// Pattern for an upgrade line such as `nmap-6.01->6.25: ok`.
    ///
    /// The line is delimited by a non-word character or a line edge on each
    /// side, which separates it from progress meter output.
    fn upgrade_pattern(current_full_name: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!(
            r"(?m)(?:^|\W){}->.+: ok(?:\W|$)",
            regex::escape(current_full_name)
        ))
    }
}

impl OutputParser for PkgToolsParser {
    fn installed_names(&self, listing: &str, name: &PackageName) -> Vec<String> {
        let prefix = name.listing_prefix();
        listing
            .lines()
            .filter(|line| line.starts_with(&prefix))
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect()
    }

    fn upgrade_applied(&self, stdout: &str, current_full_name: &str) -> bool {
        if current_full_name.is_empty() {
            return false;
        }
        match Self::upgrade_pattern(current_full_name) {
            Ok(re) => re.is_match(stdout),
            Err(e) => {
                warn!("Cannot build upgrade pattern for {}: {}", current_full_name, e);
                false
            }
        }
    }
}
