//! Command lines for the OpenBSD package tools.
//!
//! Argument order matters to the tools and is fixed here.

use crate::runtime::CommandLine;

use super::PackageName;

const PKG_INFO: &str = "pkg_info";
const PKG_ADD: &str = "pkg_add";
const PKG_DELETE: &str = "pkg_delete";

/// Builders for every tool invocation the reconciler issues.
pub struct PkgCommand;

impl PkgCommand {
    /// `pkg_info -e <name>` or `pkg_info -e <name>-*`
    pub fn query(name: &PackageName) -> CommandLine {
        CommandLine::new(PKG_INFO, ["-e".to_string(), name.query_pattern()])
    }

    /// `pkg_info`
    pub fn list() -> CommandLine {
        CommandLine::new(PKG_INFO, Vec::<String>::new())
    }

    /// `pkg_add -I <name>`, or `-In` for a dry run.
    pub fn install(name: &PackageName, dry_run: bool) -> CommandLine {
        let flags = if dry_run { "-In" } else { "-I" };
        CommandLine::new(PKG_ADD, [flags, name.as_str()])
    }

    /// `pkg_add -um <name>`, or `-umn` for a dry run.
    pub fn upgrade(name: &PackageName, dry_run: bool) -> CommandLine {
        let flags = if dry_run { "-umn" } else { "-um" };
        CommandLine::new(PKG_ADD, [flags, name.as_str()])
    }

    /// `pkg_delete -I <name>`, or `-In` for a dry run.
    pub fn remove(name: &PackageName, dry_run: bool) -> CommandLine {
        let flags = if dry_run { "-In" } else { "-I" };
        CommandLine::new(PKG_DELETE, [flags, name.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> PackageName {
        s.parse().unwrap()
    }

    #[test]
    fn test_query_prefix_and_exact() {
        assert_eq!(PkgCommand::query(&name("nmap")).to_string(), "pkg_info -e nmap-*");
        assert_eq!(
            PkgCommand::query(&name("nmap-6.25")).to_string(),
            "pkg_info -e nmap-6.25"
        );
    }

    #[test]
    fn test_list_has_no_arguments() {
        let cmd = PkgCommand::list();
        assert_eq!(cmd.program, "pkg_info");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_mutating_commands_and_dry_run_flags() {
        let n = name("nmap");
        assert_eq!(PkgCommand::install(&n, false).args, ["-I", "nmap"]);
        assert_eq!(PkgCommand::install(&n, true).args, ["-In", "nmap"]);
        assert_eq!(PkgCommand::upgrade(&n, false).args, ["-um", "nmap"]);
        assert_eq!(PkgCommand::upgrade(&n, true).args, ["-umn", "nmap"]);
        assert_eq!(PkgCommand::remove(&n, false).program, "pkg_delete");
        assert_eq!(PkgCommand::remove(&n, false).args, ["-I", "nmap"]);
        assert_eq!(PkgCommand::remove(&n, true).args, ["-In", "nmap"]);
    }
}
