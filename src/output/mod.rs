//! Output formatting for discovery results and change plans
//!
//! This module provides:
//! - Text output for the change plan and the commit summary
//! - JSON output of the upgrade catalog for machine processing

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::{ChangeKind, TextFormatter};

use std::path::Path;

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Minimal output
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Detailed output with additional information
    Verbose,
}

impl Verbosity {
    /// Derive the level from the CLI flags
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Path shown to the user: relative to the project root when possible
pub(crate) fn display_path(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_default() {
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
    }

    #[test]
    fn test_display_path() {
        let root = Path::new("/repo");
        assert_eq!(display_path(Path::new("/repo"), root), ".");
        assert_eq!(
            display_path(Path::new("/repo/packages/a/package.json"), root),
            "packages/a/package.json"
        );
        assert_eq!(display_path(Path::new("/elsewhere/x"), root), "/elsewhere/x");
    }
}
