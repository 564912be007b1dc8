//! Diagnostic logging setup
//!
//! Diagnostics go to stderr so `--json` output on stdout stays parseable.
//! `RUST_LOG` takes precedence over the verbosity flags. While the
//! interactive screen owns the terminal, output is held back with [`pause`].

use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

static PAUSED: AtomicBool = AtomicBool::new(false);

/// Default filter directive for the given verbosity flags
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber; a second call is a no-op
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr.with_filter(|_| !is_paused()))
        .with_target(verbose)
        .try_init();
}

/// Drops every diagnostic until the returned guard goes out of scope
#[must_use = "logging resumes as soon as the guard is dropped"]
pub fn pause() -> PauseGuard {
    PauseGuard {
        was_paused: PAUSED.swap(true, Ordering::SeqCst),
    }
}

pub fn is_paused() -> bool {
    PAUSED.load(Ordering::SeqCst)
}

#[derive(Debug)]
pub struct PauseGuard {
    was_paused: bool,
}

impl Drop for PauseGuard {
    fn drop(&mut self) {
        PAUSED.store(self.was_paused, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false, false), "warn");
        assert_eq!(default_directive(true, false), "debug");
        assert_eq!(default_directive(false, true), "error");
    }

    #[test]
    fn test_pause_guard_nests() {
        assert!(!is_paused());
        {
            let _outer = pause();
            assert!(is_paused());
            {
                let _inner = pause();
                assert!(is_paused());
            }
            assert!(is_paused());
        }
        assert!(!is_paused());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false, false);
        init(true, false);
    }
}
