//! Plain stderr diagnostics (`info: ...`, `warning: ...`).
//!
//! Informational lines can be silenced with `set_quiet(true)`; warnings are
//! always printed. Nothing secret should ever be passed in here.

use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);

/// Suppress (or re-enable) `info` output.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn info(msg: &str) {
    if !is_quiet() {
        eprintln!("info: {}", msg);
    }
}

pub fn warn(msg: &str) {
    eprintln!("warning: {}", msg);
}
