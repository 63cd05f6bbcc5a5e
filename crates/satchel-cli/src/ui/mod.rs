//! Terminal output: status messages and human-readable numbers.
//!
//! All output goes to stderr. Colors are decided once by [`init_colors`].
//!
//! # Examples
//!
//! ```no_run
//! use satchel_cli::ui;
//!
//! ui::init_colors(false);
//! ui::info("Bundling src/main.js");
//! ui::success("Wrote dist/bundle.js");
//! ```

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::{format_duration, format_size, print_build_summary};
pub use messages::{info, success};

static COLORS_ENABLED: AtomicBool = AtomicBool::new(false);

/// Check if color output should be enabled.
///
/// Respects `NO_COLOR` and `FORCE_COLOR`, then falls back to whether a user
/// is attached to stderr.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::user_attended_stderr()
}

/// Decide color support for the rest of the process.
///
/// `--no-color` always wins over the environment.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_color();
    COLORS_ENABLED.store(enabled, Ordering::Relaxed);
    console::set_colors_enabled_stderr(enabled);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS_ENABLED.load(Ordering::Relaxed)
}
