//! Consistent styling utilities for langm output
//!
//! Colour is off until [`init`] turns it on, so library callers and tests
//! always see plain text.
//!
//! ## Features
//! - **`NO_COLOR` support**: Respects the [NO_COLOR standard](https://no-color.org/)
//! - **TTY detection**: Auto-detects terminal capabilities
//! - **Settings-aware**: `color = false` in settings.toml or `--no-color` wins

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;
use supports_color::Stream;

static COLORS: AtomicBool = AtomicBool::new(false);

/// Decide once whether this process writes coloured output.
///
/// `allow` is false when settings or the command line disabled colour.
pub fn init(allow: bool) {
    COLORS.store(allow && detect_colors(), Ordering::Relaxed);
}

/// Detect if the environment supports colour
///
/// Follows the [NO_COLOR standard](https://no-color.org/) and detects TTY support.
#[must_use]
pub fn detect_colors() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if let Ok(val) = env::var("LANGM_COLORS") {
        if val == "never" || val == "0" || val == "false" {
            return false;
        }
        if val == "always" || val == "1" || val == "true" {
            return true;
        }
    }

    supports_color::on(Stream::Stdout).is_some_and(|level| level.has_basic)
}

#[must_use]
pub fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

/// Check if unicode icons should be used
#[must_use]
pub fn use_unicode() -> bool {
    if let Ok(val) = env::var("LANGM_UNICODE") {
        return val != "0" && val != "false";
    }
    colors_enabled()
}

/// Apply color only if colors are enabled
#[inline]
#[must_use]
pub fn maybe_color(text: &str, f: impl Fn(&str) -> String) -> String {
    if colors_enabled() {
        f(text)
    } else {
        text.to_string()
    }
}

/// Get an icon (unicode or ASCII fallback)
#[inline]
#[must_use]
pub fn icon(unicode: &str, ascii: &str) -> String {
    if use_unicode() {
        unicode.to_string()
    } else {
        ascii.to_string()
    }
}

/// Success message with checkmark
#[must_use]
pub fn success(msg: &str) -> String {
    let mark = icon("✓", "OK");
    if colors_enabled() {
        format!("{} {msg}", mark.green().bold())
    } else {
        format!("{mark} {msg}")
    }
}

/// Arrow prefix for hints
#[must_use]
pub fn arrow(msg: &str) -> String {
    let mark = icon("→", ">");
    if colors_enabled() {
        format!("{} {msg}", mark.cyan().bold())
    } else {
        format!("{mark} {msg}")
    }
}

/// Error prefix used by the dispatcher
#[must_use]
pub fn error_label() -> String {
    maybe_color("Error:", |m| m.red().bold().to_string())
}

#[must_use]
pub fn dim(msg: &str) -> String {
    maybe_color(msg, |m| m.dimmed().to_string())
}

/// Group header such as `node:`
#[must_use]
pub fn heading(msg: &str) -> String {
    maybe_color(msg, |m| m.magenta().bold().to_string())
}

/// Inline command formatting
#[must_use]
pub fn command(cmd: &str) -> String {
    maybe_color(cmd, |c| c.cyan().to_string())
}

/// Runtime name (cyan)
#[must_use]
pub fn runtime(name: &str) -> String {
    maybe_color(name, |n| n.cyan().bold().to_string())
}

/// File path (yellow)
#[must_use]
pub fn path(p: &str) -> String {
    maybe_color(p, |path| path.yellow().to_string())
}

/// Marker for the active runtime
#[must_use]
pub fn current_marker() -> String {
    maybe_color(" *", |m| m.green().bold().to_string())
}
