//! Terminal logging with a coloured module prefix.
//!
//! Every pipeline step reports through the [`log!`](crate::log!) macro so the
//! output reads as a stream of `[module] message` lines:
//!
//! ```text
//! [scan] blog: 42 files
//! [warn] skipping daily/2024/x.md: permission denied
//! [feed] rss.xml (17 items)
//! ```
//!
//! Recovered failures (a corrupt manifest, a file without metadata) use the
//! `warn` module; unrecovered ones that still let the process continue use
//! `error`.

use colored::{ColoredString, Colorize};
use std::io::{Write, stdout};

/// Log a message with a coloured module prefix.
///
/// ```ignore
/// log!("update"; "refreshed {} of {} sections", done, total);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::log::log($module, &format!($($arg)*))
    }};
}

/// Write one `[module] message` line to stdout.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}
