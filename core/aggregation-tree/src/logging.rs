//! FILENAME: core/aggregation-tree/src/logging.rs
// PURPOSE: Unified, category-tagged logging for the aggregation crates.

use std::sync::atomic::{AtomicU64, Ordering};

/// Target every line is emitted under, so applications can filter on it.
pub const LOG_TARGET: &str = "aggregation_tree";

// ============================================================================
// UNIFIED LOGGING SYSTEM
// ============================================================================

/// Global sequence counter, shared by every tree in the process
static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

/// Get next sequence number
pub fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

fn level_of(code: &str) -> log::Level {
    match code {
        "E" => log::Level::Error,
        "W" => log::Level::Warn,
        "I" => log::Level::Info,
        "D" => log::Level::Debug,
        _ => log::Level::Trace,
    }
}

/// Formats a log line as `seq|level|category|message`.
pub fn format_line(seq: u64, level: &str, category: &str, message: &str) -> String {
    format!("{}|{}|{}|{}", seq, level, category, message)
}

/// Write a log line in unified format.
///
/// Lines go to whatever logger the embedding application installed through
/// the `log` facade. No sequence number is consumed while that level is
/// disabled.
pub fn write_log(level: &str, category: &str, message: &str) {
    let lvl = level_of(level);
    if !log::log_enabled!(target: LOG_TARGET, lvl) {
        return;
    }
    let line = format_line(next_seq(), level, category, message);
    log::log!(target: LOG_TARGET, lvl, "{}", line);
}

/// Write an ENTER log line for function entry
pub fn write_log_enter(level: &str, category: &str, func_name: &str, params: &str) {
    let message = if params.is_empty() {
        format!("ENTER {}", func_name)
    } else {
        format!("ENTER {} {}", func_name, params)
    };
    write_log(level, category, &message);
}

/// Write an EXIT log line for function exit
pub fn write_log_exit(level: &str, category: &str, func_name: &str, result: &str) {
    let message = if result.is_empty() {
        format!("EXIT {}", func_name)
    } else {
        format!("EXIT {} {}", func_name, result)
    };
    write_log(level, category, &message);
}

// ============================================================================
// MACRO DEFINITIONS & EXPORTS
// ============================================================================

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("D", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("I", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("W", $cat, &format!($($arg)*))
    };
}

// ENTER/EXIT macros for function tracing

#[macro_export]
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_enter("D", $cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_enter("D", $cat, $func, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_exit("D", $cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_exit("D", $cat, $func, &format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_increasing() {
        let a = next_seq();
        let b = next_seq();
        assert!(b > a);
    }

    #[test]
    fn test_line_format() {
        assert_eq!(format_line(3, "I", "TREE", "inserted"), "3|I|TREE|inserted");
    }

    #[test]
    fn test_macros_without_logger() {
        // No logger installed: the calls must be silent no-ops.
        log_debug!("TREE", "depth={}", 3);
        log_info!("TREE", "rows={}", 16);
        log_warn!("CACHE", "stale");
        log_enter!("TREE", "load");
        log_exit!("TREE", "load", "ok");
    }
}
