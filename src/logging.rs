//! Console Logger
//!
//! `log` backend for the browser devtools console. The most recent lines
//! are also kept in memory so they can be read back for diagnostics.

use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

/// Lines kept by the installed logger
pub const RECENT_CAPACITY: usize = 200;

/// Bounded buffer of formatted lines, oldest evicted first
pub struct RecentLines {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl RecentLines {
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            lines: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if let Ok(mut lines) = self.lines.lock() {
            while lines.len() >= self.capacity {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }

    /// Oldest first
    pub fn snapshot(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }
}

pub struct ConsoleLogger {
    recent: RecentLines,
}

static LOGGER: ConsoleLogger = ConsoleLogger {
    recent: RecentLines::new(RECENT_CAPACITY),
};

/// Install the logger; `level` is a `log` level name, unknown names mean `info`
pub fn init(level: &str) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(parse_level(level));
    }
}

/// Most recent log lines, oldest first
pub fn recent_lines() -> Vec<String> {
    LOGGER.recent.snapshot()
}

/// Install `window.__todoLogs()`, returning the recent lines joined by newlines
pub fn expose_recent_lines() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let dump = Closure::<dyn Fn() -> String>::new(|| recent_lines().join("\n"));
    if js_sys::Reflect::set(&window, &JsValue::from_str("__todoLogs"), dump.as_ref()).is_err() {
        log::warn!("[LOG] could not expose recent lines");
    }
    dump.forget();
}

pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level.trim()).unwrap_or(LevelFilter::Info)
}

fn format_record(level: Level, target: &str, args: &std::fmt::Arguments) -> String {
    format!("{:<5} [{}] {}", level, target, args)
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record.level(), record.target(), record.args());
        let js_line = JsValue::from_str(&line);
        match record.level() {
            Level::Error => web_sys::console::error_1(&js_line),
            Level::Warn => web_sys::console::warn_1(&js_line),
            Level::Info => web_sys::console::info_1(&js_line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&js_line),
        }
        self.recent.push(line);
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }

    #[test]
    fn test_format_record() {
        let line = format_record(Level::Warn, "shared_todo_ui::cache", &format_args!("list {} dropped", 4));
        assert_eq!(line, "WARN  [shared_todo_ui::cache] list 4 dropped");
    }

    #[test]
    fn test_recent_lines_evict_oldest_at_capacity() {
        let recent = RecentLines::new(3);
        for n in 1..=5 {
            recent.push(format!("line {}", n));
        }
        assert_eq!(recent.snapshot(), vec!["line 3", "line 4", "line 5"]);
    }

    #[test]
    fn test_recent_lines_zero_capacity_keeps_nothing() {
        let recent = RecentLines::new(0);
        recent.push("dropped".to_string());
        assert!(recent.snapshot().is_empty());
    }
}
