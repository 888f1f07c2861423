// Small shared helpers: console logging and slot arithmetic.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

/// `log` sink writing to the browser console.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

pub fn init_logging(level: LevelFilter) {
    // A second install keeps the first logger.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Rounds halves towards positive infinity: 2.5 -> 3, -2.5 -> -2.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Wraps any slot number onto `0..count`. `count` is never zero.
pub fn wrap_index(raw: i64, count: usize) -> usize {
    raw.rem_euclid(count as i64) as usize
}
