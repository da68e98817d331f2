//! `log` backend for the browser.
//!
//! Records are forwarded to the matching `console` method so they show up
//! with the right severity in devtools. Outside wasm32 nothing is installed
//! and the host application picks its own logger.

use log::LevelFilter;

/// Level used when the crate installs its own console logger.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Log, Metadata, Record};
    use wasm_bindgen::JsValue;
    use web_sys::console;

    pub(super) struct ConsoleLogger;

    pub(super) static LOGGER: ConsoleLogger = ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record<'_>) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
            match record.level() {
                Level::Error => console::error_1(&line),
                Level::Warn => console::warn_1(&line),
                Level::Info => console::info_1(&line),
                Level::Debug | Level::Trace => console::debug_1(&line),
            }
        }

        fn flush(&self) {}
    }
}

/// Install the console logger at `level`. Later calls only change the level.
#[cfg(target_arch = "wasm32")]
pub fn init_logging(level: LevelFilter) {
    if log::set_logger(&console::LOGGER).is_err() {
        // already installed
    }
    log::set_max_level(level);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(_level: LevelFilter) {}

/// Parse a level name such as `"debug"` (case-insensitive).
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.parse().ok()
}
