use std::sync::OnceLock;

use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

pub struct Logger {
    tag: String,
}

impl Logger {
    pub fn log(&self, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        println!("[{}][{}] {}", timestamp, self.tag, message);
    }
}

/// Installs the global logger. Subsequent calls keep the first tag.
pub fn init_logger(tag: &str) {
    LOGGER.get_or_init(|| Logger {
        tag: tag.to_string(),
    });
}

/// No-op until `init_logger` has been called, so library users who do not
/// care about logging pay nothing.
pub fn log(message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(message);
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(&format!($($arg)*))
    };
}
