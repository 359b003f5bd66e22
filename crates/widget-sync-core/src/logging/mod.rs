//! Logging abstractions shared by every component

mod traits;
mod level;
mod noop;
mod console;
mod memory;
mod file_logger;

use std::sync::Arc;

pub use traits::{Logger, SharedLogger};
pub use level::LogLevel;
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use memory::MemoryLogger;
pub use file_logger::FileLogger;

use crate::config::LoggingConfig;

/// Build the logger described by the logging section of the config
///
/// Falls back to the console when the configured file cannot be opened.
pub fn from_config(config: &LoggingConfig) -> SharedLogger {
    let console = ConsoleLogger::new().with_min_level(config.level);
    match config.file {
        Some(ref path) => match FileLogger::open(path, config.level) {
            Ok(logger) => Arc::new(logger),
            Err(e) => {
                console.warn(&format!(
                    "Failed to open log file {}: {}; logging to stderr",
                    path.display(),
                    e
                ));
                Arc::new(console)
            }
        },
        None => Arc::new(console),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_uses_file_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        let config = LoggingConfig {
            level: LogLevel::Debug,
            file: Some(path.clone()),
        };

        let logger = from_config(&config);
        logger.debug("hello file");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("hello file"));
    }

    #[test]
    fn test_from_config_defaults_to_console() {
        let logger = from_config(&LoggingConfig::default());
        logger.info("console only");
    }
}
