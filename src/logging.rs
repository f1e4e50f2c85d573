use std::fs::File;

use simplelog::{Config, WriteLogger};

use crate::config::EngineConfig;

/// Log to the configured file, stdout belongs to the command protocol
///
/// A file that cannot be created leaves logging disabled
pub fn init(config: &EngineConfig) {
    let Some(path) = config.log_file.as_ref() else {
        return;
    };

    if let Ok(file) = File::create(path) {
        let _ = WriteLogger::init(config.log_level, Config::default(), file);
        log::info!("logger initialized at level {}", config.log_level);
    }
}
