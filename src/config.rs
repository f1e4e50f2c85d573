//! Engine settings, built from defaults and `MAGISTER_*` environment variables

use std::{env, path::PathBuf, str::FromStr};

use log::LevelFilter;

use crate::{
    defs::Score,
    error::{EngineError, EngineResult},
    params::{DEFAULT_CONTEMPT, DEFAULT_MOVE_TIME_MS, DEFAULT_TT_ENTRIES},
};

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Number of transposition table slots
    pub tt_entries: usize,
    /// Think time for `go` without limits, in milliseconds
    pub move_time_ms: u64,
    pub contempt: Score,
    /// `None` disables logging
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
    pub perft_suite: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tt_entries: DEFAULT_TT_ENTRIES,
            move_time_ms: DEFAULT_MOVE_TIME_MS,
            contempt: DEFAULT_CONTEMPT,
            log_file: Some(PathBuf::from("magister.log")),
            log_level: LevelFilter::Info,
            perft_suite: PathBuf::from("data/perftsuite.epd"),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> EngineResult<Self> {
        EngineConfig::from_lookup(|name| env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EngineResult<Self> {
        let mut config = EngineConfig::default();

        if let Some(value) = lookup("MAGISTER_HASH") {
            config.tt_entries = parse_value("MAGISTER_HASH", &value)?;
        }
        if let Some(value) = lookup("MAGISTER_MOVETIME") {
            config.move_time_ms = parse_value("MAGISTER_MOVETIME", &value)?;
        }
        if let Some(value) = lookup("MAGISTER_CONTEMPT") {
            config.contempt = parse_value("MAGISTER_CONTEMPT", &value)?;
        }
        if let Some(value) = lookup("MAGISTER_LOG") {
            config.log_file = match value.as_str() {
                "" | "off" | "none" => None,
                path => Some(PathBuf::from(path)),
            };
        }
        if let Some(value) = lookup("MAGISTER_LOG_LEVEL") {
            config.log_level = parse_value("MAGISTER_LOG_LEVEL", &value)?;
        }
        if let Some(value) = lookup("MAGISTER_PERFT_SUITE") {
            config.perft_suite = PathBuf::from(value);
        }

        Ok(config)
    }

    /// Apply a `setoption`, names are case insensitive
    pub fn set_option(&mut self, name: &str, value: &str) -> EngineResult<()> {
        match name.to_ascii_lowercase().as_str() {
            "hash" => self.tt_entries = parse_value("Hash", value)?,
            "movetime" => self.move_time_ms = parse_value("MoveTime", value)?,
            "contempt" => self.contempt = parse_value("Contempt", value)?,
            _ => return Err(EngineError::UnknownCommand(format!("setoption {name}"))),
        }
        Ok(())
    }
}

pub fn parse_value<T: FromStr>(name: &'static str, value: &str) -> EngineResult<T> {
    value.trim().parse().map_err(|_| EngineError::InvalidArgument {
        name,
        value: value.to_string(),
    })
}
