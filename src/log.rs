//! libbladeRF log verbosity, mapped onto `tracing` levels.

use tracing::level_filters::LevelFilter;

use crate::error::{Error, Result};

/// `bladerf_log_level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum LogLevel {
    Verbose = 0,
    Debug = 1,
    Info = 2,
    Warning = 3,
    Error = 4,
    Critical = 5,
    /// No output at all
    Silent = 6,
}

impl LogLevel {
    /// Name of the vendor `bladerf_log_level` enumerator.
    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Verbose => "BLADERF_LOG_LEVEL_VERBOSE",
            LogLevel::Debug => "BLADERF_LOG_LEVEL_DEBUG",
            LogLevel::Info => "BLADERF_LOG_LEVEL_INFO",
            LogLevel::Warning => "BLADERF_LOG_LEVEL_WARNING",
            LogLevel::Error => "BLADERF_LOG_LEVEL_ERROR",
            LogLevel::Critical => "BLADERF_LOG_LEVEL_CRITICAL",
            LogLevel::Silent => "BLADERF_LOG_LEVEL_SILENT",
        }
    }

    /// Equivalent `tracing` filter. `Critical` folds into `ERROR`.
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Verbose => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
            LogLevel::Silent => LevelFilter::OFF,
        }
    }

    /// Pick the libbladeRF verbosity matching the active `tracing` filter,
    /// so the C library and the Rust side log at the same threshold.
    pub fn from_level_filter(filter: LevelFilter) -> Self {
        match filter.into_level() {
            Some(tracing::Level::TRACE) => LogLevel::Verbose,
            Some(tracing::Level::DEBUG) => LogLevel::Debug,
            Some(tracing::Level::INFO) => LogLevel::Info,
            Some(tracing::Level::WARN) => LogLevel::Warning,
            Some(_) => LogLevel::Error,
            None => LogLevel::Silent,
        }
    }

    /// Verbosity matching whatever subscriber is currently installed.
    pub fn current() -> Self {
        Self::from_level_filter(LevelFilter::current())
    }
}

impl TryFrom<i32> for LogLevel {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(LogLevel::Verbose),
            1 => Ok(LogLevel::Debug),
            2 => Ok(LogLevel::Info),
            3 => Ok(LogLevel::Warning),
            4 => Ok(LogLevel::Error),
            5 => Ok(LogLevel::Critical),
            6 => Ok(LogLevel::Silent),
            other => Err(Error::UnknownValue {
                kind: "bladerf_log_level",
                value: other as i64,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_is_off() {
        assert_eq!(LogLevel::Silent.to_level_filter(), LevelFilter::OFF);
        assert_eq!(LogLevel::from_level_filter(LevelFilter::OFF), LogLevel::Silent);
    }

    #[test]
    fn test_round_trip_through_tracing() {
        for level in [
            LogLevel::Verbose,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Error,
        ] {
            assert_eq!(LogLevel::from_level_filter(level.to_level_filter()), level);
        }
        assert_eq!(
            LogLevel::from_level_filter(LogLevel::Critical.to_level_filter()),
            LogLevel::Error
        );
    }

    #[test]
    fn test_try_from() {
        assert_eq!(LogLevel::try_from(3).unwrap(), LogLevel::Warning);
        assert!(LogLevel::try_from(7).is_err());
    }

    #[test]
    fn test_ordering_matches_verbosity() {
        assert!(LogLevel::Verbose < LogLevel::Info);
        assert!(LogLevel::Critical < LogLevel::Silent);
    }
}
