// RUNTIME PREFERENCES

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level an event needs to be emitted
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationPreferences {
    /// Whether every evaluated expression is logged at debug level
    pub log_expressions: bool,

    /// Whether evaluation results are logged as success events
    pub log_results: bool,
}

impl Default for EvaluationPreferences {
    fn default() -> Self {
        Self {
            log_expressions: env::var(env_vars::EVAL_LOG_EXPRESSIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_results: env::var(env_vars::EVAL_LOG_RESULTS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub logging: LoggingPreferences,
    pub evaluation: EvaluationPreferences,
}

impl RuntimeConfig {
    /// Development preferences: debug level, plain console output
    pub fn development() -> Self {
        Self {
            logging: LoggingPreferences {
                use_structured_logging: false,
                enable_console_logging: true,
                min_log_level: LogLevel::Debug,
            },
            evaluation: EvaluationPreferences {
                log_expressions: true,
                log_results: true,
            },
        }
    }

    /// Production preferences: info level, JSON output
    pub fn production() -> Self {
        Self {
            logging: LoggingPreferences {
                use_structured_logging: true,
                enable_console_logging: true,
                min_log_level: LogLevel::Info,
            },
            evaluation: EvaluationPreferences {
                log_expressions: false,
                log_results: false,
            },
        }
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "ASSERTION_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "ASSERTION_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "ASSERTION_LOGGING_MIN_LEVEL";

    // Evaluation
    pub const EVAL_LOG_EXPRESSIONS: &str = "ASSERTION_EVAL_LOG_EXPRESSIONS";
    pub const EVAL_LOG_RESULTS: &str = "ASSERTION_EVAL_LOG_RESULTS";
}
