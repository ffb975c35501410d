//! Общие типы для stepql

pub mod config;
pub mod error;

pub use config::{Config, LoggingConfig, OutputConfig, OutputFormat, LOG_LEVELS};
pub use error::{Error, Result};
