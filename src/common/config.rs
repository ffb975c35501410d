//! Конфигурация для stepql
//!
//! Настройки парсера, вывода и логирования. Читаются из TOML файла и
//! переменных окружения `STEPQL_*`.

use crate::common::error::{Error, Result};
use crate::parser::ParserSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Основная конфигурация
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Настройки разбора
    pub parser: ParserSettings,
    /// Настройки вывода результата
    pub output: OutputConfig,
    /// Настройки логирования
    pub logging: LoggingConfig,
}

/// Формат вывода разобранного запроса
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Компактный JSON в одну строку
    Json,
    /// JSON с отступами
    #[default]
    Pretty,
    /// Отладочное представление Rust
    Debug,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "pretty" => Ok(OutputFormat::Pretty),
            "debug" => Ok(OutputFormat::Debug),
            other => Err(Error::configuration(format!(
                "unknown output format '{}', expected json, pretty or debug",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Pretty => "pretty",
            OutputFormat::Debug => "debug",
        };
        f.write_str(name)
    }
}

/// Конфигурация вывода
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Формат вывода
    pub format: OutputFormat,
    /// Печатать указатель `^` под позицией ошибки
    pub caret: bool,
    /// Приглашение интерактивного режима
    pub prompt: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pretty,
            caret: true,
            prompt: "->".to_string(),
        }
    }
}

/// Конфигурация логирования
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень логирования
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Допустимые уровни логирования
pub const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl Config {
    /// Загружает конфигурацию из TOML файла
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Сохраняет конфигурацию в TOML файл
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Загружает конфигурацию из переменных окружения
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(level) = std::env::var("STEPQL_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(format) = std::env::var("STEPQL_FORMAT") {
            config.output.format = format.parse()?;
        }

        if let Ok(limit) = std::env::var("STEPQL_MAX_INPUT_LENGTH") {
            config.parser.max_input_length = limit.parse().map_err(|_| {
                Error::configuration(format!("STEPQL_MAX_INPUT_LENGTH is not a number: {}", limit))
            })?;
        }

        Ok(config)
    }

    /// Объединяет конфигурацию с другой; берутся значения, отличные от умолчаний
    pub fn merge(mut self, other: Self) -> Self {
        self.parser = merge_parser(self.parser, other.parser);
        self.output = self.output.merge(other.output);
        self.logging = self.logging.merge(other.logging);
        self
    }

    /// Валидирует конфигурацию
    pub fn validate(&self) -> Result<()> {
        if self.output.prompt.is_empty() {
            return Err(Error::configuration("prompt cannot be empty"));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::configuration(format!(
                "unknown log level '{}', expected one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}

fn merge_parser(mut current: ParserSettings, other: ParserSettings) -> ParserSettings {
    let defaults = ParserSettings::default();
    if other.max_input_length != defaults.max_input_length {
        current.max_input_length = other.max_input_length;
    }
    if other.trailing_semicolon != defaults.trailing_semicolon {
        current.trailing_semicolon = other.trailing_semicolon;
    }
    if other.log_errors != defaults.log_errors {
        current.log_errors = other.log_errors;
    }
    current
}

impl OutputConfig {
    fn merge(mut self, other: Self) -> Self {
        if other.format != OutputFormat::Pretty {
            self.format = other.format;
        }
        if !other.caret {
            self.caret = other.caret;
        }
        if other.prompt != "->" {
            self.prompt = other.prompt;
        }
        self
    }
}

impl LoggingConfig {
    fn merge(mut self, other: Self) -> Self {
        if other.level != "warn" {
            self.level = other.level;
        }
        self
    }
}
