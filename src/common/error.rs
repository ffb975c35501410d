//! Обработка ошибок для stepql

use thiserror::Error;

/// Основной тип ошибки для stepql
#[derive(Error, Debug)]
pub enum Error {
    /// Ошибка I/O операций
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации/десериализации
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Ошибка чтения конфигурационного файла
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Ошибка записи конфигурационного файла
    #[error("Configuration write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Синтаксическая ошибка: в текущей позиции не найден ожидаемый токен
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// Семантическая ошибка: синтаксически полный запрос нарушает правило
    #[error("semantic error at offset {offset}: {message}")]
    Semantic { offset: usize, message: String },

    /// Запрос длиннее допустимого настройками
    #[error("statement is {length} bytes long, the limit is {limit}")]
    InputTooLong { length: usize, limit: usize },

    /// Ошибка конфигурации
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Внутренняя ошибка
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Тип результата для stepql
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Создает синтаксическую ошибку
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// Создает семантическую ошибку
    pub fn semantic(offset: usize, message: impl Into<String>) -> Self {
        Self::Semantic {
            offset,
            message: message.into(),
        }
    }

    /// Создает ошибку конфигурации
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Создает внутреннюю ошибку
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Позиция (байтовое смещение), на которой остановился разбор
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Syntax { offset, .. } | Self::Semantic { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Ошибка относится к разбору запроса (а не к окружению)
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Syntax { .. } | Self::Semantic { .. } | Self::InputTooLong { .. }
        )
    }

    /// Рисует запрос и указатель `^` под позицией ошибки
    ///
    /// Возвращает `None`, если у ошибки нет позиции.
    pub fn pointer(&self, sql: &str) -> Option<String> {
        let offset = self.offset()?.min(sql.len());
        let prefix = sql.get(..offset).unwrap_or(sql);
        // Столбец считаем в символах, а не в байтах
        let column = prefix.chars().count();
        Some(format!("{}\n{}^", sql, " ".repeat(column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_only_for_parse_errors() {
        assert_eq!(Error::syntax(7, "expected FROM").offset(), Some(7));
        assert_eq!(Error::semantic(3, "bad").offset(), Some(3));
        assert_eq!(Error::internal("boom").offset(), None);
    }

    #[test]
    fn test_pointer_under_offset() {
        let err = Error::syntax(9, "expected FROM, found 'FORM'");
        let rendered = err.pointer("SELECT a FORM t").unwrap();
        assert_eq!(rendered, "SELECT a FORM t\n         ^");
    }

    #[test]
    fn test_pointer_counts_characters() {
        let sql = "SELECT 'é' x";
        // 'é' занимает два байта, но один столбец
        let err = Error::syntax(sql.find('x').unwrap(), "unexpected");
        let rendered = err.pointer(sql).unwrap();
        assert!(rendered.ends_with(&format!("{}^", " ".repeat(11))));
    }

    #[test]
    fn test_display_contains_offset() {
        let err = Error::semantic(20, "WHERE is mandatory for UPDATE and DELETE");
        assert_eq!(
            err.to_string(),
            "semantic error at offset 20: WHERE is mandatory for UPDATE and DELETE"
        );
        assert!(err.is_parse_error());
    }
}
