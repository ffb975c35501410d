//! stepql - разбор SQL запросов конечным автоматом
//!
//! Библиотека принимает один SQL запрос в виде текста и превращает его в
//! типизированный объект [`Statement`], с которым может работать код
//! выполнения без повторного разбора. Ошибка разбора всегда содержит
//! байтовое смещение, на котором автомат остановился.
//!
//! ```
//! use stepql::{parse_one, StatementKind};
//!
//! let statement = parse_one("SELECT Sname FROM Student WHERE Sage < 20").unwrap();
//! assert_eq!(statement.kind, StatementKind::Select);
//! assert_eq!(statement.tables, vec!["Student"]);
//! ```

pub mod cli;
pub mod common;
pub mod parser;

pub use common::error::{Error, Result};
pub use common::{Config, OutputFormat};
pub use parser::{
    parse_each, parse_each_with, parse_many, parse_many_with, parse_one, parse_one_with,
    BatchError, Lexer, ParserSettings, SqlParser, Statement, StatementKind,
};

/// Версия библиотеки
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
