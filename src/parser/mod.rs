//! Парсер SQL для stepql
//!
//! Текст запроса проходит через лексер и курсор в конечный автомат,
//! затем готовый запрос проверяется валидатором.

pub mod ast;
pub mod cursor;
pub mod lexer;
pub mod parser;
pub mod state;
pub mod token;
pub mod validator;

#[cfg(test)]
pub mod tests;

// Переэкспортируем основные типы
pub use ast::*;
pub use cursor::Cursor;
pub use lexer::{scan, Lexer};
pub use parser::{
    parse_each, parse_each_with, parse_many, parse_many_with, parse_one, parse_one_with,
    BatchError, ParserSettings, SqlParser,
};
pub use state::State;
pub use token::{Keyword, Token, VOCABULARY};
