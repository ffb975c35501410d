//! Лексический анализатор SQL для stepql
//!
//! `scan` смотрит на неразобранный остаток ввода и возвращает следующий
//! токен вместе с его длиной в байтах, ничего не изменяя. Ошибок на этом
//! уровне нет: нераспознанный символ становится словом, а допустимость
//! токена решает грамматика.

use crate::parser::cursor::Cursor;
use crate::parser::token::{is_word_byte, longest_match, Token};

/// Возвращает следующий токен остатка ввода и его длину в байтах
///
/// Приоритет: словарь (самое длинное совпадение), строка в кавычках,
/// слово из символов `[A-Za-z0-9_*]`.
pub fn scan(rest: &str) -> (Token, usize) {
    if rest.is_empty() {
        return (Token::End, 0);
    }

    if let Some((keyword, len)) = longest_match(rest) {
        return (Token::Keyword(keyword), len);
    }

    if rest.starts_with('\'') {
        return scan_quoted(rest);
    }

    scan_word(rest)
}

/// Читает строку в одинарных кавычках; `\'` не закрывает строку и
/// остается в значении как есть
fn scan_quoted(rest: &str) -> (Token, usize) {
    let bytes = rest.as_bytes();
    let mut index = 1;

    while index < bytes.len() {
        match bytes[index] {
            b'\\' if bytes.get(index + 1) == Some(&b'\'') => index += 2,
            b'\'' => return (Token::Literal(rest[1..index].to_string()), index + 1),
            _ => index += 1,
        }
    }

    (Token::Unterminated(rest[1..].to_string()), rest.len())
}

/// Читает идентификатор или число
fn scan_word(rest: &str) -> (Token, usize) {
    let len = rest.bytes().take_while(|b| is_word_byte(*b)).count();
    if len > 0 {
        return (Token::Word(rest[..len].to_string()), len);
    }

    // Одиночный посторонний символ: пусть его отвергнет грамматика
    match rest.chars().next() {
        Some(ch) => (Token::Word(ch.to_string()), ch.len_utf8()),
        None => (Token::End, 0),
    }
}

/// Токенизатор целого запроса, используется для диагностики
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    /// Создает лексер для запроса
    pub fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Возвращает все токены со смещениями их начала
    pub fn tokenize(mut self) -> Vec<(usize, Token)> {
        let mut tokens = Vec::new();
        while !self.cursor.is_at_end() {
            let offset = self.cursor.offset();
            tokens.push((offset, self.cursor.pop()));
        }
        tokens
    }
}
