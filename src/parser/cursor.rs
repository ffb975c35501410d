//! Курсор по тексту запроса

use crate::parser::lexer::scan;
use crate::parser::token::Token;

/// Владеет текстом запроса и байтовым смещением в нем
///
/// Смещение всегда стоит либо на начале токена, либо в конце ввода:
/// пробельные символы после токена пропускаются вместе с ним.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Создает курсор; пробелы в начале и в конце ввода не учитываются
    pub fn new(input: &'a str) -> Self {
        let input = input.trim_end();
        let mut cursor = Self { input, offset: 0 };
        cursor.skip_whitespace();
        cursor
    }

    /// Текст запроса без хвостовых пробелов
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Текущее байтовое смещение
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Весь ввод разобран
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.input.len()
    }

    /// Следующий токен без продвижения
    pub fn peek(&self) -> Token {
        self.peek_with_length().0
    }

    /// Следующий токен и его длина без продвижения
    pub fn peek_with_length(&self) -> (Token, usize) {
        scan(self.rest())
    }

    /// Возвращает следующий токен и продвигается за него и за пробелы после
    pub fn pop(&mut self) -> Token {
        let (token, len) = self.peek_with_length();
        self.offset += len;
        self.skip_whitespace();
        token
    }

    /// Остаток ввода дословно, без продвижения
    pub fn peek_rest(&self) -> &'a str {
        self.rest()
    }

    /// Остаток ввода дословно; курсор уходит в конец
    pub fn pop_rest(&mut self) -> &'a str {
        let rest = self.rest();
        self.offset = self.input.len();
        rest
    }

    /// Исходный текст следующего токена (для сообщений об ошибках)
    pub fn fragment(&self) -> &'a str {
        let (_, len) = self.peek_with_length();
        &self.rest()[..len]
    }

    fn rest(&self) -> &'a str {
        self.input.get(self.offset..).unwrap_or("")
    }

    fn skip_whitespace(&mut self) {
        let skipped = self
            .rest()
            .bytes()
            .take_while(|b| b.is_ascii_whitespace())
            .count();
        self.offset += skipped;
    }
}
