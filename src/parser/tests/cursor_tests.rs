//! Тесты для курсора

use crate::parser::cursor::Cursor;
use crate::parser::token::{Keyword, Token};

#[test]
fn test_leading_and_trailing_whitespace() {
    let mut cursor = Cursor::new("  SELECT a  ");
    assert_eq!(cursor.input(), "  SELECT a");
    assert_eq!(cursor.offset(), 2);

    assert_eq!(cursor.pop(), Token::Keyword(Keyword::Select));
    assert_eq!(cursor.offset(), 9);
    assert_eq!(cursor.pop(), Token::Word("a".to_string()));
    assert!(cursor.is_at_end());
}

#[test]
fn test_peek_does_not_advance() {
    let cursor = Cursor::new("FROM t");
    assert_eq!(cursor.peek(), Token::Keyword(Keyword::From));
    assert_eq!(cursor.peek(), Token::Keyword(Keyword::From));
    assert_eq!(cursor.offset(), 0);
}

#[test]
fn test_rest_is_verbatim() {
    let mut cursor = Cursor::new("AS SELECT a,  b FROM t");
    cursor.pop();
    assert_eq!(cursor.peek_rest(), "SELECT a,  b FROM t");
    assert_eq!(cursor.pop_rest(), "SELECT a,  b FROM t");
    assert!(cursor.is_at_end());
    assert_eq!(cursor.peek(), Token::End);
}

#[test]
fn test_fragment_is_source_text() {
    let cursor = Cursor::new("order   by x");
    assert_eq!(cursor.fragment(), "order   by");
    let cursor = Cursor::new("FORM t");
    assert_eq!(cursor.fragment(), "FORM");
}

#[test]
fn test_blank_input_is_at_end() {
    let cursor = Cursor::new(" \t\n ");
    assert!(cursor.is_at_end());
    assert_eq!(cursor.peek(), Token::End);
}
