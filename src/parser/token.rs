//! Токены и зарезервированный словарь лексера stepql
//!
//! Словарь строится один раз на процесс и больше не изменяется, поэтому
//! его можно читать из параллельных разборов без синхронизации.

use std::fmt;

/// Ключевые слова, фразы и операторы словаря
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // === Операторы и разделители ===
    LeftParen,    // (
    RightParen,   // )
    GreaterEqual, // >=
    LessEqual,    // <=
    NotEqual,     // != или <>
    Comma,        // ,
    Equal,        // =
    Greater,      // >
    Less,         // <

    // === DML ===
    Select,
    InsertInto,
    Insert,
    Values,
    Update,
    Set,
    DeleteFrom,
    Delete,
    Where,
    From,
    GroupBy,
    OrderBy,
    Having,
    Asc,
    Desc,

    // === DDL ===
    CreateTable,
    CreateView,
    CreateIndex,
    CreateUser,
    As,
    On,
    Check,
    NotNull,
    Unique,
    PrimaryKey,
    ForeignKey,
    References,
    Default,

    // === Условия ===
    And,
    Or,
    In,
    NotIn,
    Like,
    NotLike,
    Between,
    NotBetween,

    // === Права доступа ===
    IdentifiedBy,
    OnTable,
    To,
    Grant,
    Revoke,
    AllPrivileges,
}

impl Keyword {
    /// Каноническое написание для сообщений об ошибках
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::LeftParen => "(",
            Keyword::RightParen => ")",
            Keyword::GreaterEqual => ">=",
            Keyword::LessEqual => "<=",
            Keyword::NotEqual => "!=",
            Keyword::Comma => ",",
            Keyword::Equal => "=",
            Keyword::Greater => ">",
            Keyword::Less => "<",
            Keyword::Select => "SELECT",
            Keyword::InsertInto => "INSERT INTO",
            Keyword::Insert => "INSERT",
            Keyword::Values => "VALUES",
            Keyword::Update => "UPDATE",
            Keyword::Set => "SET",
            Keyword::DeleteFrom => "DELETE FROM",
            Keyword::Delete => "DELETE",
            Keyword::Where => "WHERE",
            Keyword::From => "FROM",
            Keyword::GroupBy => "GROUP BY",
            Keyword::OrderBy => "ORDER BY",
            Keyword::Having => "HAVING",
            Keyword::Asc => "ASC",
            Keyword::Desc => "DESC",
            Keyword::CreateTable => "CREATE TABLE",
            Keyword::CreateView => "CREATE VIEW",
            Keyword::CreateIndex => "CREATE INDEX",
            Keyword::CreateUser => "CREATE USER",
            Keyword::As => "AS",
            Keyword::On => "ON",
            Keyword::Check => "CHECK",
            Keyword::NotNull => "NOT NULL",
            Keyword::Unique => "UNIQUE",
            Keyword::PrimaryKey => "PRIMARY KEY",
            Keyword::ForeignKey => "FOREIGN KEY",
            Keyword::References => "REFERENCES",
            Keyword::Default => "DEFAULT",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::In => "IN",
            Keyword::NotIn => "NOT IN",
            Keyword::Like => "LIKE",
            Keyword::NotLike => "NOT LIKE",
            Keyword::Between => "BETWEEN",
            Keyword::NotBetween => "NOT BETWEEN",
            Keyword::IdentifiedBy => "IDENTIFIED BY",
            Keyword::OnTable => "ON TABLE",
            Keyword::To => "TO",
            Keyword::Grant => "GRANT",
            Keyword::Revoke => "REVOKE",
            Keyword::AllPrivileges => "ALL PRIVILEGES",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Лексический токен
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Элемент зарезервированного словаря
    Keyword(Keyword),
    /// Строка в одинарных кавычках, без самих кавычек
    Literal(String),
    /// Идентификатор, число или одиночный нераспознанный символ
    Word(String),
    /// Строка без закрывающей кавычки (остаток ввода)
    Unterminated(String),
    /// Конец ввода
    End,
}

impl Token {
    /// Ключевое слово, если токен из словаря
    pub fn keyword(&self) -> Option<Keyword> {
        match self {
            Token::Keyword(keyword) => Some(*keyword),
            _ => None,
        }
    }

    /// Проверяет, что токен - заданное ключевое слово
    pub fn is(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }

    /// Имя (таблицы, колонки, пользователя), если токен им является
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Token::Word(word) if is_identifier(word) => Some(word.as_str()),
            _ => None,
        }
    }

    /// Значение: строка в кавычках или слово без кавычек (число, NULL, имя)
    pub fn value(&self) -> Option<&str> {
        match self {
            Token::Literal(text) => Some(text.as_str()),
            Token::Word(word) if word.bytes().all(is_word_byte) => Some(word.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(keyword) => write!(f, "{}", keyword),
            Token::Literal(text) => write!(f, "'{}'", text),
            Token::Word(word) => write!(f, "{}", word),
            Token::Unterminated(text) => write!(f, "'{}", text),
            Token::End => write!(f, "end of input"),
        }
    }
}

/// Символ класса `[A-Za-z0-9_*]`
pub fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'*'
}

/// Идентификатор вида `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(text: &str) -> bool {
    let mut bytes = text.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() || first == b'_' => {
            bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
        }
        _ => false,
    }
}

/// Элемент зарезервированного словаря
#[derive(Debug, Clone)]
pub struct VocabularyEntry {
    pub text: &'static str,
    pub keyword: Keyword,
    words: Vec<&'static str>,
}

impl VocabularyEntry {
    fn new(text: &'static str, keyword: Keyword) -> Self {
        Self {
            text,
            keyword,
            words: text.split(' ').collect(),
        }
    }

    /// Заканчивается ли запись словесным символом (тогда нужна граница слова)
    fn is_word(&self) -> bool {
        self.text.bytes().last().is_some_and(is_word_byte)
    }

    /// Длина совпадения с началом `rest` без учета регистра
    ///
    /// Слова фразы могут разделяться любым количеством пробельных символов.
    pub fn match_len(&self, rest: &str) -> Option<usize> {
        let bytes = rest.as_bytes();
        let mut pos = 0;

        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                let gap = bytes[pos..]
                    .iter()
                    .take_while(|b| b.is_ascii_whitespace())
                    .count();
                if gap == 0 {
                    return None;
                }
                pos += gap;
            }

            let end = pos + word.len();
            if end > bytes.len() || !bytes[pos..end].eq_ignore_ascii_case(word.as_bytes()) {
                return None;
            }
            pos = end;
        }

        if self.is_word() && bytes.get(pos).copied().is_some_and(is_word_byte) {
            return None;
        }
        Some(pos)
    }
}

fn build_vocabulary() -> Vec<VocabularyEntry> {
    [
        ("(", Keyword::LeftParen),
        (")", Keyword::RightParen),
        (">=", Keyword::GreaterEqual),
        ("<=", Keyword::LessEqual),
        ("!=", Keyword::NotEqual),
        ("<>", Keyword::NotEqual),
        (",", Keyword::Comma),
        ("=", Keyword::Equal),
        (">", Keyword::Greater),
        ("<", Keyword::Less),
        ("SELECT", Keyword::Select),
        ("INSERT INTO", Keyword::InsertInto),
        ("INSERT", Keyword::Insert),
        ("VALUES", Keyword::Values),
        ("UPDATE", Keyword::Update),
        ("SET", Keyword::Set),
        ("DELETE FROM", Keyword::DeleteFrom),
        ("DELETE", Keyword::Delete),
        ("CREATE TABLE", Keyword::CreateTable),
        ("CREATE VIEW", Keyword::CreateView),
        ("CREATE INDEX", Keyword::CreateIndex),
        ("CREATE USER", Keyword::CreateUser),
        ("CHECK", Keyword::Check),
        ("WHERE", Keyword::Where),
        ("FROM", Keyword::From),
        ("AND", Keyword::And),
        ("OR", Keyword::Or),
        ("IN", Keyword::In),
        ("NOT IN", Keyword::NotIn),
        ("LIKE", Keyword::Like),
        ("NOT LIKE", Keyword::NotLike),
        ("GROUP BY", Keyword::GroupBy),
        ("ORDER BY", Keyword::OrderBy),
        ("HAVING", Keyword::Having),
        ("BETWEEN", Keyword::Between),
        ("NOT BETWEEN", Keyword::NotBetween),
        ("IDENTIFIED BY", Keyword::IdentifiedBy),
        ("ON TABLE", Keyword::OnTable),
        ("ON", Keyword::On),
        ("TO", Keyword::To),
        ("GRANT", Keyword::Grant),
        ("REVOKE", Keyword::Revoke),
        ("NOT NULL", Keyword::NotNull),
        ("UNIQUE", Keyword::Unique),
        ("PRIMARY KEY", Keyword::PrimaryKey),
        ("FOREIGN KEY", Keyword::ForeignKey),
        ("REFERENCES", Keyword::References),
        ("DEFAULT", Keyword::Default),
        ("AS", Keyword::As),
        ("ASC", Keyword::Asc),
        ("DESC", Keyword::Desc),
        ("ALL PRIVILEGES", Keyword::AllPrivileges),
    ]
    .into_iter()
    .map(|(text, keyword)| VocabularyEntry::new(text, keyword))
    .collect()
}

lazy_static::lazy_static! {
    /// Зарезервированный словарь, общий для всех разборов
    pub static ref VOCABULARY: Vec<VocabularyEntry> = build_vocabulary();
}

/// Самое длинное совпадение словаря с началом `rest`
///
/// Порядок записей в словаре на результат не влияет.
pub fn longest_match(rest: &str) -> Option<(Keyword, usize)> {
    VOCABULARY
        .iter()
        .filter_map(|entry| entry.match_len(rest).map(|len| (entry.keyword, len)))
        .max_by_key(|(_, len)| *len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_shape() {
        assert!(is_identifier("Sno"));
        assert!(is_identifier("_tmp1"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("*"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_keyword_display() {
        assert_eq!(Keyword::NotBetween.to_string(), "NOT BETWEEN");
        assert_eq!(Token::Keyword(Keyword::LeftParen).to_string(), "(");
        assert_eq!(Token::End.to_string(), "end of input");
    }
}
