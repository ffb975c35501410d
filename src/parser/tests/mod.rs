//! Тесты для парсера SQL

pub mod cursor_tests;
pub mod validator_tests;
