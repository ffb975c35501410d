//! Общие данные для интеграционных тестов

pub mod fixtures;
