//! CLI интерфейс для stepql
//!
//! Принимает запросы из аргументов, файла или интерактивного ввода,
//! разбирает их и печатает результат или ошибку с указателем позиции.

use crate::common::{Config, Error, OutputFormat};
use crate::parser::{
    parse_each_with, parse_many_with, parse_one_with, Lexer, Statement, VOCABULARY,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};

/// Файл конфигурации, который ищется в текущей директории
pub const DEFAULT_CONFIG_FILE: &str = "stepql.toml";

/// stepql - разбор SQL запросов в типизированные объекты
#[derive(Parser, Debug)]
#[command(name = "stepql")]
#[command(about = "stepql - turns SQL-like statements into typed query objects")]
#[command(version)]
pub struct Cli {
    /// Конфигурационный файл
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Уровень детализации логирования
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Формат вывода (json, pretty, debug)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Разобрать запросы по порядку, остановиться на первой ошибке
    Parse {
        /// SQL запросы
        #[arg(required = true)]
        statements: Vec<String>,
    },

    /// Проверить запросы из файла (по одному на строку)
    Check {
        /// Файл с запросами; без него читается stdin
        file: Option<PathBuf>,
    },

    /// Показать токены запроса
    Tokens {
        /// SQL запрос
        statement: String,
    },

    /// Показать зарезервированный словарь
    Vocabulary,

    /// Интерактивный режим
    Repl,
}

impl Cli {
    /// Загружает конфигурацию: файл, затем окружение, затем аргументы
    pub fn load_config(&self) -> crate::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Config::from_file(path)?
                } else {
                    Config::default()
                }
            }
        };

        config = config.merge(Config::from_env()?);

        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.format {
            config.output.format = format.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Выполняет команду; возвращает `false`, если хотя бы один запрос не разобран
    pub fn execute<R, W>(&self, config: &Config, input: R, out: &mut W) -> anyhow::Result<bool>
    where
        R: BufRead,
        W: Write,
    {
        match &self.command {
            Some(Commands::Parse { statements }) => run_parse(config, statements, out),
            Some(Commands::Check { file }) => {
                let text = match file {
                    Some(path) => std::fs::read_to_string(path)
                        .with_context(|| format!("failed to read {}", path.display()))?,
                    None => read_all(input)?,
                };
                run_check(config, &text, out)
            }
            Some(Commands::Tokens { statement }) => {
                for (offset, token) in Lexer::new(statement).tokenize() {
                    writeln!(out, "{:>5}  {:?}", offset, token)?;
                }
                Ok(true)
            }
            Some(Commands::Vocabulary) => {
                for entry in VOCABULARY.iter() {
                    writeln!(out, "{:<16} {:?}", entry.text, entry.keyword)?;
                }
                Ok(true)
            }
            Some(Commands::Repl) | None => run_repl(config, input, out),
        }
    }
}

fn run_parse<W: Write>(config: &Config, statements: &[String], out: &mut W) -> anyhow::Result<bool> {
    match parse_many_with(statements, &config.parser) {
        Ok(parsed) => {
            for statement in &parsed {
                writeln!(out, "{}", render(statement, config.output.format)?)?;
            }
            Ok(true)
        }
        Err(batch) => {
            for statement in &batch.parsed {
                writeln!(out, "{}", render(statement, config.output.format)?)?;
            }
            let sql = statements
                .get(batch.index)
                .map(String::as_str)
                .unwrap_or_default();
            write_error(out, config, sql, &batch.source)?;
            Ok(false)
        }
    }
}

fn run_check<W: Write>(config: &Config, text: &str, out: &mut W) -> anyhow::Result<bool> {
    let (lines, statements): (Vec<usize>, Vec<&str>) = text
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with("--")
        })
        .map(|(number, line)| (number + 1, line))
        .unzip();

    let results = parse_each_with(&statements, &config.parser);
    let mut failed = 0;

    for ((line, sql), result) in lines.iter().zip(&statements).zip(&results) {
        match result {
            Ok(statement) => writeln!(out, "{}: ok ({})", line, statement.kind)?,
            Err(err) => {
                failed += 1;
                writeln!(out, "{}: error", line)?;
                write_error(out, config, sql, err)?;
            }
        }
    }

    log::info!("checked {} statements, {} failed", statements.len(), failed);
    writeln!(out, "{} statements, {} failed", statements.len(), failed)?;
    Ok(failed == 0)
}

fn run_repl<R, W>(config: &Config, mut input: R, out: &mut W) -> anyhow::Result<bool>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(out, "{} ", config.output.prompt)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let sql = line.trim();
        if sql.is_empty() {
            continue;
        }
        if sql.eq_ignore_ascii_case("exit") || sql.eq_ignore_ascii_case("quit") {
            break;
        }

        match parse_one_with(sql, &config.parser) {
            Ok(statement) => writeln!(out, "{}", render(&statement, config.output.format)?)?,
            Err(err) => write_error(out, config, sql, &err)?,
        }
    }
    Ok(true)
}

fn read_all<R: BufRead>(mut input: R) -> anyhow::Result<String> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .context("failed to read statements from stdin")?;
    Ok(text)
}

/// Печатает запрос, указатель под позицией ошибки и сообщение
fn write_error<W: Write>(out: &mut W, config: &Config, sql: &str, err: &Error) -> std::io::Result<()> {
    if config.output.caret {
        if let Some(pointer) = err.pointer(sql) {
            writeln!(out, "{}", pointer)?;
        }
    }
    writeln!(out, "{}", err)
}

/// Представляет запрос в выбранном формате
pub fn render(statement: &Statement, format: OutputFormat) -> crate::Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string(statement)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(statement)?,
        OutputFormat::Debug => format!("{:#?}", statement),
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(args: &[&str], input: &str) -> (bool, String) {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        let mut config = Config::default();
        if let Some(format) = &cli.format {
            config.output.format = format.parse().unwrap();
        }
        let mut out = Vec::new();
        let ok = cli
            .execute(&config, Cursor::new(input.to_string()), &mut out)
            .unwrap();
        (ok, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_cli_parsing() {
        let args = vec!["stepql", "--log-level", "debug", "--format", "json", "parse", "SELECT a FROM t"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert_eq!(cli.format, Some("json".to_string()));
        match cli.command {
            Some(Commands::Parse { statements }) => assert_eq!(statements, vec!["SELECT a FROM t"]),
            other => panic!("Expected parse command, got {:?}", other),
        }
    }

    #[test]
    fn test_default_command_is_repl() {
        let cli = Cli::try_parse_from(vec!["stepql"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_requires_statement() {
        assert!(Cli::try_parse_from(vec!["stepql", "parse"]).is_err());
    }

    #[test]
    fn test_parse_command_prints_json() {
        let (ok, output) = run(&["stepql", "--format", "json", "parse", "SELECT a FROM t"], "");
        assert!(ok);
        assert!(output.contains("\"kind\":\"Select\""));
        assert!(output.contains("\"tables\":[\"t\"]"));
    }

    #[test]
    fn test_parse_command_stops_at_error() {
        let (ok, output) = run(
            &["stepql", "--format", "json", "parse", "SELECT a FROM t", "SELECT a FORM t", "DELETE FROM t WHERE a = 1"],
            "",
        );
        assert!(!ok);
        assert!(output.contains("\"kind\":\"Select\""));
        assert!(output.contains("SELECT a FORM t\n         ^"));
        assert!(!output.contains("Delete"));
    }

    #[test]
    fn test_check_command() {
        let input = "-- fixtures\nSELECT a FROM t\n\nUPDATE t SET a = 1\n";
        let (ok, output) = run(&["stepql", "check"], input);
        assert!(!ok);
        assert!(output.contains("2: ok (Select)"));
        assert!(output.contains("4: error"));
        assert!(output.contains("WHERE is mandatory"));
        assert!(output.contains("2 statements, 1 failed"));
    }

    #[test]
    fn test_tokens_command() {
        let (ok, output) = run(&["stepql", "tokens", "SELECT a"], "");
        assert!(ok);
        assert!(output.contains("    0  Keyword(Select)"));
        assert!(output.contains("    7  Word(\"a\")"));
    }

    #[test]
    fn test_vocabulary_command() {
        let (ok, output) = run(&["stepql", "vocabulary"], "");
        assert!(ok);
        assert!(output.contains("INSERT INTO"));
        assert!(output.contains("ALL PRIVILEGES"));
    }

    #[test]
    fn test_repl_until_exit() {
        let input = "SELECT a FROM t\n\nSELECT\nexit\nSELECT b FROM u\n";
        let (ok, output) = run(&["stepql", "--format", "debug", "repl"], input);
        assert!(ok);
        assert!(output.starts_with("-> "));
        assert!(output.contains("kind: Select"));
        assert!(output.contains("found end of input"));
        assert!(!output.contains("\"u\""));
    }

    #[test]
    fn test_render_formats() -> crate::Result<()> {
        let statement = crate::parser::parse_one("SELECT a FROM t")?;
        assert!(!render(&statement, OutputFormat::Json)?.contains('\n'));
        assert!(render(&statement, OutputFormat::Pretty)?.contains('\n'));
        assert!(render(&statement, OutputFormat::Debug)?.starts_with("Statement {"));
        Ok(())
    }
}
