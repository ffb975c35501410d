//! Парсер SQL для stepql
//!
//! Разбор идет конечным автоматом: на каждом шаге парсер смотрит на
//! следующий токен, выполняет переход текущего состояния и потребляет
//! ровно один токен (или завершается ошибкой). Возврата назад нет.
//! Открытые колонка, условие, строка INSERT и внешний ключ хранятся
//! как индексы в строящемся запросе.

use crate::common::{Error, Result};
use crate::parser::ast::*;
use crate::parser::cursor::Cursor;
use crate::parser::state::State;
use crate::parser::token::{Keyword, Token};
use crate::parser::validator;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Настройки парсера
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Максимальная длина запроса в байтах (0 - без ограничения)
    pub max_input_length: usize,
    /// Игнорировать одну завершающую `;`
    pub trailing_semicolon: bool,
    /// Писать ошибки разбора в лог вместе с указателем позиции
    pub log_errors: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            max_input_length: 64 * 1024,
            trailing_semicolon: true,
            log_errors: true,
        }
    }
}

/// Условие, которое сейчас заполняется
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConditionSlot {
    /// Индекс в `Statement::conditions`
    Where(usize),
    /// Индекс колонки и индекс условия в ее `check_conditions`
    Check { column: usize, condition: usize },
}

/// Куда вернуться после CHECK и REFERENCES
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstraintScope {
    Column,
    Table,
}

/// Форма правой части оператора
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PredicateShape {
    /// Одно значение: сравнение или LIKE
    Value,
    /// Две границы BETWEEN
    Range,
    /// Список в скобках IN
    List,
}

/// Парсер одного SQL запроса
pub struct SqlParser<'a> {
    cursor: Cursor<'a>,
    /// Длина исходного текста, для проверки лимита
    length: usize,
    settings: ParserSettings,
    state: State,
    statement: Statement,
    current_column: Option<usize>,
    foreign_key_column: Option<usize>,
    open_condition: Option<ConditionSlot>,
    constraint_scope: ConstraintScope,
    check_column: Option<usize>,
    /// Следующее условие CHECK начинает новую группу
    fresh_check: bool,
    open_row: Option<usize>,
    pending_update_field: Option<String>,
}

impl<'a> SqlParser<'a> {
    /// Создает парсер с настройками по умолчанию
    pub fn new(input: &'a str) -> Self {
        Self::with_settings(input, ParserSettings::default())
    }

    /// Создает парсер с настройками
    pub fn with_settings(input: &'a str, settings: ParserSettings) -> Self {
        let text = input.trim_end();
        let text = if settings.trailing_semicolon {
            text.strip_suffix(';').unwrap_or(text)
        } else {
            text
        };

        Self {
            cursor: Cursor::new(text),
            length: input.len(),
            settings,
            state: State::Beginning,
            statement: Statement::default(),
            current_column: None,
            foreign_key_column: None,
            open_condition: None,
            constraint_scope: ConstraintScope::Column,
            check_column: None,
            fresh_check: false,
            open_row: None,
            pending_update_field: None,
        }
    }

    /// Получает настройки парсера
    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Парсит SQL запрос
    pub fn parse(&mut self) -> Result<Statement> {
        let result = self.run();

        if let Err(err) = &result {
            if self.settings.log_errors {
                match err.pointer(self.cursor.input()) {
                    Some(pointer) => log::debug!("{}\n{}", pointer, err),
                    None => log::debug!("{}", err),
                }
            }
        }

        result
    }

    fn run(&mut self) -> Result<Statement> {
        let limit = self.settings.max_input_length;
        if limit > 0 && self.length > limit {
            return Err(Error::InputTooLong {
                length: self.length,
                limit,
            });
        }

        while !self.cursor.is_at_end() {
            let offset = self.cursor.offset();
            let token = self.cursor.peek();
            let next = self.step(token)?;
            log::trace!("{:?} -> {:?} at offset {}", self.state, next, offset);
            self.state = next;
        }

        if !self.state.is_accepting() {
            return Err(Error::syntax(
                self.cursor.offset(),
                format!("expected {}, found end of input", self.state.expectation()),
            ));
        }

        validator::validate(&self.statement, self.cursor.offset())?;

        let statement = std::mem::take(&mut self.statement);
        log::debug!(
            "parsed {} statement on {:?}",
            statement.kind,
            statement.tables
        );
        Ok(statement)
    }

    /// Один переход автомата
    fn step(&mut self, token: Token) -> Result<State> {
        match self.state {
            State::Beginning => match token.keyword() {
                Some(Keyword::Select) => self.begin(StatementKind::Select, State::SelectField),
                Some(Keyword::InsertInto) => self.begin(StatementKind::Insert, State::InsertTable),
                Some(Keyword::Update) => self.begin(StatementKind::Update, State::UpdateTable),
                Some(Keyword::DeleteFrom) => self.begin(StatementKind::Delete, State::DeleteTable),
                Some(Keyword::CreateTable) => {
                    self.begin(StatementKind::CreateTable, State::CreateTableName)
                }
                Some(Keyword::CreateView) => {
                    self.begin(StatementKind::CreateView, State::CreateViewName)
                }
                Some(Keyword::CreateIndex) => {
                    self.begin(StatementKind::CreateIndex, State::CreateIndexName)
                }
                Some(Keyword::CreateUser) => {
                    self.begin(StatementKind::CreateUser, State::CreateUserName)
                }
                Some(Keyword::Grant) => self.begin(StatementKind::Grant, State::PrivilegeAction),
                Some(Keyword::Revoke) => self.begin(StatementKind::Revoke, State::PrivilegeAction),
                _ => self.unexpected(),
            },

            // === SELECT ===
            State::SelectField => {
                let field = match &token {
                    Token::Word(word) if word == "*" => word.clone(),
                    _ => self.identifier(&token)?,
                };
                self.statement.fields.push(field);
                self.advance(State::SelectCommaOrFrom)
            }
            State::SelectCommaOrFrom => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::SelectField),
                Some(Keyword::From) => self.advance(State::SelectFromTable),
                _ => self.unexpected(),
            },
            State::SelectFromTable => {
                let table = self.identifier(&token)?;
                self.statement.tables.push(table);
                self.advance(State::SelectTableCommaOrClause)
            }
            State::SelectTableCommaOrClause => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::SelectFromTable),
                Some(Keyword::Where) => self.advance(State::WhereField),
                Some(Keyword::OrderBy) => self.advance(State::OrderByField),
                _ => self.unexpected(),
            },
            State::OrderByField => {
                let column = self.identifier(&token)?;
                self.statement.order_by.push(OrderByItem {
                    column,
                    order: SortOrder::Ascending,
                });
                self.advance(State::OrderByDirectionOrComma)
            }
            State::OrderByDirectionOrComma => match token.keyword() {
                Some(Keyword::Asc) | Some(Keyword::Desc) => {
                    let order = sort_order(&token);
                    match self.statement.order_by.last_mut() {
                        Some(item) => item.order = order,
                        None => return Err(Error::internal("ORDER BY has no open column")),
                    }
                    self.advance(State::OrderByComma)
                }
                Some(Keyword::Comma) => self.advance(State::OrderByField),
                _ => self.unexpected(),
            },
            State::OrderByComma => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::OrderByField),
                _ => self.unexpected(),
            },

            // === INSERT ===
            State::InsertTable => {
                let table = self.identifier(&token)?;
                self.statement.tables.push(table);
                self.advance(State::InsertFieldsOpeningParens)
            }
            State::InsertFieldsOpeningParens => self.expect(&token, Keyword::LeftParen, State::InsertField),
            State::InsertField => {
                let field = self.identifier(&token)?;
                self.statement.fields.push(field);
                self.advance(State::InsertFieldsCommaOrClosingParens)
            }
            State::InsertFieldsCommaOrClosingParens => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::InsertField),
                Some(Keyword::RightParen) => self.advance(State::InsertValuesKeyword),
                _ => self.unexpected(),
            },
            State::InsertValuesKeyword => {
                self.expect(&token, Keyword::Values, State::InsertValuesOpeningParens)
            }
            State::InsertValuesOpeningParens => {
                if !token.is(Keyword::LeftParen) {
                    return self.unexpected();
                }
                self.statement.inserts.push(Vec::new());
                self.open_row = Some(self.statement.inserts.len() - 1);
                self.advance(State::InsertValue)
            }
            State::InsertValue => {
                let value = self.value(&token)?;
                self.open_row()?.push(value);
                self.advance(State::InsertValuesCommaOrClosingParens)
            }
            State::InsertValuesCommaOrClosingParens => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::InsertValue),
                Some(Keyword::RightParen) => {
                    let expected = self.statement.fields.len();
                    let found = self.open_row()?.len();
                    if found != expected {
                        return Err(Error::semantic(
                            self.cursor.offset(),
                            format!(
                                "value count does not match column count: expected {}, found {}",
                                expected, found
                            ),
                        ));
                    }
                    self.open_row = None;
                    self.advance(State::InsertRowComma)
                }
                _ => self.unexpected(),
            },
            State::InsertRowComma => {
                self.expect(&token, Keyword::Comma, State::InsertValuesOpeningParens)
            }

            // === UPDATE ===
            State::UpdateTable => {
                let table = self.identifier(&token)?;
                self.statement.tables.push(table);
                self.advance(State::UpdateSet)
            }
            State::UpdateSet => self.expect(&token, Keyword::Set, State::UpdateField),
            State::UpdateField => {
                let field = self.identifier(&token)?;
                if !self.statement.fields.contains(&field) {
                    self.statement.fields.push(field.clone());
                }
                self.pending_update_field = Some(field);
                self.advance(State::UpdateEqual)
            }
            State::UpdateEqual => self.expect(&token, Keyword::Equal, State::UpdateValue),
            State::UpdateValue => {
                let value = self.value(&token)?;
                let field = self
                    .pending_update_field
                    .take()
                    .ok_or_else(|| Error::internal("UPDATE value without a target column"))?;
                self.statement.updates.insert(field, value);
                self.advance(State::UpdateCommaOrWhere)
            }
            State::UpdateCommaOrWhere => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::UpdateField),
                Some(Keyword::Where) => self.advance(State::WhereField),
                _ => self.unexpected(),
            },

            // === DELETE ===
            State::DeleteTable => {
                let table = self.identifier(&token)?;
                self.statement.tables.push(table);
                self.advance(State::DeleteWhere)
            }
            State::DeleteWhere => self.expect(&token, Keyword::Where, State::WhereField),

            // === WHERE ===
            State::WhereField => {
                let field = self.identifier(&token)?;
                self.statement.conditions.push(Condition::on_field(field));
                self.open_condition = Some(ConditionSlot::Where(
                    self.statement.conditions.len() - 1,
                ));
                self.advance(State::WhereOperator)
            }
            State::WhereOperator => {
                let (predicate, shape) = match token.keyword().and_then(predicate_for) {
                    Some(found) => found,
                    None => return self.unexpected(),
                };
                self.open_condition()?.predicate = Some(predicate);
                let next = match shape {
                    PredicateShape::Value => State::WhereValue,
                    PredicateShape::Range => State::WhereBetweenLow,
                    PredicateShape::List => State::WhereInOpeningParens,
                };
                self.advance(next)
            }
            State::WhereValue => {
                let operand = self.operand(&token)?;
                fill_operand(self.open_predicate()?, operand)?;
                self.advance(State::WhereConjunction)
            }
            State::WhereBetweenLow => {
                let value = self.value(&token)?;
                match self.open_predicate()? {
                    Predicate::Between { low, .. } => *low = value,
                    _ => return Err(Error::internal("BETWEEN bound outside of BETWEEN")),
                }
                self.advance(State::WhereBetweenAnd)
            }
            State::WhereBetweenAnd => self.expect(&token, Keyword::And, State::WhereBetweenHigh),
            State::WhereBetweenHigh => {
                let value = self.value(&token)?;
                match self.open_predicate()? {
                    Predicate::Between { high, .. } => *high = value,
                    _ => return Err(Error::internal("BETWEEN bound outside of BETWEEN")),
                }
                self.advance(State::WhereConjunction)
            }
            State::WhereInOpeningParens => {
                self.expect(&token, Keyword::LeftParen, State::WhereInValue)
            }
            State::WhereInValue => {
                let value = self.value(&token)?;
                push_list_value(self.open_predicate()?, value)?;
                self.advance(State::WhereInCommaOrClosingParens)
            }
            State::WhereInCommaOrClosingParens => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::WhereInValue),
                Some(Keyword::RightParen) => self.advance(State::WhereConjunction),
                _ => self.unexpected(),
            },
            State::WhereConjunction => match token.keyword() {
                Some(Keyword::And) => {
                    self.statement.condition_operators.push(ConditionOperator::And);
                    self.advance(State::WhereField)
                }
                Some(Keyword::Or) => {
                    self.statement.condition_operators.push(ConditionOperator::Or);
                    self.advance(State::WhereField)
                }
                Some(Keyword::OrderBy) if self.statement.kind == StatementKind::Select => {
                    self.advance(State::OrderByField)
                }
                _ => self.unexpected(),
            },

            // === CREATE TABLE ===
            State::CreateTableName => {
                let table = self.identifier(&token)?;
                self.statement.tables.push(table);
                self.advance(State::CreateTableOpeningParens)
            }
            State::CreateTableOpeningParens => {
                self.expect(&token, Keyword::LeftParen, State::CreateTableField)
            }
            State::CreateTableField => self.open_new_column(&token),
            State::CreateTableFieldType => {
                let data_type = match &token {
                    Token::Word(word) => DataType::parse(word),
                    _ => DataType::Unknown,
                };
                if data_type == DataType::Unknown {
                    return self.unexpected();
                }
                self.open_column()?.data_type = data_type;
                self.advance(State::CreateTableTypeSuffix)
            }
            State::CreateTableTypeSuffix => {
                if token.is(Keyword::LeftParen) {
                    return self.advance(State::CreateTableFieldLength);
                }
                self.column_tail(&token)
            }
            State::CreateTableFieldLength => {
                let length = match &token {
                    Token::Word(word) => word.parse::<u32>().ok(),
                    _ => None,
                };
                match length {
                    Some(length) => {
                        self.open_column()?.length = Some(length);
                        self.advance(State::CreateTableFieldClosingParens)
                    }
                    None => self.unexpected(),
                }
            }
            State::CreateTableFieldClosingParens => {
                self.expect(&token, Keyword::RightParen, State::CreateTableColumnTail)
            }
            State::CreateTableColumnTail => self.column_tail(&token),
            State::CreateTableDefaultValue => {
                let value = self.value(&token)?;
                let column = self.open_column()?;
                column.default = Some(value);
                column.constraints.push(ConstraintKind::Default);
                self.advance(State::CreateTableColumnTail)
            }
            State::CreateTableElement => match token.keyword() {
                Some(Keyword::PrimaryKey) => {
                    self.constraint_scope = ConstraintScope::Table;
                    self.advance(State::PrimaryKeyOpeningParens)
                }
                Some(Keyword::ForeignKey) => {
                    self.constraint_scope = ConstraintScope::Table;
                    self.advance(State::ForeignKeyOpeningParens)
                }
                Some(Keyword::Check) => {
                    self.constraint_scope = ConstraintScope::Table;
                    self.check_column = None;
                    self.fresh_check = true;
                    self.advance(State::CheckOpeningParens)
                }
                _ => self.open_new_column(&token),
            },
            State::CreateTableConstraintEnd => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::CreateTableElement),
                Some(Keyword::RightParen) => self.advance(State::Done),
                _ => self.unexpected(),
            },

            // === CHECK ===
            State::CheckOpeningParens => self.expect(&token, Keyword::LeftParen, State::CheckField),
            State::CheckField => {
                let field = self.identifier(&token)?;
                let column = match self.check_column {
                    Some(column) => column,
                    None => {
                        let column = self.column_index(&field)?;
                        self.check_column = Some(column);
                        column
                    }
                };

                let fresh = self.fresh_check;
                let definition = self.column_at(column)?;
                if fresh {
                    if !definition.check_conditions.is_empty() {
                        definition.check_operators.push(ConditionOperator::And);
                    }
                    definition.constraints.push(ConstraintKind::Check);
                }
                definition.check_conditions.push(Condition::on_field(field));
                let condition = definition.check_conditions.len() - 1;

                self.fresh_check = false;
                self.open_condition = Some(ConditionSlot::Check { column, condition });
                self.advance(State::CheckOperator)
            }
            State::CheckOperator => {
                let (predicate, shape) = match token.keyword().and_then(predicate_for) {
                    Some(found) => found,
                    None => return self.unexpected(),
                };
                let next = match shape {
                    PredicateShape::Value => State::CheckValue,
                    PredicateShape::List => State::CheckInOpeningParens,
                    PredicateShape::Range => return self.unexpected(),
                };
                self.open_condition()?.predicate = Some(predicate);
                self.advance(next)
            }
            State::CheckValue => {
                let operand = self.operand(&token)?;
                fill_operand(self.open_predicate()?, operand)?;
                self.advance(State::CheckConjunctionOrClosingParens)
            }
            State::CheckInOpeningParens => {
                self.expect(&token, Keyword::LeftParen, State::CheckInValue)
            }
            State::CheckInValue => {
                let value = self.value(&token)?;
                push_list_value(self.open_predicate()?, value)?;
                self.advance(State::CheckInCommaOrClosingParens)
            }
            State::CheckInCommaOrClosingParens => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::CheckInValue),
                Some(Keyword::RightParen) => self.advance(State::CheckConjunctionOrClosingParens),
                _ => self.unexpected(),
            },
            State::CheckConjunctionOrClosingParens => match token.keyword() {
                Some(Keyword::And) | Some(Keyword::Or) => {
                    let operator = if token.is(Keyword::And) {
                        ConditionOperator::And
                    } else {
                        ConditionOperator::Or
                    };
                    let column = self
                        .check_column
                        .ok_or_else(|| Error::internal("CHECK has no column"))?;
                    self.column_at(column)?.check_operators.push(operator);
                    self.advance(State::CheckField)
                }
                Some(Keyword::RightParen) => {
                    self.open_condition = None;
                    self.check_column = None;
                    let next = self.after_constraint();
                    self.advance(next)
                }
                _ => self.unexpected(),
            },

            // === PRIMARY KEY ===
            State::PrimaryKeyOpeningParens => {
                self.expect(&token, Keyword::LeftParen, State::PrimaryKeyField)
            }
            State::PrimaryKeyField => {
                let field = self.identifier(&token)?;
                let column = self.column_index(&field)?;
                let definition = self.column_at(column)?;
                definition.primary_key = true;
                definition.constraints.push(ConstraintKind::PrimaryKey);
                self.advance(State::PrimaryKeyCommaOrClosingParens)
            }
            State::PrimaryKeyCommaOrClosingParens => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::PrimaryKeyField),
                Some(Keyword::RightParen) => self.advance(State::CreateTableConstraintEnd),
                _ => self.unexpected(),
            },

            // === FOREIGN KEY ===
            State::ForeignKeyOpeningParens => {
                self.expect(&token, Keyword::LeftParen, State::ForeignKeyField)
            }
            State::ForeignKeyField => {
                let field = self.identifier(&token)?;
                let column = self.column_index(&field)?;
                self.mark_foreign_key(column)?;
                self.advance(State::ForeignKeyClosingParens)
            }
            State::ForeignKeyClosingParens => {
                self.expect(&token, Keyword::RightParen, State::ForeignKeyReferences)
            }
            State::ForeignKeyReferences => {
                self.expect(&token, Keyword::References, State::ForeignKeyReferenceTable)
            }
            State::ForeignKeyReferenceTable => {
                let table = self.identifier(&token)?;
                self.foreign_key()?.references = Some(ForeignKeyTarget {
                    table,
                    column: String::new(),
                });
                self.advance(State::ForeignKeyReferenceOpeningParens)
            }
            State::ForeignKeyReferenceOpeningParens => {
                self.expect(&token, Keyword::LeftParen, State::ForeignKeyReferenceField)
            }
            State::ForeignKeyReferenceField => {
                let field = self.identifier(&token)?;
                match self.foreign_key()?.references.as_mut() {
                    Some(target) => target.column = field,
                    None => return Err(Error::internal("foreign key has no referenced table")),
                }
                self.advance(State::ForeignKeyReferenceClosingParens)
            }
            State::ForeignKeyReferenceClosingParens => {
                if !token.is(Keyword::RightParen) {
                    return self.unexpected();
                }
                self.foreign_key_column = None;
                let next = self.after_constraint();
                self.advance(next)
            }

            // === CREATE VIEW ===
            State::CreateViewName => {
                let view = self.identifier(&token)?;
                self.statement.tables.push(view);
                self.advance(State::CreateViewColumnsOrAs)
            }
            State::CreateViewColumnsOrAs => match token.keyword() {
                Some(Keyword::LeftParen) => self.advance(State::CreateViewField),
                Some(Keyword::As) => self.advance(State::CreateViewSelect),
                _ => self.unexpected(),
            },
            State::CreateViewField => {
                let field = self.identifier(&token)?;
                self.statement.fields.push(field);
                self.advance(State::CreateViewCommaOrClosingParens)
            }
            State::CreateViewCommaOrClosingParens => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::CreateViewField),
                Some(Keyword::RightParen) => self.advance(State::CreateViewAs),
                _ => self.unexpected(),
            },
            State::CreateViewAs => self.expect(&token, Keyword::As, State::CreateViewSelect),
            State::CreateViewSelect => {
                if !token.is(Keyword::Select) {
                    return self.unexpected();
                }
                // Подзапрос сохраняется как есть, без разбора
                self.statement.view_select = Some(self.cursor.pop_rest().to_string());
                Ok(State::Done)
            }

            // === CREATE INDEX ===
            State::CreateIndexName => {
                let name = self.identifier(&token)?;
                self.statement.index = Some(IndexDefinition {
                    name,
                    columns: Vec::new(),
                });
                self.advance(State::CreateIndexOn)
            }
            State::CreateIndexOn => self.expect(&token, Keyword::On, State::CreateIndexTable),
            State::CreateIndexTable => {
                let table = self.identifier(&token)?;
                self.statement.tables.push(table);
                self.advance(State::CreateIndexOpeningParens)
            }
            State::CreateIndexOpeningParens => {
                self.expect(&token, Keyword::LeftParen, State::CreateIndexField)
            }
            State::CreateIndexField => {
                let name = self.identifier(&token)?;
                self.index()?.columns.push(IndexColumn {
                    name: name.clone(),
                    order: SortOrder::Ascending,
                });
                self.statement.fields.push(name);
                self.advance(State::CreateIndexOrderOrCommaOrClosingParens)
            }
            State::CreateIndexOrderOrCommaOrClosingParens => match token.keyword() {
                Some(Keyword::Asc) | Some(Keyword::Desc) => {
                    let order = sort_order(&token);
                    match self.index()?.columns.last_mut() {
                        Some(column) => column.order = order,
                        None => return Err(Error::internal("index has no open column")),
                    }
                    self.advance(State::CreateIndexCommaOrClosingParens)
                }
                Some(Keyword::Comma) => self.advance(State::CreateIndexField),
                Some(Keyword::RightParen) => self.advance(State::Done),
                _ => self.unexpected(),
            },
            State::CreateIndexCommaOrClosingParens => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::CreateIndexField),
                Some(Keyword::RightParen) => self.advance(State::Done),
                _ => self.unexpected(),
            },

            // === CREATE USER ===
            State::CreateUserName => {
                let user = self.identifier(&token)?;
                self.statement.users.push(user);
                self.advance(State::CreateUserIdentifiedBy)
            }
            State::CreateUserIdentifiedBy => {
                self.expect(&token, Keyword::IdentifiedBy, State::CreateUserPassword)
            }
            State::CreateUserPassword => {
                let password = self.value(&token)?;
                self.statement.password = Some(password);
                self.advance(State::Done)
            }

            // === GRANT / REVOKE ===
            State::PrivilegeAction => {
                let action = match token.keyword() {
                    Some(Keyword::Select) => PrivilegeAction::Select,
                    Some(Keyword::Insert) => PrivilegeAction::Insert,
                    Some(Keyword::Update) => PrivilegeAction::Update,
                    Some(Keyword::Delete) => PrivilegeAction::Delete,
                    Some(Keyword::AllPrivileges) => PrivilegeAction::All,
                    _ => return self.unexpected(),
                };
                self.statement.privileges.push(Privilege {
                    action,
                    columns: Vec::new(),
                });
                self.advance(State::PrivilegeColumnsOrNext)
            }
            State::PrivilegeColumnsOrNext => match token.keyword() {
                Some(Keyword::LeftParen) => self.advance(State::PrivilegeColumn),
                Some(Keyword::Comma) => self.advance(State::PrivilegeAction),
                Some(Keyword::OnTable) | Some(Keyword::On) => self.advance(State::PrivilegeTable),
                _ => self.unexpected(),
            },
            State::PrivilegeColumn => {
                let column = self.identifier(&token)?;
                if !self.statement.fields.contains(&column) {
                    self.statement.fields.push(column.clone());
                }
                match self.statement.privileges.last_mut() {
                    Some(privilege) => privilege.columns.push(column),
                    None => return Err(Error::internal("privilege column without a privilege")),
                }
                self.advance(State::PrivilegeColumnCommaOrClosingParens)
            }
            State::PrivilegeColumnCommaOrClosingParens => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::PrivilegeColumn),
                Some(Keyword::RightParen) => self.advance(State::PrivilegeCommaOrOnTable),
                _ => self.unexpected(),
            },
            State::PrivilegeCommaOrOnTable => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::PrivilegeAction),
                Some(Keyword::OnTable) | Some(Keyword::On) => self.advance(State::PrivilegeTable),
                _ => self.unexpected(),
            },
            State::PrivilegeTable => {
                let table = self.identifier(&token)?;
                self.statement.tables.push(table);
                self.advance(State::PrivilegeTableCommaOrGrantee)
            }
            State::PrivilegeTableCommaOrGrantee => match token.keyword() {
                Some(Keyword::Comma) => self.advance(State::PrivilegeTable),
                Some(Keyword::To) if self.statement.kind == StatementKind::Grant => {
                    self.advance(State::Grantee)
                }
                Some(Keyword::From) if self.statement.kind == StatementKind::Revoke => {
                    self.advance(State::Grantee)
                }
                _ => self.unexpected(),
            },
            State::Grantee => {
                let user = self.identifier(&token)?;
                self.statement.users.push(user);
                self.advance(State::GranteeComma)
            }
            State::GranteeComma => self.expect(&token, Keyword::Comma, State::Grantee),

            State::Done => self.unexpected(),
        }
    }

    /// Хвост определения колонки: ограничения, `,` или `)`
    fn column_tail(&mut self, token: &Token) -> Result<State> {
        match token.keyword() {
            Some(Keyword::Comma) => {
                self.current_column = None;
                self.advance(State::CreateTableElement)
            }
            Some(Keyword::RightParen) => {
                self.current_column = None;
                self.advance(State::Done)
            }
            Some(Keyword::NotNull) => {
                let column = self.open_column()?;
                column.not_null = true;
                column.constraints.push(ConstraintKind::NotNull);
                self.advance(State::CreateTableColumnTail)
            }
            Some(Keyword::Unique) => {
                let column = self.open_column()?;
                column.unique = true;
                column.constraints.push(ConstraintKind::Unique);
                self.advance(State::CreateTableColumnTail)
            }
            Some(Keyword::PrimaryKey) => {
                let column = self.open_column()?;
                column.primary_key = true;
                column.constraints.push(ConstraintKind::PrimaryKey);
                self.advance(State::CreateTableColumnTail)
            }
            Some(Keyword::Default) => self.advance(State::CreateTableDefaultValue),
            Some(Keyword::Check) => {
                self.constraint_scope = ConstraintScope::Column;
                self.check_column = self.current_column;
                self.fresh_check = true;
                self.advance(State::CheckOpeningParens)
            }
            Some(Keyword::References) => {
                let column = self
                    .current_column
                    .ok_or_else(|| Error::internal("REFERENCES without an open column"))?;
                self.constraint_scope = ConstraintScope::Column;
                self.mark_foreign_key(column)?;
                self.advance(State::ForeignKeyReferenceTable)
            }
            _ => self.unexpected(),
        }
    }

    /// Начинает новую колонку CREATE TABLE
    fn open_new_column(&mut self, token: &Token) -> Result<State> {
        let name = self.identifier(token)?;
        self.statement.columns.push(ColumnDefinition::new(name));
        self.current_column = Some(self.statement.columns.len() - 1);
        self.advance(State::CreateTableFieldType)
    }

    fn mark_foreign_key(&mut self, column: usize) -> Result<()> {
        let definition = self.column_at(column)?;
        definition.foreign_key = true;
        definition.constraints.push(ConstraintKind::ForeignKey);
        self.foreign_key_column = Some(column);
        Ok(())
    }

    fn after_constraint(&self) -> State {
        match self.constraint_scope {
            ConstraintScope::Column => State::CreateTableColumnTail,
            ConstraintScope::Table => State::CreateTableConstraintEnd,
        }
    }
}

impl<'a> SqlParser<'a> {
    fn begin(&mut self, kind: StatementKind, next: State) -> Result<State> {
        self.statement.kind = kind;
        self.advance(next)
    }

    /// Потребляет токен и переходит в `next`
    fn advance(&mut self, next: State) -> Result<State> {
        self.cursor.pop();
        Ok(next)
    }

    /// Потребляет ожидаемое ключевое слово
    fn expect(&mut self, token: &Token, keyword: Keyword, next: State) -> Result<State> {
        if token.is(keyword) {
            self.advance(next)
        } else {
            self.unexpected()
        }
    }

    /// Ошибка "expected X, found Y" в текущей позиции
    fn unexpected<T>(&self) -> Result<T> {
        let found = if self.cursor.is_at_end() {
            "end of input".to_string()
        } else {
            format!("'{}'", self.cursor.fragment())
        };
        Err(Error::syntax(
            self.cursor.offset(),
            format!("expected {}, found {}", self.state.expectation(), found),
        ))
    }

    fn identifier(&self, token: &Token) -> Result<String> {
        match token.identifier() {
            Some(name) => Ok(name.to_string()),
            None => self.unexpected(),
        }
    }

    fn value(&self, token: &Token) -> Result<String> {
        match token.value() {
            Some(value) => Ok(value.to_string()),
            None => self.unexpected(),
        }
    }

    /// Правая часть сравнения всегда значение, даже если записана без кавычек
    fn operand(&self, token: &Token) -> Result<Operand> {
        self.value(token).map(Operand::Literal)
    }

    /// Индекс колонки по имени (при повторах - последней)
    fn column_index(&self, name: &str) -> Result<usize> {
        self.statement
            .columns
            .iter()
            .rposition(|column| column.name == name)
            .ok_or_else(|| {
                Error::semantic(
                    self.cursor.offset(),
                    format!("column '{}' is not defined", name),
                )
            })
    }

    fn column_at(&mut self, index: usize) -> Result<&mut ColumnDefinition> {
        self.statement
            .columns
            .get_mut(index)
            .ok_or_else(|| Error::internal(format!("column index {} is out of range", index)))
    }

    fn open_column(&mut self) -> Result<&mut ColumnDefinition> {
        let index = self
            .current_column
            .ok_or_else(|| Error::internal("no open column"))?;
        self.column_at(index)
    }

    fn foreign_key(&mut self) -> Result<&mut ColumnDefinition> {
        let index = self
            .foreign_key_column
            .ok_or_else(|| Error::internal("no foreign key in progress"))?;
        self.column_at(index)
    }

    fn open_row(&mut self) -> Result<&mut Vec<String>> {
        let index = self
            .open_row
            .ok_or_else(|| Error::internal("no open INSERT row"))?;
        self.statement
            .inserts
            .get_mut(index)
            .ok_or_else(|| Error::internal("INSERT row index is out of range"))
    }

    fn index(&mut self) -> Result<&mut IndexDefinition> {
        self.statement
            .index
            .as_mut()
            .ok_or_else(|| Error::internal("index name is missing"))
    }

    fn open_condition(&mut self) -> Result<&mut Condition> {
        let slot = self
            .open_condition
            .ok_or_else(|| Error::internal("no open condition"))?;
        let condition = match slot {
            ConditionSlot::Where(index) => self.statement.conditions.get_mut(index),
            ConditionSlot::Check { column, condition } => self
                .statement
                .columns
                .get_mut(column)
                .and_then(|definition| definition.check_conditions.get_mut(condition)),
        };
        condition.ok_or_else(|| Error::internal("open condition index is out of range"))
    }

    fn open_predicate(&mut self) -> Result<&mut Predicate> {
        self.open_condition()?
            .predicate
            .as_mut()
            .ok_or_else(|| Error::internal("condition has no operator yet"))
    }
}

/// Предикат-заготовка для оператора и форма его правой части
fn predicate_for(keyword: Keyword) -> Option<(Predicate, PredicateShape)> {
    let compare = |operator| {
        Some((
            Predicate::Compare {
                operator,
                right: Operand::Literal(String::new()),
            },
            PredicateShape::Value,
        ))
    };
    let like = |negated| {
        Some((
            Predicate::Like {
                negated,
                pattern: String::new(),
            },
            PredicateShape::Value,
        ))
    };
    let between = |negated| {
        Some((
            Predicate::Between {
                negated,
                low: String::new(),
                high: String::new(),
            },
            PredicateShape::Range,
        ))
    };
    let list = |negated| {
        Some((
            Predicate::In {
                negated,
                values: Vec::new(),
            },
            PredicateShape::List,
        ))
    };

    match keyword {
        Keyword::Equal => compare(Operator::Eq),
        Keyword::NotEqual => compare(Operator::Ne),
        Keyword::Greater => compare(Operator::Gt),
        Keyword::Less => compare(Operator::Lt),
        Keyword::GreaterEqual => compare(Operator::Gte),
        Keyword::LessEqual => compare(Operator::Lte),
        Keyword::Like => like(false),
        Keyword::NotLike => like(true),
        Keyword::Between => between(false),
        Keyword::NotBetween => between(true),
        Keyword::In => list(false),
        Keyword::NotIn => list(true),
        _ => None,
    }
}

fn fill_operand(predicate: &mut Predicate, operand: Operand) -> Result<()> {
    match predicate {
        Predicate::Compare { right, .. } => *right = operand,
        Predicate::Like { pattern, .. } => *pattern = operand.into_text(),
        _ => return Err(Error::internal("single value for a range or list operator")),
    }
    Ok(())
}

fn push_list_value(predicate: &mut Predicate, value: String) -> Result<()> {
    match predicate {
        Predicate::In { values, .. } => values.push(value),
        _ => return Err(Error::internal("list value outside of IN")),
    }
    Ok(())
}

fn sort_order(token: &Token) -> SortOrder {
    if token.is(Keyword::Desc) {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    }
}

/// Разбирает один запрос с настройками по умолчанию
pub fn parse_one(text: &str) -> Result<Statement> {
    SqlParser::new(text).parse()
}

/// Разбирает один запрос с заданными настройками
pub fn parse_one_with(text: &str, settings: &ParserSettings) -> Result<Statement> {
    SqlParser::with_settings(text, settings.clone()).parse()
}

/// Ошибка пакетного разбора: уже разобранные запросы и первая ошибка
#[derive(thiserror::Error, Debug)]
#[error("statement {index} failed: {source}")]
pub struct BatchError {
    /// Запросы, разобранные до ошибки
    pub parsed: Vec<Statement>,
    /// Номер запроса с ошибкой (с нуля)
    pub index: usize,
    #[source]
    pub source: Error,
}

/// Разбирает запросы по порядку и останавливается на первой ошибке
pub fn parse_many<I, S>(texts: I) -> std::result::Result<Vec<Statement>, BatchError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_many_with(texts, &ParserSettings::default())
}

/// То же, что [`parse_many`], с заданными настройками
pub fn parse_many_with<I, S>(
    texts: I,
    settings: &ParserSettings,
) -> std::result::Result<Vec<Statement>, BatchError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = Vec::new();
    for (index, text) in texts.into_iter().enumerate() {
        match parse_one_with(text.as_ref(), settings) {
            Ok(statement) => parsed.push(statement),
            Err(source) => {
                return Err(BatchError {
                    parsed,
                    index,
                    source,
                })
            }
        }
    }
    Ok(parsed)
}

/// Разбирает каждый запрос независимо и параллельно; порядок сохраняется
pub fn parse_each<S>(texts: &[S]) -> Vec<Result<Statement>>
where
    S: AsRef<str> + Sync,
{
    parse_each_with(texts, &ParserSettings::default())
}

/// То же, что [`parse_each`], с заданными настройками
pub fn parse_each_with<S>(texts: &[S], settings: &ParserSettings) -> Vec<Result<Statement>>
where
    S: AsRef<str> + Sync,
{
    texts
        .par_iter()
        .map(|text| parse_one_with(text.as_ref(), settings))
        .collect()
}
