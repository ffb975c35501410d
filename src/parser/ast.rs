//! Разобранное представление запроса для stepql
//!
//! Все структуры строятся по ходу разбора одного запроса и после
//! возврата из парсера не изменяются.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Вид запроса
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Вид еще не определен; в готовом запросе не встречается
    #[default]
    Unknown,
    Select,
    Insert,
    Update,
    Delete,
    CreateTable,
    CreateView,
    CreateIndex,
    CreateUser,
    /// Выдача прав пользователю
    Grant,
    /// Отзыв прав у пользователя
    Revoke,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatementKind::Unknown => "Unknown",
            StatementKind::Select => "Select",
            StatementKind::Insert => "Insert",
            StatementKind::Update => "Update",
            StatementKind::Delete => "Delete",
            StatementKind::CreateTable => "Create Table",
            StatementKind::CreateView => "Create View",
            StatementKind::CreateIndex => "Create Index",
            StatementKind::CreateUser => "Create User",
            StatementKind::Grant => "Grant",
            StatementKind::Revoke => "Revoke",
        };
        f.write_str(name)
    }
}

/// Разобранный запрос
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    /// Таблицы запроса; для CREATE VIEW - имя представления
    pub tables: Vec<String>,
    /// Затронутые колонки в порядке появления
    pub fields: Vec<String>,
    /// Условия WHERE
    pub conditions: Vec<Condition>,
    /// Связки между соседними условиями, на одну меньше, чем условий
    pub condition_operators: Vec<ConditionOperator>,
    /// Присваивания UPDATE: колонка -> значение
    pub updates: IndexMap<String, String>,
    /// Строки INSERT
    pub inserts: Vec<Vec<String>>,
    /// Колонки CREATE TABLE
    pub columns: Vec<ColumnDefinition>,
    /// Текст SELECT для CREATE VIEW, дословно
    pub view_select: Option<String>,
    pub order_by: Vec<OrderByItem>,
    pub index: Option<IndexDefinition>,
    pub privileges: Vec<Privilege>,
    /// Пользователи CREATE USER, GRANT и REVOKE
    pub users: Vec<String>,
    pub password: Option<String>,
}

impl Statement {
    /// Создает пустой запрос заданного вида
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Колонка CREATE TABLE по имени (при повторах - последняя)
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().rev().find(|column| column.name == name)
    }
}

/// Тип данных колонки
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Нераспознанный тип; в готовом запросе не встречается
    #[default]
    Unknown,
    /// Целое со знаком
    SmallInt,
    /// 64-битное число с плавающей точкой
    Double,
    /// Дата и время в формате YYYY-MM-DD HH:MM:SS
    DateTime,
    /// Строка переменной длины
    Varchar,
}

impl DataType {
    /// Распознает имя типа без учета регистра
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "SMALLINT" | "INT" => DataType::SmallInt,
            "DOUBLE" => DataType::Double,
            "DATETIME" => DataType::DateTime,
            "VARCHAR" | "CHAR" => DataType::Varchar,
            _ => DataType::Unknown,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Unknown => "UNKNOWN",
            DataType::SmallInt => "SMALLINT",
            DataType::Double => "DOUBLE",
            DataType::DateTime => "DATETIME",
            DataType::Varchar => "VARCHAR",
        };
        f.write_str(name)
    }
}

/// Вид ограничения колонки в порядке объявления
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    NotNull,
    Unique,
    PrimaryKey,
    Check,
    ForeignKey,
    Default,
}

/// Цель внешнего ключа
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyTarget {
    pub table: String,
    pub column: String,
}

/// Определение колонки CREATE TABLE
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    /// Длина из `VARCHAR(20)`
    pub length: Option<u32>,
    pub not_null: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub foreign_key: bool,
    pub references: Option<ForeignKeyTarget>,
    pub default: Option<String>,
    pub constraints: Vec<ConstraintKind>,
    /// Условия CHECK
    pub check_conditions: Vec<Condition>,
    /// Связки между условиями CHECK
    pub check_operators: Vec<ConditionOperator>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Операнд условия: ссылка на колонку или значение
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    Field(String),
    Literal(String),
}

impl Operand {
    pub fn is_field(&self) -> bool {
        matches!(self, Operand::Field(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Operand::Field(text) | Operand::Literal(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Operand::Field(text) | Operand::Literal(text) => text,
        }
    }
}

/// Оператор условия
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    Between,
    NotBetween,
    Like,
    NotLike,
    In,
    NotIn,
}

impl Operator {
    /// Простой оператор сравнения
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::Ne | Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
        };
        f.write_str(symbol)
    }
}

/// Правая часть условия; заполнена ровно одна форма
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    /// `=`, `!=`, `>`, `<`, `>=`, `<=`
    Compare { operator: Operator, right: Operand },
    /// `[NOT] BETWEEN low AND high`
    Between {
        negated: bool,
        low: String,
        high: String,
    },
    /// `[NOT] IN (values)`
    In { negated: bool, values: Vec<String> },
    /// `[NOT] LIKE pattern`
    Like { negated: bool, pattern: String },
}

impl Predicate {
    /// Плоский оператор предиката
    pub fn operator(&self) -> Operator {
        match self {
            Predicate::Compare { operator, .. } => *operator,
            Predicate::Between { negated: false, .. } => Operator::Between,
            Predicate::Between { negated: true, .. } => Operator::NotBetween,
            Predicate::In { negated: false, .. } => Operator::In,
            Predicate::In { negated: true, .. } => Operator::NotIn,
            Predicate::Like { negated: false, .. } => Operator::Like,
            Predicate::Like { negated: true, .. } => Operator::NotLike,
        }
    }
}

/// Одно условие WHERE или CHECK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub left: Operand,
    /// Пусто, пока оператор не прочитан
    pub predicate: Option<Predicate>,
}

impl Condition {
    /// Условие над колонкой без оператора
    pub fn on_field(field: impl Into<String>) -> Self {
        Self {
            left: Operand::Field(field.into()),
            predicate: None,
        }
    }

    pub fn operator(&self) -> Option<Operator> {
        self.predicate.as_ref().map(Predicate::operator)
    }
}

/// Связка между условиями; вычисляется строго слева направо
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOperator {
    And,
    Or,
}

/// Направление сортировки
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Элемент ORDER BY
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub column: String,
    pub order: SortOrder,
}

/// Колонка индекса
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub name: String,
    pub order: SortOrder,
}

/// Определение CREATE INDEX
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub columns: Vec<IndexColumn>,
}

/// Действие, на которое выдается право
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrivilegeAction {
    Select,
    Insert,
    Update,
    Delete,
    All,
}

/// Право GRANT/REVOKE, возможно ограниченное колонками
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privilege {
    pub action: PrivilegeAction,
    pub columns: Vec<String>,
}
