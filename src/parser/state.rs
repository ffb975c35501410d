//! Состояния автомата разбора
//!
//! Каждое состояние описывает, какой токен допустим следующим. Переход
//! потребляет не больше одного токена. Пример для
//! `UPDATE Student SET Sage = '22' WHERE Sno = '201215121'`:
//!
//! | состояние            | токен       | переход              |
//! |----------------------|-------------|----------------------|
//! | `Beginning`          | `UPDATE`    | `UpdateTable`        |
//! | `UpdateTable`        | `Student`   | `UpdateSet`          |
//! | `UpdateSet`          | `SET`       | `UpdateField`        |
//! | `UpdateField`        | `Sage`      | `UpdateEqual`        |
//! | `UpdateEqual`        | `=`         | `UpdateValue`        |
//! | `UpdateValue`        | `'22'`      | `UpdateCommaOrWhere` |
//! | `UpdateCommaOrWhere` | `WHERE`     | `WhereField`         |
//! | `WhereField`         | `Sno`       | `WhereOperator`      |
//! | `WhereOperator`      | `=`         | `WhereValue`         |
//! | `WhereValue`         | `'201215121'` | `WhereConjunction` |

/// Состояние автомата разбора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Beginning,

    // === SELECT ===
    SelectField,
    SelectCommaOrFrom,
    SelectFromTable,
    SelectTableCommaOrClause,
    OrderByField,
    OrderByDirectionOrComma,
    OrderByComma,

    // === INSERT ===
    InsertTable,
    InsertFieldsOpeningParens,
    InsertField,
    InsertFieldsCommaOrClosingParens,
    InsertValuesKeyword,
    InsertValuesOpeningParens,
    InsertValue,
    InsertValuesCommaOrClosingParens,
    InsertRowComma,

    // === UPDATE ===
    UpdateTable,
    UpdateSet,
    UpdateField,
    UpdateEqual,
    UpdateValue,
    UpdateCommaOrWhere,

    // === DELETE ===
    DeleteTable,
    DeleteWhere,

    // === WHERE ===
    WhereField,
    WhereOperator,
    WhereValue,
    WhereBetweenLow,
    WhereBetweenAnd,
    WhereBetweenHigh,
    WhereInOpeningParens,
    WhereInValue,
    WhereInCommaOrClosingParens,
    WhereConjunction,

    // === CREATE TABLE ===
    CreateTableName,
    CreateTableOpeningParens,
    CreateTableField,
    CreateTableFieldType,
    CreateTableTypeSuffix,
    CreateTableFieldLength,
    CreateTableFieldClosingParens,
    CreateTableColumnTail,
    CreateTableDefaultValue,
    CreateTableElement,
    CreateTableConstraintEnd,

    // === CHECK ===
    CheckOpeningParens,
    CheckField,
    CheckOperator,
    CheckValue,
    CheckInOpeningParens,
    CheckInValue,
    CheckInCommaOrClosingParens,
    CheckConjunctionOrClosingParens,

    // === PRIMARY KEY ===
    PrimaryKeyOpeningParens,
    PrimaryKeyField,
    PrimaryKeyCommaOrClosingParens,

    // === FOREIGN KEY ===
    ForeignKeyOpeningParens,
    ForeignKeyField,
    ForeignKeyClosingParens,
    ForeignKeyReferences,
    ForeignKeyReferenceTable,
    ForeignKeyReferenceOpeningParens,
    ForeignKeyReferenceField,
    ForeignKeyReferenceClosingParens,

    // === CREATE VIEW ===
    CreateViewName,
    CreateViewColumnsOrAs,
    CreateViewField,
    CreateViewCommaOrClosingParens,
    CreateViewAs,
    CreateViewSelect,

    // === CREATE INDEX ===
    CreateIndexName,
    CreateIndexOn,
    CreateIndexTable,
    CreateIndexOpeningParens,
    CreateIndexField,
    CreateIndexOrderOrCommaOrClosingParens,
    CreateIndexCommaOrClosingParens,

    // === CREATE USER ===
    CreateUserName,
    CreateUserIdentifiedBy,
    CreateUserPassword,

    // === GRANT / REVOKE ===
    PrivilegeAction,
    PrivilegeColumnsOrNext,
    PrivilegeColumn,
    PrivilegeColumnCommaOrClosingParens,
    PrivilegeCommaOrOnTable,
    PrivilegeTable,
    PrivilegeTableCommaOrGrantee,
    Grantee,
    GranteeComma,

    /// Запрос закончен, дальше допустим только конец ввода
    Done,
}

impl State {
    /// Может ли ввод закончиться в этом состоянии
    pub fn is_accepting(&self) -> bool {
        matches!(
            self,
            State::SelectTableCommaOrClause
                | State::OrderByDirectionOrComma
                | State::OrderByComma
                | State::InsertRowComma
                | State::UpdateCommaOrWhere
                | State::DeleteWhere
                | State::WhereConjunction
                | State::GranteeComma
                | State::Done
        )
    }

    /// Что ожидается в этом состоянии, для сообщения "expected ..."
    pub fn expectation(&self) -> &'static str {
        match self {
            State::Beginning => {
                "SELECT, INSERT INTO, UPDATE, DELETE FROM, CREATE TABLE, CREATE VIEW, CREATE INDEX, CREATE USER, GRANT or REVOKE"
            }

            State::SelectField => "a column name or '*'",
            State::SelectCommaOrFrom => "',' or FROM",
            State::SelectFromTable => "a table name",
            State::SelectTableCommaOrClause => "',', WHERE, ORDER BY or end of statement",
            State::OrderByField => "a column name to ORDER BY",
            State::OrderByDirectionOrComma => "ASC, DESC, ',' or end of statement",
            State::OrderByComma => "',' or end of statement",

            State::InsertTable => "a table name to INSERT INTO",
            State::InsertFieldsOpeningParens => "'(' before the column list",
            State::InsertField => "a column name to INSERT",
            State::InsertFieldsCommaOrClosingParens => "',' or ')' in the column list",
            State::InsertValuesKeyword => "VALUES",
            State::InsertValuesOpeningParens => "'(' before the values",
            State::InsertValue => "a value to INSERT",
            State::InsertValuesCommaOrClosingParens => "',' or ')' in the values",
            State::InsertRowComma => "',' before the next row or end of statement",

            State::UpdateTable => "a table name to UPDATE",
            State::UpdateSet => "SET",
            State::UpdateField => "a column name to UPDATE",
            State::UpdateEqual => "'='",
            State::UpdateValue => "a value to assign",
            State::UpdateCommaOrWhere => "',', WHERE or end of statement",

            State::DeleteTable => "a table name to DELETE FROM",
            State::DeleteWhere => "WHERE or end of statement",

            State::WhereField => "a column name in WHERE",
            State::WhereOperator => {
                "a comparison operator, LIKE, NOT LIKE, IN, NOT IN, BETWEEN or NOT BETWEEN"
            }
            State::WhereValue => "a value to compare with",
            State::WhereBetweenLow => "the lower BETWEEN bound",
            State::WhereBetweenAnd => "AND between the BETWEEN bounds",
            State::WhereBetweenHigh => "the upper BETWEEN bound",
            State::WhereInOpeningParens => "'(' before the IN list",
            State::WhereInValue => "a value in the IN list",
            State::WhereInCommaOrClosingParens => "',' or ')' in the IN list",
            State::WhereConjunction => "AND, OR or end of statement",

            State::CreateTableName => "a table name to CREATE",
            State::CreateTableOpeningParens => "'(' before the column definitions",
            State::CreateTableField => "a column name",
            State::CreateTableFieldType => "a data type (SMALLINT, DOUBLE, DATETIME or VARCHAR)",
            State::CreateTableTypeSuffix => "a length, a constraint, ',' or ')'",
            State::CreateTableFieldLength => "an integer column length",
            State::CreateTableFieldClosingParens => "')' after the column length",
            State::CreateTableColumnTail => {
                "NOT NULL, UNIQUE, PRIMARY KEY, DEFAULT, CHECK, REFERENCES, ',' or ')'"
            }
            State::CreateTableDefaultValue => "a DEFAULT value",
            State::CreateTableElement => {
                "a column name, PRIMARY KEY, FOREIGN KEY or CHECK"
            }
            State::CreateTableConstraintEnd => "',' or ')'",

            State::CheckOpeningParens => "'(' after CHECK",
            State::CheckField => "a column name in CHECK",
            State::CheckOperator => "a comparison operator, LIKE, NOT LIKE, IN or NOT IN",
            State::CheckValue => "a value to check against",
            State::CheckInOpeningParens => "'(' before the IN list",
            State::CheckInValue => "a value in the IN list",
            State::CheckInCommaOrClosingParens => "',' or ')' in the IN list",
            State::CheckConjunctionOrClosingParens => "AND, OR or ')' closing CHECK",

            State::PrimaryKeyOpeningParens => "'(' after PRIMARY KEY",
            State::PrimaryKeyField => "a column name in PRIMARY KEY",
            State::PrimaryKeyCommaOrClosingParens => "',' or ')' in PRIMARY KEY",

            State::ForeignKeyOpeningParens => "'(' after FOREIGN KEY",
            State::ForeignKeyField => "a column name in FOREIGN KEY",
            State::ForeignKeyClosingParens => "')' after the FOREIGN KEY column",
            State::ForeignKeyReferences => "REFERENCES",
            State::ForeignKeyReferenceTable => "a referenced table name",
            State::ForeignKeyReferenceOpeningParens => "'(' before the referenced column",
            State::ForeignKeyReferenceField => "a referenced column name",
            State::ForeignKeyReferenceClosingParens => "')' after the referenced column",

            State::CreateViewName => "a view name to CREATE",
            State::CreateViewColumnsOrAs => "'(' or AS",
            State::CreateViewField => "a view column name",
            State::CreateViewCommaOrClosingParens => "',' or ')' in the view columns",
            State::CreateViewAs => "AS",
            State::CreateViewSelect => "SELECT",

            State::CreateIndexName => "an index name to CREATE",
            State::CreateIndexOn => "ON",
            State::CreateIndexTable => "a table name to index",
            State::CreateIndexOpeningParens => "'(' before the index columns",
            State::CreateIndexField => "a column name to index",
            State::CreateIndexOrderOrCommaOrClosingParens => "ASC, DESC, ',' or ')'",
            State::CreateIndexCommaOrClosingParens => "',' or ')' in the index columns",

            State::CreateUserName => "a user name to CREATE",
            State::CreateUserIdentifiedBy => "IDENTIFIED BY",
            State::CreateUserPassword => "a password",

            State::PrivilegeAction => "SELECT, INSERT, UPDATE, DELETE or ALL PRIVILEGES",
            State::PrivilegeColumnsOrNext => "'(', ',' or ON TABLE",
            State::PrivilegeColumn => "a column name for the privilege",
            State::PrivilegeColumnCommaOrClosingParens => "',' or ')' in the privilege columns",
            State::PrivilegeCommaOrOnTable => "',' or ON TABLE",
            State::PrivilegeTable => "a table name",
            State::PrivilegeTableCommaOrGrantee => "',', TO or FROM",
            State::Grantee => "a user name",
            State::GranteeComma => "',' or end of statement",

            State::Done => "end of statement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beginning_is_not_accepting() {
        assert!(!State::Beginning.is_accepting());
        assert!(!State::WhereField.is_accepting());
        assert!(State::Done.is_accepting());
        assert!(State::WhereConjunction.is_accepting());
    }
}
