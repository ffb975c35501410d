//! Семантическая проверка разобранного запроса
//!
//! Вызывается один раз, когда синтаксический разбор дошел до конца ввода.
//! Все ошибки отмечаются смещением конца запроса.

use crate::common::{Error, Result};
use crate::parser::ast::{
    Condition, ConditionOperator, DataType, Predicate, Statement, StatementKind,
};

/// Проверяет межполевые правила запроса
pub fn validate(statement: &Statement, offset: usize) -> Result<()> {
    if statement.kind == StatementKind::Unknown {
        return Err(Error::semantic(offset, "statement kind is not recognized"));
    }

    if statement.tables.iter().any(|table| table.is_empty()) {
        return Err(Error::semantic(offset, "table name is empty"));
    }

    match statement.kind {
        StatementKind::Update | StatementKind::Delete if statement.conditions.is_empty() => {
            return Err(Error::semantic(
                offset,
                "WHERE is mandatory for UPDATE and DELETE",
            ));
        }
        StatementKind::Insert => validate_insert(statement, offset)?,
        StatementKind::CreateTable => validate_create_table(statement, offset)?,
        _ => {}
    }

    validate_conditions(
        &statement.conditions,
        &statement.condition_operators,
        "WHERE",
        offset,
    )
}

fn validate_insert(statement: &Statement, offset: usize) -> Result<()> {
    if statement.inserts.is_empty() {
        return Err(Error::semantic(offset, "INSERT has no rows"));
    }

    let expected = statement.fields.len();
    for row in &statement.inserts {
        if row.len() != expected {
            return Err(Error::semantic(
                offset,
                format!(
                    "value count does not match column count: expected {}, found {}",
                    expected,
                    row.len()
                ),
            ));
        }
    }
    Ok(())
}

fn validate_create_table(statement: &Statement, offset: usize) -> Result<()> {
    if statement.columns.is_empty() {
        return Err(Error::semantic(offset, "CREATE TABLE has no columns"));
    }

    for column in &statement.columns {
        if column.data_type == DataType::Unknown {
            return Err(Error::semantic(
                offset,
                format!("column '{}' has no data type", column.name),
            ));
        }

        if column.foreign_key {
            let complete = column
                .references
                .as_ref()
                .is_some_and(|target| !target.table.is_empty() && !target.column.is_empty());
            if !complete {
                return Err(Error::semantic(
                    offset,
                    format!("foreign key on '{}' has no referenced column", column.name),
                ));
            }
        }

        validate_conditions(
            &column.check_conditions,
            &column.check_operators,
            "CHECK",
            offset,
        )?;
    }
    Ok(())
}

fn validate_conditions(
    conditions: &[Condition],
    operators: &[ConditionOperator],
    clause: &str,
    offset: usize,
) -> Result<()> {
    for condition in conditions {
        if condition.predicate.is_none() {
            return Err(Error::semantic(
                offset,
                format!("{} condition on '{}' has no operator", clause, condition.left.text()),
            ));
        }

        if condition.left.is_field() && condition.left.text().is_empty() {
            return Err(Error::semantic(
                offset,
                format!("{} condition refers to an empty column name", clause),
            ));
        }

        if let Some(Predicate::Compare { operator, .. }) = &condition.predicate {
            if !operator.is_comparison() {
                return Err(Error::semantic(
                    offset,
                    format!(
                        "{} condition on '{}' uses {} as a comparison",
                        clause,
                        condition.left.text(),
                        operator
                    ),
                ));
            }
        }
    }

    if operators.len() != conditions.len().saturating_sub(1) {
        return Err(Error::semantic(
            offset,
            format!(
                "{} has {} conditions but {} AND/OR operators",
                clause,
                conditions.len(),
                operators.len()
            ),
        ));
    }
    Ok(())
}
