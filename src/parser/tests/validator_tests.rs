//! Тесты для семантической проверки

use crate::common::{Error, Result};
use crate::parser::validator::validate;
use crate::parser::{
    ColumnDefinition, Condition, ConditionOperator, DataType, Operand, Operator, Predicate,
    Statement, StatementKind,
};

fn compare(field: &str, value: &str) -> Condition {
    Condition {
        left: Operand::Field(field.to_string()),
        predicate: Some(Predicate::Compare {
            operator: Operator::Eq,
            right: Operand::Literal(value.to_string()),
        }),
    }
}

fn expect_semantic(statement: &Statement, fragment: &str) {
    match validate(statement, 42) {
        Err(Error::Semantic { offset, message }) => {
            assert_eq!(offset, 42);
            assert!(message.contains(fragment), "{}", message);
        }
        other => panic!("Ожидалась семантическая ошибка, получено {:?}", other),
    }
}

#[test]
fn test_unknown_kind_is_rejected() {
    expect_semantic(&Statement::default(), "not recognized");
}

#[test]
fn test_empty_table_name() {
    let mut statement = Statement::new(StatementKind::Select);
    statement.tables.push(String::new());
    statement.fields.push("a".to_string());
    expect_semantic(&statement, "table name is empty");
}

#[test]
fn test_delete_requires_where() -> Result<()> {
    let mut statement = Statement::new(StatementKind::Delete);
    statement.tables.push("t".to_string());
    expect_semantic(&statement, "WHERE is mandatory");

    statement.conditions.push(compare("a", "1"));
    validate(&statement, 0)?;
    Ok(())
}

#[test]
fn test_condition_without_operator() {
    let mut statement = Statement::new(StatementKind::Select);
    statement.tables.push("t".to_string());
    statement.conditions.push(Condition::on_field("a"));
    expect_semantic(&statement, "has no operator");
}

#[test]
fn test_empty_field_operand() {
    let mut statement = Statement::new(StatementKind::Select);
    statement.tables.push("t".to_string());
    statement.conditions.push(compare("", "1"));
    expect_semantic(&statement, "empty column name");
}

#[test]
fn test_compare_needs_comparison_operator() {
    let mut statement = Statement::new(StatementKind::Select);
    statement.tables.push("t".to_string());
    statement.conditions.push(Condition {
        left: Operand::Field("a".to_string()),
        predicate: Some(Predicate::Compare {
            operator: Operator::Like,
            right: Operand::Literal("x%".to_string()),
        }),
    });
    expect_semantic(&statement, "uses LIKE as a comparison");

    statement.conditions[0] = compare("a", "1");
    assert!(validate(&statement, 0).is_ok());
}

#[test]
fn test_operator_count_must_match() {
    let mut statement = Statement::new(StatementKind::Select);
    statement.tables.push("t".to_string());
    statement.conditions.push(compare("a", "1"));
    statement.conditions.push(compare("b", "2"));
    expect_semantic(&statement, "2 conditions but 0 AND/OR operators");

    statement.condition_operators.push(ConditionOperator::Or);
    assert!(validate(&statement, 0).is_ok());
}

#[test]
fn test_insert_rows() {
    let mut statement = Statement::new(StatementKind::Insert);
    statement.tables.push("t".to_string());
    statement.fields = vec!["a".to_string(), "b".to_string()];
    expect_semantic(&statement, "INSERT has no rows");

    statement.inserts.push(vec!["1".to_string(), "2".to_string()]);
    statement.inserts.push(vec!["3".to_string()]);
    expect_semantic(&statement, "expected 2, found 1");
}

#[test]
fn test_create_table_columns() {
    let mut statement = Statement::new(StatementKind::CreateTable);
    statement.tables.push("t".to_string());
    expect_semantic(&statement, "has no columns");

    statement.columns.push(ColumnDefinition::new("a"));
    expect_semantic(&statement, "'a' has no data type");

    statement.columns[0].data_type = DataType::Double;
    statement.columns[0].foreign_key = true;
    expect_semantic(&statement, "foreign key on 'a'");
}

#[test]
fn test_check_operators_are_counted() {
    let mut statement = Statement::new(StatementKind::CreateTable);
    statement.tables.push("t".to_string());
    let mut column = ColumnDefinition::new("a");
    column.data_type = DataType::SmallInt;
    column.check_conditions.push(compare("a", "1"));
    column.check_operators.push(ConditionOperator::And);
    statement.columns.push(column);
    expect_semantic(&statement, "CHECK has 1 conditions but 1 AND/OR operators");
}
