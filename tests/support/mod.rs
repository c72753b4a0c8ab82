#![allow(dead_code)]

use std::path::PathBuf;

use rules2sql::parser::json_rules::{self, ParseLimits};
use rules2sql::render::ValidatorRegistry;
use rules2sql::Node;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

pub(crate) const WORKED_EXAMPLE_SQL: &str =
    r#"("price" = 10.25 OR "category" != 3 OR ("price" = 1) OR "category" != null)"#;

pub(crate) fn fixture_dir(fixture: &str) -> PathBuf {
    PathBuf::from("tests/fixtures").join(fixture)
}

pub(crate) fn read_fixture_json(fixture: &str) -> String {
    let path = fixture_dir(fixture).join("input.json");
    std::fs::read_to_string(path).expect("fixture JSON should be readable")
}

pub(crate) fn parse_fixture(fixture: &str) -> Node {
    json_rules::parse_rules(&read_fixture_json(fixture), &ParseLimits::default())
        .expect("fixture JSON should parse")
}

pub(crate) fn load_fixture_validators(fixture: &str) -> ValidatorRegistry {
    let path = fixture_dir(fixture).join("validators.json");
    let json = std::fs::read_to_string(path).expect("fixture validators should be readable");
    let mut registry = ValidatorRegistry::new();
    registry
        .load_from_json(&json)
        .expect("fixture validators should parse");
    registry
}

/// Assert that a rendered fragment parses as a standalone SQL expression.
pub(crate) fn assert_parses_as_expression(sql: &str) {
    Parser::new(&GenericDialect {})
        .try_with_sql(sql)
        .and_then(|mut parser| parser.parse_expr())
        .unwrap_or_else(|e| panic!("rendered fragment should parse as SQL, got {e}:\n{sql}"));
}
