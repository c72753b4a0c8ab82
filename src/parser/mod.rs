/// Bounded JSON decoding of query-builder rule documents.
pub mod json_rules;

pub use json_rules::{parse_document, parse_rules, ParseError, ParseLimits};
