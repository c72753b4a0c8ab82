//! Translate query-builder rule trees into parenthesized SQL `WHERE` fragments.
//!
//! ```
//! use rules2sql::parser::{parse_rules, ParseLimits};
//! use rules2sql::render::RenderConfig;
//!
//! let json = r#"{"condition": "AND", "rules": [
//!     {"field": "price", "operator": "less", "value": 10}
//! ]}"#;
//! let tree = parse_rules(json, &ParseLimits::default()).unwrap();
//! assert_eq!(tree.to_sql(&RenderConfig::default()).unwrap(), r#"("price" < 10)"#);
//! ```
#![warn(missing_docs)]

/// Render error types shared by every layer.
pub mod error;
/// File output for rendered fragments.
pub mod output;
/// Bounded JSON decoding into rule trees.
pub mod parser;
/// SQL rendering: tables, validators, literal and parameterized output.
pub mod render;
/// Rule tree data model.
pub mod rules;

pub use error::{RenderError, RuleFault};
pub use render::RenderConfig;
pub use rules::{Group, Leaf, Node};
