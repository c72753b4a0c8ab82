use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

/// Bound-parameter marker style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// `?` for every parameter (SQLite, MySQL, DuckDB).
    #[default]
    Question,
    /// `$1`, `$2`, ... numbered from one (PostgreSQL).
    Dollar,
}

impl Placeholder {
    /// Marker for the parameter at 1-based `position`.
    pub fn marker(self, position: usize) -> String {
        match self {
            Placeholder::Question => "?".to_string(),
            Placeholder::Dollar => format!("${position}"),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Question => write!(f, "question"),
            Placeholder::Dollar => write!(f, "dollar"),
        }
    }
}

impl FromStr for Placeholder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "question" | "?" => Ok(Placeholder::Question),
            "dollar" | "$" => Ok(Placeholder::Dollar),
            _ => Err(format!(
                "Invalid placeholder style '{s}': expected 'question' or 'dollar'"
            )),
        }
    }
}

/// SQL fragment with placeholders plus the values bound to them, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterizedSql {
    /// Parenthesized fragment containing placeholders.
    pub sql: String,
    /// Values for the placeholders, first to last.
    pub params: Vec<Value>,
}
