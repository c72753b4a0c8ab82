use std::collections::BTreeMap;

/// Operator key → SQL comparison token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorTable {
    tokens: BTreeMap<String, String>,
}

/// Group condition key → join separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionTable {
    separators: BTreeMap<String, String>,
}

const STANDARD_OPERATORS: [(&str, &str); 7] = [
    ("equal", "="),
    ("not_equal", "!="),
    ("in", "IN"),
    ("less", "<"),
    ("less_or_equal", "<="),
    ("greater", ">"),
    ("greater_or_equal", ">="),
];

const STANDARD_CONDITIONS: [(&str, &str); 2] = [("AND", " AND "), ("OR", " OR ")];

impl OperatorTable {
    /// The seven query-builder operators (`equal`, `not_equal`, `in`, `less`,
    /// `less_or_equal`, `greater`, `greater_or_equal`).
    pub fn standard() -> Self {
        Self {
            tokens: STANDARD_OPERATORS
                .iter()
                .map(|(key, token)| ((*key).to_string(), (*token).to_string()))
                .collect(),
        }
    }

    /// A table with no operators; every lookup misses.
    pub fn empty() -> Self {
        Self {
            tokens: BTreeMap::new(),
        }
    }

    /// Add or replace an operator mapping.
    pub fn insert(&mut self, key: impl Into<String>, token: impl Into<String>) {
        self.tokens.insert(key.into(), token.into());
    }

    /// Builder form of [`OperatorTable::insert`].
    #[must_use]
    pub fn with_operator(mut self, key: impl Into<String>, token: impl Into<String>) -> Self {
        self.insert(key, token);
        self
    }

    /// SQL token for `key`, if known.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tokens.get(key).map(String::as_str)
    }

    /// Known operator keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tokens.keys().map(String::as_str)
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ConditionTable {
    /// `AND` and `OR`, matched case-sensitively.
    pub fn standard() -> Self {
        Self {
            separators: STANDARD_CONDITIONS
                .iter()
                .map(|(key, sep)| ((*key).to_string(), (*sep).to_string()))
                .collect(),
        }
    }

    /// Add or replace a condition mapping. The separator is used verbatim,
    /// surrounding spaces included.
    pub fn insert(&mut self, key: impl Into<String>, separator: impl Into<String>) {
        self.separators.insert(key.into(), separator.into());
    }

    /// Builder form of [`ConditionTable::insert`].
    #[must_use]
    pub fn with_condition(mut self, key: impl Into<String>, separator: impl Into<String>) -> Self {
        self.insert(key, separator);
        self
    }

    /// Join separator for `key`, if known.
    pub fn separator(&self, key: &str) -> Option<&str> {
        self.separators.get(key).map(String::as_str)
    }
}

impl Default for ConditionTable {
    fn default() -> Self {
        Self::standard()
    }
}
