//! Render error types

use thiserror::Error;

/// Failure of a render call.
///
/// The first error met anywhere in the tree aborts the whole render and is
/// returned as-is to the caller; no partial SQL accompanies it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A node carries neither a group nor a leaf, or carries both.
    #[error("invalid Node")]
    InvalidNode,

    /// A leaf or group could not be rendered.
    #[error("invalid Rule: {0}")]
    InvalidRule(#[from] RuleFault),
}

/// Why a rule was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleFault {
    /// The leaf operator is not in the operator table.
    #[error("unknown operator '{operator}' on field '{field}'")]
    UnknownOperator {
        /// Field of the offending leaf.
        field: String,
        /// Operator key that missed the table.
        operator: String,
    },

    /// The validator registered for the field returned `false`.
    #[error("value rejected by validator for field '{field}'")]
    RejectedValue {
        /// Field whose validator rejected the value.
        field: String,
    },

    /// The group condition is not in the condition table.
    #[error("unknown condition '{0}'")]
    UnknownCondition(String),

    /// The value has a JSON shape that cannot be rendered as a SQL literal.
    #[error("unsupported value for field '{field}': {kind}")]
    UnsupportedValue {
        /// Field of the offending leaf.
        field: String,
        /// JSON kind of the value (`object`, `nested array`).
        kind: &'static str,
    },
}

impl RenderError {
    /// Returns the rule fault when this is an `InvalidRule` error.
    pub fn fault(&self) -> Option<&RuleFault> {
        match self {
            RenderError::InvalidNode => None,
            RenderError::InvalidRule(fault) => Some(fault),
        }
    }
}
