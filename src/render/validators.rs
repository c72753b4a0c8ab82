use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Per-field value predicate, called with `(field, value)`.
pub type ValidatorFn = dyn Fn(&str, &Value) -> bool + Send + Sync;

/// Field name → validator lookup table.
///
/// Built up front and then shared read-only through
/// [`RenderConfig`](crate::render::RenderConfig). Fields without a validator
/// always pass.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Arc<ValidatorFn>>,
}

/// Declarative validator, as loaded from a JSON registry file.
///
/// Array values (as used with `in`) pass when every element passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidatorSpec {
    /// JSON number within the optional inclusive bounds.
    Number {
        /// Inclusive lower bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Inclusive upper bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// JSON string no longer than `max_len` characters.
    String {
        /// Maximum length in characters.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_len: Option<usize>,
    },
    /// JSON boolean.
    Boolean,
    /// One of the listed JSON values.
    OneOf {
        /// Allowed values.
        values: Vec<Value>,
    },
    /// Anything except `null`.
    NotNull,
}

/// Failure to load a declarative validator registry.
#[derive(Error, Debug)]
pub enum ValidatorLoadError {
    /// The registry file is not valid JSON or has an unknown validator kind.
    #[error("Invalid validator registry JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A number validator has `min` greater than `max`.
    #[error("Invalid range for field '{field}': min {min} is greater than max {max}")]
    InvalidRange {
        /// Field carrying the bad range.
        field: String,
        /// Declared lower bound.
        min: f64,
        /// Declared upper bound.
        max: f64,
    },
}

impl ValidatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate for `field`, replacing any previous one.
    pub fn register<F>(&mut self, field: impl Into<String>, validator: F)
    where
        F: Fn(&str, &Value) -> bool + Send + Sync + 'static,
    {
        self.validators.insert(field.into(), Arc::new(validator));
    }

    /// Builder form of [`ValidatorRegistry::register`].
    #[must_use]
    pub fn with_validator<F>(mut self, field: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&str, &Value) -> bool + Send + Sync + 'static,
    {
        self.register(field, validator);
        self
    }

    /// Register a declarative validator for `field`.
    pub fn register_spec(&mut self, field: impl Into<String>, spec: ValidatorSpec) {
        self.register(field, move |_, value| spec.accepts(value));
    }

    /// Load declarative validators from a JSON object of
    /// `field → {"kind": ..., ...}` entries.
    ///
    /// Loaded entries replace validators already registered for the same field.
    /// Nothing is registered when any entry is invalid.
    pub fn load_from_json(&mut self, json: &str) -> Result<(), ValidatorLoadError> {
        let parsed: HashMap<String, ValidatorSpec> = serde_json::from_str(json)?;
        for (field, spec) in &parsed {
            if let ValidatorSpec::Number {
                min: Some(min),
                max: Some(max),
            } = spec
            {
                if min > max {
                    return Err(ValidatorLoadError::InvalidRange {
                        field: field.clone(),
                        min: *min,
                        max: *max,
                    });
                }
            }
        }
        for (field, spec) in parsed {
            self.register_spec(field, spec);
        }
        Ok(())
    }

    /// Returns `true` when a validator is registered for `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.validators.contains_key(field)
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns `true` when no validator is registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run the validator for `field`; unregistered fields pass.
    pub fn validate(&self, field: &str, value: &Value) -> bool {
        match self.validators.get(field) {
            Some(validator) => validator(field, value),
            None => true,
        }
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        fields.sort_unstable();
        f.debug_struct("ValidatorRegistry")
            .field("fields", &fields)
            .finish()
    }
}

impl ValidatorSpec {
    /// Returns `true` when `value` satisfies this validator.
    pub fn accepts(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) if !matches!(self, ValidatorSpec::NotNull) => {
                items.iter().all(|item| self.accepts_scalar(item))
            }
            _ => self.accepts_scalar(value),
        }
    }

    fn accepts_scalar(&self, value: &Value) -> bool {
        match self {
            ValidatorSpec::Number { min, max } => value.as_f64().is_some_and(|n| {
                min.is_none_or(|lo| n >= lo) && max.is_none_or(|hi| n <= hi)
            }),
            ValidatorSpec::String { max_len } => value
                .as_str()
                .is_some_and(|s| max_len.is_none_or(|limit| s.chars().count() <= limit)),
            ValidatorSpec::Boolean => value.is_boolean(),
            ValidatorSpec::OneOf { values } => values.contains(value),
            ValidatorSpec::NotNull => !value.is_null(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unregistered_field_passes() {
        let registry = ValidatorRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.validate("anything", &json!({"nested": true})));
    }

    #[test]
    fn registered_predicate_receives_field_and_value() {
        let registry = ValidatorRegistry::new()
            .with_validator("price", |field, value| field == "price" && value.as_f64() > Some(0.0));
        assert!(registry.validate("price", &json!(10.25)));
        assert!(!registry.validate("price", &json!(-1)));
        assert!(registry.contains("price"));
        assert!(!registry.contains("category"));
    }

    #[test]
    fn load_from_json_registers_declarative_validators() {
        let mut registry = ValidatorRegistry::new();
        registry
            .load_from_json(
                r#"{
                    "price": {"kind": "number", "min": 0, "max": 100},
                    "name": {"kind": "string", "max_len": 3},
                    "active": {"kind": "boolean"},
                    "category": {"kind": "one_of", "values": [1, 2, 3]},
                    "owner": {"kind": "not_null"}
                }"#,
            )
            .expect("registry JSON should load");

        assert_eq!(registry.len(), 5);
        assert!(registry.validate("price", &json!(10.25)));
        assert!(!registry.validate("price", &json!(100.5)));
        assert!(!registry.validate("price", &json!("10")));
        assert!(registry.validate("name", &json!("abc")));
        assert!(!registry.validate("name", &json!("abcd")));
        assert!(registry.validate("active", &json!(false)));
        assert!(!registry.validate("active", &json!(0)));
        assert!(registry.validate("category", &json!(3)));
        assert!(!registry.validate("category", &json!(4)));
        assert!(registry.validate("owner", &json!("u1")));
        assert!(!registry.validate("owner", &Value::Null));
    }

    #[test]
    fn array_values_are_checked_element_wise() {
        let spec = ValidatorSpec::OneOf {
            values: vec![json!(1), json!(2)],
        };
        assert!(spec.accepts(&json!([1, 2])));
        assert!(!spec.accepts(&json!([1, 5])));
        assert!(ValidatorSpec::NotNull.accepts(&json!([])));
    }

    #[test]
    fn load_from_json_rejects_inverted_range() {
        let mut registry = ValidatorRegistry::new();
        let err = registry
            .load_from_json(r#"{"price": {"kind": "number", "min": 5, "max": 1}}"#)
            .expect_err("inverted range should fail");
        assert!(matches!(err, ValidatorLoadError::InvalidRange { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn load_from_json_rejects_unknown_kind() {
        let mut registry = ValidatorRegistry::new();
        let err = registry
            .load_from_json(r#"{"price": {"kind": "regex"}}"#)
            .expect_err("unknown kind should fail");
        assert!(err.to_string().starts_with("Invalid validator registry JSON"));
    }

    #[test]
    fn debug_lists_registered_fields_sorted() {
        let registry = ValidatorRegistry::new()
            .with_validator("b", |_, _| true)
            .with_validator("a", |_, _| true);
        assert_eq!(
            format!("{registry:?}"),
            r#"ValidatorRegistry { fields: ["a", "b"] }"#
        );
    }
}
