use serde_json::Value;

use crate::error::{RenderError, RuleFault};
use crate::render::params::{ParameterizedSql, Placeholder};
use crate::render::{ConditionPolicy, RenderConfig};
use crate::rules::{Group, Leaf, Node};

/// Turns a leaf value into its SQL text.
///
/// The traversal is shared between literal and parameterized rendering; only
/// this step differs.
trait ValueSink {
    fn emit(&mut self, field: &str, value: &Value) -> Result<String, RuleFault>;
}

struct LiteralValues;

impl ValueSink for LiteralValues {
    fn emit(&mut self, field: &str, value: &Value) -> Result<String, RuleFault> {
        format_value(field, value)
    }
}

struct BoundValues {
    placeholder: Placeholder,
    params: Vec<Value>,
}

impl BoundValues {
    fn bind(&mut self, value: &Value) -> String {
        self.params.push(value.clone());
        self.placeholder.marker(self.params.len())
    }
}

impl ValueSink for BoundValues {
    fn emit(&mut self, field: &str, value: &Value) -> Result<String, RuleFault> {
        match value {
            Value::Null => Ok("null".to_string()),
            Value::Array(items) => {
                let mut markers = Vec::with_capacity(items.len());
                for item in items {
                    check_scalar(field, item)?;
                    markers.push(self.bind(item));
                }
                Ok(format!("({})", markers.join(", ")))
            }
            Value::Object(_) => Err(unsupported(field, "object")),
            scalar => Ok(self.bind(scalar)),
        }
    }
}

impl Node {
    /// Render the tree as a parenthesized SQL boolean expression with values
    /// embedded as literals.
    ///
    /// The first invalid node aborts the render. String values are quoted for
    /// display, not escaped for SQL: sanitize untrusted input upstream, or use
    /// [`Node::to_parameterized_sql`].
    pub fn to_sql(&self, config: &RenderConfig) -> Result<String, RenderError> {
        tracing::debug!(nodes = self.node_count(), "rendering rule tree");
        render_node(self, config, &mut LiteralValues)
    }

    /// Render the tree with every non-null value replaced by a placeholder.
    ///
    /// Validation and errors are the same as [`Node::to_sql`]; values are
    /// returned in placeholder order.
    pub fn to_parameterized_sql(
        &self,
        config: &RenderConfig,
        placeholder: Placeholder,
    ) -> Result<ParameterizedSql, RenderError> {
        tracing::debug!(
            nodes = self.node_count(),
            %placeholder,
            "rendering parameterized rule tree"
        );
        let mut sink = BoundValues {
            placeholder,
            params: Vec::new(),
        };
        let sql = render_node(self, config, &mut sink)?;
        Ok(ParameterizedSql {
            sql,
            params: sink.params,
        })
    }
}

impl Group {
    /// Render this group and its children, e.g. `("a" = 1 AND "b" = 2)`.
    pub fn to_sql(&self, config: &RenderConfig) -> Result<String, RenderError> {
        render_group(self, config, &mut LiteralValues)
    }
}

impl Leaf {
    /// Render this comparison, e.g. `"price" = 10.25`.
    pub fn to_sql(&self, config: &RenderConfig) -> Result<String, RenderError> {
        render_leaf(self, config, &mut LiteralValues)
    }
}

fn render_node<S: ValueSink>(
    node: &Node,
    config: &RenderConfig,
    sink: &mut S,
) -> Result<String, RenderError> {
    match node {
        Node::Group(group) => render_group(group, config, sink),
        Node::Leaf(leaf) => render_leaf(leaf, config, sink),
    }
}

fn render_group<S: ValueSink>(
    group: &Group,
    config: &RenderConfig,
    sink: &mut S,
) -> Result<String, RenderError> {
    let separator = match config.conditions().separator(&group.condition) {
        Some(separator) => separator,
        None => match config.condition_policy() {
            ConditionPolicy::Strict => {
                return Err(RuleFault::UnknownCondition(group.condition.clone()).into());
            }
            ConditionPolicy::Legacy => {
                tracing::warn!(
                    condition = %group.condition,
                    "unknown group condition, joining children without a separator"
                );
                ""
            }
        },
    };

    let mut parts = Vec::with_capacity(group.rules.len());
    for rule in &group.rules {
        parts.push(render_node(rule, config, sink)?);
    }

    Ok(format!("({})", parts.join(separator)))
}

fn render_leaf<S: ValueSink>(
    leaf: &Leaf,
    config: &RenderConfig,
    sink: &mut S,
) -> Result<String, RenderError> {
    let Some(operator) = config.operators().get(&leaf.operator) else {
        return Err(RuleFault::UnknownOperator {
            field: leaf.field.clone(),
            operator: leaf.operator.clone(),
        }
        .into());
    };

    if !config.validators().validate(&leaf.field, &leaf.value) {
        return Err(RuleFault::RejectedValue {
            field: leaf.field.clone(),
        }
        .into());
    }

    let value = sink.emit(&leaf.field, &leaf.value)?;
    tracing::trace!(field = %leaf.field, operator = %leaf.operator, "rendered leaf");

    Ok(format!("\"{}\" {operator} {value}", leaf.field))
}

/// Format a leaf value as SQL text.
///
/// - strings: double-quoted with Rust string escaping (`"a\"b"`)
/// - `null`: the bare token `null`
/// - numbers and booleans: their JSON text (`10.25`, `3`, `true`)
/// - arrays of scalars: a parenthesized list (`(1, 2, "x")`)
///
/// Objects and nested arrays are rejected for `field`.
pub fn format_value(field: &str, value: &Value) -> Result<String, RuleFault> {
    match value {
        Value::Array(items) => {
            let mut formatted = Vec::with_capacity(items.len());
            for item in items {
                check_scalar(field, item)?;
                formatted.push(format_scalar(item));
            }
            Ok(format!("({})", formatted.join(", ")))
        }
        Value::Object(_) => Err(unsupported(field, "object")),
        scalar => Ok(format_scalar(scalar)),
    }
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn check_scalar(field: &str, value: &Value) -> Result<(), RuleFault> {
    match value {
        Value::Array(_) => Err(unsupported(field, "nested array")),
        Value::Object(_) => Err(unsupported(field, "object")),
        _ => Ok(()),
    }
}

fn unsupported(field: &str, kind: &'static str) -> RuleFault {
    RuleFault::UnsupportedValue {
        field: field.to_string(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> RenderConfig {
        RenderConfig::default()
    }

    #[test]
    fn format_value_quotes_strings_and_passes_other_scalars() {
        assert_eq!(format_value("f", &json!("abc")).unwrap(), r#""abc""#);
        assert_eq!(format_value("f", &json!("a\"b")).unwrap(), r#""a\"b""#);
        assert_eq!(format_value("f", &json!("line\nbreak")).unwrap(), r#""line\nbreak""#);
        assert_eq!(format_value("f", &Value::Null).unwrap(), "null");
        assert_eq!(format_value("f", &json!(10.25)).unwrap(), "10.25");
        assert_eq!(format_value("f", &json!(3)).unwrap(), "3");
        assert_eq!(format_value("f", &json!(-7)).unwrap(), "-7");
        assert_eq!(format_value("f", &json!(true)).unwrap(), "true");
    }

    #[test]
    fn format_value_renders_scalar_arrays_as_lists() {
        assert_eq!(
            format_value("f", &json!([1, "x", null])).unwrap(),
            r#"(1, "x", null)"#
        );
        assert_eq!(format_value("f", &json!([])).unwrap(), "()");
    }

    #[test]
    fn format_value_rejects_objects_and_nested_arrays() {
        assert_eq!(
            format_value("f", &json!({"a": 1})),
            Err(RuleFault::UnsupportedValue {
                field: "f".to_string(),
                kind: "object"
            })
        );
        assert_eq!(
            format_value("f", &json!([[1]])),
            Err(RuleFault::UnsupportedValue {
                field: "f".to_string(),
                kind: "nested array"
            })
        );
    }

    #[test]
    fn leaf_field_is_quoted_verbatim() {
        let leaf = Leaf::new("we\"ird", "equal", json!(1));
        assert_eq!(leaf.to_sql(&config()).unwrap(), "\"we\"ird\" = 1");
    }

    #[test]
    fn leaf_with_missing_operator_is_invalid_rule() {
        let leaf = Leaf::new("price", "", json!(1));
        assert!(matches!(
            leaf.to_sql(&config()),
            Err(RenderError::InvalidRule(RuleFault::UnknownOperator { .. }))
        ));
    }

    #[test]
    fn validator_runs_before_value_formatting() {
        let cfg = RenderConfig::default()
            .with_validators(crate::render::ValidatorRegistry::new().with_validator("f", |_, _| false));
        let leaf = Leaf::new("f", "equal", json!({"a": 1}));
        assert_eq!(
            leaf.to_sql(&cfg),
            Err(RenderError::InvalidRule(RuleFault::RejectedValue {
                field: "f".to_string()
            }))
        );
    }

    #[test]
    fn group_with_single_child_is_still_parenthesized() {
        let group = Group::new("AND", vec![Node::leaf("price", "equal", json!(1))]);
        assert_eq!(group.to_sql(&config()).unwrap(), r#"("price" = 1)"#);
    }

    #[test]
    fn strict_policy_rejects_unknown_condition_even_when_empty() {
        let group = Group::new("XOR", Vec::new());
        assert_eq!(
            group.to_sql(&config()),
            Err(RenderError::InvalidRule(RuleFault::UnknownCondition(
                "XOR".to_string()
            )))
        );
    }

    #[test]
    fn legacy_policy_joins_unknown_condition_with_nothing() {
        let cfg = RenderConfig::default().with_condition_policy(ConditionPolicy::Legacy);
        let group = Group::new(
            "XOR",
            vec![
                Node::leaf("a", "equal", json!(1)),
                Node::leaf("b", "equal", json!(2)),
            ],
        );
        assert_eq!(group.to_sql(&cfg).unwrap(), r#"("a" = 1"b" = 2)"#);
        assert_eq!(Group::new("", Vec::new()).to_sql(&cfg).unwrap(), "()");
    }

    #[test]
    fn parameterized_render_numbers_dollar_placeholders_in_order() {
        let tree = Node::group(
            "OR",
            vec![
                Node::leaf("price", "equal", json!(10.25)),
                Node::leaf("category", "in", json!([1, 2])),
                Node::leaf("owner", "not_equal", Value::Null),
            ],
        );
        let out = tree
            .to_parameterized_sql(&config(), Placeholder::Dollar)
            .unwrap();
        assert_eq!(
            out.sql,
            r#"("price" = $1 OR "category" IN ($2, $3) OR "owner" != null)"#
        );
        assert_eq!(out.params, vec![json!(10.25), json!(1), json!(2)]);
    }

    #[test]
    fn parameterized_render_fails_like_literal_render() {
        let tree = Node::group("AND", vec![Node::leaf("price", "between", json!(1))]);
        assert_eq!(
            tree.to_parameterized_sql(&config(), Placeholder::Question),
            Err(RenderError::InvalidRule(RuleFault::UnknownOperator {
                field: "price".to_string(),
                operator: "between".to_string(),
            }))
        );
    }
}
