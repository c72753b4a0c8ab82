use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rules::document::NodeDocument;

/// One node of a rule tree: either a group combinator or a leaf comparison.
///
/// Decoding goes through [`NodeDocument`], so a JSON object that is neither
/// a group nor a leaf fails to deserialize with `invalid Node`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeDocument", into = "NodeDocument")]
pub enum Node {
    /// Logical combinator over child nodes.
    Group(Group),
    /// Single field comparison.
    Leaf(Leaf),
}

/// A logical combinator joining its children with `condition`.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Condition key, looked up in the condition table (`AND` / `OR`).
    pub condition: String,
    /// Ordered children; may be empty.
    pub rules: Vec<Node>,
}

/// A single `field operator value` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    /// Builder-assigned identifier, carried through but not rendered.
    pub id: Option<String>,
    /// Field name, used for validator lookup and emitted double-quoted.
    pub field: String,
    /// Value type hint (`type` on the wire), carried through but not rendered.
    pub kind: Option<String>,
    /// Input widget hint, carried through but not rendered.
    pub input: Option<String>,
    /// Operator key, looked up in the operator table.
    pub operator: String,
    /// Comparison value; `Value::Null` when absent.
    pub value: Value,
}

impl Node {
    /// Build a group node.
    pub fn group(condition: impl Into<String>, rules: Vec<Node>) -> Self {
        Node::Group(Group::new(condition, rules))
    }

    /// Build a leaf node without metadata.
    pub fn leaf(field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Node::Leaf(Leaf::new(field, operator, value))
    }

    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        match self {
            Node::Group(group) => 1 + group.rules.iter().map(Node::node_count).sum::<usize>(),
            Node::Leaf(_) => 1,
        }
    }

    /// Every leaf in depth-first document order.
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Group(group) => stack.extend(group.rules.iter().rev()),
                Node::Leaf(leaf) => out.push(leaf),
            }
        }
        out
    }
}

impl Group {
    /// Create a group from a condition key and children.
    pub fn new(condition: impl Into<String>, rules: Vec<Node>) -> Self {
        Self {
            condition: condition.into(),
            rules,
        }
    }
}

impl Leaf {
    /// Create a leaf without the descriptive metadata.
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            id: None,
            field: field.into(),
            kind: None,
            input: None,
            operator: operator.into(),
            value,
        }
    }

    /// Attach the builder's `id`, `type` and `input` metadata.
    #[must_use]
    pub fn with_metadata(
        mut self,
        id: impl Into<String>,
        kind: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        self.id = Some(id.into());
        self.kind = Some(kind.into());
        self.input = Some(input.into());
        self
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        Node::Leaf(leaf)
    }
}
