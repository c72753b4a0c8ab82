use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::RenderError;
use crate::render::RenderConfig;
use crate::rules::tree::{Group, Leaf, Node};

/// Wire shape of one rule-tree node as emitted by query-builder UIs.
///
/// Every key is optional, so a document can describe a group, a leaf, both,
/// or neither. Conversion into [`Node`] settles which one it is and rejects
/// the ambiguous shapes with [`RenderError::InvalidNode`].
///
/// Unknown keys (`valid`, `not`, `flags`, `data`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    /// Group combinator key (`AND` / `OR`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Group children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<NodeDocument>>,
    /// Leaf identifier assigned by the builder UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Leaf field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Leaf value type hint (`double`, `integer`, `string`, ...).
    #[serde(
        default,
        rename = "type",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    /// Leaf input widget hint (`number`, `select`, `text`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Leaf operator key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Leaf value. An explicit JSON `null` is kept as `Some(Value::Null)` so
    /// it still marks the node as a leaf.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl NodeDocument {
    /// True when any group key is present.
    pub fn has_group(&self) -> bool {
        self.condition.is_some() || self.rules.is_some()
    }

    /// True when any leaf key is present.
    pub fn has_leaf(&self) -> bool {
        self.id.is_some()
            || self.field.is_some()
            || self.kind.is_some()
            || self.input.is_some()
            || self.operator.is_some()
            || self.value.is_some()
    }

    /// Depth of the document tree; a lone leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((doc, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in doc.rules.iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        max_depth
    }

    /// Number of documents in the tree, the root included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(doc) = stack.pop() {
            count += 1;
            stack.extend(doc.rules.iter().flatten());
        }
        count
    }

    /// Convert and render in one call.
    ///
    /// Surfaces [`RenderError::InvalidNode`] for documents that are neither a
    /// group nor a leaf (or are both), then behaves like [`Node::to_sql`].
    pub fn to_sql(&self, config: &RenderConfig) -> Result<String, RenderError> {
        Node::try_from(self.clone())?.to_sql(config)
    }
}

impl TryFrom<NodeDocument> for Node {
    type Error = RenderError;

    fn try_from(doc: NodeDocument) -> Result<Self, Self::Error> {
        match (doc.has_group(), doc.has_leaf()) {
            (true, false) => {
                let rules = doc
                    .rules
                    .unwrap_or_default()
                    .into_iter()
                    .map(Node::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Node::Group(Group {
                    condition: doc.condition.unwrap_or_default(),
                    rules,
                }))
            }
            (false, true) => Ok(Node::Leaf(Leaf {
                id: doc.id,
                field: doc.field.unwrap_or_default(),
                kind: doc.kind,
                input: doc.input,
                operator: doc.operator.unwrap_or_default(),
                value: doc.value.unwrap_or(Value::Null),
            })),
            _ => Err(RenderError::InvalidNode),
        }
    }
}

impl From<Node> for NodeDocument {
    fn from(node: Node) -> Self {
        match node {
            Node::Group(group) => NodeDocument {
                condition: Some(group.condition),
                rules: Some(group.rules.into_iter().map(NodeDocument::from).collect()),
                ..NodeDocument::default()
            },
            Node::Leaf(leaf) => NodeDocument {
                id: leaf.id,
                field: Some(leaf.field),
                kind: leaf.kind,
                input: leaf.input,
                operator: Some(leaf.operator),
                value: Some(leaf.value),
                ..NodeDocument::default()
            },
        }
    }
}
