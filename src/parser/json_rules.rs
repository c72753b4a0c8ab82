use thiserror::Error;

use crate::error::RenderError;
use crate::rules::{Node, NodeDocument};

/// Maximum size of rule JSON in bytes (64KB)
pub const MAX_RULES_JSON_SIZE: usize = 64 * 1024;

/// Maximum nesting depth of a rule tree (a lone leaf has depth 1)
pub const MAX_TREE_DEPTH: usize = 32;

/// Maximum number of nodes in a rule tree
pub const MAX_RULE_COUNT: usize = 1000;

/// Bounds applied while decoding untrusted rule JSON.
///
/// Rendering recurses once per tree level, so the depth bound is what keeps
/// the render stack bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum document size in bytes.
    pub max_bytes: usize,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Maximum number of nodes.
    pub max_nodes: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_bytes: MAX_RULES_JSON_SIZE,
            max_depth: MAX_TREE_DEPTH,
            max_nodes: MAX_RULE_COUNT,
        }
    }
}

/// Failure to turn rule JSON into a [`Node`].
#[derive(Error, Debug)]
pub enum ParseError {
    /// The document is larger than `max_bytes`.
    #[error("Rule JSON is {size} bytes, exceeds maximum size of {limit} bytes")]
    TooLarge {
        /// Document size in bytes.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// The document is not valid JSON or has the wrong shape.
    #[error("Invalid rule JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The tree nests deeper than `max_depth`.
    #[error("Rule tree depth {depth} exceeds maximum of {limit}")]
    TooDeep {
        /// Measured depth.
        depth: usize,
        /// Configured limit.
        limit: usize,
    },

    /// The tree has more than `max_nodes` nodes.
    #[error("Rule tree has {count} nodes, maximum is {limit}")]
    TooManyNodes {
        /// Measured node count.
        count: usize,
        /// Configured limit.
        limit: usize,
    },

    /// A node is neither a group nor a leaf.
    #[error(transparent)]
    Tree(#[from] RenderError),
}

/// Decode rule JSON into a [`NodeDocument`] and check the size, depth and
/// node-count limits, without deciding group/leaf shapes yet.
pub fn parse_document(json: &str, limits: &ParseLimits) -> Result<NodeDocument, ParseError> {
    if json.len() > limits.max_bytes {
        return Err(ParseError::TooLarge {
            size: json.len(),
            limit: limits.max_bytes,
        });
    }

    let document: NodeDocument = serde_json::from_str(json)?;

    let depth = document.depth();
    if depth > limits.max_depth {
        return Err(ParseError::TooDeep {
            depth,
            limit: limits.max_depth,
        });
    }

    let count = document.node_count();
    if count > limits.max_nodes {
        return Err(ParseError::TooManyNodes {
            count,
            limit: limits.max_nodes,
        });
    }

    Ok(document)
}

/// Decode rule JSON into a typed [`Node`] tree.
///
/// Objects carrying `condition`/`rules` are groups, objects carrying any of
/// `id`, `field`, `type`, `input`, `operator`, `value` are leaves; anything
/// else fails with [`RenderError::InvalidNode`].
pub fn parse_rules(json: &str, limits: &ParseLimits) -> Result<Node, ParseError> {
    let document = parse_document(json, limits)?;
    let node = Node::try_from(document)?;
    tracing::debug!(nodes = node.node_count(), "decoded rule tree");
    Ok(node)
}
