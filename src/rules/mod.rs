/// Wire-format documents and their conversion into typed trees.
pub mod document;
/// Typed rule tree: groups, leaves, and the node union.
pub mod tree;

pub use document::NodeDocument;
pub use tree::{Group, Leaf, Node};
