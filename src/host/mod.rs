//! Host document - The primitive tree operations the engine consumes.
//!
//! The engine never walks or diffs the document. Everything it does is one of
//! the calls on [`Host`]: create a node, put it somewhere, take it out, or
//! write one field on it.
//!
//! [`MemoryDocument`] is the in-tree implementation, used for headless
//! rendering and by the test suite.

mod memory;

pub use memory::{MemoryDocument, Mutation, NodeKind};

/// Handle to a node owned by a [`Host`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Primitive document operations.
///
/// All methods take `&self`: a host is shared by every slot and listener of
/// a render root, so implementations keep their tree behind interior
/// mutability. No method may call back into the engine.
pub trait Host {
    fn create_element(&self, tag: &str) -> NodeId;

    fn create_text(&self, text: &str) -> NodeId;

    /// Create an empty marker node (a comment in a browser DOM).
    fn create_marker(&self) -> NodeId;

    /// Insert `child` into `parent` before `anchor`, or at the end when `anchor` is `None`.
    fn insert_before(&self, parent: NodeId, child: NodeId, anchor: Option<NodeId>);

    /// Put `new` where `old` currently is; `old` is detached.
    fn replace_child(&self, parent: NodeId, new: NodeId, old: NodeId);

    fn remove_child(&self, parent: NodeId, child: NodeId);

    fn set_text(&self, node: NodeId, text: &str);

    fn set_property(&self, node: NodeId, key: &str, value: &str);

    fn set_style(&self, node: NodeId, key: &str, value: &str);
}
