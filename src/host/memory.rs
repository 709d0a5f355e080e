//! MemoryDocument - Arena-backed host document.
//!
//! Nodes are indices into a `Vec`, never freed (markers are recycled by the
//! engine's pool instead). Every mutation is appended to a log so callers can
//! check exactly which nodes an update touched.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::{Host, NodeId};

// =============================================================================
// Node Storage
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { tag: String },
    Text,
    Marker,
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    text: String,
    properties: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
            properties: BTreeMap::new(),
            styles: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// One primitive operation applied to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create { node: NodeId },
    Insert { parent: NodeId, child: NodeId },
    Replace { parent: NodeId, new: NodeId, old: NodeId },
    Remove { parent: NodeId, child: NodeId },
    SetText { node: NodeId },
    SetProperty { node: NodeId, key: String },
    SetStyle { node: NodeId, key: String },
}

impl Mutation {
    /// The node whose own content or fields this mutation wrote.
    pub fn target(&self) -> NodeId {
        match self {
            Mutation::Create { node }
            | Mutation::SetText { node }
            | Mutation::SetProperty { node, .. }
            | Mutation::SetStyle { node, .. } => *node,
            Mutation::Insert { parent, .. }
            | Mutation::Replace { parent, .. }
            | Mutation::Remove { parent, .. } => *parent,
        }
    }
}

/// In-memory document tree.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    nodes: RefCell<Vec<NodeData>>,
    log: RefCell<Vec<Mutation>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, data: NodeData) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(data);
        drop(nodes);
        self.record(Mutation::Create { node: id });
        id
    }

    fn record(&self, mutation: Mutation) {
        self.log.borrow_mut().push(mutation);
    }

    fn is_valid(&self, node: NodeId) -> bool {
        node.0 < self.nodes.borrow().len()
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.nodes.borrow().get(node.0).map(|n| n.kind.clone())
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        match self.kind(node)? {
            NodeKind::Element { tag } => Some(tag),
            _ => None,
        }
    }

    pub fn is_marker(&self, node: NodeId) -> bool {
        matches!(self.kind(node), Some(NodeKind::Marker))
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow().get(node.0).and_then(|n| n.parent)
    }

    /// All children, markers included.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .get(node.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Element children only (what a DOM's `children` returns).
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .into_iter()
            .filter(|&child| self.tag(child).is_some())
            .collect()
    }

    /// Concatenated text of every descendant text node. Markers contribute nothing.
    pub fn text_content(&self, node: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        collect_text(&nodes, node, &mut out);
        out
    }

    pub fn property(&self, node: NodeId, key: &str) -> Option<String> {
        self.nodes
            .borrow()
            .get(node.0)
            .and_then(|n| n.properties.get(key).cloned())
    }

    pub fn style(&self, node: NodeId, key: &str) -> Option<String> {
        self.nodes
            .borrow()
            .get(node.0)
            .and_then(|n| n.styles.get(key).cloned())
    }

    /// Serialize the subtree rooted at `node`, markers shown as `<!---->`.
    pub fn markup(&self, node: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        write_markup(&nodes, node, &mut out);
        out
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.log.borrow().clone()
    }

    /// Drain the mutation log.
    pub fn take_mutations(&self) -> Vec<Mutation> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

fn collect_text(nodes: &[NodeData], node: NodeId, out: &mut String) {
    let Some(data) = nodes.get(node.0) else { return };
    match data.kind {
        NodeKind::Text => out.push_str(&data.text),
        NodeKind::Marker => {}
        NodeKind::Element { .. } => {
            for &child in &data.children {
                collect_text(nodes, child, out);
            }
        }
    }
}

fn write_markup(nodes: &[NodeData], node: NodeId, out: &mut String) {
    let Some(data) = nodes.get(node.0) else { return };
    match &data.kind {
        NodeKind::Text => out.push_str(&data.text),
        NodeKind::Marker => out.push_str("<!---->"),
        NodeKind::Element { tag } => {
            out.push('<');
            out.push_str(tag);
            for (key, value) in &data.properties {
                let _ = write!(out, " {key}=\"{value}\"");
            }
            if !data.styles.is_empty() {
                out.push_str(" style=\"");
                for (key, value) in &data.styles {
                    let _ = write!(out, "{key}:{value};");
                }
                out.push('"');
            }
            out.push('>');
            for &child in &data.children {
                write_markup(nodes, child, out);
            }
            let _ = write!(out, "</{tag}>");
        }
    }
}

fn detach(nodes: &mut [NodeData], child: NodeId) {
    if let Some(parent) = nodes[child.0].parent.take() {
        nodes[parent.0].children.retain(|&c| c != child);
    }
}

// =============================================================================
// Host Operations
// =============================================================================

impl Host for MemoryDocument {
    fn create_element(&self, tag: &str) -> NodeId {
        self.push(NodeData::new(
            NodeKind::Element {
                tag: tag.to_string(),
            },
            "",
        ))
    }

    fn create_text(&self, text: &str) -> NodeId {
        self.push(NodeData::new(NodeKind::Text, text))
    }

    fn create_marker(&self) -> NodeId {
        self.push(NodeData::new(NodeKind::Marker, ""))
    }

    fn insert_before(&self, parent: NodeId, child: NodeId, anchor: Option<NodeId>) {
        if !self.is_valid(parent) || !self.is_valid(child) {
            tracing::error!(%parent, %child, "insert_before on unknown node");
            return;
        }
        let mut nodes = self.nodes.borrow_mut();
        if let Some(anchor) = anchor {
            if anchor == child {
                return;
            }
            if !nodes[parent.0].children.contains(&anchor) {
                tracing::error!(%parent, %anchor, "insert_before anchor is not a child");
                return;
            }
        }

        // Detaching may shift the anchor when child and anchor share a parent.
        detach(&mut nodes, child);
        let position = anchor
            .and_then(|anchor| nodes[parent.0].children.iter().position(|&c| c == anchor))
            .unwrap_or(nodes[parent.0].children.len());
        nodes[parent.0].children.insert(position, child);
        nodes[child.0].parent = Some(parent);
        drop(nodes);

        self.record(Mutation::Insert { parent, child });
    }

    fn replace_child(&self, parent: NodeId, new: NodeId, old: NodeId) {
        if !self.is_valid(parent) || !self.is_valid(new) || !self.is_valid(old) {
            tracing::error!(%parent, %new, %old, "replace_child on unknown node");
            return;
        }
        if new == old {
            return;
        }
        let mut nodes = self.nodes.borrow_mut();
        if nodes[old.0].parent != Some(parent) {
            tracing::error!(%parent, %old, "replace_child target is not a child");
            return;
        }
        detach(&mut nodes, new);

        let Some(position) = nodes[parent.0].children.iter().position(|&c| c == old) else {
            return;
        };
        nodes[parent.0].children[position] = new;
        nodes[new.0].parent = Some(parent);
        nodes[old.0].parent = None;
        drop(nodes);

        self.record(Mutation::Replace { parent, new, old });
    }

    fn remove_child(&self, parent: NodeId, child: NodeId) {
        if !self.is_valid(parent) || !self.is_valid(child) {
            tracing::error!(%parent, %child, "remove_child on unknown node");
            return;
        }
        let mut nodes = self.nodes.borrow_mut();
        if nodes[child.0].parent != Some(parent) {
            tracing::error!(%parent, %child, "remove_child target is not a child");
            return;
        }
        detach(&mut nodes, child);
        drop(nodes);

        self.record(Mutation::Remove { parent, child });
    }

    fn set_text(&self, node: NodeId, text: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let Some(data) = nodes.get_mut(node.0) else {
            tracing::error!(%node, "set_text on unknown node");
            return;
        };
        if data.kind != NodeKind::Text {
            tracing::error!(%node, "set_text on a non-text node");
            return;
        }
        data.text = text.to_string();
        drop(nodes);

        self.record(Mutation::SetText { node });
    }

    fn set_property(&self, node: NodeId, key: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let Some(data) = nodes.get_mut(node.0) else {
            tracing::error!(%node, key, "set_property on unknown node");
            return;
        };
        data.properties.insert(key.to_string(), value.to_string());
        drop(nodes);

        self.record(Mutation::SetProperty {
            node,
            key: key.to_string(),
        });
    }

    fn set_style(&self, node: NodeId, key: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let Some(data) = nodes.get_mut(node.0) else {
            tracing::error!(%node, key, "set_style on unknown node");
            return;
        };
        data.styles.insert(key.to_string(), value.to_string());
        drop(nodes);

        self.record(Mutation::SetStyle {
            node,
            key: key.to_string(),
        });
    }
}
