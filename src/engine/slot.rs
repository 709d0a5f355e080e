//! Slot - Ownership of exactly one position in the document.
//!
//! A slot sits inside a fixed parent node and holds one occupant: either a
//! real node installed with [`Slot::set`] or a placeholder marker installed by
//! [`Slot::empty`]. Once a slot is `ensure`d it is never left without an
//! occupant, so a sibling mounted later can never be inserted in its place.
//!
//! Two kinds of slot exist:
//! - `Static` - first occupant is appended to the parent. Used for the render
//!   root and for the fixed children of a structural element, which are
//!   mounted strictly in order.
//! - `Anchored` - first occupant is inserted before a trailing anchor marker.
//!   Used by [`MultiSlot`](super::MultiSlot) for variable-length children.
//!
//! After the first occupant, both kinds swap in place via `replace_child`.

use std::cell::RefCell;
use std::rc::Rc;

use super::pool::RenderContext;
use crate::host::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Static,
    Anchored { end: NodeId },
}

struct SlotState {
    ctx: Rc<RenderContext>,
    parent: NodeId,
    kind: SlotKind,
    node: Option<NodeId>,
    placeholder: bool,
}

impl SlotState {
    fn attach(&mut self, node: NodeId) {
        let anchor = match self.kind {
            SlotKind::Static => None,
            SlotKind::Anchored { end } => Some(end),
        };
        match self.node {
            None => self.ctx.host().insert_before(self.parent, node, anchor),
            Some(old) => self.ctx.host().replace_child(self.parent, node, old),
        }
        self.node = Some(node);
    }
}

/// Shared handle to one document position.
///
/// Cloning shares the position: the element mounted into a slot and the
/// container tracking it both see the same occupant.
#[derive(Clone)]
pub struct Slot {
    state: Rc<RefCell<SlotState>>,
}

impl Slot {
    fn with_kind(ctx: Rc<RenderContext>, parent: NodeId, kind: SlotKind) -> Self {
        Self {
            state: Rc::new(RefCell::new(SlotState {
                ctx,
                parent,
                kind,
                node: None,
                placeholder: false,
            })),
        }
    }

    /// Slot appending into `parent` (render root, structural children).
    pub fn new(ctx: Rc<RenderContext>, parent: NodeId) -> Self {
        Self::with_kind(ctx, parent, SlotKind::Static)
    }

    /// Slot inserting before `end` inside `parent`.
    pub fn anchored(ctx: Rc<RenderContext>, parent: NodeId, end: NodeId) -> Self {
        Self::with_kind(ctx, parent, SlotKind::Anchored { end })
    }

    pub fn context(&self) -> Rc<RenderContext> {
        self.state.borrow().ctx.clone()
    }

    pub fn parent(&self) -> NodeId {
        self.state.borrow().parent
    }

    pub fn kind(&self) -> SlotKind {
        self.state.borrow().kind
    }

    /// Current occupant, real or placeholder.
    pub fn node(&self) -> Option<NodeId> {
        self.state.borrow().node
    }

    pub fn holds_placeholder(&self) -> bool {
        self.state.borrow().placeholder
    }

    /// Install `node`, replacing the current occupant. A replaced placeholder
    /// goes back to the pool.
    pub fn set(&self, node: NodeId) {
        let mut state = self.state.borrow_mut();
        if state.node == Some(node) {
            return;
        }
        let old = state.node;
        state.attach(node);

        if state.placeholder {
            state.placeholder = false;
            if let Some(old) = old {
                state.ctx.release_placeholder(old);
            }
        }
    }

    /// Install a placeholder unless one is already there.
    pub fn empty(&self) {
        let mut state = self.state.borrow_mut();
        if state.placeholder {
            return;
        }
        let marker = state.ctx.acquire_placeholder();
        state.attach(marker);
        state.placeholder = true;
    }

    /// Install a placeholder only if the slot has never been filled.
    pub fn ensure(&self) {
        if self.node().is_none() {
            self.empty();
        }
    }

    /// Take the occupant out of the document. A placeholder goes back to the pool.
    ///
    /// The slot is left with no occupant; it is only released when its
    /// position is going away for good.
    pub fn release(&self) {
        let mut state = self.state.borrow_mut();
        let Some(node) = state.node.take() else { return };
        state.ctx.host().remove_child(state.parent, node);
        if state.placeholder {
            state.placeholder = false;
            state.ctx.release_placeholder(node);
        }
    }
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Slot")
            .field("parent", &state.parent)
            .field("kind", &state.kind)
            .field("node", &state.node)
            .field("placeholder", &state.placeholder)
            .finish()
    }
}
