//! MultiSlot - A variable-length run of children behind one trailing anchor.
//!
//! The multi-slot installs a single marker (the anchor) into the slot it was
//! given. Every child slot it creates inserts before that anchor, so appending
//! a child never needs to know how many siblings exist or which of them are
//! currently placeholders.
//!
//! ```text
//! parent: [ ...siblings... | child 0 | child 1 | child 2 | <!--end--> | ...siblings... ]
//!                            ^ each child is an anchored Slot
//! ```
//!
//! Insertion is append-only: the index passed to [`MultiSlot::insert`] must be
//! the current length. Anything else is a caller bug and fails the operation.

use std::rc::Rc;

use super::pool::RenderContext;
use super::slot::Slot;
use crate::error::{BindError, BindResult};
use crate::host::NodeId;
use crate::primitives::WitnessElement;

/// Identity of a child inside one multi-slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildId(u64);

struct Child {
    id: ChildId,
    slot: Slot,
    element: WitnessElement,
}

pub struct MultiSlot {
    slot: Slot,
    ctx: Rc<RenderContext>,
    end: Option<NodeId>,
    children: Vec<Child>,
    next_id: u64,
}

impl MultiSlot {
    /// Take over `slot` by installing the trailing anchor into it.
    pub fn new(slot: Slot) -> Self {
        let ctx = slot.context();
        let end = ctx.acquire_placeholder();
        slot.set(end);

        Self {
            slot,
            ctx,
            end: Some(end),
            children: Vec::new(),
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The trailing anchor, until [`remove_self`](Self::remove_self).
    pub fn anchor(&self) -> Option<NodeId> {
        self.end
    }

    pub fn element(&self, index: usize) -> Option<&WitnessElement> {
        self.children.get(index).map(|c| &c.element)
    }

    pub fn child_id(&self, index: usize) -> Option<ChildId> {
        self.children.get(index).map(|c| c.id)
    }

    /// Mount `element` as the new last child.
    ///
    /// The child slot is `ensure`d right after mounting, so an element that
    /// produced no content still holds its position with a placeholder.
    pub fn insert(&mut self, index: usize, mut element: WitnessElement) -> BindResult<ChildId> {
        let end = self.end.ok_or(BindError::Detached)?;
        if index != self.children.len() {
            return Err(BindError::out_of_order(index, self.children.len()));
        }

        let slot = Slot::anchored(self.ctx.clone(), self.slot.parent(), end);
        element.mount(slot.clone());
        slot.ensure();

        let id = ChildId(self.next_id);
        self.next_id += 1;
        self.children.push(Child { id, slot, element });
        Ok(id)
    }

    /// Unmount the child at `index` and drop its position.
    ///
    /// `id` must be the identity returned by the matching `insert`; a
    /// mismatch means the caller's bookkeeping has drifted and nothing is touched.
    pub fn remove(&mut self, index: usize, id: ChildId) -> BindResult<WitnessElement> {
        let len = self.children.len();
        let child = self
            .children
            .get(index)
            .ok_or(BindError::out_of_bounds(index, len))?;
        if child.id != id {
            return Err(BindError::ElementMismatch { index });
        }

        let Child { slot, mut element, .. } = self.children.remove(index);
        element.unmount();
        slot.release();
        Ok(element)
    }

    /// Detach and recycle the trailing anchor.
    ///
    /// Children still present are unmounted first. The owning slot is left
    /// holding a placeholder, so it can be filled again.
    pub fn remove_self(&mut self) {
        let Some(end) = self.end.take() else { return };

        for Child { slot, mut element, .. } in self.children.drain(..).rev() {
            element.unmount();
            slot.release();
        }

        self.slot.empty();
        self.ctx.release_placeholder(end);
    }
}

impl std::fmt::Debug for MultiSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiSlot")
            .field("end", &self.end)
            .field("len", &self.children.len())
            .finish()
    }
}
