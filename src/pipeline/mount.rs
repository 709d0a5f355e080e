//! Render API - Mounting a tree into a host container.
//!
//! This module provides the entry point for putting an element tree into a
//! document. It creates the root slot inside the container, mounts the tree
//! into it, and hands back a handle that tears the tree down again.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use witness_dom::{h, render, text, Host, MemoryDocument};
//!
//! let doc = Rc::new(MemoryDocument::new());
//! let container = doc.create_element("body");
//!
//! // Mount the tree
//! let handle = render(h("p", [text("hello")]), doc.clone(), container);
//!
//! // Clean up
//! handle.unmount();
//! ```

use std::rc::Rc;

use crate::config::RenderOptions;
use crate::engine::{PoolStats, RenderContext, Slot};
use crate::host::{Host, NodeId};
use crate::primitives::WitnessElement;

// =============================================================================
// Render Handle
// =============================================================================

/// Handle returned by [`render`] that allows unmounting.
///
/// Dropping the handle unmounts the tree as well.
pub struct RenderHandle {
    root: Option<WitnessElement>,
    slot: Slot,
    ctx: Rc<RenderContext>,
}

impl RenderHandle {
    /// Unmount the tree and take the root position out of the container.
    ///
    /// This will:
    /// 1. Unmount the root element (revoking every subscription below it)
    /// 2. Remove the placeholder left in the root position
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(mut root) = self.root.take() else {
            return;
        };
        root.unmount();
        self.slot.release();

        tracing::debug!(container = %self.slot.parent(), "tree unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.root.is_some()
    }

    /// The container the tree was rendered into.
    pub fn container(&self) -> NodeId {
        self.slot.parent()
    }

    pub fn root(&self) -> Option<&WitnessElement> {
        self.root.as_ref()
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.ctx.pool_stats()
    }
}

impl Drop for RenderHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for RenderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderHandle")
            .field("container", &self.container())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Renders trees into one host, every root sharing one placeholder pool.
#[derive(Clone)]
pub struct Renderer {
    ctx: Rc<RenderContext>,
}

impl Renderer {
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self::with_options(host, RenderOptions::default())
    }

    pub fn with_options(host: Rc<dyn Host>, options: RenderOptions) -> Self {
        Self {
            ctx: RenderContext::new(host, options),
        }
    }

    pub fn context(&self) -> Rc<RenderContext> {
        self.ctx.clone()
    }

    /// Mount `tree` as the last child of `container`.
    pub fn render(&self, mut tree: WitnessElement, container: NodeId) -> RenderHandle {
        // 1. ROOT SLOT - appends inside the container
        let slot = Slot::new(self.ctx.clone(), container);

        // 2. MOUNT - recursively creates nodes and subscriptions
        tree.mount(slot.clone());

        // 3. HOLD POSITION - an element with no content leaves a placeholder
        slot.ensure();

        tracing::debug!(container = %container, kind = %tree.kind(), "tree mounted");

        RenderHandle {
            root: Some(tree),
            slot,
            ctx: self.ctx.clone(),
        }
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("options", self.ctx.options())
            .field("pool", &self.ctx.pool_stats())
            .finish()
    }
}

// =============================================================================
// Render Functions
// =============================================================================

/// Mount `tree` into `container` with default options and its own pool.
pub fn render(tree: WitnessElement, host: Rc<dyn Host>, container: NodeId) -> RenderHandle {
    Renderer::new(host).render(tree, container)
}

/// Unmount a rendered tree.
///
/// Equivalent to `handle.unmount()`.
pub fn unmount(handle: RenderHandle) {
    handle.unmount();
}
