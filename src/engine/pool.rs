//! Placeholder Pool - Recycled marker nodes, owned by a render context.
//!
//! Markers hold a document position while a slot has no real content. They
//! are never destroyed: a freed marker goes back on the free-list and the next
//! `acquire` hands it out again. The list only grows when every marker is in use.
//!
//! The pool lives inside a [`RenderContext`] rather than in global state, so
//! independent render roots never share markers unless they share a context.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::RenderOptions;
use crate::host::{Host, NodeId};

// =============================================================================
// Pool
// =============================================================================

#[derive(Debug, Default)]
pub struct PlaceholderPool {
    free: Vec<NodeId>,
    allocated: usize,
}

/// Snapshot of pool usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Markers ever created by this pool.
    pub allocated: usize,
    /// Markers currently on the free-list.
    pub free: usize,
}

impl PoolStats {
    /// Markers currently sitting in the document.
    pub fn in_use(&self) -> usize {
        self.allocated - self.free
    }
}

impl PlaceholderPool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            allocated: 0,
        }
    }

    /// Reuse a free marker, or create one.
    pub fn acquire(&mut self, host: &dyn Host) -> NodeId {
        match self.free.pop() {
            Some(node) => node,
            None => {
                self.allocated += 1;
                host.create_marker()
            }
        }
    }

    /// Return a detached marker to the free-list.
    pub fn release(&mut self, node: NodeId) {
        debug_assert!(!self.free.contains(&node), "marker {node} released twice");
        self.free.push(node);
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            allocated: self.allocated,
            free: self.free.len(),
        }
    }
}

// =============================================================================
// Render Context
// =============================================================================

/// Everything a slot needs from its render root: the host and the marker pool.
pub struct RenderContext {
    host: Rc<dyn Host>,
    pool: RefCell<PlaceholderPool>,
    options: RenderOptions,
}

impl RenderContext {
    pub fn new(host: Rc<dyn Host>, options: RenderOptions) -> Rc<Self> {
        let mut pool = PlaceholderPool::with_capacity(options.placeholder_capacity);
        let prewarmed: Vec<NodeId> = (0..options.prewarm_placeholders)
            .map(|_| pool.acquire(host.as_ref()))
            .collect();
        for node in prewarmed {
            pool.release(node);
        }

        Rc::new(Self {
            host,
            pool: RefCell::new(pool),
            options,
        })
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// Shared handle to the host, for listeners that outlive a borrow.
    pub fn host_handle(&self) -> Rc<dyn Host> {
        self.host.clone()
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn acquire_placeholder(&self) -> NodeId {
        self.pool.borrow_mut().acquire(self.host.as_ref())
    }

    pub fn release_placeholder(&self, node: NodeId) {
        self.pool.borrow_mut().release(node);
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.borrow().stats()
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("pool", &self.pool.borrow().stats())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryDocument;

    #[test]
    fn test_acquire_reuses_released_marker() {
        let doc = MemoryDocument::new();
        let mut pool = PlaceholderPool::default();

        let first = pool.acquire(&doc);
        pool.release(first);
        let second = pool.acquire(&doc);

        assert_eq!(first, second, "released marker should be handed out again");
        assert_eq!(pool.stats().allocated, 1);
        assert_eq!(doc.node_count(), 1);
    }

    #[test]
    fn test_pool_grows_only_when_empty() {
        let doc = MemoryDocument::new();
        let mut pool = PlaceholderPool::default();

        let a = pool.acquire(&doc);
        let b = pool.acquire(&doc);
        assert_ne!(a, b);
        assert_eq!(pool.stats(), PoolStats { allocated: 2, free: 0 });

        pool.release(a);
        pool.release(b);
        assert_eq!(pool.stats().in_use(), 0);
    }

    #[test]
    fn test_context_prewarm() {
        let doc = Rc::new(MemoryDocument::new());
        let ctx = RenderContext::new(doc.clone(), RenderOptions::default().with_prewarm(4));

        assert_eq!(ctx.pool_stats(), PoolStats { allocated: 4, free: 4 });

        let marker = ctx.acquire_placeholder();
        assert!(doc.is_marker(marker));
        assert_eq!(doc.node_count(), 4, "prewarmed marker reused, nothing new created");
    }
}
