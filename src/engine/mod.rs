//! Binding engine - Position ownership in the document tree.
//!
//! The engine owns the machinery every element mounts through:
//! - Pool: recycled placeholder markers, held by a [`RenderContext`]
//! - Slot: exactly one occupant at one document position
//! - MultiSlot: an append-only run of slots behind a trailing anchor
//!
//! # Invariant
//!
//! A position is never left empty once it has been `ensure`d. When an element
//! has nothing to show, a placeholder marker stands in for it, so siblings
//! inserted later still land in the right order:
//!
//! ```text
//! <div>
//!   <!---->        ← branch with no match yet
//!   <span>b</span>
//! </div>
//! ```

mod multi_slot;
mod pool;
mod slot;

pub use multi_slot::{ChildId, MultiSlot};
pub use pool::{PlaceholderPool, PoolStats, RenderContext};
pub use slot::{Slot, SlotKind};
