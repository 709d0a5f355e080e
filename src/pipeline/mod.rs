//! Render Pipeline
//!
//! Connects an element tree to a host container.
//!
//! ```text
//! create_element / map / cond / text → WitnessElement tree → render → root Slot → host
//! ```
//!
//! There is no frame loop. After `render` returns, every update is driven by
//! a value stream pushing into a point listener, which writes straight to the
//! host before the push returns.

pub mod mount;

pub use mount::{render, unmount, RenderHandle, Renderer};
