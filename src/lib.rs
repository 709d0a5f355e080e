//! # witness-dom
//!
//! Stream-driven UI binding for Rust.
//!
//! Binds a declarative element tree to a live, mutable document without a
//! diff pass. Every dynamic value (a child list, a branch, a text value, a
//! style or property field) is bound through its own subscription, so a push
//! touches only the node that value owns.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals): signals
//! and getters can be bound directly wherever a stream is accepted.
//!
//! ## Architecture
//!
//! ```text
//! Construction API → WitnessElement tree → render → Slot / MultiSlot → Host
//!                                                     ↑
//!                              Observable push → point listener
//! ```
//!
//! A slot owns exactly one document position and never leaves it empty, so
//! siblings that mount late or unmount early can't corrupt insertion order.
//!
//! ## Modules
//!
//! - [`observable`] - Push contract, subjects, signal bridge
//! - [`host`] - Primitive document operations and the in-memory document
//! - [`engine`] - Placeholder pool, slots, multi-slots
//! - [`primitives`] - Element variants and their constructors
//! - [`pipeline`] - Render entry point and handles
//! - [`config`] - Render options
//! - [`error`] - Error types

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod observable;
pub mod pipeline;
pub mod primitives;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::RenderOptions;

pub use error::{BindError, BindResult, ConfigError, StreamError};

pub use engine::{ChildId, MultiSlot, PlaceholderPool, PoolStats, RenderContext, Slot, SlotKind};

pub use host::{Host, MemoryDocument, Mutation, NodeId, NodeKind};

pub use observable::{
    listener, listener_with_error, report_stream_error, unsubscribe_all, watch, ErrorHandler,
    Listener, Mapped, Observable, ObservableExt, Source, Subject, Subscription, Watch,
};

pub use pipeline::{render, unmount, RenderHandle, Renderer};

pub use primitives::{
    cond, create_element, h, is, map, otherwise, text, when, CaseElement, ElementArgs,
    KeySelector, Keyed, Lifecycle, ListElement, Matcher, PropValue, Props, StructureElement,
    TextElement, WitnessElement, WitnessSubject,
};
