//! Element Primitives - Building blocks of a declarative tree.
//!
//! This module provides the element constructors:
//! - [`create_element`] / [`h`] - Tagged node with props, styles and children
//! - [`text`] - Text node with static or streamed content
//! - [`map`] - Keyed list with per-item observables
//! - [`cond`] - Branch switcher with [`is`], [`when`] and [`otherwise`] matchers
//! - [`WitnessElement::Empty`] - Nothing, held by a placeholder
//!
//! # Architecture
//!
//! Constructors only describe. Nothing touches the document until the tree is
//! mounted into a slot. Each element then:
//! 1. Creates its node(s) through the host
//! 2. Binds every stream input to its own point listener
//! 3. Mounts its children into slots of its own
//! 4. Installs itself into the slot it was given
//!
//! # Reactivity
//!
//! Props can be:
//! - Static values: `.prop("id", "x")` (written once)
//! - Subjects, signals, getters: `.style("color", color_subject)` (stays connected!)
//!
//! Pass the stream itself, not a value read from it:
//!
//! ```ignore
//! // CORRECT - the element follows the signal
//! h("div", Props::new().style("width", width_signal.clone()));
//!
//! // WRONG - reads once, the element never updates
//! h("div", Props::new().style("width", width_signal.get()));
//! ```

mod control_flow;
mod element;
mod structure;
mod text;
mod types;

pub use control_flow::{
    cond, is, map, otherwise, when, CaseElement, KeySelector, Keyed, ListElement, Matcher,
};
pub use element::WitnessElement;
pub use structure::{create_element, h, StructureElement};
pub use text::{text, TextElement};
pub use types::{ElementArgs, Lifecycle, PropValue, Props, WitnessSubject};
