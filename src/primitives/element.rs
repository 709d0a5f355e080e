//! WitnessElement - The unit of a declarative tree.
//!
//! An element is inert until [`mount`](WitnessElement::mount)ed into a slot.
//! While mounted it owns its nodes and subscriptions; `unmount` gives both
//! back and leaves the element ready to be discarded, or mounted again by a
//! branch switcher that toggles back to it.
//!
//! Mounting an element that is already mounted, or unmounting one that is
//! not, is a caller bug. It is not detected in release builds.

use super::control_flow::{CaseElement, ListElement};
use super::structure::StructureElement;
use super::text::TextElement;
use crate::engine::Slot;
use crate::types::ElementKind;

pub enum WitnessElement {
    Structural(StructureElement),
    Text(TextElement),
    List(ListElement),
    Case(CaseElement),
    Empty,
}

impl WitnessElement {
    pub fn mount(&mut self, slot: Slot) {
        match self {
            WitnessElement::Structural(element) => element.mount(slot),
            WitnessElement::Text(element) => element.mount(slot),
            WitnessElement::List(element) => element.mount(slot),
            WitnessElement::Case(element) => element.mount(slot),
            WitnessElement::Empty => {}
        }
    }

    pub fn unmount(&mut self) {
        match self {
            WitnessElement::Structural(element) => element.unmount(),
            WitnessElement::Text(element) => element.unmount(),
            WitnessElement::List(element) => element.unmount(),
            WitnessElement::Case(element) => element.unmount(),
            WitnessElement::Empty => {}
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            WitnessElement::Structural(_) => ElementKind::Structural,
            WitnessElement::Text(_) => ElementKind::Text,
            WitnessElement::List(_) => ElementKind::List,
            WitnessElement::Case(_) => ElementKind::Case,
            WitnessElement::Empty => ElementKind::Empty,
        }
    }

    pub fn is_mounted(&self) -> bool {
        match self {
            WitnessElement::Structural(element) => element.is_mounted(),
            WitnessElement::Text(element) => element.is_mounted(),
            WitnessElement::List(element) => element.is_mounted(),
            WitnessElement::Case(element) => element.is_mounted(),
            WitnessElement::Empty => false,
        }
    }
}

impl std::fmt::Debug for WitnessElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WitnessElement::Structural(element) => std::fmt::Debug::fmt(element, f),
            WitnessElement::Text(element) => std::fmt::Debug::fmt(element, f),
            other => f
                .debug_struct("WitnessElement")
                .field("kind", &other.kind())
                .field("mounted", &other.is_mounted())
                .finish(),
        }
    }
}

impl From<StructureElement> for WitnessElement {
    fn from(element: StructureElement) -> Self {
        WitnessElement::Structural(element)
    }
}

impl From<TextElement> for WitnessElement {
    fn from(element: TextElement) -> Self {
        WitnessElement::Text(element)
    }
}

impl From<ListElement> for WitnessElement {
    fn from(element: ListElement) -> Self {
        WitnessElement::List(element)
    }
}

impl From<CaseElement> for WitnessElement {
    fn from(element: CaseElement) -> Self {
        WitnessElement::Case(element)
    }
}
