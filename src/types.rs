//! Core types shared across the crate.

// =============================================================================
// Element Kind
// =============================================================================

/// Which variant a [`WitnessElement`](crate::primitives::WitnessElement) is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Structural,
    Text,
    List,
    Case,
    Empty,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementKind::Structural => "structural",
            ElementKind::Text => "text",
            ElementKind::List => "list",
            ElementKind::Case => "case",
            ElementKind::Empty => "empty",
        };
        f.write_str(name)
    }
}
