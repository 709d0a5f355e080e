//! Text Element - A single text node.
//!
//! # Reactivity
//!
//! Content can be a static string or a stream. A stream's emissions overwrite
//! the node's text in place; the node itself is never replaced. Until a stream
//! emits, the node is empty.
//!
//! # Example
//!
//! ```ignore
//! use witness_dom::{text, watch};
//! use spark_signals::signal;
//!
//! // Static text
//! text("Hello, World!");
//!
//! // Reactive text
//! let count = signal(0);
//! let count_clone = count.clone();
//! text(watch(move || format!("Count: {}", count_clone.get())));
//!
//! // Update count - text updates automatically
//! count.set(42);
//! ```

use std::rc::Rc;

use super::types::PropValue;
use super::WitnessElement;
use crate::engine::Slot;
use crate::host::{Host, NodeId};
use crate::observable::{Listener, Subscription};

struct TextListener {
    host: Rc<dyn Host>,
    node: NodeId,
}

impl Listener<String> for TextListener {
    fn next(&self, value: String) {
        self.host.set_text(self.node, &value);
    }
}

struct MountedText {
    slot: Slot,
    node: NodeId,
    subscription: Option<Subscription>,
}

pub struct TextElement {
    value: PropValue,
    mounted: Option<MountedText>,
}

impl TextElement {
    pub fn new(value: impl Into<PropValue>) -> Self {
        Self {
            value: value.into(),
            mounted: None,
        }
    }

    pub fn node(&self) -> Option<NodeId> {
        self.mounted.as_ref().map(|m| m.node)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn mount(&mut self, slot: Slot) {
        debug_assert!(self.mounted.is_none(), "text element mounted twice");

        let host = slot.context().host_handle();
        let node = match &self.value {
            PropValue::Static(value) => host.create_text(value),
            PropValue::Stream(_) => host.create_text(""),
        };
        slot.set(node);

        // Subscribed after install: a replaying source writes into a node that
        // is already in the document.
        let subscription = match &self.value {
            PropValue::Static(_) => None,
            PropValue::Stream(source) => Some(source.subscribe(Rc::new(TextListener {
                host: host.clone(),
                node,
            }))),
        };

        self.mounted = Some(MountedText {
            slot,
            node,
            subscription,
        });
    }

    pub fn unmount(&mut self) {
        let Some(mut mounted) = self.mounted.take() else {
            return;
        };
        if let Some(subscription) = mounted.subscription.as_mut() {
            subscription.unsubscribe();
        }
        mounted.slot.empty();
    }
}

impl std::fmt::Debug for TextElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextElement")
            .field("value", &self.value)
            .field("node", &self.node())
            .finish()
    }
}

/// Create a text element from a static value or a string stream.
pub fn text(value: impl Into<PropValue>) -> WitnessElement {
    WitnessElement::Text(TextElement::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderOptions;
    use crate::engine::RenderContext;
    use crate::host::MemoryDocument;
    use crate::observable::{ObservableExt, Subject};

    fn setup() -> (Rc<MemoryDocument>, Slot, NodeId) {
        let doc = Rc::new(MemoryDocument::new());
        let ctx = RenderContext::new(doc.clone(), RenderOptions::default());
        let root = doc.create_element("p");
        (doc, Slot::new(ctx, root), root)
    }

    #[test]
    fn test_static_text() {
        let (doc, slot, root) = setup();
        let mut element = text("Hello world");

        element.mount(slot);

        assert_eq!(doc.text_content(root), "Hello world");
        assert_eq!(doc.children(root).len(), 1);
    }

    #[test]
    fn test_stream_text_follows_latest_value() {
        let (doc, slot, root) = setup();
        let source = Subject::new();
        let mut element = text(source.clone());

        element.mount(slot);
        assert_eq!(doc.text_content(root), "", "nothing emitted yet");

        source.next("one".to_string());
        source.next("two".to_string());

        assert_eq!(doc.text_content(root), "two");
        assert_eq!(doc.children(root).len(), 1, "node is rewritten, not replaced");
    }

    #[test]
    fn test_seeded_stream_writes_at_mount() {
        let (doc, slot, root) = setup();
        let count = Subject::seeded(3);
        let mut element = text(count.clone().map(|n: i32| format!("{n} items")));

        element.mount(slot);

        assert_eq!(doc.text_content(root), "3 items");
    }

    #[test]
    fn test_unmount_stops_updates() {
        let (doc, slot, root) = setup();
        let source = Subject::new();
        let mut element = text(source.clone());
        element.mount(slot.clone());
        source.next("before".to_string());

        element.unmount();
        source.next("after".to_string());

        assert_eq!(source.listener_count(), 0);
        assert_eq!(doc.text_content(root), "");
        assert!(slot.holds_placeholder());
    }

    #[test]
    fn test_remount_after_unmount() {
        let (doc, slot, root) = setup();
        let source = Subject::seeded("x".to_string());
        let mut element = text(source.clone());

        element.mount(slot.clone());
        element.unmount();
        element.mount(slot.clone());
        source.next("y".to_string());

        assert_eq!(doc.text_content(root), "y");
        assert_eq!(source.listener_count(), 1);
        assert!(!slot.holds_placeholder());
    }
}
