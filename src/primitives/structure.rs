//! Structural Element - A tagged node with props, styles and fixed children.
//!
//! # Reactivity
//!
//! Each prop and style field is bound on its own. A static value is written
//! once at mount. A stream gets a point listener that rewrites exactly that
//! one field on every emission; nothing else on the node, and nothing on any
//! sibling, is touched.
//!
//! # Example
//!
//! ```ignore
//! use witness_dom::{h, text, Props, Subject};
//!
//! let color = Subject::new();
//! let tree = h("div", (
//!     Props::new().prop("id", "banner").style("backgroundColor", color.clone()),
//!     vec![text("hello")],
//! ));
//!
//! // Later - only the banner's background field is rewritten
//! color.next("red".to_string());
//! ```

use std::rc::Rc;

use super::types::{ElementArgs, PropValue, Props, WitnessSubject};
use super::WitnessElement;
use crate::engine::Slot;
use crate::error::StreamError;
use crate::host::{Host, NodeId};
use crate::observable::{report_stream_error, unsubscribe_all, ErrorHandler, Listener, Subscription};

// =============================================================================
// Point Listener - Writes one field of one node
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Property,
    Style,
}

fn write_field(host: &dyn Host, node: NodeId, field: Field, key: &str, value: &str) {
    match field {
        Field::Property => host.set_property(node, key, value),
        Field::Style => host.set_style(node, key, value),
    }
}

struct PointListener {
    host: Rc<dyn Host>,
    node: NodeId,
    field: Field,
    key: String,
    on_error: Option<ErrorHandler>,
}

impl Listener<String> for PointListener {
    fn next(&self, value: String) {
        write_field(self.host.as_ref(), self.node, self.field, &self.key, &value);
    }

    fn error(&self, err: StreamError) {
        match &self.on_error {
            Some(handler) => handler(&err),
            None => report_stream_error(&err),
        }
    }
}

// =============================================================================
// Structure Element
// =============================================================================

struct MountedStructure {
    slot: Slot,
    node: NodeId,
    child_slots: Vec<Slot>,
    subscriptions: Vec<Subscription>,
}

pub struct StructureElement {
    tag: String,
    props: Props,
    children: Vec<WitnessElement>,
    subject: Option<WitnessSubject>,
    mounted: Option<MountedStructure>,
}

impl StructureElement {
    pub fn new(tag: impl Into<String>, args: ElementArgs) -> Self {
        Self {
            tag: tag.into(),
            props: args.props,
            children: args.children,
            subject: args.subject,
            mounted: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn children(&self) -> &[WitnessElement] {
        &self.children
    }

    /// The element's node while mounted.
    pub fn node(&self) -> Option<NodeId> {
        self.mounted.as_ref().map(|m| m.node)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Live prop/style subscriptions held by this element (children excluded).
    pub fn subscription_count(&self) -> usize {
        self.mounted.as_ref().map_or(0, |m| m.subscriptions.len())
    }

    pub fn mount(&mut self, slot: Slot) {
        debug_assert!(self.mounted.is_none(), "<{}> mounted twice", self.tag);

        // 1. CREATE NODE
        let ctx = slot.context();
        let host = ctx.host_handle();
        let node = host.create_element(&self.tag);

        // 2. BIND STYLES, THEN PROPS - declared order within each
        let mut subscriptions = Vec::new();
        for (key, value) in &self.props.style {
            if let Some(sub) = self.bind(&host, node, Field::Style, key, value) {
                subscriptions.push(sub);
            }
        }
        for (key, value) in &self.props.properties {
            if let Some(sub) = self.bind(&host, node, Field::Property, key, value) {
                subscriptions.push(sub);
            }
        }

        // 3. MOUNT CHILDREN - each position filled before the next child mounts
        let mut child_slots = Vec::with_capacity(self.children.len());
        for child in &mut self.children {
            let child_slot = Slot::new(ctx.clone(), node);
            child.mount(child_slot.clone());
            child_slot.ensure();
            child_slots.push(child_slot);
        }

        // 4. INSTALL
        slot.set(node);
        self.mounted = Some(MountedStructure {
            slot,
            node,
            child_slots,
            subscriptions,
        });

        if let Some(subject) = &self.subject {
            subject.mounted(node);
        }
    }

    fn bind(
        &self,
        host: &Rc<dyn Host>,
        node: NodeId,
        field: Field,
        key: &str,
        value: &PropValue,
    ) -> Option<Subscription> {
        match value {
            PropValue::Static(v) => {
                write_field(host.as_ref(), node, field, key, v);
                None
            }
            PropValue::Stream(source) => Some(source.subscribe(Rc::new(PointListener {
                host: host.clone(),
                node,
                field,
                key: key.to_string(),
                on_error: self.props.on_error.clone(),
            }))),
        }
    }

    pub fn unmount(&mut self) {
        let Some(mut mounted) = self.mounted.take() else {
            tracing::debug!(tag = %self.tag, "unmount of an element that is not mounted");
            return;
        };

        for (child, child_slot) in self.children.iter_mut().zip(mounted.child_slots.drain(..)) {
            child.unmount();
            child_slot.release();
        }

        mounted.slot.empty();
        unsubscribe_all(&mut mounted.subscriptions);

        if let Some(subject) = &self.subject {
            subject.unmounted();
        }
    }
}

impl std::fmt::Debug for StructureElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureElement")
            .field("tag", &self.tag)
            .field("props", &self.props)
            .field("children", &self.children)
            .field("node", &self.node())
            .finish()
    }
}

// =============================================================================
// Construction
// =============================================================================

/// Build a structural element.
///
/// `args` may be any shape listed on [`ElementArgs`]: nothing, children,
/// props, a lifecycle subject, or a tuple of those in subject/props/children order.
pub fn create_element(tag: impl Into<String>, args: impl Into<ElementArgs>) -> WitnessElement {
    WitnessElement::Structural(StructureElement::new(tag, args.into()))
}

/// Shorthand for [`create_element`].
pub fn h(tag: impl Into<String>, args: impl Into<ElementArgs>) -> WitnessElement {
    create_element(tag, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderOptions;
    use crate::engine::RenderContext;
    use crate::host::MemoryDocument;
    use crate::observable::{Observable, Subject};
    use crate::primitives::{text, Lifecycle};
    use std::cell::RefCell;

    fn setup() -> (Rc<MemoryDocument>, Slot, NodeId) {
        let doc = Rc::new(MemoryDocument::new());
        let ctx = RenderContext::new(doc.clone(), RenderOptions::default());
        let root = doc.create_element("main");
        (doc, Slot::new(ctx, root), root)
    }

    fn structure(element: &mut WitnessElement) -> &mut StructureElement {
        match element {
            WitnessElement::Structural(s) => s,
            _ => panic!("expected a structural element"),
        }
    }

    #[test]
    fn test_mount_creates_tagged_node() {
        let (doc, slot, root) = setup();
        let mut tree = h("i", ());

        tree.mount(slot);

        let children = doc.element_children(root);
        assert_eq!(children.len(), 1);
        assert_eq!(doc.tag(children[0]).as_deref(), Some("i"));
    }

    #[test]
    fn test_static_props_and_styles() {
        let (doc, slot, _root) = setup();
        let mut tree = h(
            "input",
            Props::new()
                .prop("id", "test")
                .prop("value", "test")
                .style("display", "inline-block"),
        );

        tree.mount(slot);
        let node = structure(&mut tree).node().unwrap();

        assert_eq!(doc.property(node, "id").as_deref(), Some("test"));
        assert_eq!(doc.property(node, "value").as_deref(), Some("test"));
        assert_eq!(doc.style(node, "display").as_deref(), Some("inline-block"));
        assert_eq!(structure(&mut tree).subscription_count(), 0);
    }

    #[test]
    fn test_children_mount_in_order() {
        let (doc, slot, root) = setup();
        let mut tree = h("div", [text("a"), WitnessElement::Empty, text("b")]);

        tree.mount(slot);
        let node = structure(&mut tree).node().unwrap();

        assert_eq!(doc.text_content(root), "ab");
        let children = doc.children(node);
        assert_eq!(children.len(), 3, "empty child holds a placeholder");
        assert!(doc.is_marker(children[1]));
    }

    #[test]
    fn test_unmount_unsubscribes_and_recycles() {
        let (doc, slot, root) = setup();
        let color = Subject::new();
        let value = Subject::new();
        let mut tree = h(
            "div",
            (
                Props::new()
                    .style("color", color.clone())
                    .prop("title", value.clone()),
                vec![text(value.clone())],
            ),
        );

        tree.mount(slot.clone());
        assert_eq!(color.listener_count(), 1);
        assert_eq!(value.listener_count(), 2, "prop and child text");

        tree.unmount();

        assert_eq!(color.listener_count(), 0);
        assert_eq!(value.listener_count(), 0);
        assert!(!tree.is_mounted());
        assert!(slot.holds_placeholder());
        assert_eq!(doc.element_children(root).len(), 0);
        assert_eq!(slot.context().pool_stats().in_use(), 1, "only the root placeholder");
    }

    #[test]
    fn test_error_override() {
        let (_doc, slot, _root) = setup();
        let errors = Rc::new(RefCell::new(Vec::new()));
        let errors_clone = errors.clone();
        let source: Subject<String> = Subject::new();

        let mut tree = h(
            "div",
            Props::new()
                .prop("title", source.clone())
                .on_error(move |err| errors_clone.borrow_mut().push(err.to_string())),
        );
        tree.mount(slot);

        source.error("lost connection");

        assert_eq!(*errors.borrow(), vec!["lost connection".to_string()]);
        assert!(tree.is_mounted(), "stream errors do not unmount");
    }

    #[test]
    fn test_subject_sees_lifecycle() {
        let (_doc, slot, _root) = setup();
        let subject = WitnessSubject::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let events_clone = events.clone();
        let mut sub = subject
            .events()
            .subscribe(crate::observable::listener(move |e: Lifecycle| {
                events_clone.borrow_mut().push(e)
            }));

        let mut tree = h("canvas", subject.clone());
        tree.mount(slot);
        let node = subject.node().unwrap();
        tree.unmount();

        assert_eq!(
            *events.borrow(),
            vec![Lifecycle::Mounted(node), Lifecycle::Unmounted]
        );
        sub.unsubscribe();
    }
}
