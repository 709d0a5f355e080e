//! Primitive types - Prop values, props, lifecycle subjects and argument shapes.
//!
//! Every dynamic input of an element is a [`PropValue`]: either a static
//! string written once at mount, or a stream bound through its own
//! subscription for as long as the element stays mounted.

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::Signal;

use super::WitnessElement;
use crate::error::StreamError;
use crate::host::NodeId;
use crate::observable::{ErrorHandler, Mapped, Observable, Source, Subject, Watch};

// =============================================================================
// Prop Value - Static or streamed
// =============================================================================

/// A property, style or text value.
#[derive(Clone)]
pub enum PropValue {
    /// Written once at mount.
    Static(String),
    /// Written on every emission while mounted.
    Stream(Source<String>),
}

impl PropValue {
    pub fn stream(source: impl Observable<String> + 'static) -> Self {
        PropValue::Stream(Rc::new(source))
    }

    pub fn is_static(&self) -> bool {
        matches!(self, PropValue::Static(_))
    }
}

impl std::fmt::Debug for PropValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropValue::Static(v) => f.debug_tuple("Static").field(v).finish(),
            PropValue::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Static(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Static(value)
    }
}

macro_rules! static_prop_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PropValue {
                fn from(value: $ty) -> Self {
                    PropValue::Static(value.to_string())
                }
            }
        )*
    };
}

static_prop_from!(bool, i32, i64, u32, u64, usize, f64);

impl From<Source<String>> for PropValue {
    fn from(source: Source<String>) -> Self {
        PropValue::Stream(source)
    }
}

impl From<Subject<String>> for PropValue {
    fn from(subject: Subject<String>) -> Self {
        PropValue::stream(subject)
    }
}

impl From<Signal<String>> for PropValue {
    fn from(signal: Signal<String>) -> Self {
        PropValue::stream(signal)
    }
}

impl From<Watch<String>> for PropValue {
    fn from(watch: Watch<String>) -> Self {
        PropValue::stream(watch)
    }
}

impl<T: 'static> From<Mapped<T, String>> for PropValue {
    fn from(mapped: Mapped<T, String>) -> Self {
        PropValue::stream(mapped)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Properties and style fields of a structural element, in declared order.
///
/// ```ignore
/// let color = Subject::new();
/// let props = Props::new()
///     .prop("id", "banner")
///     .style("backgroundColor", color.clone());
/// ```
#[derive(Clone, Default)]
pub struct Props {
    pub(crate) properties: Vec<(String, PropValue)>,
    pub(crate) style: Vec<(String, PropValue)>,
    pub(crate) on_error: Option<ErrorHandler>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    pub fn style(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.style.push((key.into(), value.into()));
        self
    }

    /// Replace the default (logging) handler for stream errors on this element.
    pub fn on_error(mut self, handler: impl Fn(&StreamError) + 'static) -> Self {
        self.on_error = Some(Rc::new(handler));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.style.is_empty()
    }
}

impl std::fmt::Debug for Props {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Props")
            .field("properties", &self.properties)
            .field("style", &self.style)
            .finish()
    }
}

// =============================================================================
// Witness Subject - Lifecycle hook for a structural element
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Mounted(NodeId),
    Unmounted,
}

/// Handle notified when the structural element it is attached to mounts or
/// unmounts. Doubles as a node ref.
#[derive(Clone, Default)]
pub struct WitnessSubject {
    node: Rc<Cell<Option<NodeId>>>,
    events: Subject<Lifecycle>,
}

impl WitnessSubject {
    pub fn new() -> Self {
        Self::default()
    }

    /// The element's node while it is mounted.
    pub fn node(&self) -> Option<NodeId> {
        self.node.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.node.get().is_some()
    }

    /// Stream of mount/unmount events.
    pub fn events(&self) -> Subject<Lifecycle> {
        self.events.clone()
    }

    pub(crate) fn mounted(&self, node: NodeId) {
        self.node.set(Some(node));
        self.events.next(Lifecycle::Mounted(node));
    }

    pub(crate) fn unmounted(&self) {
        self.node.set(None);
        self.events.next(Lifecycle::Unmounted);
    }
}

// =============================================================================
// Element Args - Accepted argument shapes for create_element
// =============================================================================

/// The resolved arguments of [`create_element`](super::create_element).
///
/// Built through `From` so the call site can pass whichever shape it has:
///
/// | shape                                   | example                                  |
/// |-----------------------------------------|------------------------------------------|
/// | nothing                                 | `h("br", ())`                            |
/// | children                                | `h("ul", vec![...])`                     |
/// | props                                   | `h("input", Props::new()...)`            |
/// | props, children                         | `h("div", (props, vec![...]))`           |
/// | subject                                 | `h("canvas", subject)`                   |
/// | subject, children                       | `h("div", (subject, vec![...]))`         |
/// | subject, props                          | `h("div", (subject, props))`             |
/// | subject, props, children                | `h("div", (subject, props, vec![...]))`  |
#[derive(Default)]
pub struct ElementArgs {
    pub subject: Option<WitnessSubject>,
    pub props: Props,
    pub children: Vec<WitnessElement>,
}

impl From<()> for ElementArgs {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<Vec<WitnessElement>> for ElementArgs {
    fn from(children: Vec<WitnessElement>) -> Self {
        Self {
            children,
            ..Default::default()
        }
    }
}

impl<const N: usize> From<[WitnessElement; N]> for ElementArgs {
    fn from(children: [WitnessElement; N]) -> Self {
        Vec::from(children).into()
    }
}

impl From<Props> for ElementArgs {
    fn from(props: Props) -> Self {
        Self {
            props,
            ..Default::default()
        }
    }
}

impl From<(Props, Vec<WitnessElement>)> for ElementArgs {
    fn from((props, children): (Props, Vec<WitnessElement>)) -> Self {
        Self {
            subject: None,
            props,
            children,
        }
    }
}

impl<const N: usize> From<(Props, [WitnessElement; N])> for ElementArgs {
    fn from((props, children): (Props, [WitnessElement; N])) -> Self {
        (props, Vec::from(children)).into()
    }
}

impl From<WitnessSubject> for ElementArgs {
    fn from(subject: WitnessSubject) -> Self {
        Self {
            subject: Some(subject),
            ..Default::default()
        }
    }
}

impl From<(WitnessSubject, Vec<WitnessElement>)> for ElementArgs {
    fn from((subject, children): (WitnessSubject, Vec<WitnessElement>)) -> Self {
        Self {
            subject: Some(subject),
            props: Props::default(),
            children,
        }
    }
}

impl From<(WitnessSubject, Props)> for ElementArgs {
    fn from((subject, props): (WitnessSubject, Props)) -> Self {
        Self {
            subject: Some(subject),
            props,
            children: Vec::new(),
        }
    }
}

impl From<(WitnessSubject, Props, Vec<WitnessElement>)> for ElementArgs {
    fn from((subject, props, children): (WitnessSubject, Props, Vec<WitnessElement>)) -> Self {
        Self {
            subject: Some(subject),
            props,
            children,
        }
    }
}
