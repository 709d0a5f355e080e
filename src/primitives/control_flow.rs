//! Control Flow Primitives - Conditional and keyed list rendering.
//!
//! This module provides the two stream-driven elements:
//! - [`cond`] - Conditional branch switching on the latest value of a stream
//! - [`map`] - Keyed list rendering with fine-grained per-item updates
//!
//! # Pattern: State Behind a Weak Listener
//!
//! Both elements keep their mutable state in an `Rc<RefCell<..>>`:
//! 1. The element owns the strong reference and the subscription
//! 2. The listener holds a `Weak` and upgrades it per emission
//! 3. A delivery that arrives while the state is already borrowed (the element
//!    re-entered itself from inside its own update) is rejected with a warning
//! 4. Unmount revokes the subscription before touching any child
//!
//! # Component Lifecycle
//!
//! ## cond()
//! - Each emission: the first matching branch wins (the fallback always matches)
//! - Different branch: current branch unmounted, new branch mounted into the slot
//! - Same branch: no document mutation at all
//! - On unmount: subscription revoked, current branch unmounted, slot emptied
//!
//! ## map()
//! - Items tracked by key (from a [`KeySelector`])
//! - New keys: seeded item subject + factory element, appended to the multi-slot
//! - Existing keys: item pushed into its subject (NO element recreation!)
//! - Removed keys: element unmounted, subject completed
//! - Reorder: persisting items keep their document position
//! - On unmount: every item removed, every subject completed, anchor released

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::{Rc, Weak};

use super::WitnessElement;
use crate::engine::{ChildId, MultiSlot, Slot};
use crate::error::BindResult;
use crate::observable::{Listener, Observable, ObservableExt, Source, Subject, Subscription};

// =============================================================================
// Matcher - Branch selection
// =============================================================================

/// Decides whether a branch of [`cond`] shows for a value.
pub enum Matcher<T> {
    /// Matches values equal to the held one.
    Equals(T),
    /// Matches values the predicate accepts.
    Predicate(Rc<dyn Fn(&T) -> bool>),
    /// Matches everything.
    Always,
}

impl<T: PartialEq> Matcher<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Matcher::Equals(expected) => expected == value,
            Matcher::Predicate(predicate) => predicate(value),
            Matcher::Always => true,
        }
    }
}

impl<T> From<T> for Matcher<T> {
    fn from(value: T) -> Self {
        Matcher::Equals(value)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Matcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Matcher::Equals(v) => f.debug_tuple("Equals").field(v).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
            Matcher::Always => f.write_str("Always"),
        }
    }
}

/// Match values equal to `value`.
pub fn is<T>(value: T) -> Matcher<T> {
    Matcher::Equals(value)
}

/// Match values accepted by `predicate`.
pub fn when<T>(predicate: impl Fn(&T) -> bool + 'static) -> Matcher<T> {
    Matcher::Predicate(Rc::new(predicate))
}

/// Match every value. Use as the last branch of [`cond`].
pub fn otherwise<T>() -> Matcher<T> {
    Matcher::Always
}

// =============================================================================
// cond() - Conditional branch element
// =============================================================================

struct CaseState<T> {
    branches: Vec<(Matcher<T>, WitnessElement)>,
    current: Option<usize>,
    slot: Option<Slot>,
}

impl<T: PartialEq> CaseState<T> {
    fn switch(&mut self, value: &T) {
        let Some(slot) = self.slot.clone() else {
            return;
        };
        let Some(next) = self.branches.iter().position(|(m, _)| m.matches(value)) else {
            return;
        };
        if self.current == Some(next) {
            return;
        }

        if let Some(previous) = self.current.take() {
            self.branches[previous].1.unmount();
        }
        self.branches[next].1.mount(slot.clone());
        slot.ensure();
        self.current = Some(next);

        tracing::debug!(branch = next, "branch switched");
    }

    fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            self.branches[previous].1.unmount();
        }
        if let Some(slot) = self.slot.take() {
            slot.empty();
        }
    }
}

struct CaseListener<T> {
    state: Weak<RefCell<CaseState<T>>>,
}

impl<T: PartialEq> Listener<T> for CaseListener<T> {
    fn next(&self, value: T) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let Ok(mut state) = state.try_borrow_mut() else {
            tracing::warn!("re-entrant branch emission rejected");
            return;
        };
        state.switch(&value);
    }
}

trait BranchBinding {
    fn mount(&mut self, slot: Slot);
    fn unmount(&mut self);
    fn is_mounted(&self) -> bool;
    fn current_branch(&self) -> Option<usize>;
}

struct Branches<T> {
    source: Source<T>,
    state: Rc<RefCell<CaseState<T>>>,
    subscription: Option<Subscription>,
}

impl<T: PartialEq + 'static> BranchBinding for Branches<T> {
    fn mount(&mut self, slot: Slot) {
        debug_assert!(self.subscription.is_none(), "branch element mounted twice");

        self.state.borrow_mut().slot = Some(slot);
        let listener = Rc::new(CaseListener {
            state: Rc::downgrade(&self.state),
        });
        self.subscription = Some(self.source.subscribe(listener));
    }

    fn unmount(&mut self) {
        let Some(mut subscription) = self.subscription.take() else {
            return;
        };
        subscription.unsubscribe();

        match self.state.try_borrow_mut() {
            Ok(mut state) => state.clear(),
            Err(_) => tracing::error!("branch element unmounted from inside its own update"),
        }
    }

    fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    fn current_branch(&self) -> Option<usize> {
        self.state.try_borrow().ok().and_then(|s| s.current)
    }
}

/// A mounted-or-not conditional branch switcher built by [`cond`].
pub struct CaseElement {
    binding: Box<dyn BranchBinding>,
}

impl CaseElement {
    pub fn mount(&mut self, slot: Slot) {
        self.binding.mount(slot);
    }

    pub fn unmount(&mut self) {
        self.binding.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.binding.is_mounted()
    }

    /// Index of the branch currently shown. The implicit fallback has the
    /// index one past the last declared branch.
    pub fn current_branch(&self) -> Option<usize> {
        self.binding.current_branch()
    }
}

/// Show the first branch whose matcher accepts the latest value of `source`.
///
/// An always-matching fallback to [`WitnessElement::Empty`] is appended after
/// the declared branches, so a value no branch accepts shows nothing.
///
/// # Example
///
/// ```ignore
/// use witness_dom::{cond, is, otherwise, text, Subject};
///
/// let flag = Subject::new();
/// let element = cond(flag.clone(), [
///     (is(true), text("hello")),
///     (otherwise(), text("bye")),
/// ]);
///
/// flag.next(true);  // "hello"
/// flag.next(false); // "bye"
/// ```
pub fn cond<T: PartialEq + 'static>(
    source: impl Observable<T> + 'static,
    branches: impl IntoIterator<Item = (Matcher<T>, WitnessElement)>,
) -> WitnessElement {
    let mut branches: Vec<_> = branches.into_iter().collect();
    branches.push((Matcher::Always, WitnessElement::Empty));

    let binding = Branches {
        source: source.into_source(),
        state: Rc::new(RefCell::new(CaseState {
            branches,
            current: None,
            slot: None,
        })),
        subscription: None,
    };

    WitnessElement::Case(CaseElement {
        binding: Box::new(binding),
    })
}

// =============================================================================
// Key Selection
// =============================================================================

/// Items that expose named fields a list key can be read from.
pub trait Keyed {
    fn key_field(&self, field: &str) -> Option<String>;
}

impl Keyed for serde_json::Value {
    fn key_field(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl Keyed for HashMap<String, String> {
    fn key_field(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

impl Keyed for BTreeMap<String, String> {
    fn key_field(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

/// How [`map`] derives the key of an item.
pub struct KeySelector<T> {
    derive: Rc<dyn Fn(&T) -> Option<String>>,
}

impl<T> Clone for KeySelector<T> {
    fn clone(&self) -> Self {
        Self {
            derive: self.derive.clone(),
        }
    }
}

impl<T: Keyed> KeySelector<T> {
    /// Read the key from the item's `name` field.
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            derive: Rc::new(move |item: &T| item.key_field(&name)),
        }
    }
}

impl<T> KeySelector<T> {
    /// Derive the key with a function.
    pub fn with<K: ToString>(derive: impl Fn(&T) -> K + 'static) -> Self {
        Self {
            derive: Rc::new(move |item: &T| Some(derive(item).to_string())),
        }
    }

    pub fn key_of(&self, item: &T) -> Option<String> {
        (self.derive)(item)
    }
}

impl<T: Keyed> From<&str> for KeySelector<T> {
    fn from(name: &str) -> Self {
        KeySelector::field(name)
    }
}

// =============================================================================
// map() - Keyed list element
// =============================================================================

struct ItemRecord<T> {
    id: ChildId,
    position: usize,
    subject: Subject<T>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ReconcileStats {
    inserted: usize,
    updated: usize,
    removed: usize,
}

struct ListState<T> {
    key: KeySelector<T>,
    factory: Rc<dyn Fn(Source<T>) -> WitnessElement>,
    slots: Option<MultiSlot>,
    records: HashMap<String, ItemRecord<T>>,
    warn_on_duplicate_keys: bool,
}

impl<T: Clone + 'static> ListState<T> {
    fn reconcile(&mut self, items: Vec<T>) -> BindResult<ReconcileStats> {
        let ListState {
            key,
            factory,
            slots,
            records,
            warn_on_duplicate_keys,
        } = self;
        let Some(slots) = slots.as_mut() else {
            return Ok(ReconcileStats::default());
        };
        let mut stats = ReconcileStats::default();
        let mut current_keys = HashSet::new();

        // 1. WALK - create or update in traversal order
        for item in items {
            let Some(item_key) = key.key_of(&item) else {
                tracing::warn!("list item has no key, skipped");
                continue;
            };

            if !current_keys.insert(item_key.clone()) {
                if *warn_on_duplicate_keys {
                    tracing::warn!(key = %item_key, "duplicate key in list emission, skipped");
                }
                continue;
            }

            match records.get(&item_key) {
                Some(record) => {
                    record.subject.next(item);
                    stats.updated += 1;
                }
                None => {
                    let subject = Subject::seeded(item);
                    let element = factory(subject.clone().into_source());
                    let position = slots.len();
                    let id = slots.insert(position, element)?;
                    records.insert(item_key, ItemRecord { id, position, subject });
                    stats.inserted += 1;
                }
            }
        }

        // 2. REMOVE - keys absent from this emission, highest position first
        let mut stale: Vec<(String, usize)> = records
            .iter()
            .filter(|(k, _)| !current_keys.contains(*k))
            .map(|(k, r)| (k.clone(), r.position))
            .collect();
        stale.sort_by(|a, b| b.1.cmp(&a.1));

        for (stale_key, _) in stale {
            let Some(record) = records.remove(&stale_key) else {
                continue;
            };
            slots.remove(record.position, record.id)?;
            for other in records.values_mut() {
                if other.position > record.position {
                    other.position -= 1;
                }
            }
            record.subject.complete();
            stats.removed += 1;
        }

        Ok(stats)
    }

    fn clear(&mut self) {
        let Some(mut slots) = self.slots.take() else {
            return;
        };

        let mut records: Vec<ItemRecord<T>> = self.records.drain().map(|(_, r)| r).collect();
        records.sort_by(|a, b| b.position.cmp(&a.position));

        for record in records {
            if let Err(err) = slots.remove(record.position, record.id) {
                tracing::error!(error = %err, "list item removal failed during unmount");
            }
            record.subject.complete();
        }
        slots.remove_self();
    }

    fn keys(&self) -> Vec<String> {
        let mut keyed: Vec<(&String, usize)> =
            self.records.iter().map(|(k, r)| (k, r.position)).collect();
        keyed.sort_by_key(|(_, position)| *position);
        keyed.into_iter().map(|(k, _)| k.clone()).collect()
    }
}

struct ListListener<T> {
    state: Weak<RefCell<ListState<T>>>,
}

impl<T: Clone + 'static> Listener<Vec<T>> for ListListener<T> {
    fn next(&self, items: Vec<T>) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let Ok(mut state) = state.try_borrow_mut() else {
            tracing::warn!("re-entrant list emission rejected");
            return;
        };

        match state.reconcile(items) {
            Ok(stats) => tracing::debug!(
                inserted = stats.inserted,
                updated = stats.updated,
                removed = stats.removed,
                "list reconciled"
            ),
            Err(err) => tracing::error!(error = %err, "list reconcile aborted"),
        }
    }
}

trait ListBinding {
    fn mount(&mut self, slot: Slot);
    fn unmount(&mut self);
    fn is_mounted(&self) -> bool;
    fn keys(&self) -> Vec<String>;
}

struct KeyedList<T> {
    source: Source<Vec<T>>,
    state: Rc<RefCell<ListState<T>>>,
    subscription: Option<Subscription>,
}

impl<T: Clone + 'static> ListBinding for KeyedList<T> {
    fn mount(&mut self, slot: Slot) {
        debug_assert!(self.subscription.is_none(), "list element mounted twice");

        {
            let mut state = self.state.borrow_mut();
            state.warn_on_duplicate_keys = slot.context().options().warn_on_duplicate_keys;
            state.slots = Some(MultiSlot::new(slot));
        }

        let listener = Rc::new(ListListener {
            state: Rc::downgrade(&self.state),
        });
        self.subscription = Some(self.source.subscribe(listener));
    }

    fn unmount(&mut self) {
        let Some(mut subscription) = self.subscription.take() else {
            return;
        };
        subscription.unsubscribe();

        match self.state.try_borrow_mut() {
            Ok(mut state) => state.clear(),
            Err(_) => tracing::error!("list element unmounted from inside its own update"),
        }
    }

    fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    fn keys(&self) -> Vec<String> {
        self.state.try_borrow().map(|s| s.keys()).unwrap_or_default()
    }
}

/// A keyed list built by [`map`].
pub struct ListElement {
    binding: Box<dyn ListBinding>,
}

impl ListElement {
    pub fn mount(&mut self, slot: Slot) {
        self.binding.mount(slot);
    }

    pub fn unmount(&mut self) {
        self.binding.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.binding.is_mounted()
    }

    /// Tracked keys in document order.
    pub fn keys(&self) -> Vec<String> {
        self.binding.keys()
    }
}

/// Render one element per keyed item of the latest list emitted by `source`.
///
/// `factory` runs once per new key and receives an observable of that item.
/// Later emissions that still contain the key push the new item into that
/// observable instead of recreating the element.
///
/// # Example
///
/// ```ignore
/// use witness_dom::{h, map, text, ObservableExt, Subject};
/// use serde_json::{json, Value};
///
/// let rows = Subject::new();
/// let list = map("id", rows.clone(), |row| {
///     h("li", [text(row.map(|r: Value| r["label"].to_string()))])
/// });
///
/// rows.next(vec![json!({"id": 1, "label": "a"}), json!({"id": 2, "label": "b"})]);
///
/// // Key 1 removed, key 2 updated in place, key 3 appended
/// rows.next(vec![json!({"id": 2, "label": "B"}), json!({"id": 3, "label": "c"})]);
/// ```
///
/// # Duplicate Key Handling
///
/// Duplicate keys in one emission are warned about and skipped. Only the first
/// occurrence is tracked.
pub fn map<T: Clone + 'static>(
    key: impl Into<KeySelector<T>>,
    source: impl Observable<Vec<T>> + 'static,
    factory: impl Fn(Source<T>) -> WitnessElement + 'static,
) -> WitnessElement {
    let binding = KeyedList {
        source: source.into_source(),
        state: Rc::new(RefCell::new(ListState {
            key: key.into(),
            factory: Rc::new(factory),
            slots: None,
            records: HashMap::new(),
            warn_on_duplicate_keys: true,
        })),
        subscription: None,
    };

    WitnessElement::List(ListElement {
        binding: Box::new(binding),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderOptions;
    use crate::engine::RenderContext;
    use crate::host::{Host, MemoryDocument, NodeId};
    use crate::primitives::{h, text};
    use serde_json::{json, Value};
    use std::cell::Cell;

    fn setup() -> (Rc<MemoryDocument>, Slot, NodeId) {
        let doc = Rc::new(MemoryDocument::new());
        let ctx = RenderContext::new(doc.clone(), RenderOptions::default());
        let root = doc.create_element("div");
        (doc, Slot::new(ctx, root), root)
    }

    fn mount(element: &mut WitnessElement, slot: &Slot) {
        element.mount(slot.clone());
        slot.ensure();
    }

    fn case(element: &WitnessElement) -> &CaseElement {
        match element {
            WitnessElement::Case(c) => c,
            _ => panic!("expected a case element"),
        }
    }

    fn list(element: &WitnessElement) -> &ListElement {
        match element {
            WitnessElement::List(l) => l,
            _ => panic!("expected a list element"),
        }
    }

    /// Factory that renders the item's label and counts how often it ran.
    fn label_factory(created: Rc<Cell<usize>>) -> impl Fn(Source<Value>) -> WitnessElement {
        move |item| {
            created.set(created.get() + 1);
            text(item.map(|v: Value| v["label"].as_str().unwrap_or_default().to_string()))
        }
    }

    // =========================================================================
    // Matcher Tests
    // =========================================================================

    #[test]
    fn test_matchers() {
        assert!(is(3).matches(&3));
        assert!(!is(3).matches(&4));
        assert!(when(|v: &i32| *v > 2).matches(&3));
        assert!(otherwise::<i32>().matches(&-1));
        assert!(Matcher::from("a").matches(&"a"));
    }

    // =========================================================================
    // cond() Tests
    // =========================================================================

    #[test]
    fn test_cond_toggles_branches() {
        let (doc, slot, root) = setup();
        let flag = Subject::new();
        let mut element = cond(
            flag.clone(),
            [(is(true), text("hello")), (otherwise(), text("bye"))],
        );
        mount(&mut element, &slot);

        flag.next(true);
        assert_eq!(doc.text_content(root), "hello");
        flag.next(false);
        assert_eq!(doc.text_content(root), "bye");
        flag.next(true);
        assert_eq!(doc.text_content(root), "hello");
        assert_eq!(doc.children(root).len(), 1, "exactly one occupant at all times");
    }

    #[test]
    fn test_cond_holds_placeholder_until_first_value() {
        let (doc, slot, root) = setup();
        let flag: Subject<bool> = Subject::new();
        let mut element = cond(flag.clone(), [(is(true), text("yes"))]);
        mount(&mut element, &slot);

        assert!(slot.holds_placeholder());
        assert_eq!(case(&element).current_branch(), None);

        flag.next(false);
        assert_eq!(doc.text_content(root), "", "fallback shows nothing");
        assert_eq!(case(&element).current_branch(), Some(1));
        assert!(slot.holds_placeholder());
    }

    #[test]
    fn test_cond_first_match_wins() {
        let (doc, slot, root) = setup();
        let source = Subject::new();
        let mut element = cond(
            source.clone(),
            [
                (when(|_: &i32| false), text("never")),
                (when(|v: &i32| *v > 0), text("positive")),
                (otherwise(), text("always")),
            ],
        );
        mount(&mut element, &slot);

        source.next(5);
        assert_eq!(doc.text_content(root), "positive");
        source.next(-5);
        assert_eq!(doc.text_content(root), "always");
    }

    #[test]
    fn test_cond_same_branch_no_mutation() {
        let (doc, slot, _root) = setup();
        let source = Subject::new();
        let mut element = cond(source.clone(), [(when(|v: &i32| *v > 0), text("positive"))]);
        mount(&mut element, &slot);
        source.next(1);
        doc.take_mutations();

        source.next(2);
        source.next(3);

        assert!(doc.mutations().is_empty(), "same branch must not touch the document");
    }

    #[test]
    fn test_cond_unmount_revokes_everything() {
        let (doc, slot, root) = setup();
        let flag = Subject::new();
        let label = Subject::new();
        let mut element = cond(flag.clone(), [(is(true), text(label.clone()))]);
        mount(&mut element, &slot);
        flag.next(true);
        label.next("shown".to_string());

        element.unmount();

        assert_eq!(flag.listener_count(), 0);
        assert_eq!(label.listener_count(), 0);
        assert!(slot.holds_placeholder());
        assert_eq!(doc.text_content(root), "");
        assert!(!element.is_mounted());
    }

    #[test]
    fn test_cond_reentrant_emission_rejected() {
        let (doc, slot, root) = setup();
        let source = Subject::new();
        let source_clone = source.clone();
        let seen = Rc::new(Cell::new(0));
        let seen_clone = seen.clone();

        // A branch whose mount pushes back into the switcher's own source.
        let echo = crate::observable::watch(move || {
            seen_clone.set(seen_clone.get() + 1);
            source_clone.next(0);
            "echo".to_string()
        });
        let mut element = cond(
            source.clone(),
            [(is(1), text(echo)), (otherwise(), text("other"))],
        );
        mount(&mut element, &slot);

        source.next(1);

        assert_eq!(doc.text_content(root), "echo", "nested emission must not switch");
        assert_eq!(seen.get(), 1);
    }

    // =========================================================================
    // map() Tests
    // =========================================================================

    #[test]
    fn test_map_renders_all_items() {
        let (doc, slot, root) = setup();
        let rows = Subject::new();
        let created = Rc::new(Cell::new(0));
        let mut element = map("id", rows.clone(), label_factory(created.clone()));
        mount(&mut element, &slot);

        rows.next(vec![
            json!({"id": 1, "label": "a"}),
            json!({"id": 2, "label": "b"}),
            json!({"id": 3, "label": "c"}),
        ]);

        assert_eq!(doc.text_content(root), "abc");
        assert_eq!(created.get(), 3);
        assert_eq!(list(&element).keys(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_map_keyed_diff() {
        let (doc, slot, root) = setup();
        let rows = Subject::new();
        let created = Rc::new(Cell::new(0));
        let mut element = map("id", rows.clone(), label_factory(created.clone()));
        mount(&mut element, &slot);

        rows.next(vec![json!({"id": 1, "label": "a"}), json!({"id": 2, "label": "b"})]);
        rows.next(vec![json!({"id": 2, "label": "B"}), json!({"id": 3, "label": "c"})]);

        assert_eq!(doc.text_content(root), "Bc");
        assert_eq!(created.get(), 3, "key 2 must not be recreated");
        assert_eq!(list(&element).keys(), vec!["2", "3"]);
    }

    #[test]
    fn test_map_reorder_does_not_relocate() {
        let (doc, slot, root) = setup();
        let rows = Subject::new();
        let created = Rc::new(Cell::new(0));
        let mut element = map(
            KeySelector::with(|s: &String| s.clone()),
            rows.clone(),
            move |item| {
                created.set(created.get() + 1);
                text(item)
            },
        );
        mount(&mut element, &slot);

        rows.next(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        doc.take_mutations();
        rows.next(vec!["c".to_string(), "a".to_string(), "b".to_string()]);

        assert_eq!(doc.text_content(root), "abc");
        assert!(
            doc.mutations()
                .iter()
                .all(|m| matches!(m, crate::host::Mutation::SetText { .. })),
            "reorder only rewrites item text"
        );
    }

    #[test]
    fn test_map_duplicate_keys_skipped() {
        let (doc, slot, root) = setup();
        let rows = Subject::new();
        let mut element = map(KeySelector::with(|n: &i32| *n), rows.clone(), |item| {
            text(item.map(|n: i32| n.to_string()))
        });
        mount(&mut element, &slot);

        rows.next(vec![1, 2, 1, 3]);

        assert_eq!(doc.text_content(root), "123");
        assert_eq!(list(&element).keys(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_map_skips_items_without_key() {
        let (doc, slot, root) = setup();
        let rows = Subject::new();
        let created = Rc::new(Cell::new(0));
        let mut element = map("id", rows.clone(), label_factory(created.clone()));
        mount(&mut element, &slot);

        rows.next(vec![json!({"label": "orphan"}), json!({"id": "x", "label": "kept"})]);

        assert_eq!(doc.text_content(root), "kept");
        assert_eq!(list(&element).keys(), vec!["x"]);
    }

    #[test]
    fn test_map_empty_list() {
        let (doc, slot, root) = setup();
        let rows: Subject<Vec<Value>> = Subject::new();
        let created = Rc::new(Cell::new(0));
        let mut element = map("id", rows.clone(), label_factory(created.clone()));
        mount(&mut element, &slot);

        rows.next(vec![json!({"id": 1, "label": "a"})]);
        rows.next(Vec::new());

        assert_eq!(doc.text_content(root), "");
        assert_eq!(doc.children(root).len(), 1, "only the anchor remains");
        assert!(list(&element).keys().is_empty());
    }

    #[test]
    fn test_map_items_inside_structure_stay_in_order() {
        let (doc, slot, root) = setup();
        let rows = Subject::new();
        let mut element = h(
            "ul",
            [
                text("<"),
                map(KeySelector::with(|n: &i32| *n), rows.clone(), |item| {
                    h("li", [text(item.map(|n: i32| n.to_string()))])
                }),
                text(">"),
            ],
        );
        mount(&mut element, &slot);

        rows.next(vec![1, 2]);
        rows.next(vec![2, 3]);

        assert_eq!(doc.text_content(root), "<23>");
    }

    #[test]
    fn test_map_removal_completes_subject() {
        let (_doc, slot, _root) = setup();
        let rows = Subject::new();
        let item_subjects = Rc::new(RefCell::new(Vec::new()));
        let completed = Rc::new(Cell::new(0));
        let (subjects_clone, completed_clone) = (item_subjects.clone(), completed.clone());

        struct CompleteCounter(Rc<Cell<usize>>);
        impl Listener<i32> for CompleteCounter {
            fn next(&self, _: i32) {}
            fn complete(&self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let mut element = map(KeySelector::with(|n: &i32| *n), rows.clone(), move |item| {
            subjects_clone
                .borrow_mut()
                .push(item.subscribe(Rc::new(CompleteCounter(completed_clone.clone()))));
            WitnessElement::Empty
        });
        mount(&mut element, &slot);

        rows.next(vec![1, 2, 3]);
        rows.next(vec![2]);
        assert_eq!(completed.get(), 2);

        element.unmount();
        assert_eq!(completed.get(), 3);
        assert_eq!(rows.listener_count(), 0);
    }

    #[test]
    fn test_map_unmount_and_remount() {
        let (doc, slot, root) = setup();
        let rows = Subject::seeded(vec![1, 2]);
        let mut element = map(KeySelector::with(|n: &i32| *n), rows.clone(), |item| {
            text(item.map(|n: i32| n.to_string()))
        });

        mount(&mut element, &slot);
        assert_eq!(doc.text_content(root), "12");

        element.unmount();
        assert_eq!(doc.text_content(root), "");
        assert!(slot.holds_placeholder());
        assert_eq!(slot.context().pool_stats().in_use(), 1);

        mount(&mut element, &slot);
        assert_eq!(doc.text_content(root), "12", "seeded source replays on remount");
    }
}
