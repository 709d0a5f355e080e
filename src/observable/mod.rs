//! Observable contract - The minimal push protocol every dynamic value satisfies.
//!
//! The binding engine never looks inside a value source. It only needs:
//! - [`Observable::subscribe`] - register a [`Listener`], get a [`Subscription`]
//! - [`Listener::next`] / [`Listener::error`] / [`Listener::complete`]
//! - [`Subscription::unsubscribe`] - revoke the registration
//!
//! Two concrete sources ship with the crate:
//! - [`Subject`] - a push-side handle (plain, or seeded so it replays its latest value)
//! - `spark_signals::Signal` and [`watch`] getters, bridged through an effect
//!
//! # Delivery
//!
//! Delivery is synchronous. `next` runs every listener to completion before it
//! returns, and there is no scheduler anywhere in the crate.

mod signal;
mod subject;

use std::rc::Rc;

pub use signal::{watch, Watch};
pub use subject::Subject;

use crate::error::StreamError;

// =============================================================================
// Listener
// =============================================================================

/// Receiving side of a subscription.
///
/// Listeners take `&self`; anything they mutate lives behind a `Cell`/`RefCell`.
pub trait Listener<T> {
    fn next(&self, value: T);

    /// Defaults to logging the error. The bound element stays mounted.
    fn error(&self, err: StreamError) {
        report_stream_error(&err);
    }

    fn complete(&self) {}
}

/// Default handler for value-stream errors.
pub fn report_stream_error(err: &StreamError) {
    tracing::error!(error = %err, "value stream error");
}

/// Callback invoked instead of [`report_stream_error`] when an element overrides it.
pub type ErrorHandler = Rc<dyn Fn(&StreamError)>;

/// Listener built from a closure.
pub struct FnListener<F> {
    on_next: F,
    on_error: Option<ErrorHandler>,
}

impl<T, F: Fn(T)> Listener<T> for FnListener<F> {
    fn next(&self, value: T) {
        (self.on_next)(value)
    }

    fn error(&self, err: StreamError) {
        match &self.on_error {
            Some(handler) => handler(&err),
            None => report_stream_error(&err),
        }
    }
}

/// Wrap a closure as a listener.
pub fn listener<T: 'static>(on_next: impl Fn(T) + 'static) -> Rc<dyn Listener<T>> {
    Rc::new(FnListener {
        on_next,
        on_error: None,
    })
}

/// Wrap a closure as a listener with its own error handler.
pub fn listener_with_error<T: 'static>(
    on_next: impl Fn(T) + 'static,
    on_error: Option<ErrorHandler>,
) -> Rc<dyn Listener<T>> {
    Rc::new(FnListener { on_next, on_error })
}

// =============================================================================
// Subscription
// =============================================================================

/// A revocable registration between a source and a listener.
///
/// Dropping a subscription does NOT unsubscribe; owners call
/// [`unsubscribe`](Subscription::unsubscribe) from their unmount path.
#[must_use = "a subscription that is never unsubscribed keeps its listener alive"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A subscription with nothing to revoke (source already completed).
    pub fn closed() -> Self {
        Self { teardown: None }
    }

    /// Revoke the registration. Calling it again is a no-op.
    pub fn unsubscribe(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.teardown.is_none()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Unsubscribe and drop every subscription in `subscriptions`.
pub fn unsubscribe_all(subscriptions: &mut Vec<Subscription>) {
    for mut subscription in subscriptions.drain(..) {
        subscription.unsubscribe();
    }
}

// =============================================================================
// Observable
// =============================================================================

/// Anything that can push values to listeners.
pub trait Observable<T> {
    fn subscribe(&self, listener: Rc<dyn Listener<T>>) -> Subscription;
}

/// Type-erased, shareable observable.
pub type Source<T> = Rc<dyn Observable<T>>;

impl<T, O: Observable<T> + ?Sized> Observable<T> for Rc<O> {
    fn subscribe(&self, listener: Rc<dyn Listener<T>>) -> Subscription {
        (**self).subscribe(listener)
    }
}

/// Combinators available on every sized observable.
pub trait ObservableExt<T: 'static>: Observable<T> + Sized + 'static {
    /// Transform every value before it reaches the listener.
    fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Mapped<T, U> {
        Mapped {
            source: Rc::new(self),
            f: Rc::new(f),
        }
    }

    fn into_source(self) -> Source<T> {
        Rc::new(self)
    }
}

impl<T: 'static, O: Observable<T> + 'static> ObservableExt<T> for O {}

/// Observable returned by [`ObservableExt::map`].
pub struct Mapped<T, U> {
    source: Source<T>,
    f: Rc<dyn Fn(T) -> U>,
}

struct MapListener<T, U> {
    inner: Rc<dyn Listener<U>>,
    f: Rc<dyn Fn(T) -> U>,
}

impl<T, U> Listener<T> for MapListener<T, U> {
    fn next(&self, value: T) {
        self.inner.next((self.f)(value));
    }

    fn error(&self, err: StreamError) {
        self.inner.error(err);
    }

    fn complete(&self) {
        self.inner.complete();
    }
}

impl<T: 'static, U: 'static> Observable<U> for Mapped<T, U> {
    fn subscribe(&self, listener: Rc<dyn Listener<U>>) -> Subscription {
        self.source.subscribe(Rc::new(MapListener {
            inner: listener,
            f: self.f.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_subscription_unsubscribe_runs_once() {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let mut sub = Subscription::new(move || count_clone.set(count_clone.get() + 1));
        assert!(!sub.is_closed());

        sub.unsubscribe();
        sub.unsubscribe();

        assert_eq!(count.get(), 1, "teardown must run exactly once");
        assert!(sub.is_closed());
    }

    #[test]
    fn test_unsubscribe_all_drains() {
        let count = Rc::new(Cell::new(0));
        let mut subs: Vec<Subscription> = (0..3)
            .map(|_| {
                let count = count.clone();
                Subscription::new(move || count.set(count.get() + 1))
            })
            .collect();

        unsubscribe_all(&mut subs);

        assert_eq!(count.get(), 3);
        assert!(subs.is_empty());
    }

    #[test]
    fn test_map_transforms_values() {
        let subject = Subject::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let doubled = subject.clone().map(|v: i32| v * 2);
        let mut sub = doubled.subscribe(listener(move |v: i32| seen_clone.borrow_mut().push(v)));

        subject.next(1);
        subject.next(21);
        sub.unsubscribe();
        subject.next(100);

        assert_eq!(*seen.borrow(), vec![2, 42]);
    }

    #[test]
    fn test_listener_error_override() {
        let errors = Rc::new(RefCell::new(Vec::new()));
        let errors_clone = errors.clone();
        let handler: ErrorHandler =
            Rc::new(move |err: &StreamError| errors_clone.borrow_mut().push(err.to_string()));

        let l = listener_with_error(|_: i32| {}, Some(handler));
        l.error(StreamError::new("boom"));

        assert_eq!(*errors.borrow(), vec!["boom".to_string()]);
    }
}
