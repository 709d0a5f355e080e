//! Signal bridge - spark-signals values as observables.
//!
//! A subscription is an `effect` that reads the signal and forwards the value.
//! The effect runs once immediately, so a signal behaves like a seeded source:
//! the listener sees the current value at subscribe time and every change after.
//! Stopping the effect is the unsubscribe.
//!
//! # Detached Delivery
//!
//! The effect only reads. The value is handed to the listener with no active
//! effect or reaction, because a listener may mount whole subtrees:
//! - effects created by those subtrees must be roots, or spark-signals would
//!   destroy them as children the next time the bridge re-runs
//! - signals read while mounting must not become dependencies of the bridge

use std::rc::{Rc, Weak};

use spark_signals::{effect, untrack, with_context, AnyReaction, Signal};

use super::{Listener, Observable, Subscription};

struct RestoreContext {
    reaction: Option<Weak<dyn AnyReaction>>,
    effect: Option<Weak<dyn AnyReaction>>,
}

impl Drop for RestoreContext {
    fn drop(&mut self) {
        with_context(|ctx| {
            ctx.set_active_reaction(self.reaction.take());
            ctx.set_active_effect(self.effect.take());
        });
    }
}

/// Run `f` outside whatever effect is currently running.
fn detached<R>(f: impl FnOnce() -> R) -> R {
    let _restore = with_context(|ctx| RestoreContext {
        reaction: ctx.set_active_reaction(None),
        effect: ctx.set_active_effect(None),
    });
    untrack(f)
}

/// Root effect that re-reads `read` on change and delivers outside itself.
fn bridge<T: 'static>(read: impl Fn() -> T + 'static, listener: Rc<dyn Listener<T>>) -> Subscription {
    let stop = detached(move || {
        effect(move || {
            let value = read();
            detached(|| listener.next(value));
        })
    });
    Subscription::new(stop)
}

impl<T: Clone + PartialEq + 'static> Observable<T> for Signal<T> {
    fn subscribe(&self, listener: Rc<dyn Listener<T>>) -> Subscription {
        let signal = self.clone();
        bridge(move || signal.get(), listener)
    }
}

/// Observable over a getter closure.
///
/// The getter is re-run whenever a signal it reads changes.
pub struct Watch<T> {
    getter: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Watch<T> {
    fn clone(&self) -> Self {
        Self {
            getter: self.getter.clone(),
        }
    }
}

/// Wrap a getter closure as an observable.
///
/// ```ignore
/// let count = signal(0);
/// let count_clone = count.clone();
/// let label = watch(move || format!("Count: {}", count_clone.get()));
/// ```
pub fn watch<T: 'static>(getter: impl Fn() -> T + 'static) -> Watch<T> {
    Watch {
        getter: Rc::new(getter),
    }
}

impl<T: 'static> Observable<T> for Watch<T> {
    fn subscribe(&self, listener: Rc<dyn Listener<T>>) -> Subscription {
        let getter = self.getter.clone();
        bridge(move || getter(), listener)
    }
}
