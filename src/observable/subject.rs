//! Subject - Push-side handle that is also an observable.
//!
//! A plain subject only forwards what is pushed after a listener subscribes.
//! A seeded subject also remembers the latest value and replays it to every
//! new listener, which is what per-item sources in keyed lists need: the item
//! component must see its item the moment it mounts.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::{Listener, Observable, Subscription};
use crate::error::StreamError;

struct Registration<T> {
    id: u64,
    active: Cell<bool>,
    listener: Rc<dyn Listener<T>>,
}

struct SubjectState<T> {
    registrations: Vec<Rc<Registration<T>>>,
    next_id: u64,
    latest: Option<T>,
    replay: bool,
    closed: bool,
}

/// Multicast push source. Cloning yields another handle to the same subject.
pub struct Subject<T> {
    state: Rc<RefCell<SubjectState<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    /// A subject that only delivers values pushed after subscription.
    pub fn new() -> Self {
        Self::with_state(None, false)
    }

    /// A subject holding `value`, replayed to every new listener.
    pub fn seeded(value: T) -> Self {
        Self::with_state(Some(value), true)
    }

    fn with_state(latest: Option<T>, replay: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(SubjectState {
                registrations: Vec::new(),
                next_id: 0,
                latest,
                replay,
                closed: false,
            })),
        }
    }

    /// Push a value to every active listener.
    pub fn next(&self, value: T) {
        let registrations = {
            let mut state = self.state.borrow_mut();
            if state.closed {
                tracing::warn!("next() on a completed subject ignored");
                return;
            }
            if state.replay {
                state.latest = Some(value.clone());
            }
            state.registrations.clone()
        };

        for registration in registrations {
            // Listeners revoked earlier in this same delivery must not fire.
            if registration.active.get() {
                registration.listener.next(value.clone());
            }
        }
    }

    /// Signal an error. Terminal: the subject is closed afterwards.
    pub fn error(&self, err: impl Into<StreamError>) {
        let err = err.into();
        for registration in self.close() {
            if registration.active.replace(false) {
                registration.listener.error(err.clone());
            }
        }
    }

    /// End the stream. Listeners receive `complete` and are released.
    pub fn complete(&self) {
        for registration in self.close() {
            if registration.active.replace(false) {
                registration.listener.complete();
            }
        }
    }

    fn close(&self) -> Vec<Rc<Registration<T>>> {
        let mut state = self.state.borrow_mut();
        if state.closed {
            return Vec::new();
        }
        state.closed = true;
        std::mem::take(&mut state.registrations)
    }

    /// Latest value of a seeded subject.
    pub fn latest(&self) -> Option<T> {
        self.state.borrow().latest.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().registrations.len()
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }
}

impl<T: Clone + 'static> Observable<T> for Subject<T> {
    fn subscribe(&self, listener: Rc<dyn Listener<T>>) -> Subscription {
        let (registration, replay) = {
            let mut state = self.state.borrow_mut();
            if state.closed {
                drop(state);
                listener.complete();
                return Subscription::closed();
            }

            let id = state.next_id;
            state.next_id += 1;
            let registration = Rc::new(Registration {
                id,
                active: Cell::new(true),
                listener,
            });
            state.registrations.push(registration.clone());

            let replay = if state.replay { state.latest.clone() } else { None };
            (registration, replay)
        };

        if let Some(value) = replay {
            registration.listener.next(value);
        }

        let weak: Weak<RefCell<SubjectState<T>>> = Rc::downgrade(&self.state);
        let id = registration.id;
        Subscription::new(move || {
            registration.active.set(false);
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().registrations.retain(|r| r.id != id);
            }
        })
    }
}
