mod resolve;
mod state;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::scheduler::Schedule;
use crate::value::Value;

pub use state::FutureState;

/// A settlement entry point. Handed to initializers and returned by
/// [`Future::deferred`]; calling it after the future has settled is a no-op.
pub type SettleFn = Rc<dyn Fn(Value)>;

/// A continuation registered through [`Future::then`]. `Ok` is the produced
/// value (fed to the resolution procedure), `Err` a raised error (rejects
/// the chained future directly).
pub type Handler = Rc<dyn Fn(Value) -> Result<Value, Value>>;

type SettledCallback = Box<dyn FnOnce(Value)>;

thread_local! {
    static NEXT_FUTURE_ID: Cell<u64> = Cell::new(1);
}

struct Inner {
    id: u64,
    state: FutureState,
    fulfill_callbacks: Vec<SettledCallback>,
    reject_callbacks: Vec<SettledCallback>,
}

/// A deferred value: settles at most once, and continuations registered
/// through [`then`](Future::then) observe the settled value asynchronously,
/// in registration order. Cloning yields another handle to the same
/// underlying future.
#[derive(Clone)]
pub struct Future {
    inner: Rc<RefCell<Inner>>,
    scheduler: Rc<dyn Schedule>,
}

/// A future together with its two settlement entry points, for driving
/// settlement from outside an initializer.
pub struct Deferred {
    pub future: Future,
    pub fulfill: SettleFn,
    pub reject: SettleFn,
}

impl Future {
    /// Constructs a future and synchronously runs `initializer` with the
    /// future's two settlement entry points. An `Err` return rejects the
    /// future with the returned value, unless an entry point already ran.
    pub fn new<S, F>(scheduler: S, initializer: F) -> Future
    where
        S: Schedule + 'static,
        F: FnOnce(SettleFn, SettleFn) -> Result<(), Value>,
    {
        let future = Future::pending(Rc::new(scheduler));
        let (fulfill, reject) = future.settle_fns();
        if let Err(reason) = initializer(fulfill, reject) {
            future.settle(true, reason);
        }
        future
    }

    /// A future already fulfilled with `value`.
    pub fn resolved<S: Schedule + 'static>(scheduler: S, value: Value) -> Future {
        Future::new(scheduler, |fulfill, _reject| {
            fulfill(value);
            Ok(())
        })
    }

    /// A future already rejected with `reason`.
    pub fn rejected<S: Schedule + 'static>(scheduler: S, reason: Value) -> Future {
        Future::new(scheduler, |_fulfill, reject| {
            reject(reason);
            Ok(())
        })
    }

    /// A pending future with its entry points exposed, so settlement can be
    /// driven externally (conformance harnesses rely on this).
    pub fn deferred<S: Schedule + 'static>(scheduler: S) -> Deferred {
        let future = Future::pending(Rc::new(scheduler));
        let (fulfill, reject) = future.settle_fns();
        Deferred {
            future,
            fulfill,
            reject,
        }
    }

    /// Registers continuations and returns the chained future immediately,
    /// regardless of this future's current state. A missing `on_fulfilled`
    /// passes the value through; a missing `on_rejected` re-raises the
    /// reason. Handlers never run inside this call: the invocation is
    /// deferred at least one scheduling tick, even on a settled source.
    pub fn then(&self, on_fulfilled: Option<Handler>, on_rejected: Option<Handler>) -> Future {
        let next = Future::pending(self.scheduler.clone());
        let on_fulfilled: Handler = on_fulfilled.unwrap_or_else(|| Rc::new(|value| Ok(value)));
        let on_rejected: Handler = on_rejected.unwrap_or_else(|| Rc::new(|reason| Err(reason)));

        let fulfill_next = next.clone();
        let reject_next = next.clone();
        self.when_settled(
            move |value| run_handler(&fulfill_next, &on_fulfilled, value),
            move |reason| run_handler(&reject_next, &on_rejected, reason),
        );
        next
    }

    /// `then` with only a rejection handler.
    pub fn catch(&self, on_rejected: Handler) -> Future {
        self.then(None, Some(on_rejected))
    }

    /// Runs `action` once this future settles either way; the original
    /// outcome passes through unchanged.
    pub fn finally(&self, action: Rc<dyn Fn()>) -> Future {
        let on_fulfilled: Handler = {
            let action = action.clone();
            Rc::new(move |value| {
                action();
                Ok(value)
            })
        };
        let on_rejected: Handler = Rc::new(move |reason| {
            action();
            Err(reason)
        });
        self.then(Some(on_fulfilled), Some(on_rejected))
    }

    pub fn state(&self) -> FutureState {
        self.inner.borrow().state.clone()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.inner.borrow().state, FutureState::Pending)
    }

    pub fn id(&self) -> u64 {
        self.inner.borrow().id
    }

    /// Handle identity: whether both handles refer to the same future.
    pub fn ptr_eq(&self, other: &Future) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn pending(scheduler: Rc<dyn Schedule>) -> Future {
        let id = NEXT_FUTURE_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        Future {
            inner: Rc::new(RefCell::new(Inner {
                id,
                state: FutureState::Pending,
                fulfill_callbacks: Vec::new(),
                reject_callbacks: Vec::new(),
            })),
            scheduler,
        }
    }

    fn settle_fns(&self) -> (SettleFn, SettleFn) {
        let fulfill: SettleFn = {
            let future = self.clone();
            Rc::new(move |value| future.settle(false, value))
        };
        let reject: SettleFn = {
            let future = self.clone();
            Rc::new(move |reason| future.settle(true, reason))
        };
        (fulfill, reject)
    }

    /// The one-time state transition. Only the first call has any effect;
    /// the matching callback list is invoked synchronously in registration
    /// order (each callback defers its own handler), then both lists are
    /// discarded.
    fn settle(&self, is_reject: bool, value: Value) {
        let callbacks = {
            let mut inner = self.inner.borrow_mut();
            if !matches!(inner.state, FutureState::Pending) {
                return;
            }
            inner.state = if is_reject {
                FutureState::Rejected(value.clone())
            } else {
                FutureState::Fulfilled(value.clone())
            };
            if is_reject {
                inner.fulfill_callbacks.clear();
                std::mem::take(&mut inner.reject_callbacks)
            } else {
                inner.reject_callbacks.clear();
                std::mem::take(&mut inner.fulfill_callbacks)
            }
        };

        for callback in callbacks {
            callback(value.clone());
        }
    }

    /// Schedules exactly one of the two actions for one tick after this
    /// future settles. On an already-settled future the matching action is
    /// scheduled immediately; on a pending one, wrapped callbacks go onto
    /// the callback lists and schedule the action at settlement time. The
    /// action never runs inline.
    fn when_settled<F, R>(&self, on_fulfilled: F, on_rejected: R)
    where
        F: FnOnce(Value) + 'static,
        R: FnOnce(Value) + 'static,
    {
        let settled = {
            let inner = self.inner.borrow();
            match &inner.state {
                FutureState::Pending => None,
                FutureState::Fulfilled(value) => Some((false, value.clone())),
                FutureState::Rejected(reason) => Some((true, reason.clone())),
            }
        };

        match settled {
            Some((false, value)) => {
                self.scheduler.schedule(Box::new(move || on_fulfilled(value)));
            }
            Some((true, reason)) => {
                self.scheduler.schedule(Box::new(move || on_rejected(reason)));
            }
            None => {
                let mut inner = self.inner.borrow_mut();
                let scheduler = self.scheduler.clone();
                inner.fulfill_callbacks.push(Box::new(move |value| {
                    scheduler.schedule(Box::new(move || on_fulfilled(value)));
                }));
                let scheduler = self.scheduler.clone();
                inner.reject_callbacks.push(Box::new(move |reason| {
                    scheduler.schedule(Box::new(move || on_rejected(reason)));
                }));
            }
        }
    }
}

/// Failure boundary around a deferred handler invocation: a produced value
/// goes through the resolution procedure, a raised error rejects the
/// chained future directly.
fn run_handler(next: &Future, handler: &Handler, input: Value) {
    match handler(input) {
        Ok(produced) => resolve::resolve(next, produced, 0),
        Err(raised) => next.settle(true, raised),
    }
}
