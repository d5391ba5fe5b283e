use std::cell::Cell;
use std::rc::Rc;

use super::{Future, SettleFn};
use crate::errors::FutureError;
use crate::value::{ThenMethod, Value};

/// Nested adoption beyond this depth rejects with
/// [`FutureError::AdoptionDepthExceeded`] instead of recursing further, so
/// a self-feeding thenable chain cannot blow the stack.
const MAX_ADOPTION_DEPTH: usize = 256;

/// Decides how a produced value settles `next`: primitives and plain
/// objects settle it directly, a future or thenable is adopted so `next`
/// takes on its eventual outcome. The self-reference check runs before any
/// member access on the produced value.
pub(super) fn resolve(next: &Future, produced: Value, depth: usize) {
    if depth > MAX_ADOPTION_DEPTH {
        next.settle(
            true,
            Value::error(FutureError::AdoptionDepthExceeded {
                limit: MAX_ADOPTION_DEPTH,
            }),
        );
        return;
    }

    match produced {
        Value::Future(source) => {
            if source.ptr_eq(next) {
                next.settle(true, Value::error(FutureError::ChainingCycle { id: next.id() }));
                return;
            }
            // A future settles exactly once, so adoption needs no latch:
            // subscribe and keep unwrapping whatever it fulfills with.
            let fulfill_next = next.clone();
            let reject_next = next.clone();
            source.when_settled(
                move |value| resolve(&fulfill_next, value, depth + 1),
                move |reason| reject_next.settle(true, reason),
            );
        }
        Value::Thenable(object) => match object.then_member() {
            Err(raised) => next.settle(true, raised),
            Ok(Some(method)) => adopt_thenable(next, method, depth),
            Ok(None) => next.settle(false, Value::Thenable(object)),
        },
        other => next.settle(false, other),
    }
}

/// The foreign-thenable protocol. A single `called` latch spans both
/// callbacks: only the first invocation of either has effect, so a
/// misbehaving `then` that calls both, or one twice, is tolerated silently
/// after the first.
fn adopt_thenable(next: &Future, method: ThenMethod, depth: usize) {
    let called = Rc::new(Cell::new(false));

    let on_fulfilled: SettleFn = {
        let next = next.clone();
        let called = called.clone();
        Rc::new(move |value| {
            if called.replace(true) {
                return;
            }
            resolve(&next, value, depth + 1);
        })
    };
    let on_rejected: SettleFn = {
        let next = next.clone();
        let called = called.clone();
        Rc::new(move |reason| {
            if called.replace(true) {
                return;
            }
            next.settle(true, reason);
        })
    };

    // A failure after the latch tripped means a callback already claimed
    // the settlement; the error is swallowed.
    if let Err(raised) = method(on_fulfilled, on_rejected) {
        if !called.replace(true) {
            next.settle(true, raised);
        }
    }
}
