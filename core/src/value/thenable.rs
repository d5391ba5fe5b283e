use std::rc::Rc;

use crate::future::SettleFn;
use crate::value::Value;

/// A callable `then` member: invoked with the adopting side's two
/// settlement callbacks. Returning `Err` models the invocation raising;
/// whether the error matters depends on whether a callback already ran.
pub type ThenMethod = Rc<dyn Fn(SettleFn, SettleFn) -> Result<(), Value>>;

/// A foreign deferred-like object: any value claiming a `then` member.
/// The member is read through `then_member` rather than stored directly
/// because accessor-backed members can fail on read.
pub trait Thenable {
    /// Reads the `then` member. `Ok(None)` means the member is present but
    /// not callable, so the holder is treated as a plain object.
    fn then_member(&self) -> Result<Option<ThenMethod>, Value>;
}

/// Thenable whose `then` is an ordinary closure. Covers the common case;
/// exotic read behavior (raising accessors, non-callable members) takes a
/// custom [`Thenable`] impl.
pub struct FnThenable {
    then: ThenMethod,
}

impl FnThenable {
    pub fn new(then: impl Fn(SettleFn, SettleFn) -> Result<(), Value> + 'static) -> Rc<Self> {
        Rc::new(Self {
            then: Rc::new(then),
        })
    }
}

impl Thenable for FnThenable {
    fn then_member(&self) -> Result<Option<ThenMethod>, Value> {
        Ok(Some(self.then.clone()))
    }
}
