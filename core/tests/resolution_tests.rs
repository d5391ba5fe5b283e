use std::cell::RefCell;
use std::rc::Rc;

use vow::{
    FnThenable, Future, FutureError, FutureState, Handler, ObjectValue, Scheduler, ThenMethod,
    Thenable, Value,
};

fn handler(f: impl Fn(Value) -> Result<Value, Value> + 'static) -> Handler {
    Rc::new(f)
}

#[test]
fn handler_returning_pending_future_adopts_it() {
    let scheduler = Scheduler::new();
    let inner = Future::deferred(scheduler.clone());
    let adopted = Value::Future(inner.future.clone());
    let next = Future::resolved(scheduler.clone(), Value::Undefined)
        .then(Some(handler(move |_| Ok(adopted.clone()))), None);

    scheduler.run_until_idle();
    assert!(next.is_pending());

    (inner.fulfill)(Value::Number(9.0));
    scheduler.run_until_idle();
    assert_eq!(next.state(), FutureState::Fulfilled(Value::Number(9.0)));
}

#[test]
fn handler_returning_settled_future_adopts_its_value() {
    let scheduler = Scheduler::new();
    let settled = Future::resolved(scheduler.clone(), Value::String("inner".into()));
    let next = Future::resolved(scheduler.clone(), Value::Undefined)
        .then(Some(handler(move |_| Ok(Value::Future(settled.clone())))), None);

    scheduler.run_until_idle();
    assert_eq!(
        next.state(),
        FutureState::Fulfilled(Value::String("inner".into()))
    );
}

#[test]
fn adopted_rejection_propagates() {
    let scheduler = Scheduler::new();
    let failing = Future::rejected(scheduler.clone(), Value::String("inner error".into()));
    let next = Future::resolved(scheduler.clone(), Value::Undefined)
        .then(Some(handler(move |_| Ok(Value::Future(failing.clone())))), None);

    scheduler.run_until_idle();
    assert_eq!(
        next.state(),
        FutureState::Rejected(Value::String("inner error".into()))
    );
}

#[test]
fn adoption_unwraps_future_fulfilled_with_future() {
    let scheduler = Scheduler::new();
    let innermost = Future::resolved(scheduler.clone(), Value::Number(2.0));
    let middle = Future::deferred(scheduler.clone());
    (middle.fulfill)(Value::Future(innermost));

    let next = Future::resolved(scheduler.clone(), Value::Undefined).then(
        Some(handler(move |_| Ok(Value::Future(middle.future.clone())))),
        None,
    );

    scheduler.run_until_idle();
    assert_eq!(next.state(), FutureState::Fulfilled(Value::Number(2.0)));
}

#[test]
fn nested_thenables_unwrap_to_a_primitive() {
    let scheduler = Scheduler::new();
    let outer = FnThenable::new(|on_fulfilled, _on_rejected| {
        let inner = FnThenable::new(|on_fulfilled, _on_rejected| {
            on_fulfilled(Value::Number(7.0));
            Ok(())
        });
        on_fulfilled(Value::Thenable(inner));
        Ok(())
    });
    let next = Future::resolved(scheduler.clone(), Value::Undefined)
        .then(Some(handler(move |_| Ok(Value::Thenable(outer.clone())))), None);

    scheduler.run_until_idle();
    assert_eq!(next.state(), FutureState::Fulfilled(Value::Number(7.0)));
}

#[test]
fn returning_the_chained_future_rejects_with_cycle_error() {
    let scheduler = Scheduler::new();
    let slot: Rc<RefCell<Option<Future>>> = Rc::new(RefCell::new(None));
    let producer = {
        let slot = slot.clone();
        handler(move |_| {
            let own = slot
                .borrow()
                .clone()
                .expect("chained future stored before settlement");
            Ok(Value::Future(own))
        })
    };
    let next = Future::resolved(scheduler.clone(), Value::Undefined).then(Some(producer), None);
    *slot.borrow_mut() = Some(next.clone());

    scheduler.run_until_idle();
    match next.state() {
        FutureState::Rejected(Value::Error(err)) => {
            assert!(matches!(*err, FutureError::ChainingCycle { .. }));
        }
        other => panic!("expected cycle rejection, got {other:?}"),
    }
}

#[test]
fn thenable_calling_both_callbacks_settles_once() {
    let scheduler = Scheduler::new();
    let rogue = FnThenable::new(|on_fulfilled, on_rejected| {
        on_fulfilled(Value::Number(1.0));
        on_rejected(Value::String("late".into()));
        on_fulfilled(Value::Number(2.0));
        Ok(())
    });
    let next = Future::resolved(scheduler.clone(), Value::Undefined)
        .then(Some(handler(move |_| Ok(Value::Thenable(rogue.clone())))), None);

    scheduler.run_until_idle();
    assert_eq!(next.state(), FutureState::Fulfilled(Value::Number(1.0)));
}

#[test]
fn thenable_rejecting_first_wins() {
    let scheduler = Scheduler::new();
    let rogue = FnThenable::new(|on_fulfilled, on_rejected| {
        on_rejected(Value::String("first".into()));
        on_fulfilled(Value::Number(1.0));
        Ok(())
    });
    let next = Future::resolved(scheduler.clone(), Value::Undefined)
        .then(Some(handler(move |_| Ok(Value::Thenable(rogue.clone())))), None);

    scheduler.run_until_idle();
    assert_eq!(
        next.state(),
        FutureState::Rejected(Value::String("first".into()))
    );
}

#[test]
fn then_member_read_failure_rejects() {
    struct ThrowingRead;
    impl Thenable for ThrowingRead {
        fn then_member(&self) -> Result<Option<ThenMethod>, Value> {
            Err(Value::String("accessor blew up".into()))
        }
    }

    let scheduler = Scheduler::new();
    let next = Future::resolved(scheduler.clone(), Value::Undefined).then(
        Some(handler(|_| Ok(Value::Thenable(Rc::new(ThrowingRead))))),
        None,
    );

    scheduler.run_until_idle();
    assert_eq!(
        next.state(),
        FutureState::Rejected(Value::String("accessor blew up".into()))
    );
}

#[test]
fn non_callable_then_member_fulfills_with_the_object() {
    struct InertThen;
    impl Thenable for InertThen {
        fn then_member(&self) -> Result<Option<ThenMethod>, Value> {
            Ok(None)
        }
    }

    let scheduler = Scheduler::new();
    let object: Rc<dyn Thenable> = Rc::new(InertThen);
    let produced = Value::Thenable(object.clone());
    let next = Future::resolved(scheduler.clone(), Value::Undefined)
        .then(Some(handler(move |_| Ok(produced.clone()))), None);

    scheduler.run_until_idle();
    assert_eq!(next.state(), FutureState::Fulfilled(Value::Thenable(object)));
}

#[test]
fn plain_object_is_a_final_value() {
    let scheduler = Scheduler::new();
    let object = ObjectValue::new();
    object.insert("answer", Value::Number(42.0));
    let produced = Value::Object(object.clone());
    let next = Future::resolved(scheduler.clone(), Value::Undefined)
        .then(Some(handler(move |_| Ok(produced.clone()))), None);

    scheduler.run_until_idle();
    assert_eq!(next.state(), FutureState::Fulfilled(Value::Object(object)));
}

#[test]
fn then_failure_before_any_callback_rejects() {
    let scheduler = Scheduler::new();
    let rogue =
        FnThenable::new(|_on_fulfilled, _on_rejected| Err(Value::String("then raised".into())));
    let next = Future::resolved(scheduler.clone(), Value::Undefined)
        .then(Some(handler(move |_| Ok(Value::Thenable(rogue.clone())))), None);

    scheduler.run_until_idle();
    assert_eq!(
        next.state(),
        FutureState::Rejected(Value::String("then raised".into()))
    );
}

#[test]
fn then_failure_after_callback_is_swallowed() {
    let scheduler = Scheduler::new();
    let rogue = FnThenable::new(|on_fulfilled, _on_rejected| {
        on_fulfilled(Value::Number(5.0));
        Err(Value::String("raised after settling".into()))
    });
    let next = Future::resolved(scheduler.clone(), Value::Undefined)
        .then(Some(handler(move |_| Ok(Value::Thenable(rogue.clone())))), None);

    scheduler.run_until_idle();
    assert_eq!(next.state(), FutureState::Fulfilled(Value::Number(5.0)));
}

#[test]
fn self_feeding_thenable_chain_rejects_with_depth_error() {
    struct SelfFeeding;
    impl Thenable for SelfFeeding {
        fn then_member(&self) -> Result<Option<ThenMethod>, Value> {
            Ok(Some(Rc::new(|on_fulfilled, _on_rejected| {
                on_fulfilled(Value::Thenable(Rc::new(SelfFeeding)));
                Ok(())
            })))
        }
    }

    let scheduler = Scheduler::new();
    let next = Future::resolved(scheduler.clone(), Value::Undefined).then(
        Some(handler(|_| Ok(Value::Thenable(Rc::new(SelfFeeding))))),
        None,
    );

    scheduler.run_until_idle();
    match next.state() {
        FutureState::Rejected(Value::Error(err)) => {
            assert!(matches!(*err, FutureError::AdoptionDepthExceeded { .. }));
        }
        other => panic!("expected depth rejection, got {other:?}"),
    }
}
