use std::cell::RefCell;
use std::rc::Rc;

use vow::{
    FnThenable, Future, FutureError, FutureState, Handler, Schedule, Scheduler, Value,
};

/// A named conformance check. Each runs against a fresh scheduler and
/// reports the first violated expectation.
pub struct Scenario {
    pub name: &'static str,
    pub run: fn() -> Result<(), String>,
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "settle-once",
            run: settle_once,
        },
        Scenario {
            name: "async-only-handlers",
            run: async_only_handlers,
        },
        Scenario {
            name: "order-preservation",
            run: order_preservation,
        },
        Scenario {
            name: "default-pass-through",
            run: default_pass_through,
        },
        Scenario {
            name: "default-re-raise",
            run: default_re_raise,
        },
        Scenario {
            name: "future-adoption",
            run: future_adoption,
        },
        Scenario {
            name: "nested-thenable-unwrapping",
            run: nested_thenable_unwrapping,
        },
        Scenario {
            name: "cycle-detection",
            run: cycle_detection,
        },
        Scenario {
            name: "misbehaving-thenable",
            run: misbehaving_thenable,
        },
        Scenario {
            name: "scheduler-fifo",
            run: scheduler_fifo,
        },
    ]
}

fn handler(f: impl Fn(Value) -> Result<Value, Value> + 'static) -> Handler {
    Rc::new(f)
}

fn expect_state(future: &Future, expected: FutureState) -> Result<(), String> {
    let actual = future.state();
    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, got {actual:?}"))
    }
}

fn settle_once() -> Result<(), String> {
    let scheduler = Scheduler::new();
    let deferred = Future::deferred(scheduler.clone());
    (deferred.fulfill)(Value::Number(1.0));
    (deferred.reject)(Value::String("e".into()));
    (deferred.fulfill)(Value::Number(2.0));
    scheduler.run_until_idle();
    expect_state(&deferred.future, FutureState::Fulfilled(Value::Number(1.0)))
}

fn async_only_handlers() -> Result<(), String> {
    let scheduler = Scheduler::new();
    let future = Future::resolved(scheduler.clone(), Value::Number(1.0));
    let observed = Rc::new(RefCell::new(false));
    let flag = observed.clone();
    future.then(
        Some(handler(move |value| {
            *flag.borrow_mut() = true;
            Ok(value)
        })),
        None,
    );
    if *observed.borrow() {
        return Err("handler ran synchronously inside then".into());
    }
    scheduler.run_until_idle();
    if !*observed.borrow() {
        return Err("handler never ran after draining".into());
    }
    Ok(())
}

fn order_preservation() -> Result<(), String> {
    let scheduler = Scheduler::new();
    let deferred = Future::deferred(scheduler.clone());
    let log: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    for i in 0..4 {
        let log = log.clone();
        deferred.future.then(
            Some(handler(move |value| {
                log.borrow_mut().push(i);
                Ok(value)
            })),
            None,
        );
    }
    (deferred.fulfill)(Value::Undefined);
    scheduler.run_until_idle();
    if *log.borrow() == vec![0, 1, 2, 3] {
        Ok(())
    } else {
        Err(format!("handlers ran out of order: {:?}", log.borrow()))
    }
}

fn default_pass_through() -> Result<(), String> {
    let scheduler = Scheduler::new();
    let doubled = Future::resolved(scheduler.clone(), Value::Number(5.0))
        .then(None, None)
        .then(
            Some(handler(|value| match value {
                Value::Number(n) => Ok(Value::Number(n * 2.0)),
                other => Err(other),
            })),
            None,
        );
    scheduler.run_until_settled(&doubled);
    expect_state(&doubled, FutureState::Fulfilled(Value::Number(10.0)))
}

fn default_re_raise() -> Result<(), String> {
    let scheduler = Scheduler::new();
    let next = Future::rejected(scheduler.clone(), Value::String("x".into())).then(None, None);
    scheduler.run_until_settled(&next);
    expect_state(&next, FutureState::Rejected(Value::String("x".into())))
}

fn future_adoption() -> Result<(), String> {
    let scheduler = Scheduler::new();
    let inner = Future::deferred(scheduler.clone());
    let adopted = Value::Future(inner.future.clone());
    let next = Future::resolved(scheduler.clone(), Value::Undefined)
        .then(Some(handler(move |_| Ok(adopted.clone()))), None);
    scheduler.run_until_idle();
    if !next.is_pending() {
        return Err("chained future settled before the adopted one".into());
    }
    (inner.fulfill)(Value::Number(9.0));
    scheduler.run_until_idle();
    expect_state(&next, FutureState::Fulfilled(Value::Number(9.0)))
}

fn nested_thenable_unwrapping() -> Result<(), String> {
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
    scheduler.run_until_settled(&next);
    expect_state(&next, FutureState::Fulfilled(Value::Number(7.0)))
}

fn cycle_detection() -> Result<(), String> {
    let scheduler = Scheduler::new();
    let slot: Rc<RefCell<Option<Future>>> = Rc::new(RefCell::new(None));
    let producer = {
        let slot = slot.clone();
        handler(move |_| {
            let own = slot
                .borrow()
                .clone()
                .ok_or(Value::String("slot empty".into()))?;
            Ok(Value::Future(own))
        })
    };
    let next = Future::resolved(scheduler.clone(), Value::Undefined).then(Some(producer), None);
    *slot.borrow_mut() = Some(next.clone());
    scheduler.run_until_settled(&next);
    match next.state() {
        FutureState::Rejected(Value::Error(err))
            if matches!(*err, FutureError::ChainingCycle { .. }) =>
        {
            Ok(())
        }
        other => Err(format!("expected a chaining-cycle rejection, got {other:?}")),
    }
}

fn misbehaving_thenable() -> Result<(), String> {
    let scheduler = Scheduler::new();
    let rogue = FnThenable::new(|on_fulfilled, on_rejected| {
        on_fulfilled(Value::Number(1.0));
        on_rejected(Value::String("late".into()));
        on_fulfilled(Value::Number(2.0));
        Ok(())
    });
    let next = Future::resolved(scheduler.clone(), Value::Undefined)
        .then(Some(handler(move |_| Ok(Value::Thenable(rogue.clone())))), None);
    scheduler.run_until_settled(&next);
    expect_state(&next, FutureState::Fulfilled(Value::Number(1.0)))
}

fn scheduler_fifo() -> Result<(), String> {
    let scheduler = Scheduler::new();
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    {
        let log = log.clone();
        let nested = scheduler.clone();
        scheduler.schedule(Box::new(move || {
            log.borrow_mut().push("first");
            let log = log.clone();
            nested.schedule(Box::new(move || log.borrow_mut().push("nested")));
        }));
    }
    {
        let log = log.clone();
        scheduler.schedule(Box::new(move || log.borrow_mut().push("second")));
    }
    scheduler.run_until_idle();
    if *log.borrow() == vec!["first", "second", "nested"] {
        Ok(())
    } else {
        Err(format!("unexpected task order: {:?}", log.borrow()))
    }
}
