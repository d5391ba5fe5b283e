use std::cell::RefCell;
use std::rc::Rc;

use vow::{Future, FutureState, Schedule, Scheduler, Value};

#[test]
fn tasks_run_in_enqueue_order() {
    let scheduler = Scheduler::new();
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    for label in ["first", "second", "third"] {
        let log = log.clone();
        scheduler.schedule(Box::new(move || log.borrow_mut().push(label)));
    }

    assert_eq!(scheduler.run_until_idle(), 3);
    assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn tasks_enqueued_while_draining_run_after_existing_ones() {
    let scheduler = Scheduler::new();
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    {
        let log = log.clone();
        let nested = scheduler.clone();
        scheduler.schedule(Box::new(move || {
            log.borrow_mut().push("outer");
            let log = log.clone();
            nested.schedule(Box::new(move || log.borrow_mut().push("inner")));
        }));
    }
    {
        let log = log.clone();
        scheduler.schedule(Box::new(move || log.borrow_mut().push("sibling")));
    }

    assert_eq!(scheduler.run_until_idle(), 3);
    assert_eq!(*log.borrow(), vec!["outer", "sibling", "inner"]);
}

#[test]
fn step_runs_at_most_one_task() {
    let scheduler = Scheduler::new();
    let log: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));

    for i in 0..2 {
        let log = log.clone();
        scheduler.schedule(Box::new(move || log.borrow_mut().push(i)));
    }

    assert!(scheduler.step());
    assert_eq!(*log.borrow(), vec![0]);
    assert_eq!(scheduler.pending_tasks(), 1);

    assert!(scheduler.step());
    assert!(!scheduler.step());
    assert!(!scheduler.has_pending());
}

#[test]
fn run_until_settled_stops_once_the_future_settles() {
    let scheduler = Scheduler::new();
    let deferred = Future::deferred(scheduler.clone());

    {
        let fulfill = deferred.fulfill.clone();
        scheduler.schedule(Box::new(move || fulfill(Value::Number(4.0))));
    }
    {
        let log_task_ran: Rc<RefCell<bool>> = Rc::new(RefCell::new(false));
        let flag = log_task_ran.clone();
        scheduler.schedule(Box::new(move || *flag.borrow_mut() = true));

        let state = scheduler.run_until_settled(&deferred.future);
        assert_eq!(state, FutureState::Fulfilled(Value::Number(4.0)));
        // The second task stays queued: the driver stops at settlement.
        assert!(!*log_task_ran.borrow());
        assert_eq!(scheduler.pending_tasks(), 1);
    }
}

#[test]
fn run_until_settled_returns_pending_when_the_queue_empties() {
    let scheduler = Scheduler::new();
    let deferred = Future::deferred(scheduler.clone());

    assert_eq!(
        scheduler.run_until_settled(&deferred.future),
        FutureState::Pending
    );
}
