use std::any::Any;
use std::panic;

use crate::suite::Scenario;

#[derive(Debug, Clone)]
pub enum ScenarioResult {
    Passed,
    Failed(String),
}

pub fn run_scenario(scenario: &Scenario) -> ScenarioResult {
    match panic::catch_unwind(scenario.run) {
        Ok(Ok(())) => ScenarioResult::Passed,
        Ok(Err(reason)) => ScenarioResult::Failed(reason),
        Err(payload) => ScenarioResult::Failed(format_panic(payload)),
    }
}

fn format_panic(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        return format!("panic while running scenario: {msg}");
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return format!("panic while running scenario: {msg}");
    }
    "panic while running scenario".to_string()
}
