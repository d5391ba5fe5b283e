use std::time::Instant;

use clap::Parser;
use colored::Colorize;

use crate::cli::Cli;
use crate::report;
use crate::runner::{run_scenario, ScenarioResult};
use crate::suite;

pub fn run() {
    let cli = Cli::parse();
    let start = Instant::now();

    let scenarios: Vec<_> = suite::scenarios()
        .into_iter()
        .filter(|scenario| {
            cli.filter
                .as_deref()
                .is_none_or(|filter| scenario.name.contains(filter))
        })
        .collect();

    if !cli.json {
        println!(
            "{} {} conformance scenarios...\n",
            "Running".bold().cyan(),
            scenarios.len()
        );
    }

    let mut results: Vec<(&'static str, ScenarioResult)> = Vec::new();
    for scenario in &scenarios {
        let result = run_scenario(scenario);
        if cli.verbose && !cli.json {
            match &result {
                ScenarioResult::Passed => println!("{} {}", "PASS".green(), scenario.name),
                ScenarioResult::Failed(reason) => {
                    println!("{} {} - {}", "FAIL".red(), scenario.name, reason)
                }
            }
        }
        results.push((scenario.name, result));
    }

    if cli.json {
        report::print_json(&results);
        return;
    }

    let passed = results
        .iter()
        .filter(|(_, result)| matches!(result, ScenarioResult::Passed))
        .count();
    let failures: Vec<(&'static str, String)> = results
        .iter()
        .filter_map(|(name, result)| match result {
            ScenarioResult::Failed(reason) => Some((*name, reason.clone())),
            ScenarioResult::Passed => None,
        })
        .collect();

    report::print_totals(passed, failures.len(), start.elapsed().as_secs_f64());

    if !failures.is_empty() && !cli.verbose {
        report::print_failure_sample(&failures);
    }
}
