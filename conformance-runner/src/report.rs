use colored::Colorize;
use serde::Serialize;

use crate::runner::ScenarioResult;

#[derive(Serialize)]
struct JsonReport<'a> {
    total: usize,
    passed: usize,
    failed: usize,
    scenarios: Vec<JsonScenario<'a>>,
}

#[derive(Serialize)]
struct JsonScenario<'a> {
    name: &'a str,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

pub fn print_json(results: &[(&'static str, ScenarioResult)]) {
    let scenarios: Vec<JsonScenario> = results
        .iter()
        .map(|(name, result)| match result {
            ScenarioResult::Passed => JsonScenario {
                name: *name,
                passed: true,
                reason: None,
            },
            ScenarioResult::Failed(reason) => JsonScenario {
                name: *name,
                passed: false,
                reason: Some(reason.as_str()),
            },
        })
        .collect();

    let passed = scenarios.iter().filter(|s| s.passed).count();
    let report = JsonReport {
        total: scenarios.len(),
        passed,
        failed: scenarios.len() - passed,
        scenarios,
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize report: {err}"),
    }
}

pub fn print_totals(passed: usize, failed: usize, elapsed_secs: f64) {
    println!("\n{}", "=".repeat(60));
    println!(
        "Passed: {} | Failed: {}",
        passed.to_string().green().bold(),
        failed.to_string().red().bold()
    );
    println!("Completed in {:.2}s", elapsed_secs);
    println!("{}", "=".repeat(60));
}

pub fn print_failure_sample(failures: &[(&'static str, String)]) {
    let max_rows = 10;
    let shown = failures.len().min(max_rows);

    println!("\n{}", "Failures:".red().bold());
    for (name, reason) in failures.iter().take(shown) {
        println!("  {name} - {reason}");
    }
    if failures.len() > shown {
        println!(
            "  ... and {} more (use --verbose for all)",
            failures.len() - shown
        );
    }
}
