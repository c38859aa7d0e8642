//! Report rendering for scenario runs.

use chrono::Utc;
use colored::Colorize;
use std::time::Duration;

/// Aggregated outcome of one scenario across seeds and iterations.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    pub average_duration: Duration,
}

pub fn generate_console_report(results: &[ScenarioResult], total_duration: Duration) {
    println!();
    println!("{}", "📊 Test Results Summary".bright_cyan().bold());
    println!("{}", "======================".cyan());

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    println!("Total scenarios: {total_tests}");
    println!("Passed: {}", passed_tests.to_string().green());
    println!("Failed: {}", failed_tests.to_string().red());

    if total_tests > 0 {
        #[allow(clippy::cast_precision_loss)]
        let success_rate = (passed_tests as f64 / total_tests as f64) * 100.0;
        println!("Success rate: {success_rate:.1}%");
    }
    println!("Total time: {total_duration:?}");
    println!();

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        println!("{status} {}", result.scenario_name.bold());
        println!(
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        );
        println!("   Average time: {:?}", result.average_duration);
        if !result.failures.is_empty() {
            println!("   Failures:");
            for failure in &result.failures {
                println!("     • {}", failure.red());
            }
        }
        println!();
    }
}

#[must_use]
pub fn generate_json_report(results: &[ScenarioResult], total_duration: Duration) -> String {
    let payload = serde_json::json!({
        "generated_at": Utc::now().to_rfc3339(),
        "total_duration_ms": total_duration.as_millis(),
        "scenarios": results.iter().map(|r| serde_json::json!({
            "name": r.scenario_name,
            "passed": r.passed,
            "iterations_run": r.iterations_run,
            "successful_iterations": r.successful_iterations,
            "average_duration_ms": r.average_duration.as_millis(),
            "failures": r.failures,
        })).collect::<Vec<_>>(),
    });
    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| String::from("{}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: String::from("smoke"),
            passed,
            iterations_run: 4,
            successful_iterations: if passed { 4 } else { 2 },
            failures: if passed {
                Vec::new()
            } else {
                vec![String::from("boom")]
            },
            average_duration: Duration::from_millis(3),
        }
    }

    #[test]
    fn json_report_includes_every_scenario() {
        let report = generate_json_report(&[result(true), result(false)], Duration::from_secs(1));
        let value: serde_json::Value = serde_json::from_str(&report).expect("valid json");
        assert_eq!(value["scenarios"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["scenarios"][1]["failures"][0], "boom");
    }
}
