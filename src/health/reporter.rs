//! Terminal rendering of a health report

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::runner::HealthCheckReport;

/// Renders the report as a table followed by a one-line verdict
pub fn format_report(report: &HealthCheckReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Check", "Status", "Time", "Result"]);

    for (name, result) in &report.results {
        builder.push_record([
            name.clone(),
            result.status.label(),
            format!("{:.2?}", result.duration),
            result.message.clone(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    format!("{table}\n{}", verdict(report))
}

fn verdict(report: &HealthCheckReport) -> String {
    let counts = format!(
        "{} checks: {} passed, {} warned, {} failed",
        report.total, report.passed, report.warned, report.failed
    );

    let status = if !report.is_healthy() {
        "UNHEALTHY".red().bold()
    } else if report.has_warnings() {
        "HEALTHY (with warnings)".yellow().bold()
    } else {
        "HEALTHY".green().bold()
    };

    format!("{status}  {counts}\n")
}

/// Prints the report, then the detail lines of every check that has them
pub fn print_report(report: &HealthCheckReport) {
    println!("{}", format_report(report));

    for (name, result) in &report.results {
        if result.details.is_empty() {
            continue;
        }
        println!("{}", name.bold());
        for line in &result.details {
            println!("  {line}");
        }
    }
}
