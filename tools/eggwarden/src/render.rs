//! Final report and error output

use anyhow::Result;
use colored::Colorize;
use panel_reconcile::{ReconcileError, ReconciliationReport, RemediationReport};
use serde::Serialize;

/// Presentation settings picked once from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Print reports as JSON on stdout; everything interactive goes to stderr
    pub json: bool,
    pub color: bool,
}

impl Output {
    /// Print a progress line where it won't corrupt JSON output
    pub fn line(&self, message: impl std::fmt::Display) {
        if self.json {
            eprintln!("{}", message);
        } else {
            println!("{}", message);
        }
    }
}

pub fn reconciliation_summary(report: &ReconciliationReport) -> String {
    if report.no_servers_found() {
        return format!("No servers found using egg {}", report.egg_id);
    }

    let mut summary = format!(
        "Egg {}: {} servers checked, {} matched, {} updated, {} updated via all, {} skipped",
        report.egg_id,
        report.servers.len(),
        report.matched(),
        report.updated(),
        report.updated_via_all(),
        report.skipped()
    );
    if let Some(rows) = report.bulk_rows_affected {
        summary.push_str(&format!(" ({} rows rewritten in bulk)", rows));
    }
    summary
}

pub fn remediation_summary(report: &RemediationReport) -> String {
    if report.no_stuck_transfers() {
        return "No stuck transfers found".to_string();
    }
    format!(
        "Stuck transfers: {} found, {} deleted, {} kept",
        report.visited(),
        report.removed(),
        report.retained()
    )
}

pub fn print_reconciliation(report: &ReconciliationReport, output: Output) -> Result<()> {
    if output.json {
        return print_json(report);
    }
    println!();
    println!(
        "{} {}",
        "SUMMARY".bright_cyan(),
        reconciliation_summary(report)
    );
    Ok(())
}

pub fn print_remediation(report: &RemediationReport, output: Output) -> Result<()> {
    if output.json {
        return print_json(report);
    }
    println!();
    println!("{} {}", "SUMMARY".bright_cyan(), remediation_summary(report));
    Ok(())
}

/// Report an error the session survives
pub fn print_error(err: &ReconcileError) {
    eprintln!("{} {}", "ERROR".red(), err);
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
