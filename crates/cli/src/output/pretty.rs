//! Pretty output formatting.

use super::{CountReport, KeyReport, PatternReport, ScriptStatus};

/// Format a pattern operation result for display.
pub fn format_pattern(report: &PatternReport) -> String {
    match report.removed {
        Some(count) => format!(
            "{} {}: {} key{} removed",
            report.command,
            report.pattern,
            count,
            if count == 1 { "" } else { "s" }
        ),
        None => format!("{} {}: no count reported", report.command, report.pattern),
    }
}

/// Format a key operation result for display.
pub fn format_key(report: &KeyReport) -> String {
    let outcome = if report.applied { "done" } else { "key not found" };
    format!("{} {}: {}", report.operation, report.key, outcome)
}

/// Format a count for display.
pub fn format_count(report: &CountReport) -> String {
    format!(
        "{} [{}, {}]: {}",
        report.key, report.min, report.max, report.count
    )
}

/// Format script statuses for display.
pub fn format_scripts(statuses: &[ScriptStatus]) -> String {
    if statuses.is_empty() {
        return "No scripts given.".to_string();
    }
    let mut output = format!("SCRIPTS ({})\n", statuses.len());
    output.push_str(&"-".repeat(40));
    for status in statuses {
        let state = if status.loaded { "loaded" } else { "missing" };
        output.push_str(&format!("\n{}  {}", status.sha, state));
    }
    output
}
