//! Doctor command - run storage health checks

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};
use serde_json::Value;
use wenli_core::services::{CheckStatus, LogEvent};

use super::{get_context, get_logger, log_event};
use crate::output;

/// Format a detail JSON value for display
fn format_detail(value: &Value) -> String {
    match value {
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let display_val = match v {
                    Value::String(s) if s.chars().count() > 60 => {
                        format!("{}...", s.chars().take(57).collect::<String>())
                    }
                    Value::String(s) => s.clone(),
                    _ => v.to_string(),
                };
                format!("{}: {}", k, display_val)
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

/// Returns whether any check reported an error
pub fn run(verbose: bool, json: bool) -> Result<bool> {
    let ctx = get_context()?;
    let result = ctx.doctor.run_checks()?;
    let failed = result.summary.errors > 0;

    if failed {
        log_event(
            &get_logger(),
            LogEvent::new("doctor_failed")
                .with_command("doctor")
                .with_error(format!("{} check(s) failed", result.summary.errors)),
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(failed);
    }

    println!("{}", "Wallet Health Check".bold());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Check", "Status", "Message"]);

    for (check_name, check_result) in &result.checks {
        let status_cell = match check_result.status {
            CheckStatus::Pass => Cell::new("PASS").fg(Color::Green),
            CheckStatus::Warning => Cell::new("WARN").fg(Color::Yellow),
            CheckStatus::Error => Cell::new("ERROR").fg(Color::Red),
        };

        table.add_row(vec![
            Cell::new(check_name),
            status_cell,
            Cell::new(&check_result.message),
        ]);

        if verbose {
            if let Some(details) = &check_result.details {
                for detail in details {
                    table.add_row(vec![
                        Cell::new(""),
                        Cell::new(""),
                        Cell::new(format!("  - {}", format_detail(detail))),
                    ]);
                }
            }
        }
    }

    println!("{}", table);
    println!();

    println!(
        "Summary: {} passed, {} warnings, {} errors",
        result.summary.passed.to_string().green(),
        result.summary.warnings.to_string().yellow(),
        result.summary.errors.to_string().red(),
    );

    Ok(failed)
}
