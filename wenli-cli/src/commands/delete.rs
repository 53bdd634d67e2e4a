//! Delete command - remove a transaction

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use serde_json::json;
use wenli_core::services::LogEvent;

use super::{get_context, get_logger, log_event, require_session};
use crate::output;

pub fn run(id: &str, force: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    let Some(tx) = ctx.ledger.get(&session, id)? else {
        if json {
            return output::print_json(json!({ "deleted": false }));
        }
        println!("{}", format!("Transaction '{}' not found, nothing deleted", id).dimmed());
        return Ok(());
    };

    // Confirm removal unless --force
    if !force && !json {
        println!(
            "\n{}",
            format!(
                "This will delete {} {} {} on {}.",
                tx.kind,
                tx.category,
                output::format_amount(tx.amount),
                tx.date
            )
            .yellow()
        );

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let deleted = ctx.ledger.delete(&session, id)?;
    if deleted {
        log_event(&get_logger(), LogEvent::new("transaction_deleted").with_command("delete"));
    }

    if json {
        return output::print_json(json!({ "deleted": deleted }));
    }
    output::success("Transaction deleted");
    Ok(())
}
