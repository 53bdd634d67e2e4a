//! Edit command - change fields of an existing transaction

use anyhow::{bail, Result};
use wenli_core::services::LogEvent;
use wenli_core::{TransactionPatch, TransactionType};

use super::add::{parse_amount, parse_date, resolve_category};
use super::{get_context, get_logger, log_event, require_session};
use crate::output;

pub struct EditArgs {
    pub id: String,
    pub kind: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub note: Option<String>,
    pub json: bool,
}

pub fn run(args: EditArgs) -> Result<()> {
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    let Some(current) = ctx.ledger.get(&session, &args.id)? else {
        bail!("Transaction '{}' not found", args.id);
    };

    let kind = match &args.kind {
        Some(k) => Some(k.parse::<TransactionType>()?),
        None => None,
    };
    // A new category is checked against the type the record will have
    let target_kind = kind.unwrap_or(current.kind);

    let patch = TransactionPatch {
        kind,
        category: args
            .category
            .as_deref()
            .map(|c| resolve_category(target_kind, c))
            .transpose()?,
        amount: args.amount.as_deref().map(parse_amount).transpose()?,
        date: args.date.as_deref().map(parse_date).transpose()?,
        note: args.note.map(|n| n.trim().to_string()),
    };

    if patch.is_empty() {
        bail!("Nothing to change. Pass at least one of --type, --amount, --category, --date, --note");
    }

    let Some(updated) = ctx.ledger.update(&session, &args.id, &patch)? else {
        bail!("Transaction '{}' not found", args.id);
    };
    log_event(&get_logger(), LogEvent::new("transaction_updated").with_command("edit"));

    if args.json {
        return output::print_json(&updated);
    }

    output::success("Transaction updated");
    println!(
        "  {} {} {} {}",
        updated.date,
        updated.kind,
        updated.category,
        output::format_amount(updated.amount)
    );
    Ok(())
}
