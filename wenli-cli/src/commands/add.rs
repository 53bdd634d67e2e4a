//! Add command - record an income or expense

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use colored::Colorize;
use dialoguer::{Input, Select};
use rust_decimal::Decimal;
use wenli_core::domain::category;
use wenli_core::services::LogEvent;
use wenli_core::{NewTransaction, TransactionType};

use super::{get_context, get_logger, log_event, require_session};
use crate::output;

/// Parse a strictly positive amount
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let amount: Decimal = input
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid amount '{}'", input.trim()))?;
    if amount <= Decimal::ZERO {
        bail!("Amount must be greater than zero");
    }
    Ok(amount)
}

/// Parse a YYYY-MM-DD date
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date format. Use YYYY-MM-DD"))
}

/// Map an English label to the stored name; other input is kept as typed
pub fn resolve_category(kind: TransactionType, input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        bail!("Category must not be empty");
    }
    match category::resolve(kind, input) {
        Some(name) => Ok(name.to_string()),
        None => {
            output::warning(&format!(
                "'{}' is not a suggested {} category (see 'wl categories')",
                input, kind
            ));
            Ok(input.to_string())
        }
    }
}

fn pick_type() -> Result<TransactionType> {
    let choices = [TransactionType::Expense, TransactionType::Income];
    let labels: Vec<&str> = choices.iter().map(|t| t.as_str()).collect();
    let idx = Select::new()
        .with_prompt("Type")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(choices[idx])
}

fn pick_category(kind: TransactionType) -> Result<String> {
    let labels: Vec<String> = kind
        .categories()
        .iter()
        .map(|c| format!("{} ({})", c.name, c.english))
        .collect();
    let idx = Select::new()
        .with_prompt("Category")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(kind.categories()[idx].name.to_string())
}

pub struct AddArgs {
    pub kind: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub note: Option<String>,
    pub json: bool,
}

pub fn run(args: AddArgs) -> Result<()> {
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    let kind = match args.kind {
        Some(k) => k.parse::<TransactionType>()?,
        None => pick_type()?,
    };

    let amount_str = match args.amount {
        Some(a) => a,
        None => Input::new().with_prompt("Amount").interact_text()?,
    };
    let amount = parse_amount(&amount_str)?;

    let category = match args.category {
        Some(c) => resolve_category(kind, &c)?,
        None => pick_category(kind)?,
    };

    let date = match args.date {
        Some(d) => parse_date(&d)?,
        None => ctx.today(),
    };

    let mut data = NewTransaction::new(kind, category, amount, date);
    if let Some(note) = args.note {
        data = data.with_note(note.trim());
    }

    let tx = ctx.ledger.add(&session, data)?;
    log_event(&get_logger(), LogEvent::new("transaction_added").with_command("add"));

    if args.json {
        return output::print_json(&tx);
    }

    output::success("Transaction recorded");
    println!("  ID: {}", tx.id.dimmed());
    println!("  {} {} {}", tx.date, tx.category, output::format_amount(tx.amount));
    if !tx.note.is_empty() {
        println!("  Note: {}", tx.note);
    }
    Ok(())
}
