//! List command - show the logged-in user's transactions

use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;
use wenli_core::{TransactionFilter, TransactionType};

use super::{get_context, require_session};
use crate::output;

pub fn run(kind: Option<String>, search: Option<String>, limit: Option<usize>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    let mut filter = TransactionFilter::default();
    if let Some(k) = kind {
        filter = filter.kind(k.parse::<TransactionType>()?);
    }
    if let Some(term) = search {
        filter = filter.search(term);
    }

    let mut transactions = ctx.ledger.search(&session, &filter)?;
    if let Some(limit) = limit {
        transactions.truncate(limit);
    }

    if json {
        return output::print_json(&transactions);
    }

    if transactions.is_empty() {
        println!("{}", "No transactions found.".dimmed());
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Type", "Category", "Amount", "Note", "ID"]);
    for tx in &transactions {
        table.add_row(vec![
            Cell::new(tx.date),
            Cell::new(tx.kind),
            Cell::new(&tx.category),
            output::amount_cell(tx.kind, tx.amount),
            Cell::new(&tx.note),
            Cell::new(&tx.id),
        ]);
    }
    println!("{}", table);
    println!("{}", format!("{} transaction(s)", transactions.len()).dimmed());

    Ok(())
}
