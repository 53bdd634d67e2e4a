//! Stats command - balance, category breakdown and daily trend

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{get_context, require_session};
use crate::output;

/// Width of the widest trend bar
const BAR_WIDTH: u32 = 24;

fn bar(value: Decimal, max: Decimal) -> String {
    if max.is_zero() || value.is_zero() {
        return String::new();
    }
    let cells = (value * Decimal::from(BAR_WIDTH) / max)
        .round()
        .to_u32()
        .unwrap_or(0)
        .max(1);
    "█".repeat(cells as usize)
}

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = require_session(&ctx)?;
    let overview = ctx.statistics.overview(&session)?;

    if json {
        return output::print_json(&overview);
    }

    println!("{}", format!("Wallet of {}", session.username).bold());
    println!();

    let mut totals = output::create_table();
    totals.add_row(vec![
        Cell::new("Income"),
        Cell::new(output::format_amount(overview.totals.income)).fg(Color::Green),
    ]);
    totals.add_row(vec![
        Cell::new("Expense"),
        Cell::new(output::format_amount(overview.totals.expense)).fg(Color::Red),
    ]);
    let balance_color = if overview.totals.balance.is_sign_negative() {
        Color::Red
    } else {
        Color::Green
    };
    totals.add_row(vec![
        Cell::new("Balance"),
        Cell::new(output::format_amount(overview.totals.balance)).fg(balance_color),
    ]);
    println!("{}", totals);
    println!();

    if !overview.categories.is_empty() {
        println!("{}", "Spending by category".bold());
        let mut table = output::create_table();
        table.set_header(vec!["Category", "Amount", "Share"]);
        for c in &overview.categories {
            let share = if overview.totals.expense.is_zero() {
                Decimal::ZERO
            } else {
                (c.amount * Decimal::ONE_HUNDRED / overview.totals.expense).round_dp(1)
            };
            table.add_row(vec![
                Cell::new(&c.category),
                Cell::new(output::format_amount(c.amount)),
                Cell::new(format!("{}%", share)),
            ]);
        }
        println!("{}", table);
        println!();
    }

    println!("{}", format!("Last {} days", overview.trend.len()).bold());
    let max = overview
        .trend
        .iter()
        .map(|d| d.expense)
        .max()
        .unwrap_or(Decimal::ZERO);
    let mut table = output::create_table();
    table.set_header(vec!["Day", "Income", "Expense", ""]);
    for day in &overview.trend {
        table.add_row(vec![
            Cell::new(&day.label),
            Cell::new(output::format_amount(day.income)).fg(Color::Green),
            Cell::new(output::format_amount(day.expense)).fg(Color::Red),
            Cell::new(bar(day.expense, max)).fg(Color::Red),
        ]);
    }
    println!("{}", table);

    Ok(())
}
