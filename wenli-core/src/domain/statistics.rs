//! Aggregation over a transaction slice
//!
//! Everything here is recomputed from the full input on each call. Nothing
//! is cached or persisted.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::result::{Error, Result};
use super::transaction::{Transaction, TransactionType};

/// Length of the daily trend window, ending today
pub const DEFAULT_TREND_DAYS: u32 = 7;

/// Longest trend window accepted from settings
pub const MAX_TREND_DAYS: u32 = 366;

fn checked_sum(total: Decimal, amount: Decimal) -> Result<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| Error::validation("Amount total is out of range"))
}

/// Income, expense and balance totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl Totals {
    pub fn from_transactions(transactions: &[Transaction]) -> Result<Self> {
        let (income, expense) = transactions.iter().try_fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(income, expense), tx| match tx.kind {
                TransactionType::Income => Ok::<_, Error>((checked_sum(income, tx.amount)?, expense)),
                TransactionType::Expense => Ok((income, checked_sum(expense, tx.amount)?)),
            },
        )?;
        let balance = income
            .checked_sub(expense)
            .ok_or_else(|| Error::validation("Balance is out of range"))?;

        Ok(Self {
            income,
            expense,
            balance,
        })
    }
}

/// Expense total for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Group expenses by category, in order of first appearance
///
/// Categories with no expense entries do not appear.
pub fn category_breakdown(transactions: &[Transaction]) -> Result<Vec<CategoryTotal>> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        match index.get(tx.category.as_str()) {
            Some(&i) => totals[i].amount = checked_sum(totals[i].amount, tx.amount)?,
            None => {
                index.insert(tx.category.as_str(), totals.len());
                totals.push(CategoryTotal {
                    category: tx.category.clone(),
                    amount: tx.amount,
                });
            }
        }
    }

    Ok(totals)
}

/// Income and expense for a single calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTrend {
    pub date: NaiveDate,
    /// `MM/DD`
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
}

/// Per-day totals for the `days` calendar dates ending at `today`, oldest first
///
/// Days without entries report zero for both sides. A window reaching past
/// the representable calendar is a validation error.
pub fn daily_trend(
    transactions: &[Transaction],
    today: NaiveDate,
    days: u32,
) -> Result<Vec<DailyTrend>> {
    if days == 0 {
        return Ok(Vec::new());
    }

    let start = today
        .checked_sub_signed(Duration::days(i64::from(days) - 1))
        .ok_or_else(|| Error::validation(format!("Trend window of {} days is out of range", days)))?;
    let mut by_day: HashMap<NaiveDate, (Decimal, Decimal)> = HashMap::new();

    for tx in transactions {
        if tx.date < start || tx.date > today {
            continue;
        }
        let entry = by_day.entry(tx.date).or_insert((Decimal::ZERO, Decimal::ZERO));
        match tx.kind {
            TransactionType::Income => entry.0 = checked_sum(entry.0, tx.amount)?,
            TransactionType::Expense => entry.1 = checked_sum(entry.1, tx.amount)?,
        }
    }

    let trend = (0..i64::from(days))
        .map(|offset| {
            let date = start + Duration::days(offset);
            let (income, expense) = by_day
                .get(&date)
                .copied()
                .unwrap_or((Decimal::ZERO, Decimal::ZERO));
            DailyTrend {
                date,
                label: date.format("%m/%d").to_string(),
                income,
                expense,
            }
        })
        .collect();
    Ok(trend)
}

/// Everything the dashboard shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub totals: Totals,
    pub categories: Vec<CategoryTotal>,
    pub trend: Vec<DailyTrend>,
}

impl Overview {
    pub fn compute(transactions: &[Transaction], today: NaiveDate, trend_days: u32) -> Result<Self> {
        Ok(Self {
            totals: Totals::from_transactions(transactions)?,
            categories: category_breakdown(transactions)?,
            trend: daily_trend(transactions, today, trend_days)?,
        })
    }
}
