//! Transaction domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category;
use super::result::{Error, Result};

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Suggested categories for this type
    pub fn categories(&self) -> &'static [category::Category] {
        match self {
            TransactionType::Income => category::INCOME_CATEGORIES,
            TransactionType::Expense => category::EXPENSE_CATEGORIES,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::validation(format!(
                "Unknown transaction type '{}', expected 'income' or 'expense'",
                other
            ))),
        }
    }
}

/// A single ledger entry owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    /// Stored as a JSON number
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Calendar date of the entry (no time component)
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    /// When the record was created, distinct from `date`
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// Caller-supplied fields for a new transaction
///
/// `id`, `user_id` and `created_at` are assigned by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: String,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionType,
        category: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            category: category.into(),
            amount,
            date,
            note: String::new(),
        }
    }

    pub fn income(category: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        Self::new(TransactionType::Income, category, amount, date)
    }

    pub fn expense(category: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        Self::new(TransactionType::Expense, category, amount, date)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)
    }
}

/// Partial update of a transaction
///
/// Unset fields keep their stored value. Identity fields (`id`, `user_id`,
/// `created_at`) are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl TransactionPatch {
    pub fn amount(amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.note.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        match self.amount {
            Some(amount) => validate_amount(amount),
            None => Ok(()),
        }
    }

    /// Merge the supplied fields over `tx`
    pub fn apply(&self, tx: &mut Transaction) {
        if let Some(kind) = self.kind {
            tx.kind = kind;
        }
        if let Some(category) = &self.category {
            tx.category = category.clone();
        }
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        if let Some(date) = self.date {
            tx.date = date;
        }
        if let Some(note) = &self.note {
            tx.note = note.clone();
        }
    }
}

/// List filter: by type and by a case-insensitive term over note and category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// `None` means all types
    pub kind: Option<TransactionType>,
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if tx.kind != kind {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                tx.note.to_lowercase().contains(&term) || tx.category.to_lowercase().contains(&term)
            }
        }
    }
}

/// Largest amount a single entry may carry
///
/// Keeps any realistic number of summed entries inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = {
    const N: u64 = 1_000_000_000_000;
    Decimal::from_parts(N as u32, (N >> 32) as u32, 0, false, 0)
};

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::validation(format!(
            "Amount must not be negative, got {}",
            amount
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(Error::validation(format!(
            "Amount must not exceed {}",
            MAX_AMOUNT
        )));
    }
    Ok(())
}
