//! Suggested category vocabularies
//!
//! These populate pickers in the presentation layer. The ledger stores any
//! string as a category.

use serde::Serialize;

use super::transaction::TransactionType;

/// A suggested category label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: &'static str,
    pub english: &'static str,
}

const fn category(name: &'static str, english: &'static str) -> Category {
    Category { name, english }
}

pub const EXPENSE_CATEGORIES: &[Category] = &[
    category("餐饮", "Food"),
    category("交通", "Transport"),
    category("购物", "Shopping"),
    category("娱乐", "Entertainment"),
    category("医疗", "Medical"),
    category("教育", "Education"),
    category("住房", "Housing"),
    category("其他", "Other"),
];

pub const INCOME_CATEGORIES: &[Category] = &[
    category("工资", "Salary"),
    category("理财", "Investment"),
    category("红包", "Gift"),
    category("兼职", "Part-time"),
    category("奖金", "Bonus"),
    category("其他", "Other"),
];

/// Whether `name` is in the suggestion list for `kind`
pub fn is_suggested(kind: TransactionType, name: &str) -> bool {
    kind.categories().iter().any(|c| c.name == name)
}

/// Resolve an English label or a stored name to the stored name
pub fn resolve(kind: TransactionType, input: &str) -> Option<&'static str> {
    let input = input.trim();
    kind.categories()
        .iter()
        .find(|c| c.name == input || c.english.eq_ignore_ascii_case(input))
        .map(|c| c.name)
}
