//! Monthly totals, category breakdowns and rankings over a transaction slice.
//!
//! Every function here is pure; an empty slice yields zero sums and empty
//! breakdowns.

mod filter;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::{color_for, Transaction, TransactionType};

pub use filter::{newest_first, recent, MonthFilter, TransactionFilter};

/// Transactions dated in the same calendar month as `reference`, in collection order.
pub fn in_month(transactions: &[Transaction], reference: NaiveDate) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|txn| {
            txn.parsed_date().is_some_and(|date| {
                date.year() == reference.year() && date.month() == reference.month()
            })
        })
        .collect()
}

pub fn sum_by_type<'a, I>(transactions: I, kind: TransactionType) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|txn| txn.kind == kind)
        .map(|txn| txn.amount)
        .sum()
}

/// Income minus expenses.
pub fn balance<'a, I>(transactions: I) -> f64
where
    I: IntoIterator<Item = &'a Transaction> + Clone,
{
    sum_by_type(transactions.clone(), TransactionType::Income)
        - sum_by_type(transactions, TransactionType::Expense)
}

/// `amount / total * 100` rounded to one decimal; zero unless `total` is positive.
pub fn percentage_share(amount: f64, total: f64) -> f64 {
    if total > 0.0 {
        (amount / total * 1000.0).round() / 10.0
    } else {
        0.0
    }
}

/// `January 2024` style label.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Income, expenses and balance for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub income_count: usize,
    pub expense_count: usize,
}

impl MonthlySummary {
    pub fn is_positive(&self) -> bool {
        self.balance >= 0.0
    }
}

pub fn summarize_month(transactions: &[Transaction], reference: NaiveDate) -> MonthlySummary {
    let month = in_month(transactions, reference);
    let income = sum_by_type(month.iter().copied(), TransactionType::Income);
    let expenses = sum_by_type(month.iter().copied(), TransactionType::Expense);
    MonthlySummary {
        year: reference.year(),
        month: reference.month(),
        label: month_label(reference),
        income,
        expenses,
        balance: income - expenses,
        income_count: month.iter().filter(|txn| txn.is_income()).count(),
        expense_count: month.iter().filter(|txn| txn.is_expense()).count(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Legend row: a category total with its share and chart colour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
    pub color: &'static str,
}

/// Per-category sums, kept in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    entries: Vec<CategoryTotal>,
}

impl CategoryTotals {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryTotal> {
        self.entries.iter()
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.amount)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.amount).sum()
    }

    /// Share of `category` in the total, `0` for unknown categories.
    pub fn share(&self, category: &str) -> f64 {
        self.get(category)
            .map(|amount| percentage_share(amount, self.total()))
            .unwrap_or(0.0)
    }

    /// Largest `n` categories, descending. Ties keep encounter order.
    pub fn top(&self, n: usize) -> Vec<CategoryTotal> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| rank(b.amount).total_cmp(&rank(a.amount)));
        sorted.truncate(n);
        sorted
    }

    pub fn breakdown(&self) -> Vec<CategoryShare> {
        let total = self.total();
        self.entries
            .iter()
            .map(|entry| CategoryShare {
                category: entry.category.clone(),
                amount: entry.amount,
                percentage: percentage_share(entry.amount, total),
                color: color_for(&entry.category),
            })
            .collect()
    }

    /// Label/amount pairs in encounter order, as consumed by the chart layout.
    pub fn to_pairs(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .map(|entry| (entry.category.clone(), entry.amount))
            .collect()
    }

    fn add(&mut self, category: &str, amount: f64) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.category == category)
        {
            Some(entry) => entry.amount += amount,
            None => self.entries.push(CategoryTotal {
                category: category.to_string(),
                amount,
            }),
        }
    }
}

// NaN totals rank below every number.
fn rank(amount: f64) -> f64 {
    if amount.is_nan() {
        f64::NEG_INFINITY
    } else {
        amount
    }
}

/// Groups transactions of one type by category.
pub fn category_totals<'a, I>(transactions: I, kind: TransactionType) -> CategoryTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = CategoryTotals::default();
    for txn in transactions.into_iter().filter(|txn| txn.kind == kind) {
        totals.add(&txn.category, txn.amount);
    }
    totals
}
