use std::{cmp::Reverse, fmt, str::FromStr};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{Transaction, TransactionType},
    errors::TrackerError,
};

/// Calendar month selector written as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthFilter {
    pub year: i32,
    pub month: u32,
}

impl MonthFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        txn.parsed_date()
            .is_some_and(|date| date.year() == self.year && date.month() == self.month)
    }
}

impl FromStr for MonthFilter {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || TrackerError::InvalidInput(format!("`{}` is not a YYYY-MM month", value));
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Optional type, category and month constraints for the transaction list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub month: Option<MonthFilter>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn month(mut self, month: MonthFilter) -> Self {
        self.month = Some(month);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.kind.map_or(true, |kind| txn.kind == kind)
            && self
                .category
                .as_deref()
                .map_or(true, |category| txn.category == category)
            && self.month.map_or(true, |month| month.matches(txn))
    }

    /// Matching transactions, newest first.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let mut matched: Vec<_> = transactions.iter().filter(|txn| self.matches(txn)).collect();
        newest_first(&mut matched);
        matched
    }
}

/// Sorts by date descending; undated records go last, ties keep their order.
pub fn newest_first(transactions: &mut [&Transaction]) {
    transactions.sort_by_key(|txn| Reverse(txn.parsed_date()));
}

/// The `limit` most recent transactions.
pub fn recent(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
    let mut all: Vec<_> = transactions.iter().collect();
    newest_first(&mut all);
    all.truncate(limit);
    all
}
