//! Plain-text monthly report.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::{
    currency::format_currency,
    domain::Transaction,
    errors::Result,
    stats::{self, month_label},
};

const RULE: &str = "===============================";

/// Subject line and body ready to hand to a delivery channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyReport {
    pub subject: String,
    pub body: String,
}

/// Hands a finished report to mail, notifications or any other channel.
pub trait ReportDelivery {
    fn deliver(&mut self, report: &MonthlyReport) -> Result<()>;
}

/// Builds the report for the calendar month containing `reference`.
pub fn monthly_report(
    transactions: &[Transaction],
    currency: &str,
    reference: NaiveDate,
) -> MonthlyReport {
    let month_name = month_label(reference);
    let summary = stats::summarize_month(transactions, reference);
    let month = stats::in_month(transactions, reference);
    let fmt = |amount: f64| format_currency(amount, currency);

    let mut body = String::new();
    let _ = writeln!(
        body,
        "Yakstra Income & Expense Tracker - {} Report\n",
        month_name
    );
    let _ = writeln!(body, "MONTHLY SUMMARY\n{}", RULE);
    let _ = writeln!(body, "Total Income:    {}", fmt(summary.income));
    let _ = writeln!(body, "Total Expenses:  {}", fmt(summary.expenses));
    let _ = writeln!(body, "Balance:         {}\n", fmt(summary.balance));

    let _ = writeln!(
        body,
        "INCOME DETAILS ({} transactions)\n{}",
        summary.income_count, RULE
    );
    let incomes: Vec<_> = month.iter().filter(|txn| txn.is_income()).collect();
    if incomes.is_empty() {
        body.push_str("No income recorded\n");
    }
    for txn in incomes {
        let _ = writeln!(body, "{} - {}: {}", txn.date, txn.title, fmt(txn.amount));
    }

    let _ = writeln!(
        body,
        "\nEXPENSE DETAILS ({} transactions)\n{}",
        summary.expense_count, RULE
    );
    let expenses: Vec<_> = month.iter().filter(|txn| txn.is_expense()).collect();
    if expenses.is_empty() {
        body.push_str("No expenses recorded\n");
    }
    for txn in expenses {
        let _ = writeln!(
            body,
            "{} - {} ({}): {}",
            txn.date,
            txn.title,
            txn.category,
            fmt(txn.amount)
        );
    }

    let _ = write!(
        body,
        "\n{}\nGenerated by Yakstra - Multi-Currency Income & Expense Tracker",
        RULE
    );

    MonthlyReport {
        subject: format!("Monthly Financial Report - {}", month_name),
        body,
    }
}
