//! Quoted CSV with a fixed nine-column layout.
//!
//! Cells are wrapped in double quotes on the way out and the quotes are
//! dropped on the way in. Embedded quotes are neither escaped nor unescaped.

use tracing::debug;

use crate::{
    domain::{AmountPolicy, IdGenerator, Transaction, TransactionRecord},
    errors::{Result, TrackerError},
    time::{Clock, SystemClock},
};

pub const HEADERS: [&str; 9] = [
    "ID",
    "Type",
    "Title",
    "Amount",
    "Currency",
    "Category",
    "Date",
    "Payment Method",
    "Description",
];

/// Renders the header line followed by one fully-quoted row per transaction.
pub fn encode(transactions: &[Transaction]) -> String {
    let mut out = HEADERS.join(",");
    out.push('\n');
    for txn in transactions {
        let amount = amount_text(txn.amount);
        let cells = [
            txn.id.as_str(),
            txn.kind.as_str(),
            txn.title.as_str(),
            amount.as_str(),
            txn.currency.as_str(),
            txn.category.as_str(),
            txn.date.as_str(),
            txn.payment_method.as_str(),
            txn.description.as_str(),
        ];
        let row: Vec<String> = cells.iter().map(|cell| format!("\"{}\"", cell)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

// Infinite amounts are written as `Infinity` so the lenient parser reads them back.
fn amount_text(amount: f64) -> String {
    if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{}Infinity", sign)
    } else {
        amount.to_string()
    }
}

/// Parses CSV text, generating ids from the system clock.
pub fn decode(text: &str, policy: AmountPolicy) -> Result<Vec<Transaction>> {
    let clock = SystemClock;
    decode_with_clock(text, policy, &clock)
}

/// Parses CSV text. The first non-blank line is the header and is skipped.
/// Data rows with fewer than nine fields are dropped.
pub fn decode_with_clock(
    text: &str,
    policy: AmountPolicy,
    clock: &dyn Clock,
) -> Result<Vec<Transaction>> {
    let lines: Vec<&str> = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.len() < 2 {
        return Err(TrackerError::Format("CSV file is empty".into()));
    }

    let mut ids = IdGenerator::new(clock);
    let mut transactions = Vec::with_capacity(lines.len() - 1);
    for (idx, line) in lines.iter().enumerate().skip(1) {
        let values = split_line(line);
        let Some(fields) = values.get(..HEADERS.len()) else {
            debug!(line = idx + 1, fields = values.len(), "dropping short CSV row");
            continue;
        };
        let fields: [&str; 9] = std::array::from_fn(|i| fields[i].as_str());
        let record = TransactionRecord::from_fields(fields);
        transactions.push(Transaction::from_record(record, policy, &mut ids)?);
    }
    Ok(transactions)
}

/// Splits one line on commas outside double quotes, trimming every field.
pub fn split_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                values.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    values.push(current.trim().to_string());
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionType;

    #[test]
    fn splitter_keeps_quoted_commas() {
        assert_eq!(
            split_line(r#""1", "Rent, March" ,plain"#),
            vec!["1", "Rent, March", "plain"]
        );
        assert_eq!(split_line(""), vec![""]);
        assert_eq!(split_line("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn encode_quotes_every_cell() {
        let txn = Transaction::income("Salary", 5000.0, "Salary", "2024-01-15")
            .with_id("1")
            .with_payment_method("Bank Transfer");
        let text = encode(&[txn]);
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("ID,Type,Title,Amount,Currency,Category,Date,Payment Method,Description")
        );
        assert_eq!(
            lines.next(),
            Some(r#""1","income","Salary","5000","USD","Salary","2024-01-15","Bank Transfer","""#)
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_type_and_currency_take_defaults() {
        let text = "ID,Type,Title,Amount,Currency,Category,Date,Payment Method,Description\n\
                    \"7\",\"\",\"Coffee\",\"3.5\",\"\",\"Food & Dining\",\"2024-01-03\",\"Cash\",\"\"\n";
        let decoded = decode(text, AmountPolicy::Lenient).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].kind, TransactionType::Expense);
        assert_eq!(decoded[0].currency, "USD");
        assert_eq!(decoded[0].amount, 3.5);
    }

    #[test]
    fn carriage_returns_are_trimmed() {
        let text = "ID,Type,Title,Amount,Currency,Category,Date,Payment Method,Description\r\n\
                    1,income,Gift,20,EUR,Gifts,2024-02-01,Cash,birthday\r\n";
        let decoded = decode(text, AmountPolicy::Lenient).unwrap();
        assert_eq!(decoded[0].description, "birthday");
        assert_eq!(decoded[0].currency, "EUR");
    }

    #[test]
    fn strict_policy_rejects_the_whole_file() {
        let text = "header\n1,expense,Lunch,twelve,USD,Food & Dining,2024-01-03,Cash,\n";
        assert!(decode(text, AmountPolicy::Lenient).unwrap()[0].amount.is_nan());
        assert!(matches!(
            decode(text, AmountPolicy::Strict),
            Err(TrackerError::Format(_))
        ));
    }
}
