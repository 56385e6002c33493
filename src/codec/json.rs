//! JSON arrays of plain transaction mappings.

use serde_json::Value;

use crate::{
    domain::{AmountPolicy, IdGenerator, Transaction, TransactionRecord},
    errors::{Result, TrackerError},
    time::{Clock, SystemClock},
};

/// Pretty-prints the transactions as a JSON array.
pub fn encode(transactions: &[Transaction]) -> Result<String> {
    Ok(serde_json::to_string_pretty(transactions)?)
}

pub fn decode(text: &str, policy: AmountPolicy) -> Result<Vec<Transaction>> {
    let clock = SystemClock;
    decode_with_clock(text, policy, &clock)
}

/// Parses a JSON array; every element becomes one transaction with defaults filled in.
pub fn decode_with_clock(
    text: &str,
    policy: AmountPolicy,
    clock: &dyn Clock,
) -> Result<Vec<Transaction>> {
    let root: Value = serde_json::from_str(text)
        .map_err(|err| TrackerError::Format(format!("Invalid JSON: {}", err)))?;
    let Value::Array(items) = root else {
        return Err(TrackerError::Format("Invalid JSON format".into()));
    };

    let mut ids = IdGenerator::new(clock);
    items
        .into_iter()
        .map(|item| {
            let record: TransactionRecord = serde_json::from_value(item).unwrap_or_default();
            Transaction::from_record(record, policy, &mut ids)
        })
        .collect()
}
