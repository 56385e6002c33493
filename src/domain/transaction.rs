//! Income and expense records plus the coercion rules shared by every input path.

use std::fmt;

use chrono::NaiveDate;
use serde::{de::Deserializer, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    currency::DEFAULT_CURRENCY,
    errors::{Result, TrackerError},
    time::Clock,
};

/// Textual layout of `Transaction::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    /// Parses a type label; anything other than `income` is an expense.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => TransactionType::Income,
            _ => TransactionType::Expense,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .map(|v| TransactionType::parse(&v))
            .unwrap_or_default())
    }
}

/// How non-numeric amounts are treated when records enter the system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountPolicy {
    /// Coerce like a leading-number parse; unparseable input becomes `NaN`.
    #[default]
    Lenient,
    /// Reject anything that is not a finite number with a format error.
    Strict,
}

/// A single income or expense record.
///
/// Serializes to the plain field mapping used by storage and JSON export. Reading
/// goes through [`TransactionRecord`] so that defaults and amount coercion apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub payment_method: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub currency: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Transaction {
    pub fn new(
        kind: TransactionType,
        title: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            amount,
            category: category.into(),
            date: date.into(),
            payment_method: String::new(),
            description: String::new(),
            kind,
            currency: default_currency(),
        }
    }

    pub fn income(
        title: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self::new(TransactionType::Income, title, amount, category, date)
    }

    pub fn expense(
        title: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self::new(TransactionType::Expense, title, amount, category, date)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Calendar date of the record, `None` when the text is not a date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Checks the fields a record needs before it is accepted from user input.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(TrackerError::InvalidInput(
                "transaction title must not be empty".into(),
            ));
        }
        if self.parsed_date().is_none() {
            return Err(TrackerError::InvalidInput(format!(
                "`{}` is not a YYYY-MM-DD date",
                self.date
            )));
        }
        Ok(())
    }

    /// Builds a transaction from loosely-typed fields, applying the default-filling rules.
    pub fn from_record(
        record: TransactionRecord,
        policy: AmountPolicy,
        ids: &mut IdGenerator<'_>,
    ) -> Result<Self> {
        let amount = match &record.amount {
            Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
            Some(Value::String(raw)) => parse_amount(raw, policy)?,
            other => match policy {
                AmountPolicy::Lenient => f64::NAN,
                AmountPolicy::Strict => {
                    let shown = other
                        .as_ref()
                        .map(Value::to_string)
                        .unwrap_or_else(|| "<missing>".into());
                    return Err(TrackerError::Format(format!(
                        "amount {} is not a number",
                        shown
                    )));
                }
            },
        };
        let id = text(record.id);
        let kind = text(record.kind);
        let currency = text(record.currency);
        Ok(Self {
            id: if id.is_empty() { ids.next_id() } else { id },
            title: text(record.title),
            amount,
            category: text(record.category),
            date: text(record.date),
            payment_method: text(record.payment_method),
            description: text(record.description),
            kind: TransactionType::parse(&kind),
            currency: if currency.trim().is_empty() {
                default_currency()
            } else {
                currency
            },
        })
    }
}

/// Loosely-typed transaction fields as they arrive from an import file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionRecord {
    pub id: Option<Value>,
    pub title: Option<Value>,
    pub amount: Option<Value>,
    pub category: Option<Value>,
    pub date: Option<Value>,
    pub payment_method: Option<Value>,
    pub description: Option<Value>,
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    pub currency: Option<Value>,
}

impl TransactionRecord {
    /// Record built from positional text fields.
    pub fn from_fields(fields: [&str; 9]) -> Self {
        let [id, kind, title, amount, currency, category, date, payment_method, description] =
            fields.map(|field| Some(Value::String(field.to_string())));
        Self {
            id,
            title,
            amount,
            category,
            date,
            payment_method,
            description,
            kind,
            currency,
        }
    }
}

fn text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Issues timestamp-derived ids that never repeat within one generator.
pub struct IdGenerator<'a> {
    clock: &'a dyn Clock,
    last: i64,
}

impl<'a> IdGenerator<'a> {
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self { clock, last: 0 }
    }

    pub fn next_id(&mut self) -> String {
        let now = self.clock.now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last.to_string()
    }
}

/// Converts amount text under the given policy.
pub fn parse_amount(raw: &str, policy: AmountPolicy) -> Result<f64> {
    match policy {
        AmountPolicy::Lenient => Ok(leading_number(raw).unwrap_or(f64::NAN)),
        AmountPolicy::Strict => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| TrackerError::Format(format!("amount `{}` is not a number", raw))),
    }
}

/// Longest numeric prefix of `raw` after leading whitespace, if any.
fn leading_number(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if text[end..].starts_with("Infinity") {
        return text[..end + "Infinity".len()].parse().ok();
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - end - 1;
        if frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    text[..end].parse().ok()
}

/// Parses `YYYY-MM-DD`, also accepting a trailing time component.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok().or_else(|| {
        let (day, rest) = (raw.get(..10)?, raw.get(10..)?);
        if rest.starts_with(['T', ' ']) {
            NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
        } else {
            None
        }
    })
}
