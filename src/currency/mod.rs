//! Currency catalog and amount formatting.

use serde::{Deserialize, Serialize};

/// Code used whenever a record or setting carries no currency.
pub const DEFAULT_CURRENCY: &str = "USD";

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Catalog entry for this code, when it is one of the known currencies.
    pub fn info(&self) -> Option<&'static CurrencyInfo> {
        lookup(self.as_str())
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

/// Display metadata for a supported currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

impl CurrencyInfo {
    /// Label used by currency pickers, e.g. `$ USD - US Dollar`.
    pub fn selector_label(&self) -> String {
        format!("{} {} - {}", self.symbol, self.code, self.name)
    }
}

const fn entry(code: &'static str, symbol: &'static str, name: &'static str) -> CurrencyInfo {
    CurrencyInfo { code, symbol, name }
}

/// Supported currencies in presentation order.
pub const CURRENCIES: [CurrencyInfo; 16] = [
    entry("USD", "$", "US Dollar"),
    entry("CAD", "CA$", "Canadian Dollar"),
    entry("EUR", "€", "Euro"),
    entry("GBP", "£", "British Pound"),
    entry("INR", "₹", "Indian Rupee"),
    entry("JPY", "¥", "Japanese Yen"),
    entry("AUD", "A$", "Australian Dollar"),
    entry("CNY", "¥", "Chinese Yuan"),
    entry("KWD", "KD", "Kuwaiti Dinar"),
    entry("BHD", "BD", "Bahraini Dinar"),
    entry("AED", "AED", "UAE Dirham"),
    entry("SAR", "SAR", "Saudi Riyal"),
    entry("CHF", "CHF", "Swiss Franc"),
    entry("SGD", "S$", "Singapore Dollar"),
    entry("MXN", "MX$", "Mexican Peso"),
    entry("BRL", "R$", "Brazilian Real"),
];

pub fn all_currencies() -> &'static [CurrencyInfo] {
    &CURRENCIES
}

pub fn lookup(code: &str) -> Option<&'static CurrencyInfo> {
    CURRENCIES
        .iter()
        .find(|info| info.code.eq_ignore_ascii_case(code.trim()))
}

pub fn is_supported(code: &str) -> bool {
    lookup(code).is_some()
}

/// Number of fractional digits shown for a currency.
pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Formats `value` with `precision` decimals and comma thousands grouping.
///
/// Rounds half away from zero on the shortest decimal form of `value`, so
/// `0.125` becomes `0.13` and `1.005` becomes `1.01`.
pub fn format_number(value: f64, precision: u8) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let precision = usize::from(precision);
    let digits = round_half_up(&value.abs().to_string(), precision);
    let (int_part, frac_part) = digits.split_at(digits.len() - precision);
    let sign = if value < 0.0 && digits.bytes().any(|d| d != b'0') {
        "-"
    } else {
        ""
    };
    let grouped = group_digits(int_part);
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

// Digits of a plain non-negative decimal rounded to `precision` places, without the point.
fn round_half_up(plain: &str, precision: usize) -> String {
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain, ""));
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(precision))
        .collect();
    if frac_part.as_bytes().get(precision).is_some_and(|d| *d >= b'5') {
        let mut idx = digits.len();
        loop {
            if idx == 0 {
                digits.insert(0, b'1');
                break;
            }
            idx -= 1;
            if digits[idx] == b'9' {
                digits[idx] = b'0';
            } else {
                digits[idx] += 1;
                break;
            }
        }
    }
    digits.into_iter().map(char::from).collect()
}

fn group_digits(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped)
}

/// Renders an amount the way a US-English currency formatter would.
///
/// Known codes use their catalog symbol (`$1,234.50`, `-€12.00`); symbols and
/// unknown codes ending in a letter are followed by a space (`CHF 12.00`,
/// `XYZ 1,234.50`). Non-finite amounts are rendered verbatim (`$NaN`).
pub fn format_currency(amount: f64, code: &str) -> String {
    let code = code.trim().to_uppercase();
    let symbol = lookup(&code).map_or(code.as_str(), |info| info.symbol);
    let prefix = if symbol.ends_with(|c: char| c.is_alphabetic()) {
        format!("{} ", symbol)
    } else {
        symbol.to_string()
    };
    if amount.is_nan() {
        return format!("{}NaN", prefix);
    }
    if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        return format!("{}{}∞", sign, prefix);
    }
    let body = format_number(amount, minor_units_for(&code));
    match body.strip_prefix('-') {
        Some(magnitude) => format!("-{}{}", prefix, magnitude),
        None => format!("{}{}", prefix, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_sixteen_unique_codes() {
        let mut codes: Vec<_> = CURRENCIES.iter().map(|info| info.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 16);
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(-1000.0, 2), "-1,000.00");
    }

    #[test]
    fn formats_known_and_unknown_codes() {
        assert_eq!(format_currency(4879.5, "USD"), "$4,879.50");
        assert_eq!(format_currency(-12.0, "EUR"), "-€12.00");
        assert_eq!(format_currency(1500.0, "JPY"), "¥1,500");
        assert_eq!(format_currency(1.5, "KWD"), "KD 1.500");
        assert_eq!(format_currency(-12.0, "CHF"), "-CHF 12.00");
        assert_eq!(format_currency(7.0, "CAD"), "CA$7.00");
        assert_eq!(format_currency(10.0, "xyz"), "XYZ 10.00");
    }

    #[test]
    fn ties_round_away_from_zero() {
        assert_eq!(format_currency(1500.5, "JPY"), "¥1,501");
        assert_eq!(format_currency(0.125, "USD"), "$0.13");
        assert_eq!(format_currency(1.005, "USD"), "$1.01");
        assert_eq!(format_currency(-2.5, "JPY"), "-¥3");
        assert_eq!(format_currency(999.995, "EUR"), "€1,000.00");
        assert_eq!(format_currency(-0.001, "USD"), "$0.00");
        assert_eq!(format_number(0.0005, 3), "0.001");
    }

    #[test]
    fn nan_is_rendered_verbatim() {
        assert_eq!(format_currency(f64::NAN, "USD"), "$NaN");
    }
}
