//! Fixed category lists, chart colours and icons.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;

use super::transaction::TransactionType;

/// Catch-all category present in both lists.
pub const OTHERS: &str = "Others";

pub const EXPENSE_CATEGORIES: [&str; 9] = [
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Bills & Utilities",
    "Healthcare",
    "Entertainment",
    "Travel",
    "Education",
    OTHERS,
];

pub const INCOME_CATEGORIES: [&str; 8] = [
    "Salary",
    "Freelance",
    "Business",
    "Investments",
    "Rental",
    "Gifts",
    "Refunds",
    OTHERS,
];

/// Colour used for any label without an entry in the colour table.
pub const DEFAULT_COLOR: &str = "#999999";

pub const INCOME_LABEL: &str = "Income";
pub const EXPENSES_LABEL: &str = "Expenses";

static COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Food & Dining", "#EF4444"),
        ("Transportation", "#3B82F6"),
        ("Shopping", "#8B5CF6"),
        ("Bills & Utilities", "#F59E0B"),
        ("Healthcare", "#EC4899"),
        ("Entertainment", "#10B981"),
        ("Travel", "#06B6D4"),
        ("Education", "#6366F1"),
        (OTHERS, "#6B7280"),
        (INCOME_LABEL, "#10B981"),
        (EXPENSES_LABEL, "#EF4444"),
    ])
});

static EXPENSE_ICONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Food & Dining", "🍔"),
        ("Transportation", "🚗"),
        ("Shopping", "🛍️"),
        ("Bills & Utilities", "💡"),
        ("Healthcare", "🏥"),
        ("Entertainment", "🎬"),
        ("Travel", "✈️"),
        ("Education", "📚"),
        (OTHERS, "📦"),
    ])
});

static INCOME_ICONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Salary", "💼"),
        ("Freelance", "💻"),
        ("Business", "🏢"),
        ("Investments", "📈"),
        ("Rental", "🏠"),
        ("Gifts", "🎁"),
        ("Refunds", "💰"),
        (OTHERS, "💵"),
    ])
});

const FALLBACK_ICON: &str = "📦";

/// Categories offered for a transaction type.
pub fn categories_for(kind: TransactionType) -> &'static [&'static str] {
    match kind {
        TransactionType::Income => &INCOME_CATEGORIES,
        TransactionType::Expense => &EXPENSE_CATEGORIES,
    }
}

/// Union of both lists, de-duplicated and sorted, as used by category filters.
pub fn all_categories() -> Vec<&'static str> {
    EXPENSE_CATEGORIES
        .iter()
        .chain(INCOME_CATEGORIES.iter())
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn color_for(label: &str) -> &'static str {
    COLORS.get(label).copied().unwrap_or(DEFAULT_COLOR)
}

pub fn icon_for(category: &str, kind: TransactionType) -> &'static str {
    let icons = match kind {
        TransactionType::Income => &INCOME_ICONS,
        TransactionType::Expense => &EXPENSE_ICONS,
    };
    icons.get(category).copied().unwrap_or(FALLBACK_ICON)
}
