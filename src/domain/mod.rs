//! Transaction records and the fixed category lists.

pub mod category;
pub mod transaction;

pub use category::{
    all_categories, categories_for, color_for, icon_for, EXPENSE_CATEGORIES, INCOME_CATEGORIES,
};
pub use transaction::{
    parse_amount, parse_date, AmountPolicy, IdGenerator, Transaction, TransactionRecord,
    TransactionType,
};
