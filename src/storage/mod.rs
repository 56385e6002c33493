//! Key-value persistence for the transaction collection and the currency setting.

pub mod json_backend;
pub mod memory;

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    codec,
    currency::DEFAULT_CURRENCY,
    domain::{AmountPolicy, Transaction},
    errors::Result,
};

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;

/// Key holding the full collection as JSON text.
pub const TRANSACTIONS_KEY: &str = "yakstra_transactions";
/// Key holding the selected 3-letter currency code.
pub const CURRENCY_KEY: &str = "yakstra_currency";

/// Synchronous string store. Each call either succeeds or fails as a whole.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Reads the stored collection, falling back to an empty list on any failure.
pub fn load_transactions(store: &dyn KeyValueStore) -> Vec<Transaction> {
    let raw = match store.get(TRANSACTIONS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(error = %err, "could not read stored transactions; starting empty");
            return Vec::new();
        }
    };
    match codec::json::decode(&raw, AmountPolicy::Lenient) {
        Ok(transactions) => transactions,
        Err(err) => {
            warn!(error = %err, "stored transactions are unreadable; starting empty");
            Vec::new()
        }
    }
}

/// Rewrites the whole collection.
pub fn save_transactions(store: &dyn KeyValueStore, transactions: &[Transaction]) -> Result<()> {
    let json = serde_json::to_string(transactions)?;
    store.set(TRANSACTIONS_KEY, &json)?;
    info!(count = transactions.len(), "transactions saved");
    Ok(())
}

pub fn clear_transactions(store: &dyn KeyValueStore) -> Result<()> {
    store.remove(TRANSACTIONS_KEY)
}

/// Reads the currency setting, `USD` when unset or unreadable.
pub fn load_currency(store: &dyn KeyValueStore) -> String {
    load_currency_or(store, DEFAULT_CURRENCY)
}

pub fn load_currency_or(store: &dyn KeyValueStore, fallback: &str) -> String {
    match store.get(CURRENCY_KEY) {
        Ok(Some(code)) if !code.trim().is_empty() => code,
        Ok(_) => fallback.to_string(),
        Err(err) => {
            warn!(error = %err, "could not read stored currency; using default");
            fallback.to_string()
        }
    }
}

pub fn save_currency(store: &dyn KeyValueStore, code: &str) -> Result<()> {
    store.set(CURRENCY_KEY, code)
}
