use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{codec::DEFAULT_EXPORT_PREFIX, currency::DEFAULT_CURRENCY, domain::AmountPolicy};

const DEFAULT_DIR_NAME: &str = "yakstra";
const HOME_ENV: &str = "YAKSTRA_HOME";

/// Returns the application data directory: `$YAKSTRA_HOME`, else the platform
/// data directory joined with `yakstra`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// User preferences. Missing fields fall back to their defaults when loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency: String,
    pub amount_policy: AmountPolicy,
    pub export_prefix: String,
    pub recent_limit: usize,
    pub top_categories_limit: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the transaction store. Defaults to the config directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.into(),
            amount_policy: AmountPolicy::default(),
            export_prefix: DEFAULT_EXPORT_PREFIX.into(),
            recent_limit: 5,
            top_categories_limit: 5,
            data_dir: None,
        }
    }
}
