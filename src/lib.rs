#![doc(test(attr(deny(warnings))))]

//! Yakstra Core holds the transaction model, import/export codecs, monthly
//! aggregation, chart geometry and persistence behind a personal income and
//! expense tracker.

pub mod chart;
pub mod codec;
pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod report;
pub mod stats;
pub mod storage;
pub mod time;
pub mod tracker;
pub mod utils;

pub use errors::{Result, TrackerError};
pub use tracker::Tracker;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Yakstra Core tracing initialized.");
    });
}
