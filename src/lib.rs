#![doc(test(attr(deny(warnings))))]

//! Agfin Core holds the filtering, aggregation and status rules behind an
//! agricultural-finance dashboard: transactions, dealer summaries, column
//! footers and tranche terms, plus the URL parameter layer that drives them.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod query;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Agfin Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
