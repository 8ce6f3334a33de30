#![doc(test(attr(deny(warnings))))]

//! Checkout Wizard collects identity, address, and payment details across
//! three validated steps and hands the finished record to a consumer.

pub mod cli;
pub mod config;
pub mod errors;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Checkout wizard tracing initialized.");
    });
}
