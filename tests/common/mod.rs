//! Shared helpers for the integration tests.
#![allow(dead_code)]

use muvera::VectorSet;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Install a subscriber for the current test thread only.
///
/// Respects `RUST_LOG`; defaults to `info`. Output goes through the test
/// harness, so it is only shown for failing tests (or with `--nocapture`).
pub fn init_test_subscriber() -> tracing::subscriber::DefaultGuard {
    let fmt_layer = fmt::layer().with_target(true).with_test_writer();

    let filter_layer = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .set_default()
}

/// Build a set from literal rows.
pub fn set(dimension: usize, rows: &[&[f32]]) -> VectorSet {
    VectorSet::from_rows(dimension, rows).expect("rows match dimension")
}

/// Project ids out of scored results.
pub fn ids(results: &[(u32, f32)]) -> Vec<u32> {
    results.iter().map(|&(id, _)| id).collect()
}
