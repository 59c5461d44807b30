//! Tracing setup for unit and integration tests.
//!
//! Call `init_test_setup` from a `ctor` hook or at the top of a fixture. Only
//! the first call installs a subscriber; `RUST_LOG` overrides the default
//! `flattree=trace` filter.

use std::env;
use std::sync::Once;

use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

const DEFAULT_FILTER: &str = "flattree=trace";

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        install_subscriber();
        info!("test logging ready");
    });
}

fn install_subscriber() {
    // another harness may already own the global dispatcher
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let filter = env::var("RUST_LOG")
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter);

    if let Err(e) = tracing_subscriber::registry().with(layer).try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }
}
