use clap::Parser;
use flattree::cli::output;
use flattree::cli::{execute_command, Cli};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if let Err(e) = execute_command(&cli) {
        tracing::debug!(error = ?e, "command failed");
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

/// `-d` count to log level; anything past three stays at trace.
fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn setup_logging(verbosity: u8) {
    let filter = level_for(verbosity);
    if verbosity > 3 {
        eprintln!("Don't be crazy, max is -d -d -d");
    }

    // settings loading is chatty at debug level
    let quiet_targets = ["config"];
    let target_filter = filter_fn(move |metadata| {
        !quiet_targets
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter)
        .with_filter(target_filter);

    tracing_subscriber::registry().with(fmt_layer).init();

    if filter > LevelFilter::WARN {
        tracing::info!(%filter, "debug logging enabled");
    }
}
