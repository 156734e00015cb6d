use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_ENV: &str = "BOOKLOOP_LOG";

/// Route `tracing` events to stderr so they never mix with command output.
///
/// `BOOKLOOP_LOG` takes an `EnvFilter` directive; without it only warnings are shown,
/// or everything from this crate down to debug with `--verbose`.
pub fn init(verbose: bool) {
    let fallback = if verbose { "bookloop=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .try_init();
}
