use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing with environment-based filtering.
///
/// `RUST_LOG` wins when set; otherwise the --log-level flag applies. Logs
/// go to stderr so they never interleave with result rows on stdout.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
