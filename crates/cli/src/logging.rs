//! Diagnostic logging to stderr

use eyre::WrapErr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// Output goes to stderr so the wrapper never writes into the program's
/// stdout before the exec.
pub fn init(filter: &str) -> eyre::Result<()> {
    let filter =
        EnvFilter::try_new(filter).wrap_err_with(|| format!("invalid log filter '{filter}'"))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .wrap_err("failed to install log subscriber")
}
