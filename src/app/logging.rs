use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// File logging under `log_dir`; stdout is left to command output.
/// Keep the guard alive for the life of the process or buffered lines are lost.
pub fn init(log_dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::never(log_dir, "jukebox.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);

    let _ = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,jukebox=debug")))
        .try_init();

    guard
}
