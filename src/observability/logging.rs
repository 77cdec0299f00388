use crate::common::constants::ENV_LOG_DIR;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes console logging, plus a JSON log file when `SWIMMEET_LOG_DIR` is set.
///
/// Console output goes to stderr so stdout stays free for plan reports and
/// summaries. The returned guard must be held until exit so the file writer
/// flushes.
pub fn init_logging(verbose: bool) -> Option<WorkerGuard> {
    // Respect RUST_LOG if set; otherwise pick a level from the verbose flag
    let default_directive = if verbose {
        "swimmeet_scraper=debug,info"
    } else {
        "info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let console_layer = fmt::layer()
        .with_target(verbose)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match std::env::var(ENV_LOG_DIR) {
        Ok(dir) if !dir.trim().is_empty() => {
            let _ = fs::create_dir_all(&dir);
            // Daily rotation, JSON lines
            let file_appender = tracing_appender::rolling::daily(&dir, "swimmeet_scraper.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        _ => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    guard
}
