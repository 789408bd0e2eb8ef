use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// `-v` raises to info, `-vv` or `--debug` to debug.
    pub fn from_verbosity(verbose: u8, debug: bool) -> Self {
        match (verbose, debug) {
            (_, true) | (2.., _) => LogLevel::Debug,
            (1, _) => LogLevel::Info,
            _ => LogLevel::Warn,
        }
    }

    fn directive(self) -> &'static str {
        match self {
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

/// Install a file logger under `log_dir`. The terminal belongs to the UI, so
/// nothing is written to stderr. `PICNAV_LOG` overrides `level`.
///
/// Returns a guard that must be held for the lifetime of the program, or
/// `None` when the log directory cannot be used.
pub fn init(level: LogLevel, log_dir: &Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(log_dir).ok()?;

    let file_appender = tracing_appender::rolling::never(log_dir, "picnav.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_env("PICNAV_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,picnav={}", level.directive())));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .ok()?;

    Some(guard)
}
