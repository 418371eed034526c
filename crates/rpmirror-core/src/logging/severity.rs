//! Severity-routed logging capability passed into the engine.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warn,
    Info,
    Debug,
}

/// Sink for engine log lines.
///
/// `log` receives every line that passes the debug gate; the provided
/// helpers only format. DEBUG lines are dropped before formatting when
/// `debug_enabled` is false.
pub trait SeverityLog: Send + Sync {
    fn log(&self, severity: Severity, message: &str);

    fn debug_enabled(&self) -> bool;

    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, &args.to_string());
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Warn, &args.to_string());
    }

    /// Logs `"<message>: <cause>"` at ERROR.
    fn error_with(&self, cause: &dyn std::error::Error, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, &format!("{}: {}", args, cause));
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        if self.debug_enabled() {
            self.log(Severity::Debug, &args.to_string());
        }
    }
}

/// Forwards to `tracing`; where lines end up is decided by the subscriber
/// installed in [`super::init_logging`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog {
    debug: bool,
}

impl TracingLog {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl SeverityLog for TracingLog {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => tracing::error!("{}", message),
            Severity::Warn => tracing::warn!("{}", message),
            Severity::Info => tracing::info!("{}", message),
            Severity::Debug => {
                if self.debug {
                    tracing::debug!("{}", message);
                }
            }
        }
    }

    fn debug_enabled(&self) -> bool {
        self.debug
    }
}
