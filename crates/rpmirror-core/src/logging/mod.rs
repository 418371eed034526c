//! Logging init: console routing by severity, or a log file with timestamps.
//!
//! The process-wide subscriber is installed once here. Engine code never
//! touches it directly; it logs through a [`SeverityLog`] handed to it.

mod severity;

pub use severity::{Severity, SeverityLog, TracingLog};

use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{Level, Metadata, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::{MakeWriter, MakeWriterExt};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("open log file {}: {source}", .path.display())]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("subscriber init failed: {0}")]
    SubscriberInit(#[from] tracing_subscriber::util::TryInitError),
}

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Emit DEBUG lines (progress per job).
    pub debug: bool,
    /// Append everything here instead of the console.
    pub log_file: Option<PathBuf>,
}

/// Keeps the log file writer alive. Dropping it flushes pending lines and closes the file.
#[must_use = "dropping the guard closes the log file"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

fn default_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("info,rpmirror=debug,rpmirror_core=debug")
        } else {
            EnvFilter::new("info")
        }
    })
}

fn is_info(meta: &Metadata<'_>) -> bool {
    *meta.level() == Level::INFO
}

/// Console output: INFO to `out`, every other level to `err`, no timestamps.
fn console_layer<S, O, E>(out: O, err: E) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    O: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    E: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(out.with_filter(is_info).or_else(err))
        .with_ansi(false)
        .with_target(false)
        .without_time()
}

/// File output: every level, timestamp first.
fn file_layer<S, W>(writer: W) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
}

/// Install the global subscriber.
///
/// Without a log file: INFO goes to stdout, every other level to stderr, no
/// timestamps. With a log file: all levels are appended to it with a
/// timestamp prefix. Failing to open the file is returned to the caller, which
/// is expected to treat it as fatal.
pub fn init_logging(opts: &LogOptions) -> Result<LoggingGuard, LogError> {
    let filter = default_filter(opts.debug);

    match &opts.log_file {
        Some(path) => {
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LogError::OpenLogFile {
                    path: path.clone(),
                    source,
                })?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer(writer))
                .try_init()?;
            tracing::debug!("logging to {}", path.display());
            Ok(LoggingGuard { _file: Some(guard) })
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer(io::stdout, io::stderr))
                .try_init()?;
            Ok(LoggingGuard { _file: None })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn emit_each_level() {
        tracing::error!("disk full");
        tracing::warn!("mirror slow");
        tracing::info!("synced 3 packages");
        tracing::debug!("[ 1 / 3 ] Downloading a.rpm (48K)...");
    }

    #[test]
    fn console_routes_info_to_stdout_and_rest_to_stderr() {
        let out = Buffer::default();
        let err = Buffer::default();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("debug"))
            .with(console_layer(out.clone(), err.clone()));
        tracing::subscriber::with_default(subscriber, emit_each_level);

        let out = out.lines();
        assert_eq!(out.len(), 1, "{:?}", out);
        assert!(out[0].trim_start().starts_with("INFO"), "{:?}", out);
        assert!(out[0].ends_with("synced 3 packages"));

        let err = err.lines();
        assert_eq!(err.len(), 3, "{:?}", err);
        assert!(err[0].trim_start().starts_with("ERROR") && err[0].ends_with("disk full"));
        assert!(err[1].trim_start().starts_with("WARN") && err[1].ends_with("mirror slow"));
        assert!(err[2].trim_start().starts_with("DEBUG") && err[2].contains("[ 1 / 3 ]"));
    }

    #[test]
    fn file_lines_carry_timestamp_at_every_level() {
        let file = Buffer::default();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("debug"))
            .with(file_layer(file.clone()));
        tracing::subscriber::with_default(subscriber, emit_each_level);

        let lines = file.lines();
        assert_eq!(lines.len(), 4, "{:?}", lines);
        for line in &lines {
            // RFC 3339, e.g. `2024-05-01T12:00:00.000000Z  INFO ...`
            let stamp = line.split_whitespace().next().unwrap();
            assert!(stamp.starts_with(|c: char| c.is_ascii_digit()), "{}", line);
            assert!(stamp.contains('T'), "{}", line);
        }
        assert!(lines[2].ends_with("synced 3 packages"));
    }

    #[test]
    fn unopenable_log_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let opts = LogOptions {
            debug: false,
            log_file: Some(dir.path().join("missing-dir").join("rpmirror.log")),
        };
        match init_logging(&opts) {
            Err(LogError::OpenLogFile { path, .. }) => {
                assert!(path.ends_with("missing-dir/rpmirror.log"));
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected open failure"),
        }
    }
}
