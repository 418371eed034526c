use rpmirror_core::logging::{Severity, SeverityLog};
use std::sync::Mutex;

/// Captures engine log lines for assertions.
#[derive(Default)]
pub struct RecordingLog {
    pub debug: bool,
    lines: Mutex<Vec<(Severity, String)>>,
}

impl RecordingLog {
    pub fn with_debug() -> Self {
        Self {
            debug: true,
            ..Self::default()
        }
    }

    pub fn lines_at(&self, severity: Severity) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap().len()
    }
}

impl SeverityLog for RecordingLog {
    fn log(&self, severity: Severity, message: &str) {
        self.lines.lock().unwrap().push((severity, message.to_string()));
    }

    fn debug_enabled(&self) -> bool {
        self.debug
    }
}
