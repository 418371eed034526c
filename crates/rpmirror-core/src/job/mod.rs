//! Download job model: one file to fetch, persist, and verify.

mod error;

pub use error::{ErrorKind, JobError};

use std::path::PathBuf;

/// One unit of work for the download engine.
///
/// The caller fills in the source, destination and checksum. `position` and
/// `outcome` are owned by the engine: the producer assigns the 1-based
/// position, and the worker that processed the job sets the outcome once
/// before handing it to the result sink.
#[derive(Debug)]
pub struct DownloadJob {
    /// Human-readable name, used only in progress and log lines.
    pub label: String,
    /// Absolute URL to fetch.
    pub url: String,
    /// Advisory size in bytes. Shown in progress output, never checked against the transfer.
    pub size: u64,
    /// Local file to create or truncate.
    pub path: PathBuf,
    /// Expected digest, hex encoded.
    pub checksum: String,
    /// Digest algorithm name (e.g. `sha256`).
    pub checksum_type: String,
    /// 1-based ordinal within the batch. Progress labeling only; delivery order is not tied to it.
    pub position: usize,
    /// `None` on success, otherwise the first stage failure.
    pub outcome: Option<JobError>,
}

impl DownloadJob {
    pub fn new(label: impl Into<String>, url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            size: 0,
            path: path.into(),
            checksum: String::new(),
            checksum_type: String::new(),
            position: 0,
            outcome: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>, checksum_type: impl Into<String>) -> Self {
        self.checksum = checksum.into();
        self.checksum_type = checksum_type.into();
        self
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_none()
    }

    /// Kind of the recorded failure, if any.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.outcome.as_ref().map(JobError::kind)
    }
}
