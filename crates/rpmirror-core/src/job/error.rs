//! Per-job error taxonomy.

use crate::checksum::VerifyError;
use std::path::PathBuf;

/// Failure of one stage of a job's fetch, persist and verify pipeline.
/// A job carries at most one of these: the first stage that fails.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// Could not reach the source (DNS, connect, TLS, timeout) before a response status arrived.
    #[error("transport: {0}")]
    Transport(#[source] curl::Error),
    /// The server answered with something other than 200.
    #[error("bad status: {status}")]
    HttpStatus { code: u32, status: String },
    /// Creating the destination file or streaming the body into it failed.
    #[error("local I/O on {}: {source}", .path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The written file's digest differs from the expected one.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
    /// The digest could not be computed or compared at all.
    #[error("checksum validation error: {0}")]
    ChecksumCompute(#[source] VerifyError),
}

/// Fieldless mirror of [`JobError`] for branching and comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    Transport,
    HttpStatus,
    LocalIo,
    ChecksumMismatch,
    ChecksumCompute,
}

impl JobError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JobError::Transport(_) => ErrorKind::Transport,
            JobError::HttpStatus { .. } => ErrorKind::HttpStatus,
            JobError::LocalIo { .. } => ErrorKind::LocalIo,
            JobError::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
            JobError::ChecksumCompute(_) => ErrorKind::ChecksumCompute,
        }
    }

    pub(crate) fn local_io(path: &std::path::Path, source: std::io::Error) -> Self {
        JobError::LocalIo {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<VerifyError> for JobError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::Mismatch { expected, actual } => {
                JobError::ChecksumMismatch { expected, actual }
            }
            other => JobError::ChecksumCompute(other),
        }
    }
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::HttpStatus => "http_status",
            ErrorKind::LocalIo => "local_io",
            ErrorKind::ChecksumMismatch => "checksum_mismatch",
            ErrorKind::ChecksumCompute => "checksum_compute",
        }
    }
}
