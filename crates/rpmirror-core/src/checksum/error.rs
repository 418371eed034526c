//! Checksum verification error type.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Digest computed fine but differs from the expected value.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },
    /// Algorithm identifier not recognized.
    #[error("unsupported checksum algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// File could not be opened or read.
    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
