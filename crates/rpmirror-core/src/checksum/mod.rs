//! Checksum verification of downloaded files.
//!
//! Digests are computed on demand after the transfer completes, reading the
//! file in chunks so memory use stays bounded for large packages.

mod error;

pub use error::VerifyError;

use sha2::Digest;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const BUF_SIZE: usize = 64 * 1024;

/// Verifies a file on disk against an expected digest.
///
/// Implementations must report a wrong digest as [`VerifyError::Mismatch`] so
/// callers can tell corrupted content apart from an environment problem.
pub trait ChecksumVerifier: Send + Sync {
    fn verify(&self, path: &Path, expected: &str, algorithm: &str) -> Result<(), VerifyError>;
}

/// Digest algorithms understood by [`DigestVerifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl FromStr for ChecksumAlgorithm {
    type Err = VerifyError;

    /// Accepts bare identifiers as found in repository metadata; `sha` is SHA-1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha" | "sha1" => Ok(ChecksumAlgorithm::Sha1),
            "sha224" => Ok(ChecksumAlgorithm::Sha224),
            "sha256" => Ok(ChecksumAlgorithm::Sha256),
            "sha384" => Ok(ChecksumAlgorithm::Sha384),
            "sha512" => Ok(ChecksumAlgorithm::Sha512),
            _ => Err(VerifyError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChecksumAlgorithm::Sha1 => "sha1",
            ChecksumAlgorithm::Sha224 => "sha224",
            ChecksumAlgorithm::Sha256 => "sha256",
            ChecksumAlgorithm::Sha384 => "sha384",
            ChecksumAlgorithm::Sha512 => "sha512",
        };
        f.write_str(name)
    }
}

fn hash_reader<D: Digest, R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Digest everything `reader` yields and return it as lowercase hex.
pub fn digest_reader<R: Read>(algorithm: ChecksumAlgorithm, reader: R) -> std::io::Result<String> {
    match algorithm {
        ChecksumAlgorithm::Sha1 => hash_reader::<sha1::Sha1, _>(reader),
        ChecksumAlgorithm::Sha224 => hash_reader::<sha2::Sha224, _>(reader),
        ChecksumAlgorithm::Sha256 => hash_reader::<sha2::Sha256, _>(reader),
        ChecksumAlgorithm::Sha384 => hash_reader::<sha2::Sha384, _>(reader),
        ChecksumAlgorithm::Sha512 => hash_reader::<sha2::Sha512, _>(reader),
    }
}

/// Digest a file and return it as lowercase hex.
pub fn digest_file(algorithm: ChecksumAlgorithm, path: &Path) -> Result<String, VerifyError> {
    let io_err = |source| VerifyError::Io {
        path: path.to_path_buf(),
        source,
    };
    let f = File::open(path).map_err(io_err)?;
    digest_reader(algorithm, f).map_err(io_err)
}

/// Default verifier backed by the SHA family digests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestVerifier;

impl ChecksumVerifier for DigestVerifier {
    fn verify(&self, path: &Path, expected: &str, algorithm: &str) -> Result<(), VerifyError> {
        let algorithm: ChecksumAlgorithm = algorithm.parse()?;
        let actual = digest_file(algorithm, path)?;
        let expected = expected.trim().to_ascii_lowercase();
        if actual != expected {
            return Err(VerifyError::Mismatch { expected, actual });
        }
        Ok(())
    }
}
