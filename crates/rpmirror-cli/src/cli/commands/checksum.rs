//! Checksum command: compute the digest of a file.

use anyhow::Result;
use rpmirror_core::checksum::{self, ChecksumAlgorithm};
use std::path::Path;
use std::process::ExitCode;

/// Compute and print the digest of the given file.
pub fn run_checksum(path: &Path, algorithm: &str) -> Result<ExitCode> {
    let algorithm: ChecksumAlgorithm = algorithm.parse()?;
    let digest = checksum::digest_file(algorithm, path)?;
    println!("{}  {}", digest, path.display());
    Ok(ExitCode::SUCCESS)
}
