//! Download manifest: the list of files to fetch, as TOML.
//!
//! ```toml
//! [[job]]
//! url = "https://mirror.example/os/Packages/bash-5.1-1.x86_64.rpm"
//! path = "Packages/bash-5.1-1.x86_64.rpm"
//! size = 1843200
//! checksum = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
//! checksum_type = "sha256"
//! ```
//!
//! `label` defaults to the last URL path segment. Relative `path`s are
//! resolved against the manifest's directory. With a top-level `base_url`,
//! an entry's `url` may be a repository-relative location instead:
//!
//! ```toml
//! base_url = "https://mirror.example/os/"
//!
//! [[job]]
//! url = "Packages/bash-5.1-1.x86_64.rpm"
//! path = "Packages/bash-5.1-1.x86_64.rpm"
//! checksum = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
//! checksum_type = "sha256"
//! ```

use anyhow::{bail, Context, Result};
use rpmirror_core::url_model::url_join;
use rpmirror_core::DownloadJob;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default, rename = "job")]
    jobs: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    #[serde(default)]
    label: Option<String>,
    url: String,
    #[serde(default)]
    size: u64,
    path: PathBuf,
    checksum: String,
    checksum_type: String,
}

/// Last non-empty path segment of `url`, if any.
fn filename_from_url_path(url: &url::Url) -> Option<String> {
    let segment = url.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Absolute URLs are kept; anything else is joined onto `base_url` when one is set.
fn resolve_url(raw: &str, base_url: Option<&str>) -> String {
    match base_url {
        Some(base) if url::Url::parse(raw).is_err() => url_join(&[base, raw]),
        _ => raw.to_string(),
    }
}

fn into_job(entry: ManifestEntry, base_url: Option<&str>, base_dir: &Path) -> Result<DownloadJob> {
    let full = resolve_url(&entry.url, base_url);
    let parsed = url::Url::parse(&full).with_context(|| format!("invalid url {:?}", full))?;
    if !parsed.has_host() {
        bail!("url {:?} has no host", full);
    }
    let label = match entry.label {
        Some(l) => l,
        None => filename_from_url_path(&parsed).unwrap_or_else(|| full.clone()),
    };
    let path = if entry.path.is_absolute() {
        entry.path
    } else {
        base_dir.join(entry.path)
    };
    Ok(DownloadJob::new(label, full, path)
        .with_size(entry.size)
        .with_checksum(entry.checksum, entry.checksum_type))
}

/// Parses manifest text. Relative destination paths are joined onto `base_dir`.
pub fn parse(text: &str, base_dir: &Path) -> Result<Vec<DownloadJob>> {
    let manifest: Manifest = toml::from_str(text)?;
    let base_url = manifest.base_url.as_deref();
    manifest
        .jobs
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            into_job(entry, base_url, base_dir).with_context(|| format!("job #{}", i + 1))
        })
        .collect()
}

pub fn load(path: &Path) -> Result<Vec<DownloadJob>> {
    let text = fs::read_to_string(path).with_context(|| format!("read manifest {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse(&text, base_dir).with_context(|| format!("parse manifest {}", path.display()))
}
