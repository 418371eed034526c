//! `rpmirror fetch`: download and verify a manifest's files.

use anyhow::{anyhow, Result};
use rpmirror_core::config::MirrorConfig;
use rpmirror_core::logging::{SeverityLog, TracingLog};
use rpmirror_core::{DownloadJob, Downloader};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use crate::cli::manifest;

/// One JSON line per finished file.
#[derive(Debug, Serialize)]
pub(crate) struct JobReport<'a> {
    pub position: usize,
    pub label: &'a str,
    pub url: &'a str,
    pub path: &'a Path,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> From<&'a DownloadJob> for JobReport<'a> {
    fn from(job: &'a DownloadJob) -> Self {
        Self {
            position: job.position,
            label: &job.label,
            url: &job.url,
            path: &job.path,
            ok: job.is_ok(),
            error_kind: job.error_kind().map(|k| k.as_str()),
            error: job.outcome.as_ref().map(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    total: usize,
    failed: usize,
}

pub fn run_fetch(cfg: &MirrorConfig, manifest_path: &Path, json: bool) -> Result<ExitCode> {
    let jobs = manifest::load(manifest_path)?;
    let total = jobs.len();
    let log = Arc::new(TracingLog::new(cfg.debug));
    let downloader = Downloader::from_config(cfg, log.clone());
    tracing::debug!(
        "fetching {} file(s) with {} worker(s)",
        total,
        downloader.threads()
    );

    if !json {
        // Failures are logged by the engine as they happen.
        downloader.download(jobs, None)?;
        log.info(format_args!("Processed {} file(s)", total));
        return Ok(ExitCode::SUCCESS);
    }

    let (tx, rx) = crossbeam_channel::bounded::<DownloadJob>(0);
    let failed = std::thread::scope(|s| -> Result<usize> {
        // Owned here so an early return disconnects the channel and unblocks the workers.
        let rx = rx;
        let engine = s.spawn(|| downloader.download(jobs, Some(tx)));
        let mut failed = 0usize;
        for job in rx.iter() {
            if !job.is_ok() {
                failed += 1;
            }
            println!("{}", serde_json::to_string(&JobReport::from(&job))?);
        }
        engine
            .join()
            .map_err(|_| anyhow!("download engine panicked"))??;
        Ok(failed)
    })?;

    println!("{}", serde_json::to_string(&Summary { total, failed })?);
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
