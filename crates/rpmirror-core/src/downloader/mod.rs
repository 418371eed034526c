//! Concurrent batch download engine.
//!
//! One producer thread numbers the jobs and hands them over a zero-capacity
//! channel to a fixed pool of worker threads. Each worker runs a job's
//! fetch, persist and verify stages to completion before taking the next one,
//! then delivers the job to the caller's result channel or, without one,
//! logs failures. Job failures never fail the batch.

mod fetch;
mod producer;
mod worker;

use crate::checksum::{ChecksumVerifier, DigestVerifier};
use crate::config::MirrorConfig;
use crate::job::DownloadJob;
use crate::logging::SeverityLog;
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use worker::Worker;

/// libcurl knobs. Both unset by default: no deadline is applied to a fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurlOptions {
    pub connect_timeout: Option<Duration>,
    pub timeout: Option<Duration>,
}

/// Engine-internal faults. Job failures are reported on the jobs themselves.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to spawn download thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("{0} download worker(s) panicked")]
    WorkerPanicked(usize),
}

/// Batch downloader with a fixed worker count.
#[derive(Clone)]
pub struct Downloader {
    threads: usize,
    verifier: Arc<dyn ChecksumVerifier>,
    log: Arc<dyn SeverityLog>,
    curl: CurlOptions,
}

impl Downloader {
    /// `threads` is clamped to at least one worker.
    pub fn new(threads: usize, log: Arc<dyn SeverityLog>) -> Self {
        Self {
            threads: threads.max(1),
            verifier: Arc::new(DigestVerifier),
            log,
            curl: CurlOptions::default(),
        }
    }

    pub fn from_config(cfg: &MirrorConfig, log: Arc<dyn SeverityLog>) -> Self {
        Self::new(cfg.download_threads, log).with_curl_options(cfg.curl_options())
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn ChecksumVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn with_curl_options(mut self, curl: CurlOptions) -> Self {
        self.curl = curl;
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Downloads `jobs` and blocks until every worker has finished.
    ///
    /// Each job is delivered exactly once to `sink` with its outcome set, in
    /// completion order. Without a sink, failed jobs are logged at ERROR and
    /// successful ones are dropped silently. `sink` is consumed, so the
    /// caller's channel is closed when this returns on any path, including an
    /// empty batch, which starts no threads at all.
    ///
    /// Returns `Ok` regardless of how many jobs failed.
    pub fn download(
        &self,
        jobs: Vec<DownloadJob>,
        sink: Option<Sender<DownloadJob>>,
    ) -> Result<(), EngineError> {
        if jobs.is_empty() {
            return Ok(());
        }
        // TODO: delete partially written files when the process is interrupted.

        let total = jobs.len();
        let (work_tx, work_rx) = crossbeam_channel::bounded::<DownloadJob>(0);

        let producer = thread::Builder::new()
            .name("rpmirror-producer".to_string())
            .spawn(move || producer::produce(jobs, work_tx))
            .map_err(EngineError::Spawn)?;

        let mut spawn_error = None;
        let mut handles = Vec::with_capacity(self.threads);
        for id in 0..self.threads {
            let worker = Worker {
                jobs: work_rx.clone(),
                sink: sink.clone(),
                total,
                verifier: Arc::clone(&self.verifier),
                log: Arc::clone(&self.log),
                curl: self.curl,
            };
            match thread::Builder::new()
                .name(format!("rpmirror-worker-{}", id))
                .spawn(move || worker.run())
            {
                Ok(h) => handles.push(h),
                Err(e) => {
                    // Run the batch on the workers already started.
                    self.log.warn(format_args!("could not start download worker {}: {}", id, e));
                    spawn_error = Some(e);
                    break;
                }
            }
        }
        // Only workers hold these from here on: the work channel disconnects
        // once they all exit, and the sink closes when the last one drops it.
        drop(work_rx);
        drop(sink);

        let mut panicked = 0usize;
        for h in handles {
            if h.join().is_err() {
                panicked += 1;
            }
        }
        if producer.join().is_err() {
            panicked += 1;
        }

        if panicked > 0 {
            self.log.warn(format_args!("{} download thread(s) panicked", panicked));
            return Err(EngineError::WorkerPanicked(panicked));
        }
        if let Some(e) = spawn_error {
            return Err(EngineError::Spawn(e));
        }
        Ok(())
    }
}
