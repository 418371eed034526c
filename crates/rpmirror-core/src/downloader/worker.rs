//! Worker loop: run each job's stages, then deliver it.

use crate::checksum::ChecksumVerifier;
use crate::job::{DownloadJob, JobError};
use crate::logging::SeverityLog;
use crate::size::format_size;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;

use super::fetch;
use super::CurlOptions;

pub(super) struct Worker {
    pub(super) jobs: Receiver<DownloadJob>,
    pub(super) sink: Option<Sender<DownloadJob>>,
    pub(super) total: usize,
    pub(super) verifier: Arc<dyn ChecksumVerifier>,
    pub(super) log: Arc<dyn SeverityLog>,
    pub(super) curl: CurlOptions,
}

impl Worker {
    /// Processes jobs until the producer closes the work channel.
    pub(super) fn run(self) {
        for mut job in self.jobs.iter() {
            self.log.debug(format_args!(
                "[ {} / {} ] Downloading {} ({})...",
                job.position,
                self.total,
                job.label,
                format_size(job.size)
            ));
            job.outcome = self.process(&job).err();
            self.deliver(job);
        }
    }

    /// Fetch and persist, then verify. Stops at the first failing stage.
    fn process(&self, job: &DownloadJob) -> Result<(), JobError> {
        let written = fetch::fetch_to_file(&job.url, &job.path, &self.curl)?;
        tracing::trace!(label = %job.label, bytes = written, "transfer complete");
        self.verifier
            .verify(&job.path, &job.checksum, &job.checksum_type)?;
        Ok(())
    }

    fn deliver(&self, job: DownloadJob) {
        let job = match &self.sink {
            // Blocks until the caller takes it; a slow consumer throttles the pool.
            Some(sink) => match sink.send(job) {
                Ok(()) => return,
                Err(returned) => returned.into_inner(),
            },
            None => job,
        };
        if let Some(err) = &job.outcome {
            self.log
                .error_with(err, format_args!("Error downloading {}", job.label));
        }
    }
}
