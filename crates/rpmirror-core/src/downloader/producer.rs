//! Job producer: numbers jobs in input order and feeds the worker pool.

use crate::job::DownloadJob;
use crossbeam_channel::Sender;

/// Sends every job with its 1-based `position`, then drops `tx` to signal
/// end of work. Stops early if every worker is gone.
pub(super) fn produce(jobs: Vec<DownloadJob>, tx: Sender<DownloadJob>) {
    for (i, mut job) in jobs.into_iter().enumerate() {
        job.position = i + 1;
        job.outcome = None;
        if tx.send(job).is_err() {
            break;
        }
    }
}
