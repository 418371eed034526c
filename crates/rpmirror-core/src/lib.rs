pub mod config;
pub mod logging;

pub mod checksum;
pub mod downloader;
pub mod job;
pub mod size;
pub mod url_model;

pub use downloader::{CurlOptions, Downloader, EngineError};
pub use job::{DownloadJob, ErrorKind, JobError};
