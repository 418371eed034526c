//! CLI command handlers, one per file.

mod checksum;
mod fetch;

pub use checksum::run_checksum;
pub use fetch::run_fetch;
