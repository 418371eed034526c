//! CLI for the rpmirror download engine.

mod commands;
mod manifest;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rpmirror_core::config::{self, MirrorConfig};
use rpmirror_core::logging::{self, LogOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use commands::{run_checksum, run_fetch};

/// Top-level CLI for rpmirror.
#[derive(Debug, Parser)]
#[command(name = "rpmirror")]
#[command(about = "rpmirror: concurrent package downloader with checksum verification", long_about = None)]
pub struct Cli {
    /// Append log output to this file instead of the console.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print per-file progress lines.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download and verify every file listed in a manifest.
    Fetch {
        /// TOML manifest with one [[job]] table per file.
        manifest: PathBuf,

        /// Number of concurrent downloads (overrides config).
        #[arg(long, value_name = "N")]
        threads: Option<usize>,

        /// Print each finished file as a JSON line, then a summary line.
        #[arg(long)]
        json: bool,
    },

    /// Compute the digest of a local file.
    Checksum {
        /// Path to the file.
        path: PathBuf,

        /// Digest algorithm (sha1, sha224, sha256, sha384, sha512).
        #[arg(long, default_value = "sha256")]
        algorithm: String,
    },
}

/// Loads (or creates) the config file. The flag says whether it was created,
/// so the caller can report it once logging is up.
fn load_config(path: &Path) -> Result<(MirrorConfig, bool)> {
    let created = !path.exists();
    let cfg = config::load_or_init_at(path)?;
    Ok((cfg, created))
}

impl Cli {
    pub fn run_from_args() -> Result<ExitCode> {
        let cli = Cli::parse();
        let cfg_path = config::config_path()?;
        let (mut cfg, created) = load_config(&cfg_path)?;
        if cli.log_file.is_some() {
            cfg.log_file = cli.log_file.clone();
        }
        cfg.debug |= cli.debug;

        // Kept alive until dispatch returns so the log file is flushed and closed on exit.
        let _log_guard = logging::init_logging(&LogOptions {
            debug: cfg.debug,
            log_file: cfg.log_file.clone(),
        })
        .context("failed to initialize logging")?;
        if created {
            tracing::info!("created default config at {}", cfg_path.display());
        }
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                manifest,
                threads,
                json,
            } => {
                if let Some(n) = threads {
                    cfg.download_threads = n;
                }
                run_fetch(&cfg, &manifest, json)
            }
            CliCommand::Checksum { path, algorithm } => run_checksum(&path, &algorithm),
        }
    }
}

#[cfg(test)]
mod tests;
