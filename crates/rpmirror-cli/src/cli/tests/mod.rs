//! CLI parse and startup tests.

use super::{load_config, Cli, CliCommand};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}


#[test]
fn config_creation_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rpmirror").join("config.toml");

    let (cfg, created) = load_config(&path).unwrap();
    assert!(created);
    assert_eq!(cfg.download_threads, 4);

    let (_, created) = load_config(&path).unwrap();
    assert!(!created);
}
