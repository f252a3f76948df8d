mod cli;
mod codec;
mod config;
mod container;
mod engine;
mod error;
mod policy;
mod processor;
mod replace;
mod timestamp;
mod walker;

#[cfg(test)]
mod test_support;

use crate::cli::Cli;
use crate::config::AppConfig;
use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);

    // Initialize env_logger based on config.log_level
    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    info!("Starting metafix");

    let policy = config.policy();
    let started_at = chrono::Utc::now().timestamp();
    let backup_root = config.backup_root(started_at);

    let mut paths =
        walker::collect_image_paths(Path::new(&config.src_dir), &config.allowed_extensions)?;
    walker::sort_by_numeric_suffix(&mut paths);
    info!("Found {} photos in '{}'", paths.len(), config.src_dir);

    let summary = processor::start_processing(&config, &policy, &paths, &backup_root);
    summary.report(config.dry_run);

    if !summary.failed.is_empty() {
        bail!(
            "{} of {} photos could not be processed",
            summary.failed.len(),
            summary.found
        );
    }

    info!("metafix finished");
    Ok(())
}
