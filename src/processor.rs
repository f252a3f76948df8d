use crate::codec;
use crate::config::AppConfig;
use crate::engine;
use crate::error::AppError;
use crate::policy::CorrectionPolicy;
use crate::replace;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum FileOutcome {
    Updated(PathBuf),
    /// Dry run: the file would have been rewritten.
    WouldUpdate,
    Unchanged,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub found: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    fn record(&mut self, path: &Path, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Updated(new_path) => {
                log::info!("Updated {:?} -> {:?}", path, new_path);
                self.updated += 1;
            }
            FileOutcome::WouldUpdate => {
                log::info!("Would update {:?}", path);
                self.updated += 1;
            }
            FileOutcome::Unchanged => {
                log::debug!("No change needed for {:?}", path);
                self.unchanged += 1;
            }
            FileOutcome::Failed(message) => {
                log::warn!("Failed to process image {:?}: {}", path, message);
                self.failed.push((path.to_path_buf(), message));
            }
        }
    }

    pub fn report(&self, dry_run: bool) {
        let verb = if dry_run { "Would update" } else { "Updated" };
        log::info!(
            "{} {} of {} photos ({} unchanged, {} failed)",
            verb,
            self.updated,
            self.found,
            self.unchanged,
            self.failed.len()
        );
        for (path, message) in &self.failed {
            log::warn!("Skipped {:?}: {}", path, message);
        }
    }
}

/// Runs every path through correction and replacement. A failing file is
/// recorded and the batch moves on to the next one.
pub fn start_processing(
    config: &AppConfig,
    policy: &CorrectionPolicy,
    paths: &[PathBuf],
    backup_root: &Path,
) -> BatchSummary {
    log::info!(
        "Processing {} photos with {} workers under {}",
        paths.len(),
        config.num_workers,
        policy.name()
    );
    log::debug!("Originals will be moved to {:?}", backup_root);

    let run = |path: &PathBuf| {
        process_image(config, policy, path, backup_root)
            .unwrap_or_else(|e| FileOutcome::Failed(e.to_string()))
    };

    let outcomes: Vec<FileOutcome> = if config.num_workers > 1 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_workers)
            .build()
        {
            Ok(pool) => pool.install(|| paths.par_iter().map(run).collect()),
            Err(e) => {
                log::warn!("Could not start worker pool ({}), processing sequentially", e);
                paths.iter().map(run).collect()
            }
        }
    } else {
        paths.iter().map(run).collect()
    };

    let mut summary = BatchSummary {
        found: paths.len(),
        ..Default::default()
    };
    for (path, outcome) in paths.iter().zip(outcomes) {
        summary.record(path, outcome);
    }
    summary
}

fn process_image(
    config: &AppConfig,
    policy: &CorrectionPolicy,
    path: &Path,
    backup_root: &Path,
) -> Result<FileOutcome, AppError> {
    log::debug!("Processing image started for: {:?}", path);
    let container = codec::load(path)?;
    let (container, changed) = engine::correct(container, policy)?;
    if !changed {
        return Ok(FileOutcome::Unchanged);
    }
    if config.dry_run {
        return Ok(FileOutcome::WouldUpdate);
    }
    let new_path = replace::replace(path, backup_root, &container, &config.copy_prefix)?;
    Ok(FileOutcome::Updated(new_path))
}
