use crate::config::{AppConfig, PolicyMode};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Shift every device except the listed ones and fix GPS date/time.
    BulkShift,
    /// Shift only the listed devices.
    TargetedShift,
}

impl From<ModeArg> for PolicyMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::BulkShift => PolicyMode::BulkShift,
            ModeArg::TargetedShift => PolicyMode::TargetedShift,
        }
    }
}

/// Fix capture timestamps of JPEGs taken with a misconfigured camera clock.
#[derive(Debug, Parser)]
#[command(name = "metafix", version)]
pub struct Cli {
    /// Directory containing image files to fix
    #[arg(short = 'd', long)]
    pub src_dir: Option<String>,

    /// Prefix to add to updated/copied files
    #[arg(short = 'p', long = "prefix")]
    pub copy_prefix: Option<String>,

    /// Directory to move replaced originals to, relative to the source directory
    #[arg(short = 'o', long)]
    pub originals_dir: Option<String>,

    #[arg(short = 'm', long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Device as "<make>/<model>"; repeat to list several. Replaces the configured set.
    #[arg(long = "device")]
    pub devices: Vec<String>,

    /// UTC offset in hours of the zone GPS timestamps are written in
    #[arg(long = "utc-offset", allow_hyphen_values = true)]
    pub target_utc_offset_hours: Option<i64>,

    /// Allowed GPS drift in seconds before it is rewritten
    #[arg(long = "tolerance")]
    pub gps_tolerance_seconds: Option<i64>,

    #[arg(short = 'j', long = "workers")]
    pub num_workers: Option<usize>,

    /// Report what would change without touching any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Extra configuration file, layered over config/
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn apply_to(self, config: &mut AppConfig) {
        if let Some(src_dir) = self.src_dir {
            config.src_dir = src_dir;
        }
        if let Some(prefix) = self.copy_prefix {
            config.copy_prefix = prefix;
        }
        if let Some(dir) = self.originals_dir {
            config.originals_dir = dir;
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if !self.devices.is_empty() {
            config.devices = self.devices.into_iter().collect();
        }
        if let Some(offset) = self.target_utc_offset_hours {
            config.target_utc_offset_hours = offset;
        }
        if let Some(tolerance) = self.gps_tolerance_seconds {
            config.gps_tolerance_seconds = tolerance;
        }
        if let Some(workers) = self.num_workers {
            config.num_workers = workers;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
    }
}
