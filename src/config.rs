use crate::policy::{
    CorrectionPolicy, DEFAULT_GPS_TOLERANCE_SECONDS, DEFAULT_TARGET_UTC_OFFSET_HOURS,
};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    BulkShift,
    TargetedShift,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub src_dir: String,
    pub copy_prefix: String,
    /// Relative to `src_dir`.
    pub originals_dir: String,
    pub allowed_extensions: HashSet<String>,
    pub mode: PolicyMode,
    /// Excluded devices under `bulk_shift`, included ones under `targeted_shift`.
    pub devices: HashSet<String>,
    pub target_utc_offset_hours: i64,
    pub gps_tolerance_seconds: i64,
    pub num_workers: usize,
    pub dry_run: bool,
    pub log_level: String,
}

impl AppConfig {
    /// Layers built-in defaults, `config/*` files, an optional extra file
    /// and `METAFIX_*` environment variables, later sources winning.
    pub fn load(extra_file: Option<&Path>) -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .set_default("src_dir", ".")?
            .set_default("copy_prefix", "metafix_")?
            .set_default("originals_dir", "originals")?
            .set_default("allowed_extensions", vec!["jpg", "jpeg"])?
            .set_default("mode", "bulk_shift")?
            .set_default("devices", vec!["SONY/ILCE-7M3"])?
            .set_default("target_utc_offset_hours", DEFAULT_TARGET_UTC_OFFSET_HOURS)?
            .set_default("gps_tolerance_seconds", DEFAULT_GPS_TOLERANCE_SECONDS)?
            .set_default("num_workers", 1i64)?
            .set_default("dry_run", false)?
            .set_default("log_level", "info")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false));
        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(Environment::with_prefix("METAFIX").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn policy(&self) -> CorrectionPolicy {
        match self.mode {
            PolicyMode::BulkShift => CorrectionPolicy::bulk_shift(
                self.devices.iter().cloned(),
                self.target_utc_offset_hours,
                self.gps_tolerance_seconds,
            ),
            PolicyMode::TargetedShift => {
                CorrectionPolicy::targeted_shift(self.devices.iter().cloned())
            }
        }
    }

    /// `<src_dir>/<originals_dir>/<started_at>`, shared by every file of a run.
    pub fn backup_root(&self, started_at: i64) -> PathBuf {
        Path::new(&self.src_dir)
            .join(&self.originals_dir)
            .join(started_at.to_string())
    }
}
