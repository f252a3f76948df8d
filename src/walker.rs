use crate::error::AppError;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

lazy_static! {
    static ref FIRST_NUMBER: Regex = Regex::new(r"\d+").unwrap();
}

/// Lists image files directly inside `dir`. Subdirectories, including the
/// backup tree, are not entered.
pub fn collect_image_paths(
    dir: &Path,
    allowed_extensions: &HashSet<String>,
) -> Result<Vec<PathBuf>, AppError> {
    let dir = std::fs::canonicalize(dir)?;
    log::info!("Starting file discovery in {:?}", dir);
    log::debug!("Configured allowed extensions: {:?}", allowed_extensions);

    let mut paths = Vec::new();
    for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() {
            let path = entry.path();
            log::trace!("Discovered file: {:?}", path);
            if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
                if allowed_extensions.contains(&ext.to_lowercase()) {
                    paths.push(path.to_path_buf());
                } else {
                    log::trace!("Skipping file due to unsupported extension: {:?}", path);
                }
            } else {
                log::trace!("Skipping file with no extension: {:?}", path);
            }
        } else {
            log::trace!("Skipping non-file entry: {:?}", entry.path());
        }
    }

    log::info!("File discovery complete.");
    Ok(paths)
}

fn first_number(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    FIRST_NUMBER.find(name)?.as_str().parse().ok()
}

/// Orders files by the first number in their name (`IMG_9` before
/// `IMG_10`). Files without one go last; ties fall back to the name.
pub fn sort_by_numeric_suffix(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|p| {
        let rank = first_number(p).map_or((1, 0), |n| (0, n));
        (rank, p.file_name().map(|n| n.to_os_string()))
    });
}
