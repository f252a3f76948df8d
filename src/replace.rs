use crate::codec;
use crate::container::MetadataContainer;
use crate::error::AppError;
use sha2::{Digest, Sha256};
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Moves `source` into `backup_root` and writes a corrected copy next to
/// where it was. Returns the path of the corrected copy.
///
/// The corrected bytes are built before anything moves, so a file that
/// cannot be re-encoded stays where it was. The backup is complete before
/// the copy is written.
pub fn replace(
    source: &Path,
    backup_root: &Path,
    container: &MetadataContainer,
    copy_prefix: &str,
) -> Result<PathBuf, AppError> {
    let source = fs::canonicalize(source)?;
    let file_name = source
        .file_name()
        .map(OsStr::to_os_string)
        .ok_or_else(|| invalid_input(format!("no file name in {:?}", source)))?;
    let directory = source
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| invalid_input(format!("no parent directory for {:?}", source)))?;

    let tiff = codec::serialize(container)?;
    let corrected = codec::splice(fs::read(&source)?, &tiff)?;

    fs::create_dir_all(backup_root)?;
    let backup_path = fs::canonicalize(backup_root)?.join(&file_name);
    if backup_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("backup {:?} already exists", backup_path),
        )
        .into());
    }

    move_file(&source, &backup_path)?;
    log::debug!("Moved original {:?} to {:?}", source, backup_path);

    let output = directory.join(output_file_name(&file_name, copy_prefix));
    if let Err(e) = fs::write(&output, corrected) {
        if let Err(cleanup) = fs::remove_file(&output) {
            log::warn!("Could not remove partial copy {:?}: {}", output, cleanup);
        }
        return Err(e.into());
    }
    log::debug!("Wrote corrected copy to {:?}", output);

    Ok(output)
}

/// `copy_prefix + file_name`, unless the name already carries the prefix.
pub fn output_file_name(file_name: &OsStr, copy_prefix: &str) -> OsString {
    if file_name.to_string_lossy().starts_with(copy_prefix) {
        return file_name.to_os_string();
    }
    let mut name = OsString::from(copy_prefix);
    name.push(file_name);
    name
}

/// Rename, falling back to copy + verify + delete when the rename fails
/// (e.g. across filesystems).
fn move_file(from: &Path, to: &Path) -> Result<(), AppError> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) => {
            log::debug!("Rename {:?} -> {:?} failed ({}), copying instead", from, to, e);
            copy_verify_remove(from, to)
        }
    }
}

fn copy_verify_remove(from: &Path, to: &Path) -> Result<(), AppError> {
    fs::copy(from, to)?;
    remove_source_if_verified(from, to)
}

/// Deletes `from` once `to` holds the same bytes. On a mismatch `to` is
/// deleted instead and `from` is left alone.
fn remove_source_if_verified(from: &Path, to: &Path) -> Result<(), AppError> {
    if file_digest(from)? != file_digest(to)? {
        fs::remove_file(to)?;
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("copy of {:?} does not match the original", from),
        )
        .into());
    }
    fs::remove_file(from)?;
    Ok(())
}

fn file_digest(path: &Path) -> Result<String, AppError> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192];
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

fn invalid_input(message: String) -> AppError {
    io::Error::new(io::ErrorKind::InvalidInput, message).into()
}
