//! Filesystem helpers for replacing the store file atomically.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Write `data` to `destination` through a sibling temp file.
///
/// The temp file is fsynced before it is renamed over the destination, so a
/// crash leaves either the old store or the new one on disk, never a torn file.
pub fn write_atomic(destination: &Path, data: &[u8]) -> io::Result<()> {
    let temp_path = temp_sibling(destination)?;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)?;
    if let Err(err) = file.write_all(data).and_then(|_| file.sync_all()) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    drop(file);

    rename_with_fallback(&temp_path, destination)
}

/// Rename `temp_path` over `destination`.
///
/// Some platforms refuse to rename onto an existing file; in that case the
/// destination is removed and the rename retried once. The temp file is
/// removed if both attempts fail.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

fn temp_sibling(destination: &Path) -> io::Result<PathBuf> {
    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let filename = destination
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid store filename"))?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?
        .as_nanos();
    Ok(parent.join(format!(".{}.{}.tmp", filename, nanos)))
}
