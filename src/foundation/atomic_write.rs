//! Crash-safe file replacement.
//!
//! Bytes go to a temp file in the destination directory, are synced, and then renamed over the
//! target, so readers only ever observe the old or the new complete file.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Atomically replace `path` with `bytes`, creating parent directories as needed.
pub(crate) fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        // Rename-over-existing can fail on some platforms: move the old file aside first.
        let backup = path.with_extension("bak");
        let _ = std::fs::remove_file(&backup);
        std::fs::rename(path, &backup)?;
        if let Err(retry) = err.file.persist(path) {
            let _ = std::fs::rename(&backup, path);
            return Err(retry.error);
        }
        if let Err(e) = std::fs::remove_file(&backup) {
            warn!(path = %backup.display(), "failed to remove backup after atomic write: {e}");
        }
    }

    #[cfg(unix)]
    if let Err(e) = std::fs::File::open(parent).and_then(|d| d.sync_all()) {
        debug!(path = %parent.display(), "parent directory sync failed (best-effort): {e}");
    }

    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/atomic_write.rs"]
mod tests;
