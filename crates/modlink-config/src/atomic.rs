//! Crash-safe atomic writes for the durable configuration store.
//!
//! Write to a temp file, verify its hash, then rename over the target —
//! the store is never observed half-written (`spec.md` §5: resources
//! that must be released on every exit path include, on write, the
//! temporary file used during assembly).

use crate::error::{ConfigError, Result};
use crate::hash;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Atomically replace `target`'s contents with `bytes`.
///
/// Acquires an exclusive lock on a sibling `.lck` file for the duration
/// of the write (so concurrent writers serialize instead of racing),
/// writes to a `.tmp` sibling, verifies the temp file's hash matches what
/// was written, then renames it over `target`.
pub fn write_atomically(target: &Path, bytes: &[u8]) -> Result<()> {
    let lock_path = sibling(target, "lck");
    let temp_path = sibling(target, "tmp");

    debug!(target = %target.display(), "writing configuration store");

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
    }

    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|e| ConfigError::io(&lock_path, e))?;
    lock_file
        .lock_exclusive()
        .map_err(|_| ConfigError::LockUnavailable(lock_path.clone()))?;

    let result = (|| -> Result<()> {
        let expected = hash::hash_bytes(bytes);

        {
            let mut temp_file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| ConfigError::io(&temp_path, e))?;
            temp_file
                .write_all(bytes)
                .map_err(|e| ConfigError::io(&temp_path, e))?;
            temp_file
                .sync_all()
                .map_err(|e| ConfigError::io(&temp_path, e))?;
        }

        let actual = hash::hash_file(&temp_path).map_err(|e| ConfigError::io(&temp_path, e))?;
        if actual != expected {
            let _ = fs::remove_file(&temp_path);
            return Err(ConfigError::IntegrityMismatch {
                expected: hash::to_hex(&expected),
                actual: hash::to_hex(&actual),
            });
        }
        trace!("temp file integrity verified");

        fs::rename(&temp_path, target).map_err(|e| ConfigError::io(target, e))?;

        #[cfg(unix)]
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        debug!(target = %target.display(), "configuration store written");
        Ok(())
    })();

    if temp_path.exists() {
        warn!(temp = %temp_path.display(), "cleaning up orphaned temp file");
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn sibling(target: &Path, suffix: &str) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push('.');
    name.push_str(suffix);
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("config");
        write_atomically(&target, b"hello").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"hello");
        assert!(!sibling(&target, "tmp").exists());
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("config");
        write_atomically(&target, b"first").unwrap();
        write_atomically(&target, b"second").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"second");
    }
}
