//! Snapshot read/write helpers for JSON backing files.

use super::{StorageError, StorageResult};
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Reads and decodes one backing file.
///
/// Returns `T::default()` when the file does not exist yet.
///
/// # Errors
/// - `StorageError::Io` when the file exists but cannot be read, including
///   read failures surfaced while decoding.
/// - `StorageError::Json` when the content does not decode as `T`.
pub fn read_json_or_default<T>(path: &Path) -> StorageResult<T>
where
    T: DeserializeOwned + Default,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(
                "event=file_read module=storage status=missing path={}",
                path.display()
            );
            return Ok(T::default());
        }
        Err(err) => {
            error!(
                "event=file_read module=storage status=error path={} error={}",
                path.display(),
                err
            );
            return Err(io_error(path, err));
        }
    };

    serde_json::from_reader(BufReader::new(file)).map_err(|err| {
        if err.is_io() {
            error!(
                "event=file_read module=storage status=error path={} error={}",
                path.display(),
                err
            );
            return io_error(path, err.into());
        }
        error!(
            "event=file_read module=storage status=error path={} error_code=json_decode_failed error={}",
            path.display(),
            err
        );
        StorageError::Json {
            path: path.to_path_buf(),
            source: err,
        }
    })
}

/// Serializes `value` and atomically replaces the file at `path`.
///
/// The temp file is synced before the rename. On unix the parent directory
/// is synced after it, so `Ok` means the new content is durable.
///
/// # Side effects
/// - Creates the parent directory when missing.
/// - Leaves the previous file content untouched when the failure happens
///   before the rename.
///
/// # Errors
/// - `StorageError::Json` when `value` cannot be serialized.
/// - `StorageError::Io` for write, sync or rename failures; a failed
///   directory sync is reported against the parent path.
pub fn write_json_atomic<T>(path: &Path, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
{
    let started_at = Instant::now();
    let tmp_path = temp_path_for(path);

    let result = write_then_rename(path, &tmp_path, value);
    match &result {
        Ok(()) => debug!(
            "event=file_write module=storage status=ok path={} duration_ms={}",
            path.display(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => {
            let _ = fs::remove_file(&tmp_path);
            error!(
                "event=file_write module=storage status=error path={} duration_ms={} error={}",
                path.display(),
                started_at.elapsed().as_millis(),
                err
            );
        }
    }
    result
}

fn write_then_rename<T>(path: &Path, tmp_path: &Path, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| io_error(parent, err))?;
    }

    let file = File::create(tmp_path).map_err(|err| io_error(tmp_path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|err| StorageError::Json {
        path: path.to_path_buf(),
        source: err,
    })?;
    writer.flush().map_err(|err| io_error(tmp_path, err))?;
    let file = writer
        .into_inner()
        .map_err(|err| io_error(tmp_path, err.into_error()))?;
    file.sync_all().map_err(|err| io_error(tmp_path, err))?;

    fs::rename(tmp_path, path).map_err(|err| io_error(path, err))?;
    sync_parent_dir(path)
}

/// Flushes the directory entry so a completed rename survives a crash.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> StorageResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = File::open(parent).map_err(|err| io_error(parent, err))?;
    dir.sync_all().map_err(|err| io_error(parent, err))
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> StorageResult<()> {
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}
