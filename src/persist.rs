//! Disk I/O helpers: hydrate from file and atomic write.
//!
//! The rename-over approach is close to atomic on most platforms. On NTFS
//! (Windows) it's reliable; on FAT32 or network shares there are no hard
//! guarantees.

use crate::error::{Error, Result};
use crate::serializer::JsonSerializer;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;

/// Reads and parses the file at `path`. A missing file is created holding
/// `{}` (parent directories included) and yields an empty map.
pub fn load_or_create(path: &Path, serializer: &JsonSerializer) -> Result<Map<String, Value>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            atomic_write(path, b"{}")?;
            tracing::info!(path = %path.display(), "created empty state file");
            return Ok(Map::new());
        }
        Err(e) => return Err(io_error("read", path, e)),
    };
    let map = serializer
        .deserialize(&bytes)
        .map_err(|e| match e {
            Error::CorruptState(msg) => Error::CorruptState(format!("{}: {msg}", path.display())),
            other => other,
        })?;
    tracing::debug!(path = %path.display(), entries = map.len(), "hydrated store");
    Ok(map)
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`, creating any
/// missing parent directories first. A crash mid-write leaves the old file
/// intact.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error("create directory", parent, e))?;
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let tmp = path.with_extension(format!("{ext}.tmp"));

    let written = write_then_rename(&tmp, path, bytes);
    if written.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    written
}

fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = std::fs::File::create(tmp).map_err(|e| io_error("create", tmp, e))?;
    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .map_err(|e| io_error("write", tmp, e))?;
    drop(file);
    std::fs::rename(tmp, path).map_err(|e| io_error("rename onto", path, e))
}

fn io_error(op: &str, path: &Path, err: std::io::Error) -> Error {
    Error::Io(format!("{op} {}: {err}", path.display()))
}
