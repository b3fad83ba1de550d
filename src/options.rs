//! Store configuration and file path resolution.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Filename used when none is configured.
pub const DEFAULT_FILENAME: &str = "data";

/// Folder created under the platform data directory by default.
pub const DEFAULT_APP_DIR: &str = "electron-app";

/// How a [`SettingsStore`](crate::SettingsStore) finds its file and when it
/// writes to it.
///
/// Deserializes from camelCase JSON (`prettyPrint`, `recordLastUpdate`, ...)
/// and fills any missing field from [`Options::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// File name, with or without the `.json` extension.
    pub filename: String,
    /// Directory holding the file. Created on first write if missing.
    pub directory: PathBuf,
    /// Save after every mutating call.
    pub autosave: bool,
    /// Two-space indented output instead of compact JSON.
    pub pretty_print: bool,
    /// Stamp a `lastUpdate` field into the file on each save.
    pub record_last_update: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
            directory: default_directory(),
            autosave: false,
            pretty_print: false,
            record_last_update: false,
        }
    }
}

impl Options {
    /// Options pointing at `directory`, defaults for everything else.
    pub fn in_dir(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// `directory/filename.json`.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(ensure_json_extension(&self.filename))
    }
}

/// `<platform data dir>/electron-app`, or a relative `electron-app` when the
/// platform has no home directory (some sandboxes and CI containers).
pub fn default_directory() -> PathBuf {
    match directories::BaseDirs::new() {
        Some(dirs) => dirs.data_dir().join(DEFAULT_APP_DIR),
        None => PathBuf::from(DEFAULT_APP_DIR),
    }
}

/// Append `.json` unless `filename` already ends with it. Case-sensitive:
/// `data.JSON` becomes `data.JSON.json`.
pub fn ensure_json_extension(filename: &str) -> String {
    if filename.ends_with(".json") {
        filename.to_string()
    } else {
        format!("{filename}.json")
    }
}
