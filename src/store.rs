//! Core store type and builder.

use crate::clock::{render_timestamp, Clock, SystemClock};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::persist::{atomic_write, load_or_create};
use crate::serializer::JsonSerializer;
use crate::value::{check_key, to_json};
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Key reserved for the save timestamp. Rejected by `set`, dropped on load,
/// and stripped from the written file whenever `record_last_update` is off.
pub const LAST_UPDATE_KEY: &str = "lastUpdate";

/// Ordered JSON key-value store mirrored to a single file.
///
/// Open one with [`open`](Self::open) or [`builder`](Self::builder). Reads
/// never touch the disk. Writes go to disk on [`save`](Self::save), or right
/// away when [`Options::autosave`] is on.
///
/// Every method takes `&self`, so the store can sit in an `Arc` and be shared
/// between threads. Saves are serialized: two overlapping saves end with the
/// later snapshot on disk, never a torn file.
pub struct SettingsStore {
    entries: RwLock<Map<String, Value>>,
    config: RwLock<Resolved>,
    save_lock: Mutex<()>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone)]
struct Resolved {
    options: Options,
    path: PathBuf,
}

impl Resolved {
    fn new(options: Options) -> Self {
        let path = options.file_path();
        Self { options, path }
    }
}

impl SettingsStore {
    /// Open (or create) the store described by `options`.
    pub fn open(options: Options) -> Result<Self> {
        Self::builder().options(options).build()
    }

    /// Open `<platform data dir>/electron-app/data.json` with default flags.
    pub fn open_default() -> Result<Self> {
        Self::open(Options::default())
    }

    /// Start configuring a new store. Call
    /// [`.build()`](SettingsStoreBuilder::build) when ready.
    pub fn builder() -> SettingsStoreBuilder {
        SettingsStoreBuilder::new()
    }

    // ---- configuration ----

    /// Current options.
    #[must_use]
    pub fn options(&self) -> Options {
        self.config.read().options.clone()
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.config.read().path.clone()
    }

    /// Replace the options. New flags apply from the next save on.
    ///
    /// When the file path changes, the store is hydrated from the new file
    /// (created as `{}` if missing) and the in-memory entries are replaced.
    /// On error the old options and entries stay in place. With an unchanged
    /// path the entries are kept as they are, unsaved changes included.
    pub fn configure(&self, options: Options) -> Result<()> {
        let _guard = self.save_lock.lock();
        let resolved = Resolved::new(options);
        let moved = self.config.read().path != resolved.path;
        let fresh = if moved {
            Some(hydrate(&resolved.path)?)
        } else {
            None
        };

        let mut config = self.config.write();
        if let Some(map) = fresh {
            *self.entries.write() = map;
        }
        tracing::debug!(path = %resolved.path.display(), moved, "store reconfigured");
        *config = resolved;
        Ok(())
    }

    /// Throw away in-memory entries and load them again from
    /// [`file_path`](Self::file_path), creating the file if it's gone.
    pub fn reload(&self) -> Result<()> {
        let path = self.file_path();
        let map = hydrate(&path)?;
        *self.entries.write() = map;
        Ok(())
    }

    // ---- reads ----

    /// `true` if the key is in the store.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Value stored under `key`, or [`Error::NotFound`].
    pub fn get(&self, key: &str) -> Result<Value> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(key.to_string()))
    }

    /// Like [`get`](Self::get) but deserializes into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.get(key)?;
        serde_json::from_value(value).map_err(|e| Error::Deserialize(format!("{key}: {e}")))
    }

    /// Values for every key in `keys` that exists. Missing keys are left out,
    /// not reported.
    #[must_use]
    pub fn get_many<I, K>(&self, keys: I) -> Map<String, Value>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let entries = self.entries.read();
        let mut out = Map::new();
        for key in keys {
            let key = key.as_ref();
            if let Some(v) = entries.get(key) {
                out.insert(key.to_string(), v.clone());
            }
        }
        out
    }

    /// Copy of every entry. Changing it doesn't change the store.
    #[must_use]
    pub fn get_all(&self) -> Map<String, Value> {
        self.entries.read().clone()
    }

    /// All keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// `true` when the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ---- writes ----

    /// Store `value` under `key` and return the whole store afterwards.
    ///
    /// Fails with [`Error::Validation`] for an empty key, the reserved
    /// [`LAST_UPDATE_KEY`], a top-level `None`, or a NaN/infinite number
    /// anywhere in `value`; the store is untouched in that case. With autosave on, a failed save is returned as the error but
    /// the new value stays in memory.
    pub fn set<V>(&self, key: &str, value: V) -> Result<Map<String, Value>>
    where
        V: Serialize,
    {
        check_key(key)?;
        let value = to_json(&value)?;
        self.entries.write().insert(key.to_string(), value);
        self.notify_mutation()?;
        Ok(self.get_all())
    }

    /// Merge many entries at once, overwriting existing keys. Entries with an
    /// empty or reserved key, or an invalid value, are skipped with a warning
    /// instead of failing the batch. Autosaves once at the end.
    pub fn set_many<I, K, V>(&self, entries: I) -> Result<Map<String, Value>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        let mut accepted = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            match check_key(&key).and_then(|()| to_json(&value)) {
                Ok(v) => accepted.push((key, v)),
                Err(e) => tracing::warn!(key = %key, error = %e, "skipping entry"),
            }
        }
        {
            let mut map = self.entries.write();
            for (k, v) in accepted {
                map.insert(k, v);
            }
        }
        self.notify_mutation()?;
        Ok(self.get_all())
    }

    /// Remove `key`, returning whether it was there.
    pub fn unset(&self, key: &str) -> Result<bool> {
        check_key(key)?;
        let removed = self.entries.write().shift_remove(key).is_some();
        self.notify_mutation()?;
        Ok(removed)
    }

    /// Drop all entries and return the (empty) store.
    pub fn clear(&self) -> Result<Map<String, Value>> {
        self.entries.write().clear();
        self.notify_mutation()?;
        Ok(Map::new())
    }

    // ---- persistence ----

    /// Write the current entries to disk (atomic temp-file + rename).
    ///
    /// The file gets a `lastUpdate` timestamp when
    /// [`Options::record_last_update`] is on and never has one otherwise.
    pub fn save(&self) -> Result<()> {
        let _guard = self.save_lock.lock();
        let (path, serializer, stamp) = {
            let cfg = self.config.read();
            (
                cfg.path.clone(),
                JsonSerializer::with_pretty(cfg.options.pretty_print),
                cfg.options.record_last_update,
            )
        };

        let mut snapshot = self.entries.read().clone();
        if stamp {
            let now = render_timestamp(self.clock.now());
            snapshot.insert(LAST_UPDATE_KEY.to_string(), Value::String(now));
        } else {
            snapshot.shift_remove(LAST_UPDATE_KEY);
        }

        let bytes = serializer.serialize(&snapshot)?;
        atomic_write(&path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "saved store");
        Ok(())
    }

    // ---- internal ----

    fn notify_mutation(&self) -> Result<()> {
        let autosave = self.config.read().options.autosave;
        if autosave {
            self.save()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cfg = self.config.read();
        f.debug_struct("SettingsStore")
            .field("path", &cfg.path)
            .field("options", &cfg.options)
            .field("len", &self.entries.read().len())
            .finish_non_exhaustive()
    }
}

fn hydrate(path: &Path) -> Result<Map<String, Value>> {
    let mut map = load_or_create(path, &JsonSerializer::new())?;
    map.shift_remove(LAST_UPDATE_KEY);
    Ok(map)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`SettingsStore`].
///
/// ```rust,no_run
/// use json_settings::SettingsStore;
///
/// let store = SettingsStore::builder()
///     .directory("/tmp/my-app")
///     .filename("prefs")
///     .pretty_print(true)
///     .autosave(true)
///     .build()
///     .unwrap();
/// store.set("theme", "dark").unwrap();
/// ```
pub struct SettingsStoreBuilder {
    options: Options,
    clock: Arc<dyn Clock>,
}

impl SettingsStoreBuilder {
    fn new() -> Self {
        Self {
            options: Options::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace every option at once.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// File name (default `data`). `.json` is appended if missing.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.options.filename = filename.into();
        self
    }

    /// Directory for the file (default: platform data dir + `electron-app`).
    pub fn directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.options.directory = directory.as_ref().to_path_buf();
        self
    }

    /// Save after every mutation (default: off).
    pub fn autosave(mut self, yes: bool) -> Self {
        self.options.autosave = yes;
        self
    }

    /// Write human-readable JSON with indentation (default: compact).
    pub fn pretty_print(mut self, yes: bool) -> Self {
        self.options.pretty_print = yes;
        self
    }

    /// Stamp `lastUpdate` into the file on each save (default: off).
    pub fn record_last_update(mut self, yes: bool) -> Self {
        self.options.record_last_update = yes;
        self
    }

    /// Time source for `lastUpdate` (default: [`SystemClock`]).
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Load (or create) the file and return the store.
    pub fn build(self) -> Result<SettingsStore> {
        let resolved = Resolved::new(self.options);
        let map = hydrate(&resolved.path)?;

        Ok(SettingsStore {
            entries: RwLock::new(map),
            config: RwLock::new(resolved),
            save_lock: Mutex::new(()),
            clock: self.clock,
        })
    }
}

impl std::fmt::Debug for SettingsStoreBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStoreBuilder")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
