//! Local settings store: an ordered JSON map in memory, mirrored to one file.
//!
//! Open a store, read and write keys, and either call `save()` yourself or turn
//! on autosave so every mutation lands on disk before the call returns.
//!
//! ```rust,no_run
//! use json_settings::SettingsStore;
//!
//! let store = SettingsStore::builder().directory("/tmp/my-app").build().unwrap();
//! store.set("volume", 0.8).unwrap();
//! store.set("recent", vec!["a.txt", "b.txt"]).unwrap();
//! store.save().unwrap();
//! ```
//!
//! Values are anything that serializes to JSON. NaN, infinities and a bare
//! `None` are rejected up front, so whatever you put in comes back unchanged
//! after a reload.
//!
//! **Single-process only.** If multiple processes open the same file they will
//! clobber each other.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod error;
pub mod options;
pub mod persist;
pub mod serializer;
pub mod store;
pub mod value;

pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use options::Options;
pub use store::{SettingsStore, SettingsStoreBuilder, LAST_UPDATE_KEY};

pub use serde_json::{Map, Value};
