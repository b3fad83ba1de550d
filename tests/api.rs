use json_settings::{Error, Options, SettingsStore};
use serde::Deserialize;
use serde_json::json;
use tempfile::TempDir;

fn open(dir: &TempDir) -> SettingsStore {
    SettingsStore::open(Options::in_dir(dir.path())).unwrap()
}

// ---- has / get --------------------------------------------------------------

#[test]
fn set_then_has_and_get() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.set("test", "test_value").unwrap();

    assert!(db.has("test"));
    assert_eq!(db.get("test").unwrap(), json!("test_value"));
}

#[test]
fn get_missing_key_is_not_found() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    assert!(!db.has("nope"));
    assert_eq!(db.get("nope"), Err(Error::NotFound("nope".into())));
}

#[test]
fn every_json_kind_is_stored() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.set("test-string", "test").unwrap();
    db.set("test-object", json!({"test": "test"})).unwrap();
    db.set("test-array", vec!["test"]).unwrap();
    db.set("test-number", 0).unwrap();
    db.set("test-true", true).unwrap();
    db.set("test-false", false).unwrap();
    let all = db.set("test-null", json!(null)).unwrap();

    assert_eq!(
        serde_json::Value::Object(all),
        json!({
            "test-string": "test",
            "test-object": {"test": "test"},
            "test-array": ["test"],
            "test-number": 0,
            "test-true": true,
            "test-false": false,
            "test-null": null
        })
    );
    assert_eq!(db.get("test-null").unwrap(), json!(null));
}

#[test]
fn get_as_deserializes() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Window {
        width: u32,
        height: u32,
    }

    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.set("window", json!({"width": 800, "height": 600})).unwrap();

    let w: Window = db.get_as("window").unwrap();
    assert_eq!(w, Window { width: 800, height: 600 });

    let err = db.get_as::<Vec<String>>("window").unwrap_err();
    assert!(matches!(err, Error::Deserialize(_)));
    assert!(matches!(db.get_as::<u32>("nope"), Err(Error::NotFound(_))));
}

// ---- get_many / get_all / keys ----------------------------------------------

#[test]
fn get_many_omits_missing_keys() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.set("a", 1).unwrap();
    db.set("b", 2).unwrap();

    let got = db.get_many(["a", "c"]);
    assert_eq!(serde_json::Value::Object(got), json!({"a": 1}));
    assert!(db.get_many(Vec::<String>::new()).is_empty());
}

#[test]
fn get_all_is_a_detached_copy() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.set("a", 1).unwrap();

    let mut all = db.get_all();
    all.insert("b".into(), json!(2));
    all.remove("a");

    assert!(db.has("a"));
    assert!(!db.has("b"));
}

#[test]
fn keys_keep_insertion_order() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    for k in ["zeta", "alpha", "mid", "beta"] {
        db.set(k, k).unwrap();
    }
    db.unset("alpha").unwrap();
    db.set("zeta", "again").unwrap();

    assert_eq!(db.keys(), vec!["zeta", "mid", "beta"]);
    assert_eq!(db.len(), 3);
}

// ---- set_many ---------------------------------------------------------------

#[test]
fn set_many_merges_and_overwrites() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.set("a", 1).unwrap();

    let all = db
        .set_many(vec![("a", json!(99)), ("set", json!("many")), ("at", json!(["once"]))])
        .unwrap();
    assert_eq!(
        serde_json::Value::Object(all),
        json!({"a": 99, "set": "many", "at": ["once"]})
    );
}

#[test]
fn set_many_skips_invalid_entries() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);

    let all = db
        .set_many(vec![
            ("ok", Some(1.5)),
            ("nan", Some(f64::NAN)),
            ("missing", None),
            ("", Some(2.0)),
            ("lastUpdate", Some(3.0)),
        ])
        .unwrap();
    assert_eq!(serde_json::Value::Object(all), json!({"ok": 1.5}));
    assert_eq!(db.keys(), vec!["ok"]);
}

// ---- unset / clear ----------------------------------------------------------

#[test]
fn unset_reports_removal() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.set("test", "v").unwrap();

    assert!(db.unset("test").unwrap());
    assert!(!db.unset("test").unwrap());
    assert!(!db.has("test"));
}

#[test]
fn unset_empty_key_fails() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    assert!(matches!(db.unset(""), Err(Error::Validation(_))));
}

#[test]
fn clear_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.set("a", 1).unwrap();
    db.set("b", 2).unwrap();

    assert!(db.clear().unwrap().is_empty());
    assert!(db.get_all().is_empty());
    assert!(db.clear().unwrap().is_empty());
    assert!(db.is_empty());
}

// ---- options ----------------------------------------------------------------

#[test]
fn options_reflect_builder() {
    let dir = TempDir::new().unwrap();
    let db = SettingsStore::builder()
        .directory(dir.path())
        .filename("prefs")
        .pretty_print(true)
        .build()
        .unwrap();

    let o = db.options();
    assert_eq!(o.filename, "prefs");
    assert_eq!(o.directory, dir.path());
    assert!(o.pretty_print);
    assert!(!o.autosave);
    assert!(!o.record_last_update);
    assert_eq!(db.file_path(), dir.path().join("prefs.json"));
}

#[test]
fn configure_same_path_keeps_unsaved_entries() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.set("kept", true).unwrap();

    let mut o = db.options();
    o.pretty_print = true;
    db.configure(o).unwrap();

    assert!(db.has("kept"));
    assert!(db.options().pretty_print);
}

#[test]
fn configure_new_path_creates_and_loads_it() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.set("old", true).unwrap();

    let mut o = db.options();
    o.filename = "other".into();
    db.configure(o).unwrap();

    assert_eq!(db.file_path(), dir.path().join("other.json"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("other.json")).unwrap(),
        "{}"
    );
    assert!(db.is_empty());
}

#[test]
fn configure_onto_existing_file_keeps_its_contents() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("other.json"), r#"{"keep":"me"}"#).unwrap();
    let db = open(&dir);
    db.set("a", 1).unwrap();

    let mut o = db.options();
    o.filename = "other".into();
    db.configure(o).unwrap();
    assert_eq!(db.get("keep").unwrap(), json!("me"));
    assert!(!db.has("a"));

    db.save().unwrap();
    let raw = std::fs::read_to_string(dir.path().join("other.json")).unwrap();
    assert_eq!(raw, r#"{"keep":"me"}"#);
}

#[test]
fn configure_onto_corrupt_file_fails_and_changes_nothing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
    let db = open(&dir);
    db.set("a", 1).unwrap();

    let mut o = db.options();
    o.filename = "broken".into();
    o.autosave = true;
    let err = db.configure(o).unwrap_err();

    assert!(matches!(err, Error::CorruptState(_)));
    assert_eq!(db.file_path(), dir.path().join("data.json"));
    assert!(!db.options().autosave);
    assert_eq!(db.get("a").unwrap(), json!(1));
}

#[test]
fn configure_into_unwritable_location_is_io_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let db = open(&dir);

    let mut o = db.options();
    o.directory = blocker.join("sub");
    assert!(matches!(db.configure(o), Err(Error::Io(_))));
    assert_eq!(db.file_path(), dir.path().join("data.json"));
}

// ---- debug ------------------------------------------------------------------

#[test]
fn debug_impls_dont_panic() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);

    let dbg_store = format!("{:?}", db);
    assert!(dbg_store.contains("SettingsStore"));
    assert!(dbg_store.contains("path"));

    let dbg_builder = format!("{:?}", SettingsStore::builder());
    assert!(dbg_builder.contains("SettingsStoreBuilder"));
}
