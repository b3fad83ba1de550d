use json_settings::{Options, SettingsStore};
use serde_json::json;

fn main() -> Result<(), json_settings::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let dir = std::env::temp_dir().join("json_settings_example_basic");
    let db = SettingsStore::open(Options::in_dir(&dir))?;

    // set / get / has
    db.set("theme", "dark")?;
    db.set("volume", 0.8)?;
    db.set("window", json!({"width": 1280, "height": 720}))?;
    println!("theme   = {}", db.get("theme")?);
    println!("has fps = {}", db.has("fps"));

    // typed read
    let volume: f64 = db.get_as("volume")?;
    println!("volume  = {volume}");

    // batch write; the NaN entry is skipped, not fatal
    db.set_many(vec![("fps", json!(60)), ("vsync", json!(true))])?;
    db.set_many(vec![("gamma", f64::NAN)])?;

    // snapshots
    println!("some    = {:?}", db.get_many(["theme", "missing"]));
    println!("keys    = {:?}", db.keys());
    println!("len     = {}", db.len());

    // persist and clean up
    db.save()?;
    println!("on disk = {}", std::fs::read_to_string(db.file_path())?);
    db.unset("fps")?;
    db.clear()?;
    println!("after clear: len = {}", db.len());

    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}
