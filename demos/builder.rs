use json_settings::SettingsStore;

fn main() -> Result<(), json_settings::Error> {
    let dir = std::env::temp_dir().join("json_settings_example_builder");

    // pretty-printed JSON, saved on every change, with a lastUpdate stamp
    let db = SettingsStore::builder()
        .directory(&dir)
        .filename("prefs")
        .pretty_print(true)
        .autosave(true)
        .record_last_update(true)
        .build()?;

    db.set("name", "json-settings")?;
    db.set("version", "0.1.0")?;
    db.set("recent", vec!["notes.md", "todo.txt"])?;

    // no explicit save needed; the file on disk is already up to date
    let contents = std::fs::read_to_string(db.file_path())?;
    println!("On-disk JSON:\n{contents}");

    // stop stamping; the next save drops the field again
    let mut options = db.options();
    options.record_last_update = false;
    db.configure(options)?;
    db.save()?;
    println!("\nWithout stamp:\n{}", std::fs::read_to_string(db.file_path())?);

    println!("\nDebug output: {db:?}");

    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}
