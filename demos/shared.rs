use json_settings::SettingsStore;
use std::sync::Arc;
use std::thread;

fn main() -> Result<(), json_settings::Error> {
    let dir = std::env::temp_dir().join("json_settings_example_shared");
    let db = Arc::new(
        SettingsStore::builder()
            .directory(&dir)
            .autosave(true)
            .build()?,
    );

    // saves are serialized, so the file is always one complete snapshot
    let workers: Vec<_> = (0..4)
        .map(|t| {
            let db = Arc::clone(&db);
            thread::spawn(move || -> Result<(), json_settings::Error> {
                for i in 0..10 {
                    db.set(&format!("worker{t}.step{i}"), i)?;
                }
                Ok(())
            })
        })
        .collect();
    for w in workers {
        w.join().expect("worker panicked")?;
    }

    println!("{} keys saved to {}", db.len(), db.file_path().display());

    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}
