use multi_scene::{SettingsStore, UserSettings};

#[test]
fn round_trips_through_ron() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SettingsStore::new(dir.path().join("settings.ron"));

    let settings = UserSettings {
        master_volume: 0.25,
        music_volume: 0.9,
        effects_volume: 0.1,
        quality: 3,
        fullscreen: true,
    };
    store.save(&settings).expect("save");

    let (loaded, err) = store.load_or_default();
    assert!(err.is_none());
    assert_eq!(loaded, settings);
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SettingsStore::new(dir.path().join("never_written.ron"));

    let (settings, err) = store.load_or_default();
    assert!(err.is_some());
    assert_eq!(settings, UserSettings::default());
    assert!((settings.master_volume - 0.75).abs() < f32::EPSILON);
    assert!((settings.music_volume - 0.6).abs() < f32::EPSILON);
    assert!((settings.effects_volume - 0.8).abs() < f32::EPSILON);
    assert!(!settings.fullscreen);
}

#[test]
fn corrupt_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.ron");
    std::fs::write(&path, "not ron at all {{{").expect("write");

    let store = SettingsStore::new(path);
    let (settings, err) = store.load_or_default();
    assert!(err.is_some());
    assert_eq!(settings, UserSettings::default());
}

#[test]
fn partial_file_fills_missing_fields_with_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.ron");
    std::fs::write(&path, "(master_volume: 0.5)").expect("write");

    let store = SettingsStore::new(path);
    let (settings, err) = store.load_or_default();
    assert!(err.is_none());
    assert!((settings.master_volume - 0.5).abs() < f32::EPSILON);
    assert!((settings.music_volume - 0.6).abs() < f32::EPSILON);
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("deeper").join("settings.ron");
    let store = SettingsStore::new(&path);

    store.save(&UserSettings::default()).expect("save");
    assert!(path.exists());
}
