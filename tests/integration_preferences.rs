use glimpse::preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, PreferencesManager, Theme,
    REBUILD_KEY, THEME_KEY, VIEW_KEY,
};
use glimpse::session::Durations;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn durations_survive_reload_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut prefs = PreferencesManager::load(Box::new(FilePreferenceStore::with_path(&path)));
    prefs.update(10, 10).unwrap();
    drop(prefs);

    let reloaded = PreferencesManager::load(Box::new(FilePreferenceStore::with_path(&path)));
    assert_eq!(reloaded.durations(), Durations::new(10, 10).unwrap());
}

#[test]
fn fresh_install_uses_defaults() {
    let dir = tempdir().unwrap();
    let prefs = PreferencesManager::load(Box::new(FilePreferenceStore::with_path(
        dir.path().join("absent.json"),
    )));

    assert_eq!(prefs.durations().view_secs(), 30);
    assert_eq!(prefs.durations().rebuild_secs(), 20);
    assert_eq!(prefs.theme(), Theme::Light);
}

#[test]
fn file_holds_three_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut prefs = PreferencesManager::load(Box::new(FilePreferenceStore::with_path(&path)));
    prefs.set_theme(Theme::Dark);

    let entries = FilePreferenceStore::with_path(&path).load();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[VIEW_KEY], json!(30));
    assert_eq!(entries[REBUILD_KEY], json!(20));
    assert_eq!(entries[THEME_KEY], json!("dark"));
}

#[test]
fn garbage_values_are_silently_replaced() {
    let store = MemoryPreferenceStore::new();
    store.set(VIEW_KEY, json!({"nested": true}));
    store.set(REBUILD_KEY, json!("7"));
    store.set(THEME_KEY, json!(3));

    let prefs = PreferencesManager::load(Box::new(store));
    assert_eq!(prefs.durations(), Durations::new(30, 7).unwrap());
    assert_eq!(prefs.theme(), Theme::Light);
}

#[test]
fn double_toggle_and_reload_restores_theme() {
    for start in [Theme::Light, Theme::Dark] {
        let store = MemoryPreferenceStore::new();
        let mut prefs = PreferencesManager::load(Box::new(store.clone()));
        prefs.set_theme(start);

        prefs.toggle_theme();
        prefs.toggle_theme();

        let reloaded = PreferencesManager::load(Box::new(store));
        assert_eq!(reloaded.theme(), start);
    }
}
