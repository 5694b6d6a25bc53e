use prism_settings::{Language, Localizer, SettingsError, SettingsStore, LAUNCHER_KEYS};
use std::fs;
use tempfile::tempdir;

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");

    let store = SettingsStore::load(&path).expect("load defaults");
    assert_eq!(store.language(), Language::Russian);
    assert!(!path.exists(), "loading must not create the file");
}

#[test]
fn toggle_persists_language() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");

    let mut store = SettingsStore::load(&path).expect("load");
    assert_eq!(store.toggle_language().expect("toggle"), Language::English);

    let reloaded = SettingsStore::load(&path).expect("reload");
    assert_eq!(reloaded.language(), Language::English);
    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "{\n  \"language\": \"en\"\n}"
    );
}

#[test]
fn toggling_twice_restores_file_and_labels() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");
    let original = "{\n  \"language\": \"ru\"\n}";
    fs::write(&path, original).expect("seed settings");

    let mut store = SettingsStore::load(&path).expect("load");
    let before = Localizer::new(store.language()).labels(LAUNCHER_KEYS);

    store.toggle_language().expect("first toggle");
    let during = Localizer::new(store.language()).labels(LAUNCHER_KEYS);
    assert_ne!(before, during);

    store.toggle_language().expect("second toggle");
    let after = Localizer::new(store.language()).labels(LAUNCHER_KEYS);
    assert_eq!(before, after);
    assert_eq!(fs::read_to_string(&path).expect("read"), original);
}

#[test]
fn unknown_keys_are_preserved_on_rewrite() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");
    fs::write(&path, r#"{"language": "en", "theme": "dark_purple"}"#).expect("seed");

    let mut store = SettingsStore::load(&path).expect("load");
    store.toggle_language().expect("toggle");

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
    assert_eq!(raw["language"], "ru");
    assert_eq!(raw["theme"], "dark_purple");
}

#[test]
fn malformed_json_is_a_parse_error() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");
    fs::write(&path, "{ not json").expect("seed");

    let err = SettingsStore::load(&path).expect_err("malformed settings must fail");
    assert!(matches!(err, SettingsError::Parse { .. }));
}

#[test]
fn unsupported_language_code_is_a_parse_error() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");
    fs::write(&path, r#"{"language": "de"}"#).expect("seed");

    assert!(matches!(
        SettingsStore::load(&path),
        Err(SettingsError::Parse { .. })
    ));
}
