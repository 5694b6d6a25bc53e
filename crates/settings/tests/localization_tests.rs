use prism_settings::{Language, Localizer, EDITOR_KEYS, LAUNCHER_KEYS};

#[test]
fn russian_and_english_launcher_labels() {
    let ru = Localizer::new(Language::Russian);
    assert_eq!(ru.text("launcher.add_project"), "Добавить проект");
    assert_eq!(ru.text("launcher.toggle_language"), "🇬🇧");

    let en = Localizer::new(Language::English);
    assert_eq!(en.text("launcher.add_project"), "Add project");
    assert_eq!(en.text("launcher.toggle_language"), "🇷🇺");
}

#[test]
fn editor_labels_are_translated() {
    let ru = Localizer::new(Language::Russian);
    let en = Localizer::new(Language::English);
    assert_eq!(ru.text("editor.saved"), "Файл сохранён");
    assert_eq!(en.text("editor.saved"), "File saved");
    assert_eq!(
        en.text("editor.new_file_prompt"),
        "Enter file name (with extension):"
    );
}

#[test]
fn every_rendered_key_has_a_translation() {
    for language in [Language::Russian, Language::English] {
        let localizer = Localizer::new(language);
        for key in LAUNCHER_KEYS.iter().chain(EDITOR_KEYS) {
            assert_ne!(localizer.text(key), *key, "{key} missing for {language}");
        }
    }
}

#[test]
fn set_language_switches_table() {
    let mut localizer = Localizer::default();
    assert_eq!(localizer.language(), Language::Russian);
    localizer.set_language(Language::English);
    assert_eq!(localizer.text("editor.delete"), "Delete");
    assert!(Localizer::keys().any(|key| key == "editor.delete"));
}

#[test]
fn dialog_buttons_are_translated() {
    let ru = Localizer::new(Language::Russian);
    let en = Localizer::new(Language::English);
    assert_eq!(ru.text("dialog.ok"), "ОК");
    assert_eq!(ru.text("dialog.cancel"), "Отмена");
    assert_eq!(en.text("dialog.ok"), "OK");
    assert_eq!(en.text("dialog.cancel"), "Cancel");
}
