use crate::settings::Language;

const RU_STRINGS: &[(&str, &str)] = &[
    ("launcher.title", "Prism Code Editor"),
    ("launcher.app_name", "PrismCE"),
    ("launcher.add_project", "Добавить проект"),
    ("launcher.choose_folder", "Выберите папку проекта"),
    ("launcher.language", "Русский"),
    ("launcher.toggle_language", "🇬🇧"),
    ("editor.title", "Редактор — Prism Code Editor"),
    ("editor.create_file", "Создать файл"),
    ("editor.delete", "Удалить"),
    ("editor.saved", "Файл сохранён"),
    ("editor.open", "Открыть файл"),
    ("editor.new_file_prompt", "Введите имя файла (с расширением):"),
    ("dialog.ok", "ОК"),
    ("dialog.cancel", "Отмена"),
];

const EN_STRINGS: &[(&str, &str)] = &[
    ("launcher.title", "Prism Code Editor"),
    ("launcher.app_name", "PrismCE"),
    ("launcher.add_project", "Add project"),
    ("launcher.choose_folder", "Select project folder"),
    ("launcher.language", "English"),
    ("launcher.toggle_language", "🇷🇺"),
    ("editor.title", "Editor — Prism Code Editor"),
    ("editor.create_file", "Create File"),
    ("editor.delete", "Delete"),
    ("editor.saved", "File saved"),
    ("editor.open", "Open File"),
    ("editor.new_file_prompt", "Enter file name (with extension):"),
    ("dialog.ok", "OK"),
    ("dialog.cancel", "Cancel"),
];

/// Labels rendered by the launcher, in display order.
pub const LAUNCHER_KEYS: &[&str] = &[
    "launcher.title",
    "launcher.app_name",
    "launcher.add_project",
    "launcher.toggle_language",
];

/// Labels rendered by an editor session, in display order.
pub const EDITOR_KEYS: &[&str] = &[
    "editor.title",
    "editor.create_file",
    "editor.delete",
    "editor.open",
];

/// Fixed two-language translation table.
/// （固定的雙語翻譯表。）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localizer {
    language: Language,
}

impl Localizer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Retrieves a label, falling back to English and then to the key itself.
    /// （取得標籤；缺少時先回退至英文，再回退為鍵本身。）
    pub fn text<'a>(&self, key: &'a str) -> &'a str {
        lookup(table(self.language), key)
            .or_else(|| lookup(EN_STRINGS, key))
            .unwrap_or(key)
    }

    /// Renders the given keys in order as `(key, text)` pairs.
    pub fn labels<'a>(&self, keys: &[&'a str]) -> Vec<(&'a str, &'a str)> {
        keys.iter().map(|key| (*key, self.text(*key))).collect()
    }

    /// Every key known to the table.
    pub fn keys() -> impl Iterator<Item = &'static str> {
        EN_STRINGS.iter().map(|(key, _)| *key)
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

fn table(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::Russian => RU_STRINGS,
        Language::English => EN_STRINGS,
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, text)| *text)
}
