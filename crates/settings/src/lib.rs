pub mod localization;
pub mod paths;
pub mod settings;

pub use localization::{Localizer, EDITOR_KEYS, LAUNCHER_KEYS};
pub use paths::{AppPaths, PROJECTS_FILE_NAME, SETTINGS_FILE_NAME};
pub use settings::{Language, Settings, SettingsError, SettingsStore, UnknownLanguage};
