use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize settings {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write settings {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Interface language. Serialized as its two-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Russian => "ru",
            Language::English => "en",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::Russian => Language::English,
            Language::English => Language::Russian,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language code '{0}' (expected 'ru' or 'en')")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "ru" => Ok(Language::Russian),
            "en" => Ok(Language::English),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub language: Language,
    /// Keys this version does not know about; written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Settings document bound to its file. Every mutation rewrites the file wholesale.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    data: Settings,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            path: path.into(),
            data: settings,
        }
    }

    /// Loads the settings file; an absent file means first run and yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!(path = %path.display(), "settings file absent, using defaults");
            return Ok(Self {
                path,
                data: Settings::default(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(|source| SettingsError::Read {
            path: path.clone(),
            source,
        })?;
        let data: Settings =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), language = %data.language, "settings loaded");
        Ok(Self { path, data })
    }

    pub fn settings(&self) -> &Settings {
        &self.data
    }

    pub fn language(&self) -> Language {
        self.data.language
    }

    pub fn set_language(&mut self, language: Language) -> Result<(), SettingsError> {
        self.data.language = language;
        self.save()
    }

    /// Flips between the two languages and persists the result.
    pub fn toggle_language(&mut self) -> Result<Language, SettingsError> {
        let next = self.data.language.toggled();
        self.set_language(next)?;
        info!(language = %next, "interface language switched");
        Ok(next)
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = serde_json::to_string_pretty(&self.data).map_err(|source| {
            SettingsError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| SettingsError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_round_trip() {
        assert_eq!("ru".parse::<Language>().unwrap(), Language::Russian);
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert!("de".parse::<Language>().is_err());
        assert_eq!(Language::English.to_string(), "en");
    }

    #[test]
    fn toggling_twice_is_identity() {
        for language in [Language::Russian, Language::English] {
            assert_ne!(language.toggled(), language);
            assert_eq!(language.toggled().toggled(), language);
        }
    }

    #[test]
    fn missing_language_key_defaults_to_russian() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.language, Language::Russian);
    }

    #[test]
    fn unknown_keys_survive_serialization() {
        let settings: Settings =
            serde_json::from_str(r#"{"language": "en", "font_size": 11}"#).unwrap();
        assert_eq!(settings.language, Language::English);
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["font_size"], 11);
        assert_eq!(value["language"], "en");
    }
}
