use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use prism_project::{absolute_root, Project, ProjectStore, ProjectStoreError};
use prism_settings::{AppPaths, Language, Localizer, SettingsError, SettingsStore, LAUNCHER_KEYS};
use thiserror::Error;
use tracing::{debug, info};

use crate::editor::{EditorConfig, EditorError, EditorSession};
use crate::prompt::Prompt;

/// 啟動器操作可能發生的錯誤。 / Errors surfaced by the launcher.
#[derive(Debug, Error)]
pub enum LauncherError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Projects(#[from] ProjectStoreError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("no project matches '{0}'")]
    UnknownProject(String),
    #[error("project index {index} is out of range ({len} projects)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// 應用程式層級狀態：設定、專案清單與開啟中的工作階段。
/// Application state: settings, the project list and every open editor session.
///
/// Sessions are keyed by the absolute project root, so a folder is never open twice
/// however its path is spelled in `projects.json`.
#[derive(Debug)]
pub struct Launcher {
    settings: SettingsStore,
    projects: ProjectStore,
    localizer: Localizer,
    editors: BTreeMap<PathBuf, EditorSession>,
    config: EditorConfig,
}

impl Launcher {
    /// 於啟動時載入兩份設定檔。 / Loads both documents; missing files mean first run.
    pub fn load(paths: &AppPaths, config: EditorConfig) -> Result<Self, LauncherError> {
        let settings = SettingsStore::load(&paths.settings_file)?;
        let projects = ProjectStore::load(&paths.projects_file)?;
        let localizer = Localizer::new(settings.language());
        info!(
            language = %settings.language(),
            projects = projects.projects().len(),
            "launcher ready"
        );
        Ok(Self {
            settings,
            projects,
            localizer,
            editors: BTreeMap::new(),
            config,
        })
    }

    pub fn language(&self) -> Language {
        self.settings.language()
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Launcher labels in the active language, in display order.
    pub fn labels(&self) -> Vec<(&'static str, &'static str)> {
        self.localizer.labels(LAUNCHER_KEYS)
    }

    /// 切換介面語言並寫回設定檔。 / Flips the language, persists it and re-targets the labels.
    pub fn toggle_language(&mut self) -> Result<Language, LauncherError> {
        let language = self.settings.toggle_language()?;
        self.localizer.set_language(language);
        Ok(language)
    }

    pub fn projects(&self) -> &[Project] {
        self.projects.projects()
    }

    /// 以資料夾對話框新增專案。 / Adds a project from the folder picker; `Ok(None)` if cancelled.
    pub fn add_project(&mut self, prompt: &mut dyn Prompt) -> Result<Option<usize>, LauncherError> {
        match prompt.pick_folder(self.localizer.text("launcher.choose_folder")) {
            Some(folder) => self.add_project_folder(folder).map(Some),
            None => {
                debug!("add project cancelled");
                Ok(None)
            }
        }
    }

    pub fn add_project_folder(&mut self, folder: impl Into<PathBuf>) -> Result<usize, LauncherError> {
        Ok(self.projects.add(Project::from_folder(folder))?)
    }

    /// 以名稱（第一個符合者）或索引找出專案。 / Finds a project by name (first match) or zero-based index.
    ///
    /// A name wins over an index when a project is literally called e.g. `"0"`.
    pub fn resolve_project(&self, name_or_index: &str) -> Result<usize, LauncherError> {
        if let Some(position) = self.projects.position_by_name(name_or_index) {
            return Ok(position);
        }
        match name_or_index.parse::<usize>() {
            Ok(index) if index < self.projects.projects().len() => Ok(index),
            Ok(index) => Err(LauncherError::IndexOutOfRange {
                index,
                len: self.projects.projects().len(),
            }),
            Err(_) => Err(LauncherError::UnknownProject(name_or_index.to_string())),
        }
    }

    /// 開啟專案；同一路徑只會有一個工作階段。 / Opens the project's session, reusing an existing one.
    pub fn open_project(&mut self, index: usize) -> Result<&mut EditorSession, LauncherError> {
        let project = self
            .projects
            .get(index)
            .ok_or(LauncherError::IndexOutOfRange {
                index,
                len: self.projects.projects().len(),
            })?;
        let root = absolute_root(&project.path).map_err(EditorError::from)?;
        let session = match self.editors.entry(root) {
            Entry::Occupied(entry) => {
                debug!(path = %entry.key().display(), "project already open, reusing session");
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                let session = EditorSession::open(entry.key().clone(), self.config)?;
                info!(project = %project.name, path = %entry.key().display(), "project opened");
                entry.insert(session)
            }
        };
        Ok(session)
    }

    pub fn editor(&self, project_path: &Path) -> Option<&EditorSession> {
        self.editors.get(project_path)
    }

    pub fn editor_mut(&mut self, project_path: &Path) -> Option<&mut EditorSession> {
        self.editors.get_mut(project_path)
    }

    pub fn open_editor_paths(&self) -> impl Iterator<Item = &Path> {
        self.editors.keys().map(PathBuf::as_path)
    }

    pub fn close_editor(&mut self, project_path: &Path) -> bool {
        let closed = self.editors.remove(project_path).is_some();
        if closed {
            debug!(path = %project_path.display(), "editor session closed");
        }
        closed
    }

    /// 關閉所有工作階段。 / Closes every session; unsaved buffers are discarded.
    pub fn shutdown(&mut self) {
        let count = self.editors.len();
        self.editors.clear();
        info!(sessions = count, "launcher shut down");
    }
}
