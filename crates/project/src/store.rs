use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::project::Project;

/// Ordered project list persisted as a JSON array.
/// 以 JSON 陣列保存的有序專案清單。
#[derive(Debug)]
pub struct ProjectStore {
    path: PathBuf,
    projects: Vec<Project>,
}

impl ProjectStore {
    /// Constructs an empty store bound to the provided path.
    /// 建立綁定至指定路徑的空清單。
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            projects: Vec::new(),
        }
    }

    /// Loads the project list; an absent file yields an empty list.
    /// 從磁碟載入專案清單；若檔案不存在則回傳空清單。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectStoreError> {
        let path = path.as_ref().to_path_buf();
        let projects = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                ProjectStoreError::Invalid {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "projects file absent, starting empty");
                Vec::new()
            }
            Err(source) => {
                return Err(ProjectStoreError::Io {
                    path: path.clone(),
                    source,
                })
            }
        };
        Ok(Self { path, projects })
    }

    /// Returns the backing path used for persistence.
    /// 取得此清單使用的檔案路徑。
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }

    /// First project carrying `name`; duplicates after it are unreachable by name.
    /// 回傳第一個符合名稱的專案。
    pub fn position_by_name(&self, name: &str) -> Option<usize> {
        self.projects.iter().position(|project| project.name == name)
    }

    /// Appends a project and rewrites the whole file.
    /// 新增專案並整份重寫檔案。
    pub fn add(&mut self, project: Project) -> Result<usize, ProjectStoreError> {
        info!(name = %project.name, path = %project.path.display(), "project added");
        self.projects.push(project);
        if let Err(err) = self.save() {
            self.projects.pop();
            return Err(err);
        }
        Ok(self.projects.len() - 1)
    }

    pub fn save(&self) -> Result<(), ProjectStoreError> {
        let payload = serde_json::to_vec_pretty(&self.projects).map_err(|source| {
            ProjectStoreError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;
        replace_file(&self.path, &payload).map_err(|source| ProjectStoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn replace_file(path: &Path, payload: &[u8]) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, payload)?;
    fs::rename(&staging, path)
}

/// Errors emitted by [`ProjectStore`].
/// [`ProjectStore`] 可能拋出的錯誤。
#[derive(Debug, Error)]
pub enum ProjectStoreError {
    #[error("projects file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid projects file {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot serialize projects for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
