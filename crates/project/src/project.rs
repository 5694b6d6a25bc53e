use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A named reference to a project folder.
/// 指向專案資料夾的具名參照。
///
/// Names come from the folder's base name and are not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
}

impl Project {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Builds a project whose name is the folder's base name.
    /// 以資料夾名稱作為專案名稱。
    pub fn from_folder(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = folder_name(&path);
        Self { name, path }
    }
}

fn folder_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_the_base_name() {
        let project = Project::from_folder("/home/user/code/demo");
        assert_eq!(project.name, "demo");
        assert_eq!(project.path, PathBuf::from("/home/user/code/demo"));
    }

    #[test]
    fn trailing_separator_is_ignored() {
        assert_eq!(Project::from_folder("/tmp/demo/").name, "demo");
    }

    #[test]
    fn filesystem_root_falls_back_to_full_path() {
        assert_eq!(Project::from_folder("/").name, "/");
    }

    #[test]
    fn serializes_as_name_and_path_strings() {
        let project = Project::new("demo", "/tmp/demo");
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "demo", "path": "/tmp/demo" })
        );
    }
}
