use std::io;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const PROJECTS_FILE_NAME: &str = "projects.json";

/// Locations of the two persisted documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub settings_file: PathBuf,
    pub projects_file: PathBuf,
}

impl AppPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            settings_file: dir.join(SETTINGS_FILE_NAME),
            projects_file: dir.join(PROJECTS_FILE_NAME),
        }
    }

    /// Both files next to the process working directory.
    pub fn current_dir() -> io::Result<Self> {
        Ok(Self::in_dir(std::env::current_dir()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_joins_fixed_file_names() {
        let paths = AppPaths::in_dir("/tmp/prism");
        assert_eq!(paths.settings_file, Path::new("/tmp/prism/settings.json"));
        assert_eq!(paths.projects_file, Path::new("/tmp/prism/projects.json"));
    }
}
