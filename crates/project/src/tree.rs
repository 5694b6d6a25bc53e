use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// The kind of a tree node.
/// 樹節點的類型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Directory,
}

impl NodeKind {
    pub fn is_dir(self) -> bool {
        matches!(self, NodeKind::Directory)
    }
}

/// A single file or directory below the project root.
/// 專案根目錄下的單一檔案或資料夾。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub path: PathBuf,
    pub name: String,
    pub kind: NodeKind,
}

/// A node flattened for display, with its nesting depth.
/// 攤平後供顯示用的節點與其層級。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub node: TreeNode,
    pub depth: usize,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(PathBuf),
    /// Something already existed at the path; nothing was touched.
    AlreadyExists(PathBuf),
}

impl CreateOutcome {
    pub fn path(&self) -> &Path {
        match self {
            CreateOutcome::Created(path) | CreateOutcome::AlreadyExists(path) => path,
        }
    }
}

/// File-tree errors.
/// 檔案樹操作錯誤類型。
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("{0} lies outside the project root")]
    OutsideRoot(PathBuf),
    #[error("invalid file name '{0}'")]
    InvalidName(String),
    #[error("{0} does not exist")]
    NotFound(PathBuf),
    #[error("the project root {0} cannot be deleted")]
    RootNotDeletable(PathBuf),
}

impl TreeError {
    fn io(path: &Path, source: io::Error) -> Self {
        TreeError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Filesystem-backed view of a project folder.
/// 以實際檔案系統為後盾的專案資料夾檢視。
///
/// Directory contents are read on demand; nothing is cached beyond which
/// directories are expanded. Every successful mutation bumps [`FileTree::revision`],
/// which views treat as the "layout changed" signal.
#[derive(Debug, Clone)]
pub struct FileTree {
    root: PathBuf,
    expanded: BTreeSet<PathBuf>,
    selected: Option<PathBuf>,
    revision: u64,
}

impl FileTree {
    /// Binds a tree to an existing directory.
    /// 綁定至既有資料夾。
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, TreeError> {
        let root: PathBuf = root.into();
        let root = absolute_root(&root)?;
        let metadata = fs::metadata(&root).map_err(|err| match err.kind() {
            ErrorKind::NotFound => TreeError::NotFound(root.clone()),
            _ => TreeError::io(&root, err),
        })?;
        if !metadata.is_dir() {
            return Err(TreeError::NotADirectory(root));
        }
        Ok(Self {
            root,
            expanded: BTreeSet::new(),
            selected: None,
            revision: 0,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Lists a directory: directories first, then case-insensitive name order.
    /// 列出資料夾內容：資料夾優先，其後依名稱排序（不分大小寫）。
    pub fn children(&self, dir: &Path) -> Result<Vec<TreeNode>, TreeError> {
        let dir = self.resolve(dir)?;
        let entries = fs::read_dir(&dir).map_err(|err| TreeError::io(&dir, err))?;
        let mut nodes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| TreeError::io(&dir, err))?;
            let file_type = entry
                .file_type()
                .map_err(|err| TreeError::io(&entry.path(), err))?;
            let path = entry.path();
            let kind = if file_type.is_dir() || (file_type.is_symlink() && path.is_dir()) {
                NodeKind::Directory
            } else {
                NodeKind::File
            };
            nodes.push(TreeNode {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                kind,
            });
        }
        nodes.sort_by(compare_nodes);
        Ok(nodes)
    }

    pub fn is_expanded(&self, dir: &Path) -> bool {
        self.resolve(dir)
            .map(|dir| self.expanded.contains(&dir))
            .unwrap_or(false)
    }

    pub fn expand(&mut self, dir: &Path) -> Result<(), TreeError> {
        let dir = self.resolve(dir)?;
        if !dir.is_dir() {
            return Err(TreeError::NotADirectory(dir));
        }
        self.expanded.insert(dir);
        Ok(())
    }

    pub fn collapse(&mut self, dir: &Path) {
        if let Ok(dir) = self.resolve(dir) {
            self.expanded.remove(&dir);
        }
    }

    /// Flips a directory between expanded and collapsed; returns the new state.
    /// 切換資料夾展開狀態並回傳新狀態。
    pub fn toggle(&mut self, dir: &Path) -> Result<bool, TreeError> {
        if self.is_expanded(dir) {
            self.collapse(dir);
            Ok(false)
        } else {
            self.expand(dir)?;
            Ok(true)
        }
    }

    /// Expands every directory below the root.
    /// 展開根目錄下所有資料夾。
    pub fn expand_all(&mut self) -> Result<(), TreeError> {
        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = entry.map_err(|source| TreeError::Walk {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone()),
                source,
            })?;
            if entry.file_type().is_dir() {
                self.expanded.insert(entry.into_path());
            }
        }
        Ok(())
    }

    /// Flattens the expanded part of the tree in display order.
    /// 依顯示順序攤平已展開的部分。
    pub fn visible_rows(&self) -> Result<Vec<TreeRow>, TreeError> {
        let mut rows = Vec::new();
        self.collect_rows(&self.root, 0, &mut rows)?;
        Ok(rows)
    }

    fn collect_rows(
        &self,
        dir: &Path,
        depth: usize,
        rows: &mut Vec<TreeRow>,
    ) -> Result<(), TreeError> {
        for node in self.children(dir)? {
            let expanded = node.kind.is_dir() && self.expanded.contains(&node.path);
            let path = node.path.clone();
            rows.push(TreeRow {
                node,
                depth,
                expanded,
            });
            if expanded {
                self.collect_rows(&path, depth + 1, rows)?;
            }
        }
        Ok(())
    }

    pub fn select(&mut self, path: Option<&Path>) -> Result<(), TreeError> {
        self.selected = match path {
            Some(path) => Some(self.resolve(path)?),
            None => None,
        };
        Ok(())
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    /// Creates an empty file named `name` under the root; an existing entry is left alone.
    /// 於根目錄下建立空檔案；若已存在則不做任何事。
    pub fn create_file(&mut self, name: &str) -> Result<CreateOutcome, TreeError> {
        let relative = relative_name(name)?;
        let path = self.root.join(relative);
        if fs::symlink_metadata(&path).is_ok() {
            debug!(path = %path.display(), "create skipped, entry exists");
            return Ok(CreateOutcome::AlreadyExists(path));
        }
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|err| TreeError::io(&path, err))?;
        self.revision = self.revision.wrapping_add(1);
        info!(path = %path.display(), "file created");
        Ok(CreateOutcome::Created(path))
    }

    /// Deletes a file, or a directory only when it is empty.
    /// 刪除檔案；資料夾僅在為空時刪除。
    ///
    /// A non-empty directory yields the filesystem error and nothing is removed.
    pub fn delete(&mut self, path: &Path) -> Result<NodeKind, TreeError> {
        let path = self.resolve(path)?;
        if path == self.root {
            return Err(TreeError::RootNotDeletable(path));
        }
        let metadata = fs::symlink_metadata(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => TreeError::NotFound(path.clone()),
            _ => TreeError::io(&path, err),
        })?;

        let kind = if metadata.is_dir() {
            fs::remove_dir(&path).map_err(|err| TreeError::io(&path, err))?;
            NodeKind::Directory
        } else {
            fs::remove_file(&path).map_err(|err| TreeError::io(&path, err))?;
            NodeKind::File
        };

        self.expanded.retain(|dir| !dir.starts_with(&path));
        if self
            .selected
            .as_deref()
            .is_some_and(|selected| selected.starts_with(&path))
        {
            self.selected = None;
        }
        self.revision = self.revision.wrapping_add(1);
        info!(path = %path.display(), ?kind, "entry deleted");
        Ok(kind)
    }

    /// Maps `path` (absolute, or relative to the root) onto a lexically normalised
    /// path inside the root.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf, TreeError> {
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.root)
                .map_err(|_| TreeError::OutsideRoot(path.to_path_buf()))?
        } else {
            path
        };
        let normalised =
            normalise(relative).ok_or_else(|| TreeError::OutsideRoot(path.to_path_buf()))?;
        if normalised.as_os_str().is_empty() {
            return Ok(self.root.clone());
        }
        Ok(self.root.join(normalised))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.resolve(path).is_ok()
    }
}

/// Absolute form of a tree root with `.` and `..` folded away lexically.
/// Two spellings of one folder map to the same path.
/// 專案根目錄的絕對路徑，已移除 `.` 與 `..`。
pub fn absolute_root(root: &Path) -> Result<PathBuf, TreeError> {
    let joined = if root.is_relative() {
        let cwd = std::env::current_dir().map_err(|err| TreeError::io(root, err))?;
        cwd.join(root)
    } else {
        root.to_path_buf()
    };
    let mut cleaned = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    Ok(cleaned)
}

fn relative_name(name: &str) -> Result<PathBuf, TreeError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TreeError::InvalidName(name.to_string()));
    }
    let candidate = Path::new(trimmed);
    if candidate.is_absolute() {
        return Err(TreeError::OutsideRoot(candidate.to_path_buf()));
    }
    match normalise(candidate) {
        Some(relative) if relative.as_os_str().is_empty() => {
            Err(TreeError::InvalidName(name.to_string()))
        }
        Some(relative) => Ok(relative),
        None => Err(TreeError::OutsideRoot(candidate.to_path_buf())),
    }
}

/// Resolves `.` and `..` without touching the filesystem; `None` when the path
/// climbs above its starting point or carries a root/prefix.
fn normalise(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

fn compare_nodes(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.kind
        .is_dir()
        .cmp(&a.kind.is_dir())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}
