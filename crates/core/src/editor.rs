use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use prism_highlight::{HighlightSpan, SyntaxHighlighter};
use prism_project::{CreateOutcome, FileTree, NodeKind, TreeError};
use prism_settings::Localizer;
use thiserror::Error;
use tracing::{debug, info};

use crate::document::{self, DecodePolicy, DocumentError};
use crate::prompt::Prompt;

/// 儲存確認訊息的預設顯示時間。 / Default lifetime of the save confirmation.
pub const DEFAULT_STATUS_TTL: Duration = Duration::from_millis(2000);

/// Translation key of the save confirmation.
pub const SAVED_STATUS_KEY: &str = "editor.saved";

/// 編輯器工作階段的設定。 / Per-session editor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    pub decode: DecodePolicy,
    pub status_ttl: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            decode: DecodePolicy::default(),
            status_ttl: DEFAULT_STATUS_TTL,
        }
    }
}

/// 工作階段狀態。 / The two states of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    NoFileOpen,
    FileOpen,
}

/// Result of [`EditorSession::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    NothingOpen,
}

/// Result of a delete issued through the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub kind: NodeKind,
    /// Whether the open file went away with it.
    pub closed_current: bool,
}

#[derive(Debug, Clone)]
struct StatusMessage {
    key: &'static str,
    expires_at: Instant,
}

/// 編輯器操作可能發生的錯誤。 / Errors surfaced by editor session operations.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("{0} is not a file")]
    NotAFile(PathBuf),
    #[error("cannot inspect {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 綁定單一專案資料夾的編輯器工作階段。 / Per-project editor state: file tree, one buffer, and the highlighter.
#[derive(Debug)]
pub struct EditorSession {
    tree: FileTree,
    buffer: String,
    current: Option<PathBuf>,
    highlighter: SyntaxHighlighter,
    config: EditorConfig,
    status: Option<StatusMessage>,
}

impl EditorSession {
    /// 以專案根目錄建立工作階段。 / Opens a session rooted at `root`.
    pub fn open(root: impl Into<PathBuf>, config: EditorConfig) -> Result<Self, EditorError> {
        let tree = FileTree::open(root)?;
        debug!(root = %tree.root().display(), "editor session opened");
        Ok(Self {
            tree,
            buffer: String::new(),
            current: None,
            highlighter: SyntaxHighlighter::python(),
            config,
            status: None,
        })
    }

    pub fn root(&self) -> &Path {
        self.tree.root()
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut FileTree {
        &mut self.tree
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> EditorState {
        if self.current.is_some() {
            EditorState::FileOpen
        } else {
            EditorState::NoFileOpen
        }
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// 直接編輯緩衝區（供文字元件使用）。 / Mutable buffer for text widgets.
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.buffer
    }

    /// Mutable buffer next to a shared highlighter, for views that edit and
    /// re-highlight in the same frame.
    pub fn buffer_and_highlighter_mut(&mut self) -> (&mut String, &SyntaxHighlighter) {
        (&mut self.buffer, &self.highlighter)
    }

    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// 讀取檔案並整份取代緩衝區。 / Loads `path` and replaces the buffer wholesale.
    ///
    /// Unsaved edits to the previous file are discarded. On error the session is unchanged.
    pub fn open_file(&mut self, path: &Path) -> Result<&str, EditorError> {
        let path = self.tree.resolve(path)?;
        let metadata = fs::metadata(&path).map_err(|source| EditorError::Metadata {
            path: path.clone(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(EditorError::NotAFile(path));
        }
        let text = document::read_text(&path, self.config.decode)?;
        self.tree.select(Some(path.as_path()))?;
        info!(path = %path.display(), bytes = text.len(), "file opened");
        self.buffer = text;
        self.current = Some(path);
        Ok(&self.buffer)
    }

    /// 原樣寫回目前檔案；未開啟檔案時不做任何事。 / Writes the buffer verbatim to the open file.
    pub fn save(&mut self, now: Instant) -> Result<SaveOutcome, EditorError> {
        let Some(path) = self.current.clone() else {
            debug!("save ignored, no file open");
            return Ok(SaveOutcome::NothingOpen);
        };
        document::write_text(&path, &self.buffer)?;
        info!(path = %path.display(), bytes = self.buffer.len(), "file saved");
        self.status = Some(StatusMessage {
            key: SAVED_STATUS_KEY,
            expires_at: now + self.config.status_ttl,
        });
        Ok(SaveOutcome::Saved(path))
    }

    /// 目前仍有效的狀態訊息鍵。 / Translation key of the status message still visible at `now`.
    pub fn status(&self, now: Instant) -> Option<&'static str> {
        self.status
            .as_ref()
            .filter(|status| now < status.expires_at)
            .map(|status| status.key)
    }

    /// When the visible status message disappears, for scheduling a repaint.
    pub fn status_expires_at(&self) -> Option<Instant> {
        self.status.as_ref().map(|status| status.expires_at)
    }

    pub fn highlight_line(&self, line: &str) -> Vec<HighlightSpan> {
        self.highlighter.highlight_line(line)
    }

    pub fn highlight_buffer(&self) -> Vec<HighlightSpan> {
        self.highlighter.highlight_text(&self.buffer)
    }

    pub fn highlighter(&self) -> &SyntaxHighlighter {
        &self.highlighter
    }

    /// 透過對話框詢問檔名後建立檔案。 / Asks for a name, then creates an empty file.
    ///
    /// Returns `Ok(None)` when the dialog is cancelled or left blank.
    pub fn create_file(
        &mut self,
        prompt: &mut dyn Prompt,
        localizer: &Localizer,
    ) -> Result<Option<CreateOutcome>, EditorError> {
        let answer = prompt.ask_text(
            localizer.text("editor.create_file"),
            localizer.text("editor.new_file_prompt"),
        );
        match answer {
            Some(name) if !name.trim().is_empty() => self.create_file_named(&name).map(Some),
            _ => Ok(None),
        }
    }

    pub fn create_file_named(&mut self, name: &str) -> Result<CreateOutcome, EditorError> {
        Ok(self.tree.create_file(name)?)
    }

    /// 刪除節點；若移除了目前檔案則回到未開啟狀態。 / Deletes a node, closing the open file if it was removed.
    pub fn delete(&mut self, path: &Path) -> Result<DeleteOutcome, EditorError> {
        let target = self.tree.resolve(path)?;
        let kind = self.tree.delete(&target)?;
        let closed_current = self
            .current
            .as_deref()
            .is_some_and(|current| current.starts_with(&target));
        if closed_current {
            info!(path = %target.display(), "open file deleted, session invalidated");
            self.close_file();
        }
        Ok(DeleteOutcome {
            kind,
            closed_current,
        })
    }

    /// 回到未開啟檔案狀態並清空緩衝區。 / Returns to No File Open and clears the buffer.
    pub fn close_file(&mut self) {
        self.current = None;
        self.buffer.clear();
        self.status = None;
    }
}
