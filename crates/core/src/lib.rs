//! 編輯器核心：工作階段、啟動器狀態與對話框邊界。
//! Editor core: per-project sessions, launcher state and the dialog boundary.

pub mod document;
pub mod editor;
pub mod launcher;
pub mod prompt;

pub use document::{read_text, write_text, DecodePolicy, DocumentError};
pub use editor::{
    DeleteOutcome, EditorConfig, EditorError, EditorSession, EditorState, SaveOutcome,
    DEFAULT_STATUS_TTL, SAVED_STATUS_KEY,
};
pub use launcher::{Launcher, LauncherError};
pub use prompt::{Prompt, ScriptedAnswer, ScriptedPrompt};
