use std::collections::VecDeque;
use std::path::PathBuf;

/// 同步對話框邊界：UI 提供實作，核心只看到回覆。 / Synchronous dialog boundary; `None` means the user cancelled.
pub trait Prompt {
    /// 要求使用者輸入一行文字。 / Asks for a single line of text.
    fn ask_text(&mut self, title: &str, message: &str) -> Option<String>;

    /// 要求使用者選擇資料夾。 / Asks for a folder.
    fn pick_folder(&mut self, title: &str) -> Option<PathBuf>;
}

/// A pre-recorded answer for [`ScriptedPrompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedAnswer {
    Text(String),
    Folder(PathBuf),
    Cancel,
}

/// 預先錄好答案的對話框，用於 CLI 與測試。 / Replays queued answers in order; an empty queue or a mismatched answer counts as cancel.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<ScriptedAnswer>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.answers.push_back(ScriptedAnswer::Text(text.into()));
        self
    }

    pub fn with_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.answers.push_back(ScriptedAnswer::Folder(folder.into()));
        self
    }

    pub fn with_cancel(mut self) -> Self {
        self.answers.push_back(ScriptedAnswer::Cancel);
        self
    }

    /// Titles of every dialog shown so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn ask_text(&mut self, title: &str, _message: &str) -> Option<String> {
        self.asked.push(title.to_string());
        match self.answers.pop_front()? {
            ScriptedAnswer::Text(text) => Some(text),
            _ => None,
        }
    }

    fn pick_folder(&mut self, title: &str) -> Option<PathBuf> {
        self.asked.push(title.to_string());
        match self.answers.pop_front()? {
            ScriptedAnswer::Folder(folder) => Some(folder),
            _ => None,
        }
    }
}
