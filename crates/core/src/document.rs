use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// 決定無法解碼的位元組如何處理。 / How bytes that are not valid UTF-8 are treated on open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// 直接丟棄無效序列。 / Drop invalid sequences and keep the rest.
    #[default]
    Lossy,
    /// 遇到無效序列即回報錯誤。 / Refuse files that are not valid UTF-8.
    Strict,
}

/// 文件讀寫時可能發生的錯誤。 / Errors raised while reading or writing a text file.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not valid UTF-8 (first invalid byte at offset {offset})")]
    InvalidUtf8 { path: PathBuf, offset: usize },
}

/// 依指定策略讀取文字檔。 / Reads a file as text according to `policy`.
pub fn read_text(path: &Path, policy: DecodePolicy) -> Result<String, DocumentError> {
    let bytes = fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(path, bytes, policy)
}

fn decode(path: &Path, bytes: Vec<u8>, policy: DecodePolicy) -> Result<String, DocumentError> {
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => match policy {
            DecodePolicy::Strict => Err(DocumentError::InvalidUtf8 {
                path: path.to_path_buf(),
                offset: err.utf8_error().valid_up_to(),
            }),
            DecodePolicy::Lossy => {
                let bytes = err.into_bytes();
                let mut text = String::with_capacity(bytes.len());
                for chunk in bytes.utf8_chunks() {
                    text.push_str(chunk.valid());
                }
                Ok(text)
            }
        },
    }
}

/// 原樣寫入文字，先寫暫存檔再重新命名。 / Writes `text` verbatim via a temporary file plus rename.
///
/// Symlinks are followed so the link target receives the new contents, and
/// an existing file keeps its permission bits.
pub fn write_text(path: &Path, text: &str) -> Result<(), DocumentError> {
    let io_err = |source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    };
    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(err) if err.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
        Err(err) => return Err(io_err(err)),
    };
    let permissions = match fs::metadata(&target) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => return Err(io_err(err)),
    };
    let tmp_path = staging_path(&target);
    stage(&tmp_path, text, permissions)
        .and_then(|()| fs::rename(&tmp_path, &target))
        .map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            io_err(source)
        })
}

fn stage(tmp_path: &Path, text: &str, permissions: Option<fs::Permissions>) -> io::Result<()> {
    let mut tmp_file = File::create(tmp_path)?;
    tmp_file.write_all(text.as_bytes())?;
    if let Some(permissions) = permissions {
        tmp_file.set_permissions(permissions)?;
    }
    tmp_file.sync_all()
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".prism-tmp");
    path.with_file_name(name)
}
