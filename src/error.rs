use std::path::PathBuf;
use thiserror::Error;

/// 库内统一错误类型。任何一种错误都会终止当前处理流程（无部分恢复）。
#[derive(Error, Debug)]
pub enum Error {
    #[error("truncated SFS stream: field '{field}' at offset {offset} needs {needed} bytes, {available} available")]
    Decode {
        field: &'static str,
        offset: usize,
        needed: u64,
        available: usize,
    },

    #[error("non-ASCII bytes in SFS field '{field}' at offset {offset}")]
    Encoding { field: &'static str, offset: usize },

    #[error("lengths/pointers shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("{source_name}: line {line}: invalid integer '{token}'")]
    InvalidInteger {
        source_name: String,
        line: usize,
        token: String,
    },

    #[error("command '{command}' failed: {reason}")]
    ExternalProcess { command: String, reason: String },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reference FASTA '{}' contains no sequences", .0.display())]
    EmptyReference(PathBuf),

    #[error("cannot build thread pool: {0}")]
    ThreadPool(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
