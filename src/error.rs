//! Error types shared by the generators, the text format and the timed reducer.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File could not be opened, read or written.
    Io,
    /// File content does not match the declared header / token counts.
    Format,
    /// A token is not a base-10 integer.
    Parse,
    /// Bad parameters handed to a generator or benchmark.
    Config,
    /// A kernel misbehaved while being benchmarked.
    Benchmark,
    /// A report could not be rendered.
    Output,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("format error at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("cannot parse {token:?} as an integer (line {line}, token {column})")]
    Parse {
        token: String,
        line: usize,
        column: usize,
    },

    #[error("invalid value range: lo ({lo}) is greater than hi ({hi})")]
    InvalidRange { lo: i64, hi: i64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("kernel {kernel} returned {actual} on trial {trial}, expected {expected}")]
    NonDeterministic {
        kernel: String,
        trial: usize,
        expected: i128,
        actual: i128,
    },

    #[error("totals differ: sequential = {sequential}, {kernel} = {actual}")]
    Mismatch {
        kernel: String,
        sequential: i128,
        actual: i128,
    },

    #[error("operands differ in shape: {left} vs {right}")]
    ShapeMismatch { left: String, right: String },

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::Format { .. } | Self::ShapeMismatch { .. } => ErrorKind::Format,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::InvalidRange { .. } | Self::InvalidConfig(_) | Self::ThreadPool(_) => {
                ErrorKind::Config
            }
            Self::NonDeterministic { .. } | Self::Mismatch { .. } => ErrorKind::Benchmark,
            Self::Serialize(_) => ErrorKind::Output,
        }
    }
}
