//! Error type shared by the image, codec and rasterizer modules
//!
//! Every failure carries an [`ErrorKind`] so the host application can pick
//! its own policy (report, retry with another file, abort).

use std::io;
use thiserror::Error;

/// Broad classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller broke a precondition (zero size, bad channel count, out of range)
    InvalidArgument,
    /// File could not be opened, read or written, including truncated reads
    Io,
    /// Input is well formed but uses something we don't decode
    UnsupportedFormat,
    /// Input claims one thing and contains another
    CorruptData,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("corrupt data: {0}")]
    CorruptData(String),
}

impl RenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            RenderError::Io(_) => ErrorKind::Io,
            RenderError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            RenderError::CorruptData(_) => ErrorKind::CorruptData,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        RenderError::InvalidArgument(msg.into())
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        RenderError::UnsupportedFormat(msg.into())
    }

    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        RenderError::CorruptData(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_their_kind() {
        let err: RenderError = io::Error::new(io::ErrorKind::UnexpectedEof, "short").into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn constructors_map_to_kinds() {
        assert_eq!(RenderError::invalid("x").kind(), ErrorKind::InvalidArgument);
        assert_eq!(RenderError::unsupported("x").kind(), ErrorKind::UnsupportedFormat);
        assert_eq!(RenderError::corrupt("x").kind(), ErrorKind::CorruptData);
    }
}
