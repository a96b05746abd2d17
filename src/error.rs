//! Error types returned by the writer.
//!
//! Every fallible public operation returns a [`PsdWriterError`]. [`Status`] is
//! the coarse, `Copy` projection of the last error that [`crate::Document::status`]
//! exposes, matching the closed set of outcomes the file format's original
//! writer reported to callers.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The full error type for a failed writer operation.
#[derive(Debug, Error)]
pub enum PsdWriterError {
    /// `save()` was called with `overwrite = false` and the target path already exists.
    #[error("output file already exists: {0}")]
    FileExists(PathBuf),

    /// The output file could not be created, written, or flushed.
    #[error("failed writing output file: {0}")]
    FileWrite(#[source] io::Error),

    /// An ICC profile path was given but could not be read.
    #[error("failed reading ICC profile: {0}")]
    NoProfile(#[source] io::Error),

    /// An argument was outside the range the operation accepts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// The coarse, `Copy` status code exposed by [`crate::Document::status`].
///
/// `Success` is the state before any fallible call, and after any call that
/// didn't fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The last operation succeeded, or no fallible operation has run yet.
    Success,
    /// `save()` refused to overwrite an existing file.
    FileExistsError,
    /// `save()` failed to write the output file.
    FileWriteError,
    /// `set_profile()` could not read the given ICC profile.
    NoProfileError,
    /// A setter was called with an argument outside its accepted range.
    InvalidArgument,
}

impl From<&PsdWriterError> for Status {
    fn from(err: &PsdWriterError) -> Self {
        match err {
            PsdWriterError::FileExists(_) => Status::FileExistsError,
            PsdWriterError::FileWrite(_) => Status::FileWriteError,
            PsdWriterError::NoProfile(_) => Status::NoProfileError,
            PsdWriterError::InvalidArgument(_) => Status::InvalidArgument,
        }
    }
}
