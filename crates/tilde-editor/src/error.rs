//! Error types for the editor core.
//!
//! Buffer mutations never fail (out-of-range indices are no-ops), so the
//! only errors are file I/O, a malformed config file, and saving a document
//! that has no filename yet.

use std::io;

/// Everything the editor core can fail with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The config file exists but is not valid TOML for [`Config`](crate::config::Config).
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// Save was requested for a document that was never given a filename.
    #[error("no filename")]
    NoFilename,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
