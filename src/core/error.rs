//! Error types for session operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a [`Session`](crate::Session) operation can report.
///
/// Path resolution itself never fails; errors come from directory changes,
/// host lookups, filesystem mutations and the archive program.
#[derive(Debug, Error)]
pub enum Error {
    /// `cd` target does not exist.
    #[error("no such directory: {}", path.display())]
    DirectoryNotFound {
        /// The resolved target.
        path: PathBuf,
    },

    /// `cd` target exists but is not a directory.
    #[error("not a directory: {}", path.display())]
    NotADirectory {
        /// The resolved target.
        path: PathBuf,
    },

    /// A source path required by an operation does not exist.
    #[error("no such file or directory: {}", path.display())]
    NotFound {
        /// The resolved path.
        path: PathBuf,
    },

    /// The home directory lookup produced nothing.
    #[error("cannot determine home directory")]
    HomeUnavailable,

    /// A path was rejected before touching the filesystem.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The offending path.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// `tar` finished but the archive file is missing.
    #[error("the archive {} was not created", archive.display())]
    ArchiveNotCreated {
        /// Expected archive location.
        archive: PathBuf,
    },

    /// The archive to extract does not exist.
    #[error("archive {} does not exist", archive.display())]
    ArchiveNotFound {
        /// Expected archive location.
        archive: PathBuf,
    },

    /// An external program exited unsuccessfully.
    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        /// Program name as invoked.
        program: String,
        /// Exit status description.
        status: String,
        /// Captured and trimmed stderr.
        stderr: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory walk failed.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
