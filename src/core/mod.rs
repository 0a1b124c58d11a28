use std::path::{Path, PathBuf};

mod error;
pub mod utils;

pub use error::{Error, Result};

/// Source of filesystem truth and environment lookups for a [`Session`](crate::Session).
///
/// The session never inspects the disk on its own when deciding where it
/// is; it asks the host. Predicates take absolute, normalized paths.
pub trait Host {
    /// The real working directory of the process, used as the initial virtual cwd.
    fn current_dir(&self) -> Result<PathBuf>;
    /// The user's home directory, if it can be determined.
    fn home_dir(&self) -> Option<PathBuf>;
    /// Regular file, following symlinks.
    fn is_file(&self, path: &Path) -> bool;
    /// Directory, following symlinks.
    fn is_dir(&self, path: &Path) -> bool;
    /// Symlink itself, dangling or not.
    fn is_symlink(&self, path: &Path) -> bool;
}

/// [`Host`] backed by the local machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalHost;

impl Host for LocalHost {
    fn current_dir(&self) -> Result<PathBuf> {
        Ok(std::env::current_dir()?)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        home::home_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }
}
