//! Existence predicates, resolved against the virtual cwd and answered by the host.

use std::path::Path;

use super::{EntryType, Session};
use crate::core::Host;

impl<H: Host> Session<H> {
    /// Regular file, following symlinks.
    pub fn is_file<P: AsRef<Path>>(&self, path: P) -> bool {
        self.host.is_file(&self.resolve(path))
    }

    /// Regular file that is not itself a symlink.
    pub fn is_real_file<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = self.resolve(path);
        self.host.is_file(&path) && !self.host.is_symlink(&path)
    }

    /// Directory, following symlinks.
    pub fn is_dir<P: AsRef<Path>>(&self, path: P) -> bool {
        self.host.is_dir(&self.resolve(path))
    }

    /// Directory that is not itself a symlink.
    pub fn is_real_dir<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = self.resolve(path);
        self.host.is_dir(&path) && !self.host.is_symlink(&path)
    }

    /// Symlink, whether or not its target exists.
    pub fn is_symlink<P: AsRef<Path>>(&self, path: P) -> bool {
        self.host.is_symlink(&self.resolve(path))
    }

    /// Symlink whose target has the given type.
    /// `EntryType::Symlink` asks only that the link exists.
    pub fn is_symlink_to<P: AsRef<Path>>(&self, path: P, target: EntryType) -> bool {
        let path = self.resolve(path);
        if !self.host.is_symlink(&path) {
            return false;
        }
        match target {
            EntryType::File => self.host.is_file(&path),
            EntryType::Directory => self.host.is_dir(&path),
            EntryType::Symlink => true,
        }
    }

    /// File, directory or symlink (dangling links count).
    pub fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = self.resolve(path);
        self.host.is_file(&path) || self.host.is_dir(&path) || self.host.is_symlink(&path)
    }
}
