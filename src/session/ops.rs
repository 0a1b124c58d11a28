//! Filesystem mutations and reads, all relative to the virtual cwd.
//!
//! These use native filesystem calls; the session cwd never leaks into the
//! process working directory.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use log::debug;
use walkdir::WalkDir;

use super::{Entry, Session};
use crate::core::{Error, Host, Result, utils};

impl<H: Host> Session<H> {
    /// Creates an empty file, or bumps the access and modification times of
    /// an existing file or directory. The parent directory must exist.
    pub fn touch<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = self.resolve(path);
        if !self.host.is_dir(&path) {
            OpenOptions::new().create(true).append(true).open(&path)?;
        }
        let now = FileTime::now();
        filetime::set_file_times(&path, now, now)?;
        debug!("touched {}", path.display());
        Ok(())
    }

    /// Creates the directory and any missing parents.
    /// An existing directory is fine; an existing file is an error.
    pub fn mkdir<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = self.resolve(path);
        fs::create_dir_all(&path)?;
        debug!("created {}", path.display());
        Ok(())
    }

    /// Removes a file, a symlink (not its target) or a whole directory tree.
    /// A missing path is not an error.
    ///
    /// Refused with `InvalidPath`: paths ending in `.` or `..`, the root, and
    /// the cwd or any of its ancestors.
    pub fn rm<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let given = non_empty(path.as_ref())?;
        if ends_in_dot_entry(given) {
            return Err(Error::InvalidPath {
                path: given.to_path_buf(),
                reason: "refusing to remove '.' or '..'".into(),
            });
        }

        let path = self.resolve(given);
        if utils::is_root(&path) {
            return Err(Error::InvalidPath {
                path,
                reason: "the root cannot be removed".into(),
            });
        }
        if self.cwd.starts_with(&path) {
            return Err(Error::InvalidPath {
                path,
                reason: "the working directory or its parent cannot be removed".into(),
            });
        }

        match utils::rm_on_host(&path) {
            Ok(()) => {
                debug!("removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Copies `source` recursively, overwriting existing files.
    ///
    /// If `dest` is an existing directory the copy lands inside it under the
    /// source's file name. Symlinks inside the source are recreated, not followed.
    /// Returns the path of the copy.
    pub fn cp<P: AsRef<Path>, Q: AsRef<Path>>(&self, source: P, dest: Q) -> Result<PathBuf> {
        let source = self.existing(non_empty(source.as_ref())?)?;
        let dest = self.destination(&source, non_empty(dest.as_ref())?);

        if dest.starts_with(&source) && self.is_real_dir(&source) {
            return Err(Error::InvalidPath {
                path: dest,
                reason: format!("cannot copy {} into itself", source.display()),
            });
        }

        copy_tree(&source, &dest)?;
        debug!("copied {} -> {}", source.display(), dest.display());
        Ok(dest)
    }

    /// Moves `source` to `dest`, or into `dest` when it is an existing directory.
    /// Returns the new path.
    pub fn mv<P: AsRef<Path>, Q: AsRef<Path>>(&self, source: P, dest: Q) -> Result<PathBuf> {
        let source = self.existing(non_empty(source.as_ref())?)?;
        let dest = self.destination(&source, non_empty(dest.as_ref())?);

        match fs::rename(&source, &dest) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::CrossesDevices => {
                copy_tree(&source, &dest)?;
                utils::rm_on_host(&source)?;
            }
            Err(e) => return Err(e.into()),
        }
        debug!("moved {} -> {}", source.display(), dest.display());
        Ok(dest)
    }

    /// Creates a symlink at `link` pointing to `target`, replacing an existing
    /// file or symlink there.
    ///
    /// `target` is stored as given. If `link` is an existing directory (not a
    /// symlink to one) the link is created inside it under the target's name.
    /// Returns the path of the link.
    pub fn symlink<P: AsRef<Path>, Q: AsRef<Path>>(&self, target: P, link: Q) -> Result<PathBuf> {
        let target = non_empty(target.as_ref())?;
        let mut link = self.resolve(non_empty(link.as_ref())?);

        if self.is_real_dir(&link) {
            let name = target.file_name().ok_or_else(|| Error::InvalidPath {
                path: target.to_path_buf(),
                reason: "cannot derive a link name".into(),
            })?;
            link = link.join(name);
        }

        match fs::symlink_metadata(&link) {
            Ok(meta) if meta.is_dir() => {
                return Err(Error::InvalidPath {
                    path: link,
                    reason: "cannot overwrite a directory".into(),
                });
            }
            Ok(_) => fs::remove_file(&link)?,
            Err(_) => {}
        }

        symlink(target, &link)?;
        debug!("linked {} -> {}", link.display(), target.display());
        Ok(link)
    }

    /// File contents as text.
    pub fn cat<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let path = self.existing(path)?;
        Ok(fs::read_to_string(path)?)
    }

    /// Immediate children of a directory, sorted by name, dot entries excluded.
    pub fn ls<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Entry>> {
        let dir = self.resolve(path);
        if !self.host.is_dir(&dir) {
            return Err(if self.host.is_file(&dir) {
                Error::NotADirectory { path: dir }
            } else {
                Error::DirectoryNotFound { path: dir }
            });
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if utils::is_hidden(entry.file_name()) {
                continue;
            }
            entries.push(Entry::new(entry.path(), entry.file_type().into()));
        }
        Ok(entries)
    }

    fn existing(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.resolve(path);
        if !self.exists(&path) {
            return Err(Error::NotFound { path });
        }
        Ok(path)
    }

    fn destination(&self, source: &Path, dest: &Path) -> PathBuf {
        let dest = self.resolve(dest);
        match source.file_name() {
            Some(name) if self.host.is_dir(&dest) => dest.join(name),
            _ => dest,
        }
    }
}

/// True when the last component as written is `.` or `..` (`Path::components`
/// drops a trailing `.`, so this looks at the raw text).
fn ends_in_dot_entry(path: &Path) -> bool {
    let raw = path.to_string_lossy();
    let last = raw.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    last == "." || last == ".."
}

fn non_empty(path: &Path) -> Result<&Path> {
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "empty".into(),
        });
    }
    Ok(path)
}

/// Copies a file, symlink or directory tree from `source` to `dest`.
fn copy_tree(source: &Path, dest: &Path) -> Result<()> {
    if fs::symlink_metadata(source)?.file_type().is_symlink() {
        return copy_link(source, dest);
    }

    for entry in WalkDir::new(source) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = if relative.as_os_str().is_empty() {
            dest.to_path_buf()
        } else {
            dest.join(relative)
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_link(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn copy_link(source: &Path, dest: &Path) -> Result<()> {
    let target = fs::read_link(source)?;
    if let Ok(meta) = fs::symlink_metadata(dest) {
        if !meta.is_dir() {
            fs::remove_file(dest)?;
        }
    }
    symlink(target, dest)?;
    Ok(())
}
