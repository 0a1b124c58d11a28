use std::fs::FileType;
use std::path::{Path, PathBuf};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
    Symlink,
}

impl From<FileType> for EntryType {
    fn from(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            EntryType::Symlink
        } else if file_type.is_dir() {
            EntryType::Directory
        } else {
            EntryType::File
        }
    }
}

/// A listed path together with its type (symlinks are not followed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: PathBuf,
    entry_type: EntryType,
}

impl Entry {
    pub fn new<P: AsRef<Path>>(path: P, entry_type: EntryType) -> Entry {
        Entry {
            path: path.as_ref().to_path_buf(),
            entry_type,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    pub fn is_symlink(&self) -> bool {
        self.entry_type == EntryType::Symlink
    }
}
