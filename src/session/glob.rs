//! Shell-style pathname expansion relative to the virtual cwd.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::Session;
use crate::core::{Host, Result, utils};

impl<H: Host> Session<H> {
    /// Expands a shell pattern into the matching paths.
    ///
    /// Each `/`-separated component may use `*`, `?` and `[...]`; a `**`
    /// component matches any number of directories, and as the last component
    /// every entry below. Dot entries match only components that start with `.`.
    ///
    /// Relative patterns yield paths relative to the cwd, absolute patterns
    /// absolute paths. The result is sorted and may be empty.
    ///
    /// # Example:
    /// ```no_run
    /// # use cwd_kit::Session;
    /// let session = Session::new().unwrap();
    /// for path in session.glob("src/**/*.rs").unwrap() {
    ///     println!("{}", path.display());
    /// }
    /// ```
    pub fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        if pattern.is_empty() {
            return Ok(Vec::new());
        }

        let absolute = pattern.starts_with('/');
        let base = if absolute {
            PathBuf::from("/")
        } else {
            self.cwd.clone()
        };
        let parts: Vec<&str> = pattern.split('/').filter(|p| !p.is_empty()).collect();

        let mut matches = Vec::new();
        expand(&base, PathBuf::new(), &parts, &mut matches)?;
        matches.sort();
        matches.dedup();

        if absolute {
            return Ok(matches.into_iter().map(|m| base.join(m)).collect());
        }
        Ok(matches)
    }
}

/// Matches `parts` below `base/rel`, pushing every full match (relative to `base`) into `out`.
fn expand(base: &Path, rel: PathBuf, parts: &[&str], out: &mut Vec<PathBuf>) -> Result<()> {
    let Some((part, rest)) = parts.split_first() else {
        out.push(rel);
        return Ok(());
    };
    let here = base.join(&rel);

    if *part == "**" {
        if rest.is_empty() {
            for entry in walk(&here) {
                let entry = entry?;
                if let Ok(sub) = entry.path().strip_prefix(&here) {
                    out.push(rel.join(sub));
                }
            }
            return Ok(());
        }

        expand(base, rel.clone(), rest, out)?;
        for entry in walk(&here) {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }
            if let Ok(sub) = entry.path().strip_prefix(&here) {
                expand(base, rel.join(sub), rest, out)?;
            }
        }
        return Ok(());
    }

    if !utils::has_wildcard(part) {
        let next = rel.join(part);
        let path = base.join(&next);
        let usable = if rest.is_empty() {
            fs::symlink_metadata(&path).is_ok()
        } else {
            path.is_dir()
        };
        if usable {
            expand(base, next, rest, out)?;
        }
        return Ok(());
    }

    // unreadable or not a directory: nothing matches
    let Ok(read_dir) = fs::read_dir(&here) else {
        return Ok(());
    };
    let allow_hidden = part.starts_with('.');
    for entry in read_dir {
        let entry = entry?;
        let name = entry.file_name();
        if utils::is_hidden(&name) && !allow_hidden {
            continue;
        }
        let Some(name_str) = name.to_str() else {
            continue;
        };
        if !utils::wildcard_match(part, name_str) {
            continue;
        }
        let next = rel.join(&name);
        if !rest.is_empty() && !base.join(&next).is_dir() {
            continue;
        }
        expand(base, next, rest, out)?;
    }
    Ok(())
}

/// Everything below `dir`, skipping dot entries and not following symlinks.
fn walk(dir: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !utils::is_hidden(e.file_name()))
}
