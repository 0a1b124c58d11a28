use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Collapses `.` and `..` components and redundant separators.
/// `..` never climbs above the root (or above the start of a relative path).
pub fn normalize<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            other => result.push(other),
        }
    }
    result
}

pub fn is_root<P: AsRef<Path>>(path: P) -> bool {
    normalize(path) == Path::new("/")
}

pub fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// `path` relative to `base`, climbing out of `base` with `..` as needed.
/// Both are expected absolute and normalized; equal paths give an empty path.
pub fn relative_to<P: AsRef<Path>, B: AsRef<Path>>(path: P, base: B) -> PathBuf {
    let path: Vec<_> = path.as_ref().components().collect();
    let base: Vec<_> = base.as_ref().components().collect();
    let common = path.iter().zip(&base).take_while(|(a, b)| a == b).count();

    let mut result = PathBuf::new();
    for _ in common..base.len() {
        result.push("..");
    }
    for component in &path[common..] {
        result.push(component);
    }
    result
}

/// Removes a file, symlink or whole directory tree from the host.
pub fn rm_on_host<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    let path = path.as_ref();
    if std::fs::symlink_metadata(path)?.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// True when `segment` contains a glob metacharacter.
pub fn has_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

/// Matches a single path component against a shell pattern.
///
/// Supports `*`, `?`, bracket classes (`[abc]`, `[a-z]`, `[!x]`) and `\` escapes.
/// An unterminated `[` matches itself.
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let n: Vec<char> = name.chars().collect();

    let (mut pi, mut ni) = (0, 0);
    // pattern position after the last `*`, and the name position it is currently absorbing
    let mut star: Option<(usize, usize)> = None;

    while ni < n.len() {
        if pi < p.len() {
            match p[pi] {
                '*' => {
                    star = Some((pi + 1, ni));
                    pi += 1;
                    continue;
                }
                '?' => {
                    pi += 1;
                    ni += 1;
                    continue;
                }
                '[' => match match_class(&p, pi, n[ni]) {
                    Some((true, next)) => {
                        pi = next;
                        ni += 1;
                        continue;
                    }
                    Some((false, _)) => {}
                    None => {
                        if n[ni] == '[' {
                            pi += 1;
                            ni += 1;
                            continue;
                        }
                    }
                },
                '\\' if pi + 1 < p.len() => {
                    if p[pi + 1] == n[ni] {
                        pi += 2;
                        ni += 1;
                        continue;
                    }
                }
                c => {
                    if c == n[ni] {
                        pi += 1;
                        ni += 1;
                        continue;
                    }
                }
            }
        }

        // mismatch: let the last `*` swallow one more character
        match star {
            Some((sp, sn)) => {
                pi = sp;
                ni = sn + 1;
                star = Some((sp, sn + 1));
            }
            None => return false,
        }
    }

    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

/// Evaluates the bracket class starting at `p[start] == '['` against `ch`.
/// Returns whether it matched and the index just past the closing `]`,
/// or `None` when the class is unterminated.
fn match_class(p: &[char], start: usize, ch: char) -> Option<(bool, usize)> {
    let mut i = start + 1;
    let negate = matches!(p.get(i), Some('!') | Some('^'));
    if negate {
        i += 1;
    }

    let mut matched = false;
    let mut first = true;
    while i < p.len() {
        let c = p[i];
        if c == ']' && !first {
            return Some((matched != negate, i + 1));
        }
        first = false;
        if i + 2 < p.len() && p[i + 1] == '-' && p[i + 2] != ']' {
            if c <= ch && ch <= p[i + 2] {
                matched = true;
            }
            i += 3;
        } else {
            if c == ch {
                matched = true;
            }
            i += 1;
        }
    }
    None
}
