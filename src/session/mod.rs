//! The virtual working directory and everything built on top of it.
//!
//! A [`Session`] keeps its own notion of "current directory", independent of
//! the process working directory, and resolves every relative path against
//! it before touching the filesystem.
//!
//! ### Key Features:
//! - **Lexical resolution**: `resolve()` joins and normalizes, never fails and
//!   never looks at the disk.
//! - **Checked navigation**: `cd()` only commits a target the [`Host`] reports
//!   as a directory, and reports every rejected target as an error.
//! - **Independent sessions**: no global state; two sessions never see each
//!   other's cwd.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::Options;
use crate::core::{Error, Host, LocalHost, Result, utils};

mod archive;
mod entry;
mod glob;
mod ops;
mod probe;

pub use entry::{Entry, EntryType};

/// A virtual working directory bound to a [`Host`].
///
/// ### Invariants
///
/// - `cwd` is always absolute and normalized.
/// - `cwd` changes only through `cd()`, and only to a path the host reported
///   as a directory (or to `/` and the home directory, which are taken as given).
///
/// ### Example:
/// ```no_run
/// use cwd_kit::Session;
///
/// let mut session = Session::new().unwrap();
/// session.mkdir("build/out").unwrap();
/// session.cd("build").unwrap();
/// assert!(session.cwd().ends_with("build"));
/// assert!(session.cd("missing").is_err());
/// ```
pub struct Session<H: Host = LocalHost> {
    host: H,
    cwd: PathBuf, // absolute normalized path
    options: Options,
}

impl Session<LocalHost> {
    /// Session on the local machine starting at the process working directory,
    /// configured from the environment.
    pub fn new() -> Result<Self> {
        Ok(Session::with_host(LocalHost)?.with_options(Options::from_env()))
    }
}

impl<H: Host> Session<H> {
    /// Starts at the working directory reported by `host`.
    pub fn with_host(host: H) -> Result<Self> {
        let cwd = host.current_dir()?;
        Self::with_cwd(host, cwd)
    }

    /// Starts at an explicit `cwd`, which must be absolute.
    /// Its existence is not checked.
    pub fn with_cwd<P: AsRef<Path>>(host: H, cwd: P) -> Result<Self> {
        let cwd = cwd.as_ref();
        if !cwd.is_absolute() {
            return Err(Error::InvalidPath {
                path: cwd.to_path_buf(),
                reason: "the working directory must be absolute".into(),
            });
        }
        Ok(Self {
            host,
            cwd: utils::normalize(cwd),
            options: Options::default(),
        })
    }

    /// Replaces the options, typically right after construction.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Options in effect for archive operations.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The host answering existence checks and lookups.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Current virtual working directory.
    pub fn cwd(&self) -> &Path {
        self.cwd.as_path()
    }

    /// Same as [`cwd`](Self::cwd).
    pub fn pwd(&self) -> &Path {
        self.cwd()
    }

    /// Resolves `path` against the cwd without touching the filesystem.
    ///
    /// An empty `path` yields the cwd itself. An absolute `path` replaces
    /// the cwd. The result is always absolute and normalized.
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return self.cwd.clone();
        }
        utils::normalize(self.cwd.join(path))
    }

    /// The home directory, with `path` appended when it is not empty.
    /// A lookup that is missing or not absolute is `HomeUnavailable`.
    pub fn home<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let home = self
            .host
            .home_dir()
            .filter(|home| home.is_absolute())
            .ok_or(Error::HomeUnavailable)?;
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Ok(utils::normalize(home));
        }
        Ok(utils::normalize(home.join(path)))
    }

    /// Changes the current working directory.
    ///
    /// * `/` and `~/` (or `~`) are committed unconditionally.
    /// * `~/<sub>` is resolved against the home directory.
    /// * anything else is resolved against the cwd.
    ///
    /// Except for the two unconditional tokens, the target must be a directory
    /// according to the host. Otherwise `DirectoryNotFound` (nothing usable
    /// there) or `NotADirectory` (a file) is returned and the cwd is unchanged.
    pub fn cd<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();

        let target = match path.to_str() {
            Some("/") => {
                self.set_cwd(PathBuf::from("/"));
                return Ok(());
            }
            Some("~") | Some("~/") => {
                let home = self.home("")?;
                self.set_cwd(home);
                return Ok(());
            }
            Some(s) if s.starts_with("~/") => self.home(&s[2..])?,
            _ => self.resolve(path),
        };

        if self.host.is_dir(&target) {
            self.set_cwd(target);
            return Ok(());
        }

        warn!(
            "cd {} rejected, cwd stays {}",
            target.display(),
            self.cwd.display()
        );
        if self.host.is_file(&target) {
            Err(Error::NotADirectory { path: target })
        } else {
            Err(Error::DirectoryNotFound { path: target })
        }
    }

    fn set_cwd(&mut self, cwd: PathBuf) {
        debug!("cwd {} -> {}", self.cwd.display(), cwd.display());
        self.cwd = cwd;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempdir::TempDir;

    /// In-memory host: nothing exists unless inserted.
    #[derive(Default)]
    struct FakeHost {
        cwd: PathBuf,
        home: Option<PathBuf>,
        dirs: HashSet<PathBuf>,
        files: HashSet<PathBuf>,
    }

    impl Host for FakeHost {
        fn current_dir(&self) -> Result<PathBuf> {
            Ok(self.cwd.clone())
        }

        fn home_dir(&self) -> Option<PathBuf> {
            self.home.clone()
        }

        fn is_file(&self, path: &Path) -> bool {
            self.files.contains(path)
        }

        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.contains(path)
        }

        fn is_symlink(&self, _path: &Path) -> bool {
            false
        }
    }

    fn home_user_session() -> Session<FakeHost> {
        let mut host = FakeHost {
            cwd: PathBuf::from("/home/user"),
            home: Some(PathBuf::from("/home/user")),
            ..Default::default()
        };
        for dir in ["/", "/home", "/home/user", "/tmp"] {
            host.dirs.insert(PathBuf::from(dir));
        }
        Session::with_host(host).unwrap()
    }

    mod creations {
        use super::*;

        #[test]
        fn test_starts_at_host_cwd() {
            let session = home_user_session();
            assert_eq!(session.cwd(), Path::new("/home/user"));
            assert_eq!(session.pwd(), Path::new("/home/user"));
        }

        #[test]
        fn test_host_cwd_is_normalized() {
            let host = FakeHost {
                cwd: PathBuf::from("/home/user/./projects/../"),
                ..Default::default()
            };
            let session = Session::with_host(host).unwrap();
            assert_eq!(session.cwd(), Path::new("/home/user"));
        }

        #[test]
        fn test_relative_cwd_rejected() {
            let result = Session::with_cwd(FakeHost::default(), "relative/dir");
            assert!(matches!(result, Err(Error::InvalidPath { .. })));
        }

        #[test]
        fn test_default_options() {
            let session = home_user_session();
            assert_eq!(session.options(), &Options::default());
        }

        #[test]
        fn test_sessions_are_independent() {
            let mut first = home_user_session();
            let second = home_user_session();
            first.cd("/tmp").unwrap();
            assert_eq!(first.cwd(), Path::new("/tmp"));
            assert_eq!(second.cwd(), Path::new("/home/user"));
        }
    }

    mod resolve {
        use super::*;

        #[test]
        fn test_resolve_empty_returns_cwd() {
            let session = home_user_session();
            assert_eq!(session.resolve(""), session.cwd());
        }

        #[test]
        fn test_resolve_relative() {
            let session = home_user_session();
            assert_eq!(session.resolve("docs"), PathBuf::from("/home/user/docs"));
            assert_eq!(session.resolve("./docs/"), PathBuf::from("/home/user/docs"));
            assert_eq!(session.resolve("a//b/../c"), PathBuf::from("/home/user/a/c"));
            assert_eq!(session.resolve(".."), PathBuf::from("/home"));
            assert_eq!(session.resolve("../../../.."), PathBuf::from("/"));
        }

        #[test]
        fn test_resolve_absolute_replaces_cwd() {
            let session = home_user_session();
            assert_eq!(session.resolve("/etc/./hosts"), PathBuf::from("/etc/hosts"));
        }

        #[test]
        fn test_resolve_does_not_check_existence() {
            let session = home_user_session();
            assert!(!session.host().is_dir(&session.resolve("nowhere")));
            assert_eq!(session.resolve("nowhere"), PathBuf::from("/home/user/nowhere"));
        }
    }

    mod cd {
        use super::*;

        #[test]
        fn test_cd_root_is_unconditional() {
            let mut session = home_user_session();
            session.host.dirs.clear();
            session.cd("/").unwrap();
            assert_eq!(session.cwd(), Path::new("/"));
            session.cd("/").unwrap();
            assert_eq!(session.cwd(), Path::new("/"));
        }

        #[test]
        fn test_cd_home_tokens() {
            let mut session = home_user_session();
            session.cd("/").unwrap();
            session.cd("~/").unwrap();
            assert_eq!(session.cwd(), Path::new("/home/user"));

            session.cd("/").unwrap();
            session.cd("~").unwrap();
            assert_eq!(session.cwd(), Path::new("/home/user"));
        }

        #[test]
        fn test_cd_home_unavailable() {
            let mut session = home_user_session();
            session.host.home = None;
            session.cd("/tmp").unwrap();
            let result = session.cd("~/");
            assert!(matches!(result, Err(Error::HomeUnavailable)));
            assert_eq!(session.cwd(), Path::new("/tmp"));
        }

        #[test]
        fn test_cd_relative_home_rejected() {
            let mut session = home_user_session();
            session.host.home = Some(PathBuf::from("relative/home"));
            session.cd("/tmp").unwrap();

            assert!(matches!(session.cd("~/"), Err(Error::HomeUnavailable)));
            assert!(matches!(session.cd("~"), Err(Error::HomeUnavailable)));
            assert_eq!(session.cwd(), Path::new("/tmp"));
            assert!(session.cwd().is_absolute());
        }

        #[test]
        fn test_cd_below_home() {
            let mut session = home_user_session();
            session.host.dirs.insert(PathBuf::from("/home/user/projects"));
            session.cd("/tmp").unwrap();
            session.cd("~/projects").unwrap();
            assert_eq!(session.cwd(), Path::new("/home/user/projects"));
        }

        #[test]
        fn test_cd_missing_dir_keeps_cwd() {
            let mut session = home_user_session();

            let first = session.cd("missing-dir");
            assert!(matches!(first, Err(Error::DirectoryNotFound { ref path }) if path == Path::new("/home/user/missing-dir")));
            assert_eq!(session.cwd(), Path::new("/home/user"));

            let second = session.cd("missing-dir");
            assert!(second.is_err());
            assert_eq!(session.cwd(), Path::new("/home/user"));
        }

        #[test]
        fn test_cd_into_created_dir() {
            let mut session = home_user_session();
            session.host.dirs.insert(PathBuf::from("/home/user/sub"));
            session.cd("sub").unwrap();
            assert_eq!(session.cwd(), Path::new("/home/user/sub"));
        }

        #[test]
        fn test_cd_into_file() {
            let mut session = home_user_session();
            session.host.files.insert(PathBuf::from("/home/user/notes.txt"));
            let result = session.cd("notes.txt");
            assert!(matches!(result, Err(Error::NotADirectory { .. })));
            assert_eq!(session.cwd(), Path::new("/home/user"));
        }

        #[test]
        fn test_cd_round_trip() {
            let mut session = home_user_session();
            session.host.dirs.insert(PathBuf::from("/home/user/dir-a"));

            session.cd("dir-a").unwrap();
            let entered = session.cwd().to_path_buf();
            session.cd("..").unwrap();
            assert_eq!(session.cwd(), Path::new("/home/user"));
            session.cd("dir-a").unwrap();
            assert_eq!(session.cwd(), entered);
        }

        #[test]
        fn test_cd_current_and_empty() {
            let mut session = home_user_session();
            session.cd(".").unwrap();
            assert_eq!(session.cwd(), Path::new("/home/user"));
            session.cd("").unwrap();
            assert_eq!(session.cwd(), Path::new("/home/user"));
        }

        #[test]
        fn test_cd_parent_of_root() {
            let mut session = home_user_session();
            session.cd("/").unwrap();
            session.cd("../..").unwrap();
            assert_eq!(session.cwd(), Path::new("/"));
        }

        #[test]
        fn test_cd_on_local_host() {
            let temp_dir = TempDir::new("session_test").unwrap();
            std::fs::create_dir_all(temp_dir.path().join("a/b")).unwrap();

            let mut session = Session::with_cwd(LocalHost, temp_dir.path()).unwrap();
            session.cd("a/b").unwrap();
            assert_eq!(session.cwd(), temp_dir.path().join("a/b"));
            session.cd("../..").unwrap();
            assert_eq!(session.cwd(), temp_dir.path());
            assert!(session.cd("a/c").is_err());
            assert_eq!(session.cwd(), temp_dir.path());
        }
    }

    mod home {
        use super::*;

        #[test]
        fn test_home_plain() {
            let session = home_user_session();
            assert_eq!(session.home("").unwrap(), PathBuf::from("/home/user"));
        }

        #[test]
        fn test_home_with_path() {
            let session = home_user_session();
            assert_eq!(
                session.home("docs/../test-data").unwrap(),
                PathBuf::from("/home/user/test-data")
            );
        }

        #[test]
        fn test_home_must_be_absolute() {
            let mut session = home_user_session();
            session.host.home = Some(PathBuf::from("relative/home"));
            assert!(matches!(session.home(""), Err(Error::HomeUnavailable)));
            assert!(matches!(session.home("docs"), Err(Error::HomeUnavailable)));
        }

        #[test]
        fn test_home_unavailable() {
            let session = Session::with_cwd(FakeHost::default(), "/").unwrap();
            assert!(matches!(session.home(""), Err(Error::HomeUnavailable)));
        }
    }
}
