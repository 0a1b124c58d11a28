//! Session configuration.
//!
//! Only the archive operations are configurable: which `tar` program to
//! spawn and how hard `xz` should compress.

use std::path::PathBuf;

use log::warn;

/// Environment variable overriding the `tar` program.
pub const TAR_ENV: &str = "CWD_KIT_TAR";
/// Environment variable overriding the xz compression level.
pub const XZ_LEVEL_ENV: &str = "CWD_KIT_XZ_LEVEL";

const MAX_XZ_LEVEL: u8 = 9;

/// Options shared by all operations of a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Program used for `compress` and `extract`.
    pub tar: PathBuf,
    /// Passed to xz as `XZ_OPT=-<level>`, 0..=9.
    pub xz_level: u8,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tar: PathBuf::from("tar"),
            xz_level: MAX_XZ_LEVEL,
        }
    }
}

impl Options {
    /// Defaults overridden by `CWD_KIT_TAR` and `CWD_KIT_XZ_LEVEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the environment keys.
    /// Unusable values are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(tar) = lookup(TAR_ENV) {
            if tar.trim().is_empty() {
                warn!("{TAR_ENV} is empty, using `{}`", options.tar.display());
            } else {
                options.tar = PathBuf::from(tar);
            }
        }

        if let Some(level) = lookup(XZ_LEVEL_ENV) {
            match level.trim().parse::<u8>() {
                Ok(level) if level <= MAX_XZ_LEVEL => options.xz_level = level,
                _ => warn!(
                    "ignoring {XZ_LEVEL_ENV}={level:?}, expected 0..={MAX_XZ_LEVEL}"
                ),
            }
        }

        options
    }
}
