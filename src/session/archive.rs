//! `.tar.xz` archives, created and unpacked by the external `tar` program.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};

use super::Session;
use crate::core::{Error, Host, Result, utils};

const ARCHIVE_SUFFIX: &str = ".tar.xz";

// GNU tar: 1 means some files changed while being read, the archive is still written
const TAR_WARNING_STATUS: i32 = 1;

/// `name` without a trailing `.tar.xz`.
fn archive_stem(name: &str) -> &str {
    name.strip_suffix(ARCHIVE_SUFFIX).unwrap_or(name)
}

impl<H: Host> Session<H> {
    /// Packs `path` into `<archive_name>.tar.xz`, both relative to the cwd.
    /// A `.tar.xz` suffix on `archive_name` is optional.
    ///
    /// A relative `path` is stored relative to the cwd (tar strips any leading
    /// `../` from member names); an absolute one is stored as resolved.
    /// Returns the absolute archive path.
    pub fn compress<P: AsRef<Path>>(&self, path: P, archive_name: &str) -> Result<PathBuf> {
        let path = path.as_ref();
        let source = self.resolve(path);
        if !self.exists(&source) {
            return Err(Error::NotFound { path: source });
        }

        let mut member = if path.is_absolute() {
            source.clone()
        } else {
            utils::relative_to(&source, &self.cwd)
        };
        if member.as_os_str().is_empty() {
            member = PathBuf::from(".");
        }
        let archive = self.resolve(format!("{}{ARCHIVE_SUFFIX}", archive_stem(archive_name)));

        let mut command = Command::new(&self.options.tar);
        command
            .env("XZ_OPT", format!("-{}", self.options.xz_level))
            .arg("-cpJf")
            .arg(&archive)
            .arg(&member);
        self.run(&mut command, true)?;

        if !self.is_file(&archive) {
            return Err(Error::ArchiveNotCreated { archive });
        }
        info!("compressed {} into {}", source.display(), archive.display());
        Ok(archive)
    }

    /// Unpacks `<archive_name>.tar.xz` into a directory named after the
    /// archive (without its suffix), creating it when missing.
    pub fn extract(&self, archive_name: &str) -> Result<PathBuf> {
        self.extract_to(archive_name, archive_stem(archive_name))
    }

    /// Unpacks `<archive_name>.tar.xz` into `dir`, creating it when missing.
    /// Returns the absolute destination directory.
    pub fn extract_to<P: AsRef<Path>>(&self, archive_name: &str, dir: P) -> Result<PathBuf> {
        let archive = self.resolve(format!("{}{ARCHIVE_SUFFIX}", archive_stem(archive_name)));
        if !self.is_file(&archive) {
            return Err(Error::ArchiveNotFound { archive });
        }

        let dest = self.resolve(dir);
        if !self.is_dir(&dest) {
            self.mkdir(&dest)?;
        }

        let mut command = Command::new(&self.options.tar);
        command.arg("-xf").arg(&archive).arg("-C").arg(&dest);
        self.run(&mut command, false)?;

        info!("extracted {} into {}", archive.display(), dest.display());
        Ok(dest)
    }

    /// Runs `command` in the virtual cwd, mapping a failing exit status to an error.
    /// With `tolerate_warnings`, tar's warning status is logged instead; the
    /// caller then has to check the result on disk.
    fn run(&self, command: &mut Command, tolerate_warnings: bool) -> Result<()> {
        let program = command.get_program().to_string_lossy().into_owned();
        let output = command.current_dir(&self.cwd).output()?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();

        match output.status.code() {
            Some(0) => Ok(()),
            Some(TAR_WARNING_STATUS) if tolerate_warnings => {
                warn!("`{program}` finished with warnings: {stderr}");
                Ok(())
            }
            _ => Err(Error::CommandFailed {
                program,
                status: output.status.to_string(),
                stderr,
            }),
        }
    }
}
