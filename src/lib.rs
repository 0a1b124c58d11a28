//! Filesystem shell helpers around a virtual current working directory.
//!
//! ### Overview
//!
//! `cwd-kit` gives you `cd`, `pwd`, `touch`, `mkdir`, `rm`, `cp`, `mv`, `ln -s`,
//! `cat`, `ls`, globbing and `.tar.xz` archives as method calls on a [`Session`].
//! A session keeps its own working directory: `cd()` never changes the
//! directory of the process, and every relative path is resolved against the
//! session instead.
//!
//! **Key ideas**:
//! - **Lexical resolution**: paths are joined and normalized without touching the disk.
//! - **Checked navigation**: `cd()` into something that is not a directory is an error,
//!   and the working directory stays where it was.
//! - **Pluggable truth**: the session asks a [`Host`] what exists; [`LocalHost`] asks the
//!   local machine, tests can answer from memory.
//! - **Native calls**: only archives spawn a process (`tar`).

mod config;
mod core;
mod session;

pub use config::{Options, TAR_ENV, XZ_LEVEL_ENV};
pub use crate::core::{Error, Host, LocalHost, Result};
pub use session::{Entry, EntryType, Session};
