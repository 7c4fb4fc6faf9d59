//! The `current` link pointing at the active runtime
//!
//! The link is either absent or points at exactly one directory. The only
//! transition is [`ActiveLink::switch_to`], an unconditional overwrite.
//! Nothing here consults the registry, so the two can drift apart.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::{LangmError, Result, paths};

/// A single-slot link to the active runtime directory
pub trait ActiveLink {
    /// Point the link at `target`, replacing whatever was there
    fn switch_to(&self, target: &Path) -> Result<()>;

    /// Where the link points, `None` if there is no link
    fn current(&self) -> Result<Option<PathBuf>>;

    /// Whether anything occupies the link path
    fn exists(&self) -> bool;

    /// The well-known link path
    fn link_path(&self) -> &Path;

    /// Directory that must be on PATH for the active runtime's executables
    fn bin_dir(&self) -> PathBuf {
        self.link_path().join("bin")
    }
}

/// Filesystem symlink (or junction on Windows) under the LangM directory
#[derive(Debug, Clone)]
pub struct SymlinkSwitcher {
    base_dir: PathBuf,
    link: PathBuf,
}

impl SymlinkSwitcher {
    /// Link named `current` inside `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let link = base_dir.join("current");
        Self { base_dir, link }
    }

    /// Link at the well-known location (~/.langm/current)
    #[must_use]
    pub fn default_location() -> Self {
        let link = paths::current_link_path();
        let base_dir = link
            .parent()
            .map_or_else(paths::langm_dir, Path::to_path_buf);
        Self { base_dir, link }
    }

    fn remove_existing(&self) -> io::Result<()> {
        match fs::remove_file(&self.link) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            // Directory symlinks and junctions are directories to Windows.
            #[cfg(windows)]
            Err(e) if is_link(&self.link) => fs::remove_dir(&self.link).or(Err(e)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(windows)]
fn is_link(path: &Path) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x400;
    fs::symlink_metadata(path)
        .is_ok_and(|m| m.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0)
}

/// Whether a link creation failure means the process lacks the symlink
/// privilege. Only Windows has one. A Unix `EACCES` stays an I/O error.
fn is_privilege_error(err: &io::Error) -> bool {
    // ERROR_PRIVILEGE_NOT_HELD
    const WINDOWS_PRIVILEGE_NOT_HELD: i32 = 1314;
    cfg!(windows) && err.raw_os_error() == Some(WINDOWS_PRIVILEGE_NOT_HELD)
}

#[cfg(unix)]
fn create_dir_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_dir_link(target: &Path, link: &Path) -> io::Result<()> {
    match std::os::windows::fs::symlink_dir(target, link) {
        Err(e) if is_privilege_error(&e) => {
            tracing::debug!("Directory symlink refused ({e}), trying a junction");
            create_junction(target, link).or(Err(e))
        }
        other => other,
    }
}

#[cfg(windows)]
fn create_junction(target: &Path, link: &Path) -> io::Result<()> {
    let (Some(link_str), Some(target_str)) = (link.to_str(), target.to_str()) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "junction paths must be valid UTF-8",
        ));
    };
    if link_str.contains('"') || target_str.contains('"') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "junction paths must not contain quotes",
        ));
    }

    let output = std::process::Command::new("cmd")
        .args(["/C", &format!(r#"mklink /J "{link_str}" "{target_str}""#)])
        .output()?;
    if output.status.success() {
        return Ok(());
    }
    Err(io::Error::other(format!(
        "mklink /J failed: {}",
        String::from_utf8_lossy(&output.stderr).trim()
    )))
}

#[cfg(not(any(unix, windows)))]
fn create_dir_link(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "directory links are not supported on this platform",
    ))
}

impl ActiveLink for SymlinkSwitcher {
    fn switch_to(&self, target: &Path) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;
        self.remove_existing()?;

        create_dir_link(target, &self.link).map_err(|source| {
            if is_privilege_error(&source) {
                LangmError::InsufficientPrivilege {
                    link: self.link.clone(),
                    source,
                }
            } else {
                LangmError::Io(source)
            }
        })?;

        tracing::debug!("Linked {} -> {}", self.link.display(), target.display());
        Ok(())
    }

    fn current(&self) -> Result<Option<PathBuf>> {
        match fs::read_link(&self.link) {
            Ok(target) => Ok(Some(target)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self) -> bool {
        fs::symlink_metadata(&self.link).is_ok()
    }

    fn link_path(&self) -> &Path {
        &self.link
    }
}
