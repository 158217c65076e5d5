//! Error type for bind mount operations.

use nix::errno::Errno;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type MountResult<T> = Result<T, MountError>;

/// Which platform call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOp {
    /// `mount(2)` with `MS_BIND`.
    Attach,
    /// `umount(2)` on the mount point.
    Detach,
    /// `mount(2)` with `MS_REMOUNT | MS_RDONLY` after a read-only bind.
    Remount,
}

impl fmt::Display for MountOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountOp::Attach => f.write_str("attach"),
            MountOp::Detach => f.write_str("detach"),
            MountOp::Remount => f.write_str("remount"),
        }
    }
}

/// A failed mount or unmount call.
///
/// The message is rendered when the error is built, from the errno returned
/// by the failing call itself, so later calls cannot change what it reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MountError {
    op: MountOp,
    errno: Errno,
    message: String,
    source_path: Option<PathBuf>,
    target: PathBuf,
}

impl MountError {
    pub fn attach(errno: Errno, source: &Path, target: &Path) -> Self {
        Self {
            op: MountOp::Attach,
            errno,
            message: format!(
                "Could not bind mount {} to {}: {}",
                source.display(),
                target.display(),
                errno
            ),
            source_path: Some(source.to_path_buf()),
            target: target.to_path_buf(),
        }
    }

    pub fn detach(errno: Errno, target: &Path) -> Self {
        Self {
            op: MountOp::Detach,
            errno,
            message: format!("Could not unmount {}: {}", target.display(), errno),
            source_path: None,
            target: target.to_path_buf(),
        }
    }

    pub fn remount(errno: Errno, target: &Path) -> Self {
        Self {
            op: MountOp::Remount,
            errno,
            message: format!(
                "Could not remount {} read-only: {}",
                target.display(),
                errno
            ),
            source_path: None,
            target: target.to_path_buf(),
        }
    }

    pub fn op(&self) -> MountOp {
        self.op
    }

    pub fn errno(&self) -> Errno {
        self.errno
    }

    /// Numeric platform error code.
    pub fn raw_os_error(&self) -> i32 {
        self.errno as i32
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source directory, only known for attach failures.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl From<MountError> for io::Error {
    fn from(err: MountError) -> Self {
        let kind = io::Error::from(err.errno).kind();
        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_message_names_errno_and_paths() {
        let err = MountError::attach(
            Errno::ENOENT,
            Path::new("/nonexistent-xyz"),
            Path::new("/mnt/target"),
        );

        let msg = err.to_string();
        assert!(msg.contains("/nonexistent-xyz"));
        assert!(msg.contains("/mnt/target"));
        assert!(msg.contains("ENOENT"));
        assert!(msg.contains(Errno::ENOENT.desc()));
        assert_eq!(err.op(), MountOp::Attach);
        assert_eq!(err.raw_os_error(), Errno::ENOENT as i32);
        assert_eq!(err.source_path(), Some(Path::new("/nonexistent-xyz")));
    }

    #[test]
    fn test_detach_message_has_no_source() {
        let err = MountError::detach(Errno::EBUSY, Path::new("/mnt/busy"));

        assert_eq!(err.op(), MountOp::Detach);
        assert!(err.source_path().is_none());
        assert_eq!(err.target(), Path::new("/mnt/busy"));
        assert!(err.message().starts_with("Could not unmount /mnt/busy"));
        assert!(err.message().contains("EBUSY"));
    }

    #[test]
    fn test_into_io_error_keeps_kind() {
        let err = MountError::attach(Errno::ENOENT, Path::new("/a"), Path::new("/b"));
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
        assert!(io_err.to_string().contains("Could not bind mount /a to /b"));

        let err = MountError::detach(Errno::EPERM, Path::new("/b"));
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);
    }
}
