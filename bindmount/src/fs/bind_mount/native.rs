//! Native bind mount using mount(2) syscall.
//!
//! Requires CAP_SYS_ADMIN capability.

use nix::errno::Errno;
use std::path::Path;

use super::MountSyscalls;

/// Binding table backed by the kernel's `mount(2)` and `umount(2)`.
///
/// Each call returns the errno produced by that call, read before anything
/// else runs on the thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeSyscalls;

#[cfg(target_os = "linux")]
impl MountSyscalls for NativeSyscalls {
    fn bind(&self, source: &Path, target: &Path) -> Result<(), Errno> {
        use nix::mount::{MsFlags, mount};

        mount(
            Some(source),
            target,
            None::<&str>,
            MsFlags::MS_BIND,
            None::<&str>,
        )
    }

    fn remount_read_only(&self, target: &Path) -> Result<(), Errno> {
        use nix::mount::{MsFlags, mount};

        mount(
            None::<&str>,
            target,
            None::<&str>,
            MsFlags::MS_BIND | MsFlags::MS_REMOUNT | MsFlags::MS_RDONLY,
            None::<&str>,
        )
    }

    fn unmount(&self, target: &Path) -> Result<(), Errno> {
        nix::mount::umount(target)
    }
}

#[cfg(not(target_os = "linux"))]
impl MountSyscalls for NativeSyscalls {
    fn bind(&self, _source: &Path, _target: &Path) -> Result<(), Errno> {
        Err(Errno::ENOSYS)
    }

    fn remount_read_only(&self, _target: &Path) -> Result<(), Errno> {
        Err(Errno::ENOSYS)
    }

    fn unmount(&self, _target: &Path) -> Result<(), Errno> {
        Err(Errno::ENOSYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_unmount_of_plain_directory_fails() {
        // A directory that is not a mount point can never be unmounted:
        // EINVAL with privileges, EPERM without.
        let dir = tempdir().unwrap();
        let err = NativeSyscalls.unmount(dir.path()).unwrap_err();
        assert_ne!(err, Errno::UnknownErrno);
        assert!(dir.path().exists());
    }

    #[test]
    fn test_bind_missing_source_fails() {
        let target = tempdir().unwrap();
        let missing = target.path().join("does-not-exist");
        assert!(NativeSyscalls.bind(&missing, target.path()).is_err());
    }
}
