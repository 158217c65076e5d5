//! Bind mount implementation.
//!
//! A [`BindMount`] attaches `source` at `target` with `mount(2)` and
//! `MS_BIND`, and hands back a [`BindMountHandle`] that detaches with
//! `umount(2)` when dropped. State is either unmounted (no handle) or
//! mounted (one live handle); a failed attach never yields a handle, so no
//! detach is attempted for it.
//!
//! The caller must already hold CAP_SYS_ADMIN. Nothing here creates mount
//! namespaces or changes propagation.

use nix::errno::Errno;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::errors::{MountError, MountResult};

// Re-exports
pub use config::BindMountConfig;
pub use handle::BindMountHandle;
pub use native::NativeSyscalls;

mod config;
mod handle;
mod native;

/// The two kernel calls a bind mount needs, plus the read-only remount.
///
/// A table is built once per [`BindMount`] and shared with every handle it
/// produces. Implementations return the errno of the failing call as-is.
pub trait MountSyscalls: Send + Sync {
    /// `mount(source, target, NULL, MS_BIND, NULL)`.
    fn bind(&self, source: &Path, target: &Path) -> Result<(), Errno>;

    /// `mount(NULL, target, NULL, MS_BIND | MS_REMOUNT | MS_RDONLY, NULL)`.
    fn remount_read_only(&self, target: &Path) -> Result<(), Errno>;

    /// `umount(target)`.
    fn unmount(&self, target: &Path) -> Result<(), Errno>;
}

/// A bind mount that is attached for the duration of a scope.
///
/// Construction is lazy: the kernel is only called by [`mount`](Self::mount)
/// or [`scope`](Self::scope).
pub struct BindMount {
    config: BindMountConfig,
    syscalls: Arc<dyn MountSyscalls>,
}

impl BindMount {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self::from_config(BindMountConfig::new(source, target))
    }

    pub fn from_config(config: BindMountConfig) -> Self {
        Self::with_syscalls(config, Arc::new(NativeSyscalls))
    }

    /// Use a custom binding table instead of the kernel's.
    pub fn with_syscalls(config: BindMountConfig, syscalls: Arc<dyn MountSyscalls>) -> Self {
        Self { config, syscalls }
    }

    pub fn config(&self) -> &BindMountConfig {
        &self.config
    }

    /// Attach the mount and return the handle that owns it.
    ///
    /// With `read_only`, a failed remount undoes the bind before returning,
    /// so an error here always means nothing is left mounted by this call.
    pub fn mount(&self) -> MountResult<BindMountHandle> {
        let source = self.config.source();
        let target = self.config.target();

        self.syscalls.bind(source, target).map_err(|errno| {
            let err = MountError::attach(errno, source, target);
            hint_missing_capability(errno);
            err
        })?;

        if self.config.is_read_only() {
            self.remount_read_only(target)?;
        }

        debug!(
            source = %source.display(),
            target = %target.display(),
            read_only = self.config.is_read_only(),
            "Native bind mount created"
        );

        Ok(BindMountHandle::new(
            target.to_path_buf(),
            Arc::clone(&self.syscalls),
        ))
    }

    /// Run `body` with the mount attached, then detach.
    ///
    /// If attaching fails the body is not run. The detach on the way out
    /// happens whether the body returns `Ok`, `Err`, or panics; its own
    /// failure is logged and dropped so the body's result is what the caller
    /// sees.
    pub fn scope<R, E, F>(&self, body: F) -> Result<R, E>
    where
        F: FnOnce(&BindMountHandle) -> Result<R, E>,
        E: From<MountError>,
    {
        let handle = self.mount()?;
        let result = body(&handle);
        drop(handle);
        result
    }

    fn remount_read_only(&self, target: &Path) -> MountResult<()> {
        self.syscalls.remount_read_only(target).map_err(|errno| {
            let err = MountError::remount(errno, target);
            // Cleanup on failure
            if let Err(undo) = self.syscalls.unmount(target) {
                tracing::warn!(
                    target = %target.display(),
                    error = %MountError::detach(undo, target),
                    "Failed to undo bind mount after read-only remount failed"
                );
            }
            err
        })?;

        debug!(target = %target.display(), "Bind mount remounted read-only");
        Ok(())
    }
}

impl fmt::Debug for BindMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindMount")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Create a bind mount using the kernel's mount calls.
pub fn create_bind_mount(config: &BindMountConfig) -> MountResult<BindMountHandle> {
    BindMount::from_config(config.clone()).mount()
}

fn hint_missing_capability(errno: Errno) {
    if errno == Errno::EPERM && !has_cap_sys_admin() {
        debug!("Bind mount denied: CAP_SYS_ADMIN is not in the effective set");
    }
}

#[cfg(target_os = "linux")]
fn has_cap_sys_admin() -> bool {
    caps::has_cap(
        None,
        caps::CapSet::Effective,
        caps::Capability::CAP_SYS_ADMIN,
    )
    .unwrap_or(false)
}

#[cfg(not(target_os = "linux"))]
fn has_cap_sys_admin() -> bool {
    false
}
