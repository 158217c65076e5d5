//! Bind mount handle with RAII cleanup.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::MountSyscalls;
use crate::errors::{MountError, MountResult};

/// Handle to an active bind mount that unmounts on drop.
///
/// Only the mount point is kept; `umount(2)` does not need the source.
/// Detach is issued at most once per handle. [`unmount`](Self::unmount)
/// consumes the handle, so a second explicit detach does not compile:
///
/// ```compile_fail
/// fn detach_twice(handle: bindmount::BindMountHandle) {
///     let _ = handle.unmount();
///     let _ = handle.unmount();
/// }
/// ```
pub struct BindMountHandle {
    target: PathBuf,
    syscalls: Arc<dyn MountSyscalls>,
    mounted: bool,
}

impl BindMountHandle {
    pub(super) fn new(target: PathBuf, syscalls: Arc<dyn MountSyscalls>) -> Self {
        Self {
            target,
            syscalls,
            mounted: true,
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Explicitly unmount, reporting any failure. Called automatically on drop,
    /// where failures are only logged.
    pub fn unmount(mut self) -> MountResult<()> {
        self.do_unmount()
    }

    fn do_unmount(&mut self) -> MountResult<()> {
        if !self.mounted {
            return Ok(());
        }
        // The handle is spent even if umount(2) fails.
        self.mounted = false;

        self.syscalls
            .unmount(&self.target)
            .map_err(|errno| MountError::detach(errno, &self.target))?;

        debug!(target = %self.target.display(), "Native bind mount unmounted");
        Ok(())
    }
}

impl fmt::Debug for BindMountHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindMountHandle")
            .field("target", &self.target)
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl Drop for BindMountHandle {
    fn drop(&mut self) {
        // Never propagate from here: the scope may already be unwinding with
        // its own error. A failure leaves a stale mount at the target.
        if let Err(e) = self.do_unmount() {
            tracing::warn!(
                target = %self.target.display(),
                error = %e,
                "Failed to unmount bind mount on drop"
            );
        }
    }
}
