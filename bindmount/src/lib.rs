//! bindmount: scoped bind mounts.
//!
//! Attaches a source directory at a target path with `mount(2)` and
//! guarantees the matching `umount(2)` when the scope ends, whether it ends
//! normally, with an error, or by panicking.
//!
//! ```no_run
//! use bindmount::{BindMount, MountError};
//!
//! let mount = BindMount::new("/srv/data", "/mnt/data");
//! let listing = mount.scope(|handle| {
//!     let entries = std::fs::read_dir(handle.target())
//!         .map(|dir| dir.count())
//!         .unwrap_or(0);
//!     Ok::<_, MountError>(entries)
//! })?;
//! # let _ = listing;
//! # Ok::<(), MountError>(())
//! ```
//!
//! Errors from the implicit unmount at scope exit are logged through
//! `tracing` and otherwise dropped; a stale mount can be left behind in that
//! case. Call [`BindMountHandle::unmount`] to observe them.

pub mod errors;
mod fs;

pub use errors::{MountError, MountOp, MountResult};
pub use fs::{
    BindMount, BindMountConfig, BindMountHandle, MountSyscalls, NativeSyscalls, create_bind_mount,
};
