//! Filesystem utilities for host-side operations.

mod bind_mount;

pub use bind_mount::{
    BindMount, BindMountConfig, BindMountHandle, MountSyscalls, NativeSyscalls, create_bind_mount,
};
