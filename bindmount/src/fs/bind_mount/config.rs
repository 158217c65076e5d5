//! Bind mount configuration.

use std::path::{Path, PathBuf};

/// Configuration for creating a bind mount.
///
/// Holds only paths; nothing touches the filesystem until the mount is
/// attached. Neither path is checked for existence here, the kernel reports
/// that when `mount(2)` runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMountConfig {
    source: PathBuf,
    target: PathBuf,
    read_only: bool,
}

impl BindMountConfig {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            read_only: false,
        }
    }

    /// Remount the bind read-only once it is attached.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Flags passed to `mount(2)` for the initial attach.
    #[cfg(target_os = "linux")]
    pub fn flags(&self) -> nix::mount::MsFlags {
        nix::mount::MsFlags::MS_BIND
    }
}
