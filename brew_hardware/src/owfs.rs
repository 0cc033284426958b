//! One-wire bus access through an OWFS FUSE mount.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use brew_traits::{BoxError, OneWireBus};
use tracing::{debug, info, warn};

use crate::util::read_trimmed;

/// Default mount point used by `owfs`.
pub const DEFAULT_MOUNT: &str = "/mnt/1wire";

pub struct OwfsBus {
    mount: PathBuf,
    online: AtomicBool,
    resets: AtomicU64,
}

impl OwfsBus {
    pub fn new(mount: impl Into<PathBuf>) -> Self {
        let mount = mount.into();
        let online = mount.is_dir();
        if !online {
            warn!(mount = %mount.display(), "OWFS mount not present yet");
        }
        Self {
            mount,
            online: AtomicBool::new(online),
            resets: AtomicU64::new(0),
        }
    }

    pub fn mount(&self) -> &Path {
        &self.mount
    }

    /// Whether the mount was present at the last probe.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    pub fn reset_count(&self) -> u64 {
        self.resets.load(Ordering::Relaxed)
    }
}

impl OneWireBus for OwfsBus {
    fn read_path(&self, path: &str) -> Result<String, BoxError> {
        let full = self.mount.join(path);
        let value = read_trimmed(&full)?;
        debug!(path, value = %value, "owfs read");
        Ok(value)
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
        // The FUSE daemon reconnects on its own; re-probe so status reflects it.
        let online = self.mount.is_dir();
        self.online.store(online, Ordering::Relaxed);
        info!(mount = %self.mount.display(), online, "OWFS reset requested");
    }
}
