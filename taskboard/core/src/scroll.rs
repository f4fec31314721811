use std::fmt;
use std::sync::Arc;

/// Host hook that freezes or releases page scrolling behind a full-screen overlay.
pub trait ScrollControl: Send + Sync {
    fn set_scroll_locked(&self, locked: bool);
}

/// For hosts with nothing to lock, such as a terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScrollControl;

impl ScrollControl for NoScrollControl {
    fn set_scroll_locked(&self, _locked: bool) {}
}

/// Held while the search overlay is open. Scrolling is released when it drops.
pub struct ScrollLock {
    control: Arc<dyn ScrollControl>,
}

impl ScrollLock {
    pub fn acquire(control: Arc<dyn ScrollControl>) -> Self {
        control.set_scroll_locked(true);
        Self { control }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.control.set_scroll_locked(false);
    }
}

impl fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLock").finish_non_exhaustive()
    }
}
