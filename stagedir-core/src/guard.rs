use crate::scratch::ScratchDirs;
use stagedir_hal::ScratchHal;

/// RAII guard that cleans up a scratch tree when dropped.
pub struct ScratchGuard<'a, H: ScratchHal> {
    scratch: &'a ScratchDirs<H>,
    active: bool,
}

impl<'a, H: ScratchHal> ScratchGuard<'a, H> {
    pub fn new(scratch: &'a ScratchDirs<H>) -> Self {
        Self {
            scratch,
            active: true,
        }
    }

    /// Keep the scratch tree on disk.
    pub fn release(mut self) {
        self.active = false;
    }

    pub fn scratch(&self) -> &ScratchDirs<H> {
        self.scratch
    }
}

impl<H: ScratchHal> Drop for ScratchGuard<'_, H> {
    fn drop(&mut self) {
        if self.active {
            self.scratch.cleanup();
        }
    }
}
