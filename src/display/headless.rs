use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;

use super::Display;
use crate::frame::Frame;

/// Display without a window, for servers and CI.
///
/// Quit is signalled through a shared flag, usually set by a Ctrl-C handler.
pub struct HeadlessDisplay {
    quit: Arc<AtomicBool>,
    frames_shown: u64,
}

impl HeadlessDisplay {
    pub fn new(quit: Arc<AtomicBool>) -> Self {
        Self {
            quit,
            frames_shown: 0,
        }
    }

    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }
}

impl Display for HeadlessDisplay {
    fn show(&mut self, frame: &Frame) -> Result<()> {
        self.frames_shown += 1;
        log::trace!(
            "headless: frame {} ({}x{})",
            self.frames_shown,
            frame.width(),
            frame.height()
        );
        Ok(())
    }

    fn quit_requested(&mut self) -> Result<bool> {
        Ok(self.quit.load(Ordering::SeqCst))
    }
}
