//! Display collaborators.
//!
//! - `HeadlessDisplay`: no window; logs frames and stops on Ctrl-C
//! - `HighGuiDisplay`: OpenCV window with a mouse hook (feature: display-highgui)

mod headless;
#[cfg(feature = "display-highgui")]
mod highgui;

use anyhow::Result;

use crate::frame::Frame;

pub use headless::HeadlessDisplay;
#[cfg(feature = "display-highgui")]
pub use highgui::HighGuiDisplay;

/// Key that ends the frame loop.
pub const QUIT_KEY: char = 'q';

/// Shows annotated frames and reports the user's quit signal.
pub trait Display {
    fn show(&mut self, frame: &Frame) -> Result<()>;

    /// Poll input once; true when the user asked to quit.
    fn quit_requested(&mut self) -> Result<bool>;
}
