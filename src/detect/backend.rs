use anyhow::Result;

use crate::detect::result::Detection;
use crate::detect::vocabulary::{ClassAllowList, Vocabulary};
use crate::frame::Frame;

/// Detector backend trait.
///
/// A backend wraps one pretrained model. It reports raw detections for the
/// classes in the allow-list and leaves confidence thresholding to callers.
pub trait DetectorBackend {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Classes the model can report, in output order.
    fn vocabulary(&self) -> &Vocabulary;

    /// Run detection on a frame.
    ///
    /// Backends whose model cannot be restricted up front must drop
    /// detections outside `allow` before returning.
    fn detect(&mut self, frame: &Frame, allow: &ClassAllowList) -> Result<Vec<Detection>>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
