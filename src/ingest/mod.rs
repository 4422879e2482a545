//! Frame ingestion sources.
//!
//! - Synthetic `stub://` source (always available, optionally finite)
//! - USB/V4L2 webcams (feature: ingest-v4l2)
//!
//! `next_frame` returns `Ok(None)` at end of stream. The frame loop treats
//! both end of stream and read errors as the end of the run; only a failure
//! to connect is fatal.

#[cfg(feature = "ingest-v4l2")]
mod normalize;
pub mod synthetic;
#[cfg(feature = "ingest-v4l2")]
pub mod v4l2;

use anyhow::Result;

use crate::frame::Frame;

pub use synthetic::SyntheticSource;
#[cfg(feature = "ingest-v4l2")]
pub use v4l2::V4l2Source;

/// Capture parameters for a camera or synthetic device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraSettings {
    /// Device path (e.g. "/dev/video0") or "stub://name".
    pub device: String,
    /// Preferred frame width.
    pub width: u32,
    /// Preferred frame height.
    pub height: u32,
    /// Requested frame rate; 0 leaves the device default.
    pub target_fps: u32,
    /// Stop after this many frames (synthetic sources only).
    pub frame_limit: Option<u64>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            target_fps: 30,
            frame_limit: None,
        }
    }
}

/// Statistics for a frame source.
#[derive(Clone, Debug)]
pub struct SourceStats {
    pub frames_captured: u64,
    pub device: String,
}

/// A sequential source of frames.
pub trait FrameSource {
    /// Open the device. Failure here means the source is unavailable.
    fn connect(&mut self) -> Result<()>;

    /// Capture the next frame, `Ok(None)` once the stream has ended.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    fn stats(&self) -> SourceStats;
}

/// Pick a source for `settings.device`: `stub://` is synthetic, anything
/// else is a V4L2 device node.
pub fn open_camera(settings: &CameraSettings) -> Result<Box<dyn FrameSource>> {
    if settings.device.starts_with("stub://") {
        return Ok(Box::new(SyntheticSource::new(settings.clone())));
    }
    #[cfg(feature = "ingest-v4l2")]
    {
        Ok(Box::new(V4l2Source::new(settings.clone())))
    }
    #[cfg(not(feature = "ingest-v4l2"))]
    {
        Err(anyhow::anyhow!(
            "camera {} requires the ingest-v4l2 feature (use stub:// for a synthetic source)",
            settings.device
        ))
    }
}
