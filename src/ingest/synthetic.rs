//! Synthetic frame source for `stub://` devices.
//!
//! Produces a moving gradient so the pipeline can run without a camera.
//! An optional frame limit turns it into a finite stream.

use anyhow::{anyhow, Result};

use super::{CameraSettings, FrameSource, SourceStats};
use crate::frame::Frame;

pub struct SyntheticSource {
    settings: CameraSettings,
    frame_count: u64,
    connected: bool,
}

impl SyntheticSource {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            frame_count: 0,
            connected: false,
        }
    }

    fn generate_pixels(&self) -> Vec<u8> {
        let (w, h) = (self.settings.width as usize, self.settings.height as usize);
        let shift = self.frame_count as usize;
        let mut pixels = vec![0u8; w * h * 3];
        for (i, px) in pixels.chunks_exact_mut(3).enumerate() {
            let (x, y) = (i % w, i / w);
            px[0] = ((x + shift) % 256) as u8;
            px[1] = ((y + shift / 2) % 256) as u8;
            px[2] = 96;
        }
        pixels
    }
}

impl FrameSource for SyntheticSource {
    fn connect(&mut self) -> Result<()> {
        if self.settings.width == 0 || self.settings.height == 0 {
            return Err(anyhow!(
                "synthetic source {} needs non-zero dimensions",
                self.settings.device
            ));
        }
        self.connected = true;
        log::info!(
            "SyntheticSource: connected to {} ({}x{})",
            self.settings.device,
            self.settings.width,
            self.settings.height
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if !self.connected {
            return Err(anyhow!("synthetic source not connected"));
        }
        if self
            .settings
            .frame_limit
            .is_some_and(|limit| self.frame_count >= limit)
        {
            return Ok(None);
        }
        let pixels = self.generate_pixels();
        self.frame_count += 1;
        Frame::from_rgb(self.settings.width, self.settings.height, pixels).map(Some)
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            device: self.settings.device.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(limit: Option<u64>) -> CameraSettings {
        CameraSettings {
            device: "stub://test".to_string(),
            width: 64,
            height: 48,
            target_fps: 30,
            frame_limit: limit,
        }
    }

    #[test]
    fn produces_frames_of_configured_size() -> Result<()> {
        let mut source = SyntheticSource::new(settings(None));
        source.connect()?;

        let frame = source.next_frame()?.expect("frame");
        assert_eq!((frame.width(), frame.height()), (64, 48));
        Ok(())
    }

    #[test]
    fn frame_limit_ends_the_stream() -> Result<()> {
        let mut source = SyntheticSource::new(settings(Some(2)));
        source.connect()?;

        assert!(source.next_frame()?.is_some());
        assert!(source.next_frame()?.is_some());
        assert!(source.next_frame()?.is_none());
        assert_eq!(source.stats().frames_captured, 2);
        Ok(())
    }

    #[test]
    fn reading_before_connect_fails() {
        let mut source = SyntheticSource::new(settings(None));
        assert!(source.next_frame().is_err());
    }

    #[test]
    fn zero_dimensions_fail_to_connect() {
        let mut cfg = settings(None);
        cfg.width = 0;
        assert!(SyntheticSource::new(cfg).connect().is_err());
    }
}
