//! Frame buffer shared by ingestion, detection and the overlay.
//!
//! A `Frame` is produced once per loop iteration by a frame source, mirrored,
//! read by the detector, drawn on by the overlay renderer and finally handed
//! to the display. Nothing keeps a frame past its iteration.

use anyhow::{anyhow, Result};
use image::{imageops, Rgb, RgbImage};

/// Owned RGB8 pixel buffer.
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Create a black frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    /// Wrap tightly packed RGB bytes.
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if pixels.len() != expected {
            return Err(anyhow!(
                "expected {} RGB bytes for {}x{}, received {}",
                expected,
                width,
                height,
                pixels.len()
            ));
        }
        let image = RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| anyhow!("RGB buffer does not fit {}x{}", width, height))?;
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Tightly packed RGB bytes, row-major.
    pub fn as_rgb(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Mirror the frame left-to-right, in place.
    pub fn mirror_horizontal(&mut self) {
        imageops::flip_horizontal_in_place(&mut self.image);
    }

    /// Read a pixel, `None` when outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x < self.width() && y < self.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    /// Write a pixel; writes outside the frame are dropped.
    pub fn put_pixel(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.image.put_pixel(x as u32, y as u32, Rgb(rgb));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb_validates_length() {
        assert!(Frame::from_rgb(2, 2, vec![0u8; 12]).is_ok());
        assert!(Frame::from_rgb(2, 2, vec![0u8; 11]).is_err());
    }

    #[test]
    fn mirror_swaps_columns() -> Result<()> {
        let pixels = vec![
            1, 1, 1, 2, 2, 2, 3, 3, 3, //
            4, 4, 4, 5, 5, 5, 6, 6, 6,
        ];
        let mut frame = Frame::from_rgb(3, 2, pixels)?;
        frame.mirror_horizontal();

        assert_eq!(frame.pixel(0, 0), Some([3, 3, 3]));
        assert_eq!(frame.pixel(1, 0), Some([2, 2, 2]));
        assert_eq!(frame.pixel(2, 1), Some([4, 4, 4]));
        Ok(())
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut frame = Frame::new(4, 4);
        frame.put_pixel(-1, 0, [255, 0, 0]);
        frame.put_pixel(4, 0, [255, 0, 0]);
        frame.put_pixel(3, 3, [9, 9, 9]);

        assert!(frame.as_rgb()[..45].iter().all(|&b| b == 0));
        assert_eq!(frame.pixel(3, 3), Some([9, 9, 9]));
        assert_eq!(frame.pixel(4, 4), None);
    }
}
