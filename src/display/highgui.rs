#![cfg(feature = "display-highgui")]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use opencv::{
    core::{self, Mat, Scalar},
    highgui,
    prelude::*,
};

use super::{Display, QUIT_KEY};
use crate::frame::Frame;
use crate::overlay::PointerState;

/// OpenCV window showing annotated frames.
///
/// Mouse moves inside the window are written to the shared `PointerState`;
/// the window is destroyed on drop. Quit is 'q' in the window or the shared
/// flag.
pub struct HighGuiDisplay {
    window: String,
    canvas: Mat,
    quit: Arc<AtomicBool>,
}

impl HighGuiDisplay {
    pub fn open(window: &str, pointer: Arc<PointerState>, quit: Arc<AtomicBool>) -> Result<Self> {
        highgui::named_window(window, highgui::WINDOW_AUTOSIZE)
            .with_context(|| format!("could not create window '{}'", window))?;
        highgui::set_mouse_callback(
            window,
            Some(Box::new(move |event, x, y, _flags| {
                if event == highgui::EVENT_MOUSEMOVE {
                    pointer.set(x, y);
                }
            })),
        )
        .context("could not install mouse callback")?;

        Ok(Self {
            window: window.to_string(),
            canvas: Mat::default(),
            quit,
        })
    }

    /// Copy RGB pixels into the reusable BGR matrix OpenCV expects.
    fn upload(&mut self, frame: &Frame) -> Result<()> {
        let (rows, cols) = (frame.height() as i32, frame.width() as i32);
        if self.canvas.rows() != rows || self.canvas.cols() != cols {
            self.canvas = Mat::new_rows_cols_with_default(rows, cols, core::CV_8UC3, Scalar::all(0.0))?;
        }
        let dst = self.canvas.data_bytes_mut()?;
        for (bgr, rgb) in dst.chunks_exact_mut(3).zip(frame.as_rgb().chunks_exact(3)) {
            bgr[0] = rgb[2];
            bgr[1] = rgb[1];
            bgr[2] = rgb[0];
        }
        Ok(())
    }
}

impl Display for HighGuiDisplay {
    fn show(&mut self, frame: &Frame) -> Result<()> {
        self.upload(frame)?;
        highgui::imshow(&self.window, &self.canvas).context("imshow failed")?;
        Ok(())
    }

    fn quit_requested(&mut self) -> Result<bool> {
        let key = highgui::wait_key(1)?;
        let pressed = key >= 0 && (key & 0xFF) as u8 == QUIT_KEY as u8;
        Ok(pressed || self.quit.load(Ordering::SeqCst))
    }
}

impl Drop for HighGuiDisplay {
    fn drop(&mut self) {
        if let Err(err) = highgui::destroy_window(&self.window) {
            log::warn!("failed to close window '{}': {}", self.window, err);
        }
    }
}
