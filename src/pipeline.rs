//! Per-frame pipeline and the frame loop.
//!
//! One iteration: acquire → mirror → detect → render → show → poll quit.
//! Everything runs on the calling thread; the pointer is the only state
//! shared with another thread.

use anyhow::Result;

use crate::detect::{ClassAllowList, ObjectDetector};
use crate::display::Display;
use crate::frame::Frame;
use crate::ingest::FrameSource;
use crate::overlay::{
    AnnotationTable, OverlayRenderer, OverlayStats, Point, PointerState,
    DEFAULT_CONFIDENCE_THRESHOLD,
};

/// What one frame went through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Raw detections returned by the detector.
    pub detections: usize,
    pub overlay: OverlayStats,
}

/// Detector adapter plus overlay renderer, bound to one annotation table.
pub struct FramePipeline {
    detector: ObjectDetector,
    table: AnnotationTable,
    allow: ClassAllowList,
    confidence_threshold: f32,
    mirror: bool,
}

impl FramePipeline {
    pub fn new(detector: ObjectDetector, table: AnnotationTable) -> Self {
        let allow = detector.allow_list(table.labels());
        log::info!(
            "detector '{}' restricted to {} of {} annotated labels",
            detector.backend_name(),
            allow.len(),
            table.len()
        );
        Self {
            detector,
            table,
            allow,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            mirror: true,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Mirror frames left-to-right before detection (on by default).
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn table(&self) -> &AnnotationTable {
        &self.table
    }

    pub fn allow_list(&self) -> &ClassAllowList {
        &self.allow
    }

    pub fn warm_up(&mut self) -> Result<()> {
        self.detector.warm_up()
    }

    /// Run one frame through detection and the overlay, in place.
    pub fn process(&mut self, frame: &mut Frame, pointer: Point) -> Result<FrameReport> {
        if self.mirror {
            frame.mirror_horizontal();
        }
        let detections = self.detector.detect_with(frame, &self.allow)?;
        let overlay = OverlayRenderer::new(&self.table)
            .with_threshold(self.confidence_threshold)
            .render(frame, &detections, pointer);
        Ok(FrameReport {
            detections: detections.len(),
            overlay,
        })
    }
}

/// Loop limits.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunOptions {
    /// Stop after this many processed frames.
    pub max_frames: Option<u64>,
}

/// Why the frame loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopEnd {
    EndOfStream,
    ReadFailed,
    QuitRequested,
    FrameLimit,
}

/// Totals over a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: u64,
    pub detections: u64,
    pub drawn: u64,
    pub hovered: u64,
    pub end: LoopEnd,
}

/// Run the frame loop until the stream ends, a read fails, the display
/// reports quit or `max_frames` is reached.
///
/// Inference and display errors end the run with an error.
pub fn run(
    source: &mut dyn FrameSource,
    display: &mut dyn Display,
    pipeline: &mut FramePipeline,
    pointer: &PointerState,
    options: RunOptions,
) -> Result<LoopStats> {
    let mut stats = LoopStats {
        frames: 0,
        detections: 0,
        drawn: 0,
        hovered: 0,
        end: LoopEnd::EndOfStream,
    };

    loop {
        if options.max_frames.is_some_and(|max| stats.frames >= max) {
            stats.end = LoopEnd::FrameLimit;
            break;
        }

        let mut frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::info!("frame source ended after {} frames", stats.frames);
                stats.end = LoopEnd::EndOfStream;
                break;
            }
            Err(err) => {
                log::warn!("frame read failed, stopping: {:#}", err);
                stats.end = LoopEnd::ReadFailed;
                break;
            }
        };

        let report = pipeline.process(&mut frame, pointer.position())?;
        stats.frames += 1;
        stats.detections += report.detections as u64;
        stats.drawn += report.overlay.drawn as u64;
        stats.hovered += report.overlay.hovered as u64;
        log::debug!(
            "frame {}: {} detections, {} drawn, {} hovered",
            stats.frames,
            report.detections,
            report.overlay.drawn,
            report.overlay.hovered
        );

        display.show(&frame)?;

        if display.quit_requested()? {
            stats.end = LoopEnd::QuitRequested;
            break;
        }
    }

    let source_stats = source.stats();
    log::info!(
        "stopped ({:?}): {} frames from {}, {} boxes drawn, {} hovered",
        stats.end,
        stats.frames,
        source_stats.device,
        stats.drawn,
        stats.hovered
    );
    Ok(stats)
}
