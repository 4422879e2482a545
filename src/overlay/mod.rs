//! Overlay renderer.
//!
//! Turns a frame's detections into colored boxes and labels, and reveals
//! per-class detail text for boxes under the pointer:
//! - `annotation`: the static label -> display data table
//! - `activity`: person activity heuristic
//! - `pointer`: pointer position handle shared with the input callback
//! - `canvas`: drawing primitives, implemented for `Frame`
//! - `render`: the per-frame drawing pass

mod activity;
mod annotation;
mod canvas;
mod pointer;
mod render;

pub use activity::{infer_activity, Activity};
pub use annotation::{AnnotationEntry, AnnotationTable, Behavior, Color};
pub use canvas::{Canvas, FontSize, TextStyle};
pub use pointer::{Point, PointerState};
pub use render::{
    box_label, OverlayRenderer, OverlayStats, DEFAULT_CONFIDENCE_THRESHOLD, HEADER_TEXT,
    ICON_CAPTION,
};
