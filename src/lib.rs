//! Interactive AR overlay for a live webcam feed.
//!
//! Each frame is mirrored, run through a pretrained object detector
//! restricted to the annotated classes, and drawn over with colored boxes
//! and labels. Hovering the pointer over a box reveals its detail block:
//! descriptive lines, an inferred activity for people and a simulated 3D
//! icon for books.
//!
//! # Module Structure
//!
//! - `frame`: owned RGB frames
//! - `ingest`: frame sources (V4L2 webcams, synthetic `stub://` devices)
//! - `detect`: detector adapter, class allow-list and backends
//! - `overlay`: annotation table, activity heuristic and the renderer
//! - `display`: window or headless output, quit polling
//! - `pipeline`: per-frame processing and the frame loop
//! - `config`: JSON file plus environment configuration

pub mod config;
pub mod detect;
pub mod display;
pub mod frame;
pub mod ingest;
pub mod overlay;
pub mod pipeline;

pub use config::{AppConfig, BackendKind};
pub use detect::{BoundingBox, ClassAllowList, Detection, DetectorBackend, ObjectDetector};
pub use display::{Display, HeadlessDisplay};
pub use frame::Frame;
pub use ingest::{open_camera, CameraSettings, FrameSource};
pub use overlay::{AnnotationTable, OverlayRenderer, Point, PointerState};
pub use pipeline::{run, FramePipeline, LoopEnd, LoopStats, RunOptions};
