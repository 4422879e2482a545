//! Detector adapter and backends.
//!
//! Detection is delegated to a pretrained model behind [`DetectorBackend`].
//! [`ObjectDetector`] restricts the backend to the labels the overlay knows
//! about and returns raw detections; confidence thresholding happens in the
//! overlay.

mod adapter;
mod backend;
pub mod backends;
mod result;
mod vocabulary;
pub mod yolo;

pub use adapter::ObjectDetector;
pub use backend::DetectorBackend;
pub use backends::{ScriptedDetection, StubBackend};
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use result::{BoundingBox, Detection};
pub use vocabulary::{ClassAllowList, Vocabulary, COCO_CLASSES};
