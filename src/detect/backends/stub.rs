use anyhow::Result;

use crate::detect::backend::DetectorBackend;
use crate::detect::result::{BoundingBox, Detection};
use crate::detect::vocabulary::{ClassAllowList, Vocabulary};
use crate::frame::Frame;

/// Scripted detection, boxes given as fractions of the frame size.
#[derive(Clone, Debug)]
pub struct ScriptedDetection {
    pub label: String,
    pub confidence: f32,
    /// `(x1, y1, x2, y2)` in `0..=1`.
    pub rel_box: (f32, f32, f32, f32),
}

impl ScriptedDetection {
    pub fn new(label: &str, confidence: f32, rel_box: (f32, f32, f32, f32)) -> Self {
        Self {
            label: label.to_string(),
            confidence,
            rel_box,
        }
    }
}

/// Stub backend for demos and tests.
///
/// Reports the same scripted detections every frame. The script is not
/// restricted up front, so results are post-filtered against the allow-list.
pub struct StubBackend {
    vocabulary: Vocabulary,
    script: Vec<ScriptedDetection>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::with_script(demo_scene())
    }

    pub fn with_script(script: Vec<ScriptedDetection>) -> Self {
        Self {
            vocabulary: Vocabulary::coco(),
            script,
        }
    }

    /// Script with absolute pixel boxes, for a known frame size.
    pub fn with_pixel_boxes(frame_width: u32, frame_height: u32, boxes: &[(&str, f32, BoundingBox)]) -> Self {
        let (w, h) = (frame_width as f32, frame_height as f32);
        let script = boxes
            .iter()
            .map(|(label, confidence, b)| {
                ScriptedDetection::new(
                    label,
                    *confidence,
                    (b.x1 as f32 / w, b.y1 as f32 / h, b.x2 as f32 / w, b.y2 as f32 / h),
                )
            })
            .collect();
        Self::with_script(script)
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    fn detect(&mut self, frame: &Frame, allow: &ClassAllowList) -> Result<Vec<Detection>> {
        let (w, h) = (frame.width() as f32, frame.height() as f32);
        let detections = self
            .script
            .iter()
            .filter_map(|s| {
                let class_id = self.vocabulary.index_of(&s.label)?;
                if !allow.contains(class_id) {
                    return None;
                }
                let (x1, y1, x2, y2) = s.rel_box;
                // Round so pixel scripts survive the fraction round trip.
                let bbox = BoundingBox::new(
                    (x1 * w).round() as i32,
                    (y1 * h).round() as i32,
                    (x2 * w).round() as i32,
                    (y2 * h).round() as i32,
                );
                Some(Detection::new(s.label.clone(), class_id, s.confidence, bbox))
            })
            .collect();
        Ok(detections)
    }
}

/// Desk scene: one of each annotated class, one unannotated object and one
/// low-confidence box.
pub fn demo_scene() -> Vec<ScriptedDetection> {
    vec![
        ScriptedDetection::new("person", 0.91, (0.05, 0.10, 0.30, 0.95)),
        ScriptedDetection::new("laptop", 0.84, (0.40, 0.55, 0.65, 0.80)),
        ScriptedDetection::new("book", 0.72, (0.70, 0.60, 0.82, 0.75)),
        ScriptedDetection::new("chair", 0.44, (0.35, 0.70, 0.55, 0.98)),
        ScriptedDetection::new("cup", 0.88, (0.66, 0.50, 0.70, 0.58)),
    ]
}
