//! YOLOv8 output decoding.
//!
//! The detection head emits a `[1, 4 + C, N]` tensor: for each of the `N`
//! proposals, rows 0..4 hold `cx, cy, w, h` in model input pixels and rows
//! `4..4 + C` hold per-class scores.

use anyhow::{anyhow, Result};

use crate::detect::result::{BoundingBox, Detection};
use crate::detect::vocabulary::{ClassAllowList, Vocabulary};

/// Decoding parameters.
#[derive(Clone, Copy, Debug)]
pub struct DecodeParams {
    /// Proposals scoring below this are discarded before NMS.
    pub candidate_floor: f32,
    pub iou_threshold: f32,
    pub max_detections: usize,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            candidate_floor: 0.25,
            iou_threshold: 0.7,
            max_detections: 300,
        }
    }
}

/// Scale from model input space back to frame pixels.
#[derive(Clone, Copy, Debug)]
pub struct InputScale {
    pub x: f32,
    pub y: f32,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl InputScale {
    pub fn new(input_size: u32, frame_width: u32, frame_height: u32) -> Self {
        Self {
            x: frame_width as f32 / input_size as f32,
            y: frame_height as f32 / input_size as f32,
            frame_width,
            frame_height,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    score: f32,
    class_id: usize,
}

impl Candidate {
    fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    fn iou(&self, other: &Candidate) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }
}

/// Decode a flattened `[1, channels, proposals]` head output.
pub fn decode(
    data: &[f32],
    channels: usize,
    proposals: usize,
    vocabulary: &Vocabulary,
    allow: &ClassAllowList,
    scale: InputScale,
    params: DecodeParams,
) -> Result<Vec<Detection>> {
    if channels < 5 {
        return Err(anyhow!("YOLO output has {} channels, need at least 5", channels));
    }
    let num_classes = channels - 4;
    if num_classes != vocabulary.len() {
        return Err(anyhow!(
            "model reports {} classes but vocabulary has {}",
            num_classes,
            vocabulary.len()
        ));
    }
    let expected = channels
        .checked_mul(proposals)
        .ok_or_else(|| anyhow!("YOLO output dimensions overflow"))?;
    if data.len() != expected {
        return Err(anyhow!(
            "YOLO output has {} values, expected {}",
            data.len(),
            expected
        ));
    }

    let at = |row: usize, col: usize| data[row * proposals + col];
    let mut candidates = Vec::new();
    for i in 0..proposals {
        let (class_id, score) = (0..num_classes)
            .map(|c| (c, at(4 + c, i)))
            .fold((0, f32::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best });
        if score < params.candidate_floor || !allow.contains(class_id) {
            continue;
        }

        let (cx, cy, w, h) = (at(0, i), at(1, i), at(2, i), at(3, i));
        let max_x = scale.frame_width as f32;
        let max_y = scale.frame_height as f32;
        candidates.push(Candidate {
            x1: ((cx - w / 2.0) * scale.x).clamp(0.0, max_x),
            y1: ((cy - h / 2.0) * scale.y).clamp(0.0, max_y),
            x2: ((cx + w / 2.0) * scale.x).clamp(0.0, max_x),
            y2: ((cy + h / 2.0) * scale.y).clamp(0.0, max_y),
            score,
            class_id,
        });
    }

    let kept = nms(candidates, params.iou_threshold, params.max_detections);
    Ok(kept
        .into_iter()
        .map(|c| {
            let label = vocabulary.name(c.class_id).unwrap_or_default();
            Detection::new(
                label,
                c.class_id,
                c.score,
                BoundingBox::from_xyxy(c.x1, c.y1, c.x2, c.y2),
            )
        })
        .collect())
}

/// Greedy per-class NMS: boxes of different classes never suppress each other.
fn nms(mut boxes: Vec<Candidate>, iou_threshold: f32, max_keep: usize) -> Vec<Candidate> {
    boxes.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<Candidate> = Vec::new();
    let mut suppressed = vec![false; boxes.len()];
    for i in 0..boxes.len() {
        if kept.len() >= max_keep {
            break;
        }
        if suppressed[i] {
            continue;
        }
        kept.push(boxes[i]);
        for j in (i + 1)..boxes.len() {
            if boxes[j].class_id == boxes[i].class_id && boxes[i].iou(&boxes[j]) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }
    kept
}
