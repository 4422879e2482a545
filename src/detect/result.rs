/// Axis-aligned box in frame pixel coordinates, `x1 <= x2` and `y1 <= y2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    /// Build a box from two corners in any order.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Build a box from model output coordinates, truncating toward zero.
    pub fn from_xyxy(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(x1 as i32, y1 as i32, x2 as i32, y2 as i32)
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Edge-inclusive point containment.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }
}

/// One detector output for a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    /// Model confidence in `[0, 1]`. Not filtered by the detector.
    pub confidence: f32,
    /// Index into the backend vocabulary.
    pub class_id: usize,
    pub label: String,
}

impl Detection {
    pub fn new(label: impl Into<String>, class_id: usize, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            bbox,
            confidence,
            class_id,
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_are_normalized() {
        let bbox = BoundingBox::new(50, 60, 10, 20);
        assert_eq!(bbox, BoundingBox::new(10, 20, 50, 60));
        assert_eq!(bbox.width(), 40);
        assert_eq!(bbox.height(), 40);
    }

    #[test]
    fn float_coordinates_truncate() {
        let bbox = BoundingBox::from_xyxy(10.9, 20.2, 49.99, 50.5);
        assert_eq!(bbox, BoundingBox::new(10, 20, 49, 50));
    }

    #[test]
    fn containment_includes_edges_and_corners() {
        let bbox = BoundingBox::new(10, 20, 50, 60);
        for (x, y) in [
            (10, 20),
            (50, 20),
            (10, 60),
            (50, 60),
            (10, 40),
            (50, 40),
            (30, 20),
            (30, 60),
        ] {
            assert!(bbox.contains(x, y), "({x}, {y}) should be inside");
        }
        for (x, y) in [(9, 40), (51, 40), (30, 19), (30, 61), (9, 19), (51, 61)] {
            assert!(!bbox.contains(x, y), "({x}, {y}) should be outside");
        }
    }
}
