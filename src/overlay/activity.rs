//! Rule-based activity guess for person boxes.

use crate::detect::BoundingBox;

/// Keeps the aspect ratio finite for zero-width boxes.
const WIDTH_EPSILON: f32 = 1e-6;

/// Tall, narrow boxes are read as standing.
const STANDING_ASPECT_RATIO: f32 = 2.0;

/// Boxes ending above this fraction of the frame height are read as waving.
const WAVING_BOTTOM_FRACTION: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activity {
    SittingWorking,
    StandingTalking,
    WavingGreeting,
}

impl Activity {
    /// Position in an entry's `activities` list.
    pub fn index(self) -> usize {
        match self {
            Activity::SittingWorking => 0,
            Activity::StandingTalking => 1,
            Activity::WavingGreeting => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Activity::SittingWorking => "Sitting/Working",
            Activity::StandingTalking => "Standing/Talking",
            Activity::WavingGreeting => "Waving/Greeting",
        }
    }

    /// Display name from `names`, falling back to the built-in name.
    pub fn display_name(self, names: &[String]) -> &str {
        names
            .get(self.index())
            .map(String::as_str)
            .unwrap_or_else(|| self.as_str())
    }
}

/// First matching rule wins: tall box, then high box, then sitting.
pub fn infer_activity(bbox: &BoundingBox, frame_height: u32) -> Activity {
    let width = bbox.width() as f32;
    let height = bbox.height() as f32;
    let aspect_ratio = height / (width + WIDTH_EPSILON);

    if aspect_ratio > STANDING_ASPECT_RATIO {
        Activity::StandingTalking
    } else if (bbox.y2 as f32) < frame_height as f32 * WAVING_BOTTOM_FRACTION {
        Activity::WavingGreeting
    } else {
        Activity::SittingWorking
    }
}
