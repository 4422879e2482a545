use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// RGB color triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const LIGHT_GRAY: Color = Color::rgb(200, 200, 200);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

/// Extra overlay content an entry carries when hovered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    #[default]
    None,
    /// Infer a coarse activity from the box shape and position.
    ActivityInference,
    /// Draw the simulated 3D icon beside the box.
    SimulatedIcon,
}

/// Static display data for one class label.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnnotationEntry {
    pub base_info: String,
    /// Activity display names: sitting, standing, waving.
    #[serde(default)]
    pub activities: Vec<String>,
    /// Sentences separated by `". "`, one overlay line each.
    pub details: String,
    pub color: Color,
    #[serde(default)]
    pub behavior: Behavior,
}

impl AnnotationEntry {
    pub fn new(base_info: &str, details: &str, color: Color) -> Self {
        Self {
            base_info: base_info.to_string(),
            activities: Vec::new(),
            details: details.to_string(),
            color,
            behavior: Behavior::None,
        }
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_activities(mut self, activities: &[&str]) -> Self {
        self.activities = activities.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Detail text split into overlay lines.
    pub fn detail_lines(&self) -> impl Iterator<Item = &str> {
        self.details.split(". ")
    }
}

/// Immutable mapping from class label to annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationTable {
    entries: BTreeMap<String, AnnotationEntry>,
}

impl AnnotationTable {
    pub fn new(entries: impl IntoIterator<Item = (String, AnnotationEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Parse a JSON object of `label -> entry`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let entries: BTreeMap<String, AnnotationEntry> =
            serde_json::from_str(raw).map_err(|e| anyhow!("invalid annotation table: {}", e))?;
        if entries.is_empty() {
            return Err(anyhow!("annotation table must define at least one label"));
        }
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read annotation table {}: {}", path.display(), e))?;
        Self::from_json(&raw).map_err(|e| anyhow!("{}: {}", path.display(), e))
    }

    pub fn get(&self, label: &str) -> Option<&AnnotationEntry> {
        self.entries.get(label)
    }

    /// Labels with annotations; this is the detector allow-list.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AnnotationTable {
    fn default() -> Self {
        Self::new([
            (
                "person".to_string(),
                AnnotationEntry::new(
                    "Human Subject Detected",
                    "Subject's inferred activity and status.",
                    Color::YELLOW,
                )
                .with_activities(&["Sitting/Working", "Standing/Talking", "Waving/Greeting"])
                .with_behavior(Behavior::ActivityInference),
            ),
            (
                "chair".to_string(),
                AnnotationEntry::new(
                    "Office Chair (AR-ID: 765)",
                    "Ergonomic design. Virtual link to maintenance log.",
                    Color::BLUE,
                ),
            ),
            (
                "laptop".to_string(),
                AnnotationEntry::new(
                    "Laptop Computer (AR-ID: 101)",
                    "Device Serial: ABC-123. Last logged in: 5 mins ago.",
                    Color::RED,
                ),
            ),
            (
                "book".to_string(),
                AnnotationEntry::new(
                    "Detected as 'Book'",
                    "Overlay: Virtual Title, Author, and a 3D spinning icon.",
                    Color::GREEN,
                )
                .with_behavior(Behavior::SimulatedIcon),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_split_on_sentence_delimiter() {
        let table = AnnotationTable::default();
        let laptop = table.get("laptop").unwrap();
        let lines: Vec<_> = laptop.detail_lines().collect();
        assert_eq!(
            lines,
            vec!["Device Serial: ABC-123", "Last logged in: 5 mins ago."]
        );
    }

    #[test]
    fn default_table_covers_demo_classes() {
        let table = AnnotationTable::default();
        assert_eq!(
            table.labels().collect::<Vec<_>>(),
            vec!["book", "chair", "laptop", "person"]
        );
        assert_eq!(table.get("person").unwrap().behavior, Behavior::ActivityInference);
        assert_eq!(table.get("book").unwrap().behavior, Behavior::SimulatedIcon);
        assert_eq!(table.get("chair").unwrap().behavior, Behavior::None);
        assert!(table.get("cup").is_none());
    }

    #[test]
    fn parses_json_table() -> Result<()> {
        let table = AnnotationTable::from_json(
            r#"{
                "cup": {
                    "base_info": "Coffee Mug",
                    "details": "Half full. Still warm.",
                    "color": [10, 20, 30]
                },
                "person": {
                    "base_info": "Visitor",
                    "details": "Badge pending.",
                    "color": [255, 255, 0],
                    "activities": ["Seated", "Upright", "Waving"],
                    "behavior": "activity_inference"
                }
            }"#,
        )?;

        let cup = table.get("cup").unwrap();
        assert_eq!(cup.color, Color::rgb(10, 20, 30));
        assert_eq!(cup.behavior, Behavior::None);
        assert!(cup.activities.is_empty());
        assert_eq!(table.get("person").unwrap().activities.len(), 3);
        Ok(())
    }

    #[test]
    fn rejects_empty_or_malformed_tables() {
        assert!(AnnotationTable::from_json("{}").is_err());
        assert!(AnnotationTable::from_json(r#"{"cup": {"base_info": "x"}}"#).is_err());
    }
}
