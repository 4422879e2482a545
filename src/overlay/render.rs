use crate::detect::Detection;
use crate::overlay::activity::infer_activity;
use crate::overlay::annotation::{AnnotationEntry, AnnotationTable, Behavior, Color};
use crate::overlay::canvas::{Canvas, FontSize, TextStyle};
use crate::overlay::pointer::Point;

/// Detections must score strictly above this to be drawn.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

pub const HEADER_TEXT: &str = "--- AR DATA (INTERACTIVE) ---";
pub const ICON_CAPTION: &str = "3D V-Model";

const BOX_THICKNESS: u32 = 2;
const LABEL_LIFT: i32 = 10;
const DETAIL_DROP: i32 = 15;
const LINE_STEP: i32 = 20;

const ICON_GAP: i32 = 20;
const ICON_RADIUS: u32 = 15;
const ICON_CROSS_HALF: i32 = 10;
const ICON_CROSS_THICKNESS: u32 = 2;
const ICON_CAPTION_OFFSET: Point = Point::new(-25, 30);

const HEADER_COLOR: Color = Color::WHITE;
const ACTIVITY_COLOR: Color = Color::ORANGE;
const DETAIL_COLOR: Color = Color::LIGHT_GRAY;
const ICON_FILL: Color = Color::CYAN;
const ICON_CROSS: Color = Color::BLACK;
const ICON_CAPTION_COLOR: Color = Color::WHITE;

/// Per-frame counts, for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayStats {
    /// Boxes drawn.
    pub drawn: usize,
    /// Drawn boxes under the pointer.
    pub hovered: usize,
    /// Detections skipped for an unknown label or low confidence.
    pub skipped: usize,
}

/// Draws boxes, labels and hover details for a frame's detections.
///
/// Stateless across frames: every call depends only on its arguments.
pub struct OverlayRenderer<'a> {
    table: &'a AnnotationTable,
    confidence_threshold: f32,
}

impl<'a> OverlayRenderer<'a> {
    pub fn new(table: &'a AnnotationTable) -> Self {
        Self {
            table,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Annotate `canvas` in place.
    ///
    /// Detections are handled independently; overlapping hovered boxes each
    /// draw their full detail block.
    pub fn render<C: Canvas>(&self, canvas: &mut C, detections: &[Detection], pointer: Point) -> OverlayStats {
        let mut stats = OverlayStats::default();
        for detection in detections {
            let Some(entry) = self.table.get(&detection.label) else {
                stats.skipped += 1;
                continue;
            };
            if detection.confidence <= self.confidence_threshold {
                stats.skipped += 1;
                continue;
            }

            draw_box(canvas, detection, entry.color);
            stats.drawn += 1;

            if detection.bbox.contains(pointer.x, pointer.y) {
                draw_details(canvas, detection, entry);
                stats.hovered += 1;
            }
        }
        stats
    }
}

fn draw_box<C: Canvas>(canvas: &mut C, detection: &Detection, color: Color) {
    let bbox = detection.bbox;
    canvas.rectangle(bbox, color, BOX_THICKNESS);
    canvas.text(
        Point::new(bbox.x1, bbox.y1 - LABEL_LIFT),
        &box_label(detection),
        TextStyle::new(color, FontSize::Large).bold(),
    );
}

/// `"<label> (<confidence>)"` with two decimals.
pub fn box_label(detection: &Detection) -> String {
    format!("{} ({:.2})", detection.label, detection.confidence)
}

fn draw_details<C: Canvas>(canvas: &mut C, detection: &Detection, entry: &AnnotationEntry) {
    let bbox = detection.bbox;
    let x = bbox.x1;
    let mut y = bbox.y2 + DETAIL_DROP;
    let mut line = |canvas: &mut C, text: &str, style: TextStyle| {
        canvas.text(Point::new(x, y), text, style);
        y += LINE_STEP;
    };

    line(canvas, HEADER_TEXT, TextStyle::new(HEADER_COLOR, FontSize::Medium));
    line(
        canvas,
        &entry.base_info,
        TextStyle::new(entry.color, FontSize::Medium).bold(),
    );

    if entry.behavior == Behavior::ActivityInference {
        let (_, frame_height) = canvas.size();
        let activity = infer_activity(&bbox, frame_height);
        let text = format!("Activity: {}", activity.display_name(&entry.activities));
        line(canvas, &text, TextStyle::new(ACTIVITY_COLOR, FontSize::Medium).bold());
    }

    for detail in entry.detail_lines() {
        line(canvas, detail, TextStyle::new(DETAIL_COLOR, FontSize::Medium));
    }

    if entry.behavior == Behavior::SimulatedIcon {
        let center = Point::new(bbox.x2 + ICON_GAP, (bbox.y1 + bbox.y2) / 2);
        draw_icon(canvas, center);
    }
}

/// Filled disc with an "X" across it and a caption underneath.
fn draw_icon<C: Canvas>(canvas: &mut C, center: Point) {
    let Point { x: cx, y: cy } = center;
    let h = ICON_CROSS_HALF;
    canvas.filled_circle(center, ICON_RADIUS, ICON_FILL);
    canvas.line(
        Point::new(cx - h, cy - h),
        Point::new(cx + h, cy + h),
        ICON_CROSS,
        ICON_CROSS_THICKNESS,
    );
    canvas.line(
        Point::new(cx + h, cy - h),
        Point::new(cx - h, cy + h),
        ICON_CROSS,
        ICON_CROSS_THICKNESS,
    );
    canvas.text(
        Point::new(cx + ICON_CAPTION_OFFSET.x, cy + ICON_CAPTION_OFFSET.y),
        ICON_CAPTION,
        TextStyle::new(ICON_CAPTION_COLOR, FontSize::Small),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::BoundingBox;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Rect(BoundingBox, Color),
        Line(Point, Point),
        Circle(Point, u32, Color),
        Text(Point, String, Color),
    }

    struct Recorder {
        size: (u32, u32),
        ops: Vec<Op>,
    }

    impl Recorder {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: (width, height),
                ops: Vec::new(),
            }
        }

        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(_, text, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn text_at(&self, text: &str) -> Option<Point> {
            self.ops.iter().find_map(|op| match op {
                Op::Text(p, t, _) if t == text => Some(*p),
                _ => None,
            })
        }
    }

    impl Canvas for Recorder {
        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn rectangle(&mut self, bbox: BoundingBox, color: Color, _thickness: u32) {
            self.ops.push(Op::Rect(bbox, color));
        }

        fn line(&mut self, from: Point, to: Point, _color: Color, _thickness: u32) {
            self.ops.push(Op::Line(from, to));
        }

        fn filled_circle(&mut self, center: Point, radius: u32, color: Color) {
            self.ops.push(Op::Circle(center, radius, color));
        }

        fn text(&mut self, origin: Point, text: &str, style: TextStyle) {
            self.ops.push(Op::Text(origin, text.to_string(), style.color));
        }
    }

    fn detection(label: &str, confidence: f32, bbox: BoundingBox) -> Detection {
        Detection::new(label, 0, confidence, bbox)
    }

    #[test]
    fn threshold_is_strict() {
        let table = AnnotationTable::default();
        let renderer = OverlayRenderer::new(&table);
        let mut canvas = Recorder::new(640, 480);
        let bbox = BoundingBox::new(10, 10, 50, 50);

        let stats = renderer.render(
            &mut canvas,
            &[detection("chair", 0.5, bbox), detection("chair", 0.2, bbox)],
            Point::new(30, 30),
        );

        assert!(canvas.ops.is_empty());
        assert_eq!(stats, OverlayStats { drawn: 0, hovered: 0, skipped: 2 });
    }

    #[test]
    fn unannotated_labels_are_not_drawn() {
        let table = AnnotationTable::default();
        let renderer = OverlayRenderer::new(&table);
        let mut canvas = Recorder::new(640, 480);

        let stats = renderer.render(
            &mut canvas,
            &[detection("cup", 0.99, BoundingBox::new(0, 0, 100, 100))],
            Point::new(50, 50),
        );

        assert!(canvas.ops.is_empty());
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn unhovered_box_gets_only_box_and_label() {
        let table = AnnotationTable::default();
        let renderer = OverlayRenderer::new(&table);
        let mut canvas = Recorder::new(640, 480);
        let bbox = BoundingBox::new(10, 20, 50, 60);

        renderer.render(&mut canvas, &[detection("laptop", 0.87, bbox)], Point::new(51, 40));

        assert_eq!(
            canvas.ops,
            vec![
                Op::Rect(bbox, Color::RED),
                Op::Text(Point::new(10, 10), "laptop (0.87)".to_string(), Color::RED),
            ]
        );
    }

    #[test]
    fn hovered_lines_stack_below_the_box() {
        let table = AnnotationTable::default();
        let renderer = OverlayRenderer::new(&table);
        let mut canvas = Recorder::new(640, 480);
        let bbox = BoundingBox::new(10, 20, 50, 60);

        renderer.render(&mut canvas, &[detection("laptop", 0.87, bbox)], Point::new(50, 60));

        assert_eq!(canvas.text_at(HEADER_TEXT), Some(Point::new(10, 75)));
        assert_eq!(canvas.text_at("Laptop Computer (AR-ID: 101)"), Some(Point::new(10, 95)));
        assert_eq!(canvas.text_at("Device Serial: ABC-123"), Some(Point::new(10, 115)));
        assert_eq!(canvas.text_at("Last logged in: 5 mins ago."), Some(Point::new(10, 135)));
    }

    #[test]
    fn person_gets_activity_line_in_accent_color() {
        let table = AnnotationTable::default();
        let renderer = OverlayRenderer::new(&table);
        let mut canvas = Recorder::new(640, 480);
        let bbox = BoundingBox::new(100, 150, 150, 300);

        renderer.render(&mut canvas, &[detection("person", 0.9, bbox)], Point::new(120, 200));

        assert_eq!(
            canvas.texts(),
            vec![
                "person (0.90)",
                HEADER_TEXT,
                "Human Subject Detected",
                "Activity: Standing/Talking",
                "Subject's inferred activity and status.",
            ]
        );
        assert!(canvas.ops.contains(&Op::Text(
            Point::new(100, 355),
            "Activity: Standing/Talking".to_string(),
            Color::ORANGE,
        )));
    }

    #[test]
    fn book_gets_simulated_icon_right_of_box() {
        let table = AnnotationTable::default();
        let renderer = OverlayRenderer::new(&table);
        let mut canvas = Recorder::new(640, 480);
        let bbox = BoundingBox::new(100, 100, 200, 160);

        renderer.render(&mut canvas, &[detection("book", 0.8, bbox)], Point::new(150, 130));

        let center = Point::new(220, 130);
        assert!(canvas.ops.contains(&Op::Circle(center, 15, Color::CYAN)));
        assert!(canvas
            .ops
            .contains(&Op::Line(Point::new(210, 120), Point::new(230, 140))));
        assert!(canvas
            .ops
            .contains(&Op::Line(Point::new(230, 120), Point::new(210, 140))));
        assert_eq!(canvas.text_at(ICON_CAPTION), Some(Point::new(195, 160)));
        assert!(!canvas.texts().iter().any(|t| t.starts_with("Activity:")));
    }

    #[test]
    fn overlapping_hovered_boxes_both_render_details() {
        let table = AnnotationTable::default();
        let renderer = OverlayRenderer::new(&table);
        let mut canvas = Recorder::new(640, 480);

        let stats = renderer.render(
            &mut canvas,
            &[
                detection("chair", 0.9, BoundingBox::new(0, 0, 100, 100)),
                detection("laptop", 0.9, BoundingBox::new(50, 50, 150, 150)),
            ],
            Point::new(75, 75),
        );

        assert_eq!(stats, OverlayStats { drawn: 2, hovered: 2, skipped: 0 });
        let headers = canvas.texts().into_iter().filter(|t| *t == HEADER_TEXT).count();
        assert_eq!(headers, 2);
    }

    #[test]
    fn custom_threshold_is_respected() {
        let table = AnnotationTable::default();
        let renderer = OverlayRenderer::new(&table).with_threshold(0.8);
        let mut canvas = Recorder::new(640, 480);

        let stats = renderer.render(
            &mut canvas,
            &[detection("chair", 0.75, BoundingBox::new(0, 0, 10, 10))],
            Point::default(),
        );
        assert_eq!(stats.drawn, 0);
    }
}
