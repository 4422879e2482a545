//! Drawing surface used by the overlay renderer.

use std::convert::Infallible;

use embedded_graphics::{
    geometry::{OriginDimensions, Point as EgPoint, Size},
    mono_font::{ascii, MonoFont, MonoTextStyle},
    pixelcolor::{Rgb888, RgbColor},
    primitives::{Circle, Line, Primitive, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment},
    text::{Baseline, Text},
    Drawable, Pixel,
};

use crate::detect::BoundingBox;
use crate::frame::Frame;
use crate::overlay::annotation::Color;
use crate::overlay::pointer::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    pub color: Color,
    pub size: FontSize,
    pub bold: bool,
}

impl TextStyle {
    pub fn new(color: Color, size: FontSize) -> Self {
        Self {
            color,
            size,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Drawing primitives the overlay needs.
pub trait Canvas {
    /// `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    fn rectangle(&mut self, bbox: BoundingBox, color: Color, thickness: u32);

    fn line(&mut self, from: Point, to: Point, color: Color, thickness: u32);

    fn filled_circle(&mut self, center: Point, radius: u32, color: Color);

    /// Draw text with `origin` at the bottom-left of the first glyph's baseline.
    fn text(&mut self, origin: Point, text: &str, style: TextStyle);
}

fn font(size: FontSize, bold: bool) -> &'static MonoFont<'static> {
    match (size, bold) {
        (FontSize::Small, _) => &ascii::FONT_6X10,
        (FontSize::Medium, false) => &ascii::FONT_7X13,
        (FontSize::Medium, true) => &ascii::FONT_7X13_BOLD,
        (FontSize::Large, false) => &ascii::FONT_8X13,
        (FontSize::Large, true) => &ascii::FONT_8X13_BOLD,
    }
}

fn eg_color(color: Color) -> Rgb888 {
    Rgb888::new(color.r, color.g, color.b)
}

fn eg_point(p: Point) -> EgPoint {
    EgPoint::new(p.x, p.y)
}

struct Target<'a>(&'a mut Frame);

impl OriginDimensions for Target<'_> {
    fn size(&self) -> Size {
        Size::new(self.0.width(), self.0.height())
    }
}

impl embedded_graphics::draw_target::DrawTarget for Target<'_> {
    type Color = Rgb888;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.0.put_pixel(point.x, point.y, [color.r(), color.g(), color.b()]);
        }
        Ok(())
    }
}

fn draw<D>(frame: &mut Frame, drawable: D)
where
    D: Drawable<Color = Rgb888>,
{
    match drawable.draw(&mut Target(frame)) {
        Ok(_) => {}
        Err(infallible) => match infallible {},
    }
}

impl Canvas for Frame {
    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn rectangle(&mut self, bbox: BoundingBox, color: Color, thickness: u32) {
        let rect = Rectangle::with_corners(EgPoint::new(bbox.x1, bbox.y1), EgPoint::new(bbox.x2, bbox.y2));
        // Inside alignment keeps the outline within the box bounds.
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(eg_color(color))
            .stroke_width(thickness)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        draw(self, rect.into_styled(style));
    }

    fn line(&mut self, from: Point, to: Point, color: Color, thickness: u32) {
        let line = Line::new(eg_point(from), eg_point(to));
        draw(self, line.into_styled(PrimitiveStyle::with_stroke(eg_color(color), thickness)));
    }

    fn filled_circle(&mut self, center: Point, radius: u32, color: Color) {
        let circle = Circle::with_center(eg_point(center), radius * 2 + 1);
        draw(self, circle.into_styled(PrimitiveStyle::with_fill(eg_color(color))));
    }

    fn text(&mut self, origin: Point, text: &str, style: TextStyle) {
        let character_style = MonoTextStyle::new(font(style.size, style.bold), eg_color(style.color));
        draw(
            self,
            Text::with_baseline(text, eg_point(origin), character_style, Baseline::Alphabetic),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_outline_leaves_interior_untouched() {
        let mut frame = Frame::new(40, 40);
        frame.rectangle(BoundingBox::new(5, 5, 30, 30), Color::RED, 2);

        assert_eq!(frame.pixel(5, 15), Some([255, 0, 0]));
        assert_eq!(frame.pixel(30, 15), Some([255, 0, 0]));
        assert_eq!(frame.pixel(17, 17), Some([0, 0, 0]));
    }

    #[test]
    fn filled_circle_covers_center() {
        let mut frame = Frame::new(40, 40);
        frame.filled_circle(Point::new(20, 20), 5, Color::CYAN);

        assert_eq!(frame.pixel(20, 20), Some([0, 255, 255]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0]));
    }

    #[test]
    fn text_draws_above_baseline() {
        let mut frame = Frame::new(100, 40);
        frame.text(
            Point::new(2, 30),
            "HELLO",
            TextStyle::new(Color::WHITE, FontSize::Medium),
        );

        let lit_above = (0..100)
            .flat_map(|x| (10..30).map(move |y| (x, y)))
            .any(|(x, y)| frame.pixel(x, y) == Some([255, 255, 255]));
        assert!(lit_above);
        let lit_far_below = (0..100).any(|x| frame.pixel(x, 39) == Some([255, 255, 255]));
        assert!(!lit_far_below);
    }

    #[test]
    fn drawing_past_the_edge_is_clipped() {
        let mut frame = Frame::new(10, 10);
        frame.line(Point::new(-20, -20), Point::new(30, 30), Color::WHITE, 1);
        frame.text(Point::new(-5, -5), "clipped", TextStyle::new(Color::WHITE, FontSize::Small));
        assert_eq!(frame.pixel(5, 5), Some([255, 255, 255]));
    }
}
