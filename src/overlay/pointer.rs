use std::sync::atomic::{AtomicI32, Ordering};

/// Pixel position in frame coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Latest pointer position, written by the input-event callback and read
/// once per frame by the render loop.
///
/// The two coordinates are stored independently. A read racing a write may
/// see a stale or mixed pair; the overlay tolerates that.
#[derive(Debug, Default)]
pub struct PointerState {
    x: AtomicI32,
    y: AtomicI32,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(x: i32, y: i32) -> Self {
        Self {
            x: AtomicI32::new(x),
            y: AtomicI32::new(y),
        }
    }

    pub fn set(&self, x: i32, y: i32) {
        self.x.store(x, Ordering::Relaxed);
        self.y.store(y, Ordering::Relaxed);
    }

    pub fn position(&self) -> Point {
        Point::new(self.x.load(Ordering::Relaxed), self.y.load(Ordering::Relaxed))
    }
}
