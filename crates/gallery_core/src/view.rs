//! On-screen anchors for transition animations

/// Rectangle in host window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Host view the gallery animates from and back to.
///
/// `tag` is whatever handle the host uses to find the view again
/// (a widget id, a grid cell index).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceView {
    pub tag: u64,
    pub frame: Rect,
}

impl ReferenceView {
    pub fn new(tag: u64, frame: Rect) -> Self {
        Self { tag, frame }
    }
}

/// Size of the host screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}
