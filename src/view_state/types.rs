//! Core view-state geometry types.
//!
//! Coordinates are `f32` in layout units. The terminal front-end uses one
//! unit per cell; any other painter may use pixels.

/// A position in viewport coordinates (origin at the top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal offset.
    pub x: f32,
    /// Vertical offset.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Same point shifted vertically.
    pub fn offset_y(&self, dy: f32) -> Self {
        Self::new(self.x, self.y + dy)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether `point` lies inside (half-open on the right and bottom).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Viewport dimensions in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSize {
    /// Available width for message content.
    pub width: f32,
    /// Visible height.
    pub height: f32,
}

impl ViewportSize {
    /// Create new viewport dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether nothing can be shown.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Geometry a layout was computed for.
///
/// A cached layout is reused only while its key matches. `f32` fields are
/// compared bitwise so the key is `Eq`.
#[derive(Debug, Clone, Copy)]
pub struct LayoutKey {
    /// Wrap width.
    pub width: f32,
    /// Glyph scale factor.
    pub scale: f32,
}

impl LayoutKey {
    /// Create a new key.
    pub fn new(width: f32, scale: f32) -> Self {
        Self { width, scale }
    }
}

impl PartialEq for LayoutKey {
    fn eq(&self, other: &Self) -> bool {
        self.width.to_bits() == other.width.to_bits() && self.scale.to_bits() == other.scale.to_bits()
    }
}

impl Eq for LayoutKey {}
