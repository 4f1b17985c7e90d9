//! Glyph metrics used by the layout engine.

use unicode_width::UnicodeWidthChar;

/// Source of glyph and line metrics.
///
/// The layout engine only ever asks for per-character advances and the
/// line height, so painters with very different units (terminal cells,
/// pixels) can share the same wrapping code.
pub trait TextMeasure {
    /// Horizontal advance of `c` at `scale`.
    fn char_width(&self, c: char, scale: f32) -> f32;

    /// Height of one text line at `scale`.
    fn line_height(&self, scale: f32) -> f32;

    /// Width of a space separating two elements.
    fn space_width(&self, scale: f32) -> f32 {
        self.char_width(' ', scale)
    }

    /// Total advance of `text`.
    fn text_width(&self, text: &str, scale: f32) -> f32 {
        text.chars().map(|c| self.char_width(c, scale)).sum()
    }

    /// Box occupied by an image whose natural size is `width` x `height`.
    fn image_size(&self, _alt: &str, width: f32, height: f32, scale: f32) -> (f32, f32) {
        (width * scale, height * scale)
    }
}

/// Terminal cell metrics: one unit per column, one unit per row.
///
/// Wide characters occupy two columns. Images render as their alt text on
/// a single row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellMeasure;

impl TextMeasure for CellMeasure {
    fn char_width(&self, c: char, scale: f32) -> f32 {
        c.width().unwrap_or(0) as f32 * scale
    }

    fn line_height(&self, scale: f32) -> f32 {
        scale
    }

    fn image_size(&self, alt: &str, _width: f32, _height: f32, scale: f32) -> (f32, f32) {
        (self.text_width(alt, scale).max(scale), self.line_height(scale))
    }
}

/// Every glyph has the same advance. Useful for deterministic layouts.
#[derive(Debug, Clone, Copy)]
pub struct FixedMeasure {
    /// Advance of every character at scale 1.
    pub char_width: f32,
    /// Line height at scale 1.
    pub line_height: f32,
}

impl FixedMeasure {
    /// Create a fixed-advance measure.
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl Default for FixedMeasure {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl TextMeasure for FixedMeasure {
    fn char_width(&self, _c: char, scale: f32) -> f32 {
        self.char_width * scale
    }

    fn line_height(&self, scale: f32) -> f32 {
        self.line_height * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_measure_counts_wide_chars_twice() {
        let m = CellMeasure;
        assert_eq!(m.text_width("ab", 1.0), 2.0);
        assert_eq!(m.text_width("日本", 1.0), 4.0);
        assert_eq!(m.line_height(1.0), 1.0);
    }

    #[test]
    fn cell_measure_images_are_one_row_of_alt_text() {
        let m = CellMeasure;
        assert_eq!(m.image_size("Kappa", 28.0, 28.0, 1.0), (5.0, 1.0));
        assert_eq!(m.image_size("", 28.0, 28.0, 1.0), (1.0, 1.0));
    }

    #[test]
    fn fixed_measure_scales() {
        let m = FixedMeasure::new(2.0, 3.0);
        assert_eq!(m.char_width('x', 2.0), 4.0);
        assert_eq!(m.line_height(2.0), 6.0);
        assert_eq!(m.image_size("x", 10.0, 20.0, 0.5), (5.0, 10.0));
    }
}
