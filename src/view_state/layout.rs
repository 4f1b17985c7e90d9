//! Per-message layout: word wrapping, collapsing and in-message hit-testing.

use super::measure::TextMeasure;
use super::types::{LayoutKey, Point, Rect};
use crate::model::{ElementKind, MessageElement, MessageRecord};
use std::ops::Range;

/// One placed piece of an element.
///
/// A word wider than the line is split into several pieces, each on its own
/// line. Rectangles are relative to the message's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutElement {
    element_index: usize,
    rect: Rect,
    line: usize,
    chars: Range<usize>,
    first_char: usize,
}

impl LaidOutElement {
    /// Index into [`MessageRecord::elements`].
    pub fn element_index(&self) -> usize {
        self.element_index
    }

    /// Bounding box relative to the message.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Zero-based line within the message.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Character range of the element shown by this piece.
    pub fn chars(&self) -> Range<usize> {
        self.chars.clone()
    }

    /// Selection positions covered by this piece, message-relative.
    pub fn selection_range(&self) -> Range<usize> {
        self.first_char..self.first_char + self.chars.len()
    }

    /// The piece's text, sliced out of the element's display text.
    pub fn text<'a>(&self, element: &'a MessageElement) -> &'a str {
        let text = element.display_text();
        if matches!(element.kind(), ElementKind::Image { .. }) {
            return text;
        }
        slice_chars(text, self.chars.clone())
    }
}

/// Layout of one message at one geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageLayout {
    key: LayoutKey,
    elements: Vec<LaidOutElement>,
    line_tops: Vec<f32>,
    line_heights: Vec<f32>,
    full_line_count: usize,
    height: f32,
    generation: u64,
    collapsed: bool,
    expanded_by_user: bool,
    last_char_index: usize,
}

/// Inputs that decide how a message is laid out besides its content.
#[derive(Debug, Clone, Copy)]
pub struct LayoutOptions {
    /// Wrap width and scale.
    pub key: LayoutKey,
    /// Lines shown before a message is collapsed; 0 disables collapsing.
    pub collapse_threshold: usize,
    /// The user asked to see the whole message.
    pub expanded_by_user: bool,
    /// Stamp identifying this computation.
    pub generation: u64,
}

impl MessageLayout {
    /// Lay out `record`.
    pub fn compute(record: &MessageRecord, measure: &dyn TextMeasure, options: LayoutOptions) -> Self {
        let LayoutKey { width, scale } = options.key;
        let base_line_height = measure.line_height(scale);
        let space = measure.space_width(scale);

        let mut placed: Vec<LaidOutElement> = Vec::new();
        let mut line_heights: Vec<f32> = vec![base_line_height];
        let mut line = 0usize;
        let mut x = 0.0f32;
        let mut first_char = 0usize;

        let new_line = |line: &mut usize, x: &mut f32, heights: &mut Vec<f32>| {
            *line += 1;
            *x = 0.0;
            heights.push(base_line_height);
        };

        for (element_index, element) in record.elements().iter().enumerate() {
            match element.kind() {
                ElementKind::Image { alt, width: w, height: h } => {
                    let (w, h) = measure.image_size(alt, *w, *h, scale);
                    if x > 0.0 && x + w > width {
                        new_line(&mut line, &mut x, &mut line_heights);
                    }
                    placed.push(LaidOutElement {
                        element_index,
                        rect: Rect::new(x, 0.0, w, h),
                        line,
                        chars: 0..1,
                        first_char,
                    });
                    line_heights[line] = line_heights[line].max(h);
                    x += w;
                    first_char += 1;
                }
                ElementKind::Text(text) | ElementKind::Timestamp(text) => {
                    let word_width = measure.text_width(text, scale);
                    if x > 0.0 && x + word_width > width {
                        new_line(&mut line, &mut x, &mut line_heights);
                    }

                    if x + word_width <= width || text.is_empty() {
                        let count = text.chars().count();
                        placed.push(LaidOutElement {
                            element_index,
                            rect: Rect::new(x, 0.0, word_width, base_line_height),
                            line,
                            chars: 0..count,
                            first_char,
                        });
                        x += word_width;
                        first_char += count;
                    } else {
                        // Split at character boundaries, at least one glyph per line.
                        let mut piece_start = 0usize;
                        let mut piece_width = 0.0f32;
                        let mut count = 0usize;
                        for c in text.chars() {
                            let cw = measure.char_width(c, scale);
                            if count > piece_start && x + piece_width + cw > width {
                                placed.push(LaidOutElement {
                                    element_index,
                                    rect: Rect::new(x, 0.0, piece_width, base_line_height),
                                    line,
                                    chars: piece_start..count,
                                    first_char: first_char + piece_start,
                                });
                                new_line(&mut line, &mut x, &mut line_heights);
                                piece_start = count;
                                piece_width = 0.0;
                            }
                            piece_width += cw;
                            count += 1;
                        }
                        placed.push(LaidOutElement {
                            element_index,
                            rect: Rect::new(x, 0.0, piece_width, base_line_height),
                            line,
                            chars: piece_start..count,
                            first_char: first_char + piece_start,
                        });
                        x += piece_width;
                        first_char += count;
                    }
                }
            }
            if element.has_trailing_space() {
                x += space;
            }
        }

        let full_line_count = line_heights.len();
        let collapsed = options.collapse_threshold > 0
            && !options.expanded_by_user
            && full_line_count > options.collapse_threshold;
        if collapsed {
            placed.retain(|piece| piece.line < options.collapse_threshold);
            line_heights.truncate(options.collapse_threshold);
        }

        let mut line_tops = Vec::with_capacity(line_heights.len());
        let mut top = 0.0f32;
        for h in &line_heights {
            line_tops.push(top);
            top += h;
        }
        for piece in &mut placed {
            piece.rect.y = line_tops[piece.line];
        }

        Self {
            key: options.key,
            elements: placed,
            line_tops,
            line_heights,
            full_line_count,
            height: top,
            generation: options.generation,
            collapsed,
            expanded_by_user: options.expanded_by_user,
            last_char_index: first_char,
        }
    }

    /// Geometry this layout was computed for.
    pub fn key(&self) -> LayoutKey {
        self.key
    }

    /// Total height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Visible line count (after collapsing).
    pub fn line_count(&self) -> usize {
        self.line_heights.len()
    }

    /// Line count the message would have if fully expanded.
    pub fn full_line_count(&self) -> usize {
        self.full_line_count
    }

    /// Stamp of the computation that produced this layout.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the message is shown truncated.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Whether the user expanded the message.
    pub fn is_expanded_by_user(&self) -> bool {
        self.expanded_by_user
    }

    /// Placed pieces in reading order.
    pub fn elements(&self) -> &[LaidOutElement] {
        &self.elements
    }

    /// Top of each visible line.
    pub fn line_tops(&self) -> &[f32] {
        &self.line_tops
    }

    /// One past the last selection position.
    pub fn last_char_index(&self) -> usize {
        self.last_char_index
    }

    /// Piece under `point` (message-relative), if any.
    pub fn element_at(&self, point: Point) -> Option<&LaidOutElement> {
        self.elements.iter().find(|piece| piece.rect.contains(point))
    }

    /// Line under a message-relative y, clamped to the visible lines.
    fn line_at(&self, y: f32) -> Option<usize> {
        if self.line_tops.is_empty() {
            return None;
        }
        let line = self.line_tops.partition_point(|top| *top <= y);
        Some(line.saturating_sub(1))
    }

    /// Selection position nearest to `point` (message-relative).
    ///
    /// Above the message maps to 0, below to [`Self::last_char_index`].
    pub fn selection_index(&self, point: Point, record: &MessageRecord, measure: &dyn TextMeasure) -> usize {
        if point.y < 0.0 {
            return 0;
        }
        if point.y >= self.height {
            return self.last_char_index;
        }
        let Some(line) = self.line_at(point.y) else {
            return 0;
        };

        let mut on_line = self.elements.iter().filter(|piece| piece.line == line).peekable();
        let Some(first) = on_line.peek() else {
            return self.last_char_index;
        };
        if point.x < first.rect.x {
            return first.first_char;
        }

        let mut end_of_line = first.first_char;
        for piece in on_line {
            if point.x < piece.rect.right() {
                let Some(element) = record.elements().get(piece.element_index) else {
                    return piece.first_char;
                };
                if !element.is_text() {
                    let mid = piece.rect.x + piece.rect.width / 2.0;
                    return piece.first_char + usize::from(point.x >= mid);
                }
                let mut cx = piece.rect.x;
                for (offset, c) in piece.text(element).chars().enumerate() {
                    let cw = measure.char_width(c, self.key.scale);
                    if point.x < cx + cw / 2.0 {
                        return piece.first_char + offset;
                    }
                    cx += cw;
                }
                return piece.selection_range().end;
            }
            end_of_line = piece.selection_range().end;
        }
        end_of_line
    }
}

/// Slice `text` by character (not byte) range, clamped to the text.
pub fn slice_chars(text: &str, range: Range<usize>) -> &str {
    let mut indices = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len()));
    let start = indices.nth(range.start).unwrap_or(text.len());
    let span = range.end.saturating_sub(range.start);
    let end = if span == 0 {
        start
    } else {
        indices.nth(span - 1).unwrap_or(text.len())
    };
    &text[start..end]
}
