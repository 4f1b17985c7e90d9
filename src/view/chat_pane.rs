//! Chat pane painting: per-message buffers and the row compositor.
//!
//! A [`MessageBuffer`] is what the view core caches per on-screen message.
//! It is built once from the record and its layout and reused until the
//! layout changes or the message scrolls off screen.

use super::constants::{COLLAPSED_SUFFIX, GO_TO_BOTTOM_LABEL, TOOLTIP_MAX_WIDTH};
use super::styles::ChatStyles;
use crate::model::{ElementKind, MessageRecord};
use crate::state::{ChannelView, PaintedRow};
use crate::view_state::{MessageLayout, Point, TextMeasure};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cells occupied by one selection position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionCell {
    /// Line within the message.
    pub line: usize,
    /// Column relative to the pane.
    pub x: u16,
    /// Cells covered.
    pub width: u16,
    /// Selection position.
    pub index: usize,
}

/// Painted form of one message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageBuffer {
    lines: Vec<Line<'static>>,
    positions: Vec<PositionCell>,
}

impl MessageBuffer {
    /// Paint `record` as laid out by `layout`.
    pub fn build(record: &MessageRecord, layout: &MessageLayout, styles: &ChatStyles) -> Self {
        let line_count = layout.line_count();
        let mut lines: Vec<Vec<Span<'static>>> = vec![Vec::new(); line_count];
        let mut columns = vec![0u16; line_count];
        let mut positions = Vec::new();
        let flags = record.flags();

        for piece in layout.elements() {
            let Some(element) = record.elements().get(piece.element_index()) else {
                continue;
            };
            let line = piece.line();
            let (Some(spans), Some(column)) = (lines.get_mut(line), columns.get_mut(line)) else {
                continue;
            };

            let x = piece.rect().x.max(0.0).round() as u16;
            if x > *column {
                spans.push(Span::raw(" ".repeat(usize::from(x - *column))));
                *column = x;
            }

            let style = styles.style_for(element.role(), flags);
            let text = piece.text(element);
            match element.kind() {
                ElementKind::Image { .. } => {
                    let width = piece.rect().width.max(1.0).round() as u16;
                    let mut label = text.to_string();
                    let shown = label.width() as u16;
                    if shown < width {
                        label.push_str(&" ".repeat(usize::from(width - shown)));
                    }
                    positions.push(PositionCell {
                        line,
                        x: *column,
                        width,
                        index: piece.selection_range().start,
                    });
                    spans.push(Span::styled(label, style));
                    *column += width;
                }
                ElementKind::Text(_) | ElementKind::Timestamp(_) => {
                    for (index, c) in piece.selection_range().zip(text.chars()) {
                        let width = c.width().unwrap_or(0) as u16;
                        positions.push(PositionCell {
                            line,
                            x: *column,
                            width,
                            index,
                        });
                        *column += width;
                    }
                    spans.push(Span::styled(text.to_string(), style));
                }
            }
        }

        if layout.is_collapsed() {
            if let Some(last) = lines.last_mut() {
                last.push(Span::styled(COLLAPSED_SUFFIX, styles.collapsed()));
            }
        }

        Self {
            lines: lines.into_iter().map(Line::from).collect(),
            positions,
        }
    }

    /// Painted lines, top to bottom.
    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    /// Cells of every selection position.
    pub fn positions(&self) -> &[PositionCell] {
        &self.positions
    }
}

/// Draw `rows` into `area` from the view's paint buffers, then overlay the
/// selection.
pub fn render_rows<M: TextMeasure>(
    buf: &mut Buffer,
    area: Rect,
    rows: &[PaintedRow],
    view: &ChannelView<MessageBuffer, M>,
    styles: &ChatStyles,
) {
    let bottom = i32::from(area.bottom());
    for row in rows {
        let Some(painted) = view.buffer(row.id) else {
            continue;
        };
        let top = i32::from(area.y) + row.y.round() as i32;

        for (offset, line) in painted.lines().iter().enumerate() {
            let y = top + offset as i32;
            if y < i32::from(area.y) || y >= bottom {
                continue;
            }
            buf.set_line(area.x, y as u16, line, area.width);
        }

        let Some((from, to)) = row.selection else {
            continue;
        };
        for cell in painted.positions() {
            if cell.index < from || cell.index >= to || cell.width == 0 {
                continue;
            }
            let y = top + cell.line as i32;
            if y < i32::from(area.y) || y >= bottom || cell.x >= area.width {
                continue;
            }
            let width = cell.width.min(area.width - cell.x);
            buf.set_style(
                Rect::new(area.x + cell.x, y as u16, width, 1),
                styles.selection(),
            );
        }
    }
}

/// Bar across the bottom row of `area` offering to jump to the newest
/// message.
pub fn render_go_to_bottom(buf: &mut Buffer, area: Rect, styles: &ChatStyles) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let bar = Rect::new(area.x, area.bottom() - 1, area.width, 1);
    buf.set_style(bar, styles.go_to_bottom());
    for x in bar.left()..bar.right() {
        buf[(x, bar.y)].set_symbol(" ");
    }
    let label_width = (GO_TO_BOTTOM_LABEL.width() as u16).min(bar.width);
    let x = bar.x + (bar.width - label_width) / 2;
    buf.set_stringn(
        x,
        bar.y,
        GO_TO_BOTTOM_LABEL,
        usize::from(label_width),
        styles.go_to_bottom(),
    );
}

/// Area of the go-to-bottom bar, for click detection.
pub fn go_to_bottom_area(area: Rect) -> Option<Rect> {
    (area.height > 0).then(|| Rect::new(area.x, area.bottom() - 1, area.width, 1))
}

/// One-line tooltip next to `anchor` (pane-relative), kept inside `area`.
pub fn render_tooltip(buf: &mut Buffer, area: Rect, anchor: Point, text: &str, styles: &ChatStyles) {
    if area.height == 0 || area.width < 3 || text.is_empty() {
        return;
    }
    let width = (text.width() as u16 + 2)
        .min(TOOLTIP_MAX_WIDTH)
        .min(area.width);

    let anchor_x = area.x + (anchor.x.max(0.0) as u16).min(area.width - 1);
    let anchor_y = area.y + (anchor.y.max(0.0) as u16).min(area.height - 1);
    let x = anchor_x.min(area.right() - width);
    let y = if anchor_y + 1 < area.bottom() {
        anchor_y + 1
    } else {
        anchor_y.saturating_sub(1).max(area.y)
    };

    let popup = Rect::new(x, y, width, 1);
    for cx in popup.left()..popup.right() {
        buf[(cx, y)].set_symbol(" ");
    }
    buf.set_style(popup, styles.tooltip());
    buf.set_stringn(x + 1, y, text, usize::from(width - 2), styles.tooltip());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MessageBuilder;
    use crate::view_state::layout::LayoutOptions;
    use crate::view_state::{CellMeasure, LayoutKey};

    fn layout(record: &MessageRecord, width: f32, collapse: usize) -> MessageLayout {
        MessageLayout::compute(
            record,
            &CellMeasure,
            LayoutOptions {
                key: LayoutKey::new(width, 1.0),
                collapse_threshold: collapse,
                expanded_by_user: false,
                generation: 0,
            },
        )
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn words_are_separated_by_their_gaps() {
        let record = MessageRecord::plain("hello big world");
        let buffer = MessageBuffer::build(&record, &layout(&record, 40.0, 0), &ChatStyles::default());

        assert_eq!(buffer.lines().len(), 1);
        assert_eq!(line_text(&buffer.lines()[0]), "hello big world");
    }

    #[test]
    fn wrapped_words_start_new_lines() {
        let record = MessageRecord::plain("aaaa bbbb cccc");
        let buffer = MessageBuffer::build(&record, &layout(&record, 5.0, 0), &ChatStyles::default());

        let texts: Vec<String> = buffer.lines().iter().map(line_text).collect();
        assert_eq!(texts, vec!["aaaa", "bbbb", "cccc"]);
    }

    #[test]
    fn positions_map_chars_to_cells() {
        let record = MessageRecord::plain("ab 日");
        let buffer = MessageBuffer::build(&record, &layout(&record, 40.0, 0), &ChatStyles::default());

        let cells: Vec<(u16, u16, usize)> = buffer
            .positions()
            .iter()
            .map(|p| (p.x, p.width, p.index))
            .collect();
        assert_eq!(cells, vec![(0, 1, 0), (1, 1, 1), (3, 2, 2)]);
    }

    #[test]
    fn image_occupies_one_position() {
        let record = MessageBuilder::new()
            .text("hi")
            .image("Kappa", 28.0, 28.0)
            .build();
        let buffer = MessageBuffer::build(&record, &layout(&record, 40.0, 0), &ChatStyles::default());

        let last = buffer.positions().last().copied().expect("image cell");
        assert_eq!((last.x, last.width, last.index), (3, 5, 2));
        assert_eq!(line_text(&buffer.lines()[0]), "hi Kappa");
    }

    #[test]
    fn collapsed_message_gets_suffix() {
        let record = MessageRecord::plain("aaaa bbbb cccc");
        let buffer = MessageBuffer::build(&record, &layout(&record, 5.0, 1), &ChatStyles::default());

        assert_eq!(buffer.lines().len(), 1);
        assert_eq!(line_text(&buffer.lines()[0]), format!("aaaa{COLLAPSED_SUFFIX}"));
    }

    #[test]
    fn go_to_bottom_bar_is_centered() {
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);

        render_go_to_bottom(&mut buf, area, &ChatStyles::default());

        let row: String = (0..30).map(|x| buf[(x, 2)].symbol().to_string()).collect();
        assert_eq!(row.trim(), GO_TO_BOTTOM_LABEL);
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }

    #[test]
    fn tooltip_stays_inside_area() {
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);

        render_tooltip(&mut buf, area, Point::new(18.0, 3.0), "URL: x", &ChatStyles::default());

        let row: String = (0..20).map(|x| buf[(x, 2)].symbol().to_string()).collect();
        assert!(row.contains("URL: x"));
    }
}
