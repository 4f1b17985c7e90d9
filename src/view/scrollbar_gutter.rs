//! Scrollbar gutter: track, thumb and highlight markers.

use super::constants::{MARKER_SYMBOL, THUMB_SYMBOL, TRACK_SYMBOL};
use super::styles::ChatStyles;
use crate::view_state::Scrollbar;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// Draw `scrollbar` into the one-column `area`. Nothing is drawn while the
/// scrollbar is hidden; the gutter stays reserved either way.
pub fn render_scrollbar(buf: &mut Buffer, area: Rect, scrollbar: &Scrollbar, styles: &ChatStyles) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let Some(thumb) = scrollbar.thumb(f32::from(area.height)) else {
        return;
    };
    let x = area.x;

    for y in area.top()..area.bottom() {
        buf[(x, y)].set_symbol(TRACK_SYMBOL).set_style(styles.track());
    }

    let first = thumb.offset.floor() as u16;
    let last = ((thumb.offset + thumb.length).ceil() as u16)
        .max(first + 1)
        .min(area.height);
    for offset in first..last {
        buf[(x, area.y + offset)]
            .set_symbol(THUMB_SYMBOL)
            .set_style(styles.thumb());
    }

    let maximum = scrollbar.maximum();
    let track = f64::from(area.height);
    for (row, kind) in scrollbar.highlights().markers() {
        let Some(style) = styles.marker(kind) else {
            continue;
        };
        let offset = ((row as f64 / maximum) * track).floor() as u16;
        let y = area.y + offset.min(area.height - 1);
        buf[(x, y)].set_symbol(MARKER_SYMBOL).set_style(style);
    }
}
