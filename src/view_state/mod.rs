//! View-state layer - layout, scrolling, selection and paint caching
//!
//! Everything here is driven from the UI loop only; the store is the sole
//! structure shared with the producer.
//!
//! # Module Structure
//!
//! - `types`: Geometry types (Point, Rect, ViewportSize, LayoutKey)
//! - `measure`: TextMeasure - glyph metrics abstraction
//! - `layout`: MessageLayout - word wrapping and in-message hit-testing
//! - `layout_engine`: LayoutEngine - identity-keyed layout side table
//! - `wheel`: Fractional wheel-delta walk over row heights
//! - `scrollbar`: Scrollbar - current/desired positions and smooth scrolling
//! - `highlights`: HighlightMarkers - scrollbar markers aligned with rows
//! - `cache`: PaintBufferCache - per-message paint buffers
//! - `selection`: Selection - anchors, reindexing, copy text
//! - `hit_test`: HitTestResult - result of pointer hit-testing
//! - `visible_range`: VisibleRange - rows intersecting the viewport
//! - `pause`: PauseState, PendingShift and HeadShift - deferred store observation

pub mod cache;
pub mod highlights;
pub mod hit_test;
pub mod layout;
pub mod layout_engine;
pub mod measure;
pub mod pause;
pub mod scrollbar;
pub mod selection;
pub mod types;
pub mod visible_range;
pub mod wheel;

pub use cache::PaintBufferCache;
pub use highlights::HighlightMarkers;
pub use hit_test::HitTestResult;
pub use layout::{LaidOutElement, MessageLayout};
pub use layout_engine::LayoutEngine;
pub use measure::{CellMeasure, FixedMeasure, TextMeasure};
pub use pause::{HeadShift, PauseState, PendingShift};
pub use scrollbar::Scrollbar;
pub use selection::{Selection, SelectionItem};
pub use types::{LayoutKey, Point, Rect, ViewportSize};
pub use visible_range::VisibleRange;
pub use wheel::{walk_wheel_delta, RowHeights, SnapshotRows};
