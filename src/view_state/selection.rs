//! Text selection addressed by (message index, character index).

use super::layout::slice_chars;
use super::pause::HeadShift;
use crate::model::MessageRecord;
use crate::store::Snapshot;

/// One selection anchor.
///
/// Ordered lexicographically: message first, then character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SelectionItem {
    /// Row index within the view's snapshot.
    pub message_index: usize,
    /// Selection position within the message.
    pub char_index: usize,
}

impl SelectionItem {
    /// Create an anchor.
    pub fn new(message_index: usize, char_index: usize) -> Self {
        Self {
            message_index,
            char_index,
        }
    }

    /// Anchor after `count` rows were evicted from the head.
    ///
    /// Indices move up and stop at zero. An anchor whose message was itself
    /// evicted lands on the start of the new first message.
    pub fn after_head_eviction(self, count: usize) -> Self {
        if self.message_index >= count {
            Self::new(self.message_index - count, self.char_index)
        } else {
            Self::new(0, 0)
        }
    }

    /// Anchor after `count` rows were inserted at the head.
    pub fn after_head_insertion(self, count: usize) -> Self {
        Self::new(self.message_index + count, self.char_index)
    }

    /// End of the last row of `snapshot`, or `None` when it is empty.
    pub fn end_of(snapshot: &Snapshot) -> Option<Self> {
        snapshot
            .last()
            .map(|record| Self::new(snapshot.len() - 1, record.last_char_index()))
    }

    /// Anchor moved back to `last` if its row lies past it.
    pub fn clamped_to(self, last: SelectionItem) -> Self {
        if self.message_index > last.message_index {
            last
        } else {
            self
        }
    }
}

/// A selection between two anchors. `start` is where the pointer went
/// down, `end` where it is now; either may come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Anchor where selecting began.
    pub start: SelectionItem,
    /// Moving anchor.
    pub end: SelectionItem,
}

impl Selection {
    /// Selection from `start` to `end`.
    pub fn new(start: SelectionItem, end: SelectionItem) -> Self {
        Self { start, end }
    }

    /// Collapsed selection at `at`.
    pub fn caret(at: SelectionItem) -> Self {
        Self::new(at, at)
    }

    /// Earlier anchor.
    pub fn min(&self) -> SelectionItem {
        self.start.min(self.end)
    }

    /// Later anchor.
    pub fn max(&self) -> SelectionItem {
        self.start.max(self.end)
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the selection stays within one message.
    pub fn is_single_message(&self) -> bool {
        self.start.message_index == self.end.message_index
    }

    /// Selected positions within row `index`, if the row is touched.
    ///
    /// `end` is `usize::MAX` when the selection continues past the row.
    pub fn range_in_message(&self, index: usize) -> Option<(usize, usize)> {
        if self.is_empty() {
            return None;
        }
        let (min, max) = (self.min(), self.max());
        if index < min.message_index || index > max.message_index {
            return None;
        }
        let from = if index == min.message_index { min.char_index } else { 0 };
        let to = if index == max.message_index { max.char_index } else { usize::MAX };
        Some((from, to))
    }

    /// Selection after `count` rows were evicted from the head.
    pub fn after_head_eviction(self, count: usize) -> Self {
        Self::new(
            self.start.after_head_eviction(count),
            self.end.after_head_eviction(count),
        )
    }

    /// Selection after `count` rows were inserted at the head.
    pub fn after_head_insertion(self, count: usize) -> Self {
        Self::new(
            self.start.after_head_insertion(count),
            self.end.after_head_insertion(count),
        )
    }

    /// Selection with anchors past `last` pulled back onto it.
    pub fn clamped_to(self, last: SelectionItem) -> Self {
        Self::new(self.start.clamped_to(last), self.end.clamped_to(last))
    }

    /// Selection after one recorded head change.
    pub fn after_shift(self, shift: HeadShift) -> Self {
        match shift {
            HeadShift::Evicted(count) => self.after_head_eviction(count),
            HeadShift::Inserted { count, tail_limit } => {
                let moved = self.after_head_insertion(count);
                match tail_limit {
                    Some(last) => moved.clamped_to(last),
                    None => moved,
                }
            }
        }
    }

    /// Copy text of the selection within `snapshot`.
    ///
    /// Rows are separated by `\n`. Images contribute their alt text; a
    /// trailing space is kept only when the selection continues past it.
    pub fn selected_text(&self, snapshot: &Snapshot) -> String {
        let mut text = String::new();
        if self.is_empty() || snapshot.is_empty() {
            return text;
        }

        let (min, max) = (self.min(), self.max());
        let last = max.message_index.min(snapshot.len() - 1);
        for index in min.message_index..=last {
            let Some((from, to)) = self.range_in_message(index) else {
                continue;
            };
            append_message_range(&mut text, &snapshot[index], from, to);
            if index < last {
                text.push('\n');
            }
        }
        text
    }
}

fn append_message_range(out: &mut String, record: &MessageRecord, from: usize, to: usize) {
    let mut position = 0usize;
    for element in record.elements() {
        let start = position;
        let end = start + element.char_len();
        position = end;

        if end <= from {
            continue;
        }
        if start >= to {
            break;
        }

        if element.is_text() {
            let local = from.saturating_sub(start)..to.min(end) - start;
            out.push_str(slice_chars(element.copy_text(), local));
        } else {
            out.push_str(element.copy_text());
        }
        if element.has_trailing_space() && to > end {
            out.push(' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MessageBuilder;
    use crate::store::MessageStore;

    fn item(m: usize, c: usize) -> SelectionItem {
        SelectionItem::new(m, c)
    }

    fn snapshot(lines: &[&str]) -> Snapshot {
        let store = MessageStore::new(100);
        for line in lines {
            store.push_back(MessageRecord::plain(line));
        }
        store.snapshot()
    }

    mod ordering {
        use super::*;

        #[test]
        fn min_max_sort_lexicographically() {
            let sel = Selection::new(item(3, 1), item(1, 9));
            assert_eq!(sel.min(), item(1, 9));
            assert_eq!(sel.max(), item(3, 1));

            let same_row = Selection::new(item(2, 8), item(2, 3));
            assert_eq!(same_row.min(), item(2, 3));
        }

        #[test]
        fn empty_when_anchors_match() {
            assert!(Selection::caret(item(4, 2)).is_empty());
            assert!(Selection::default().is_empty());
            assert!(!Selection::new(item(4, 2), item(4, 3)).is_empty());
        }
    }

    mod reindexing {
        use super::*;

        #[test]
        fn head_eviction_moves_up_one() {
            let sel = Selection::new(item(5, 3), item(6, 1)).after_head_eviction(1);
            assert_eq!(sel.start, item(4, 3));
            assert_eq!(sel.end, item(5, 1));
        }

        #[test]
        fn head_insertion_moves_down() {
            let sel = Selection::new(item(5, 3), item(5, 3)).after_head_insertion(2);
            assert_eq!(sel.start, item(7, 3));
        }

        #[test]
        fn anchor_on_evicted_row_clamps_to_start() {
            let sel = Selection::new(item(0, 4), item(2, 1)).after_head_eviction(1);
            assert_eq!(sel.start, item(0, 0));
            assert_eq!(sel.end, item(1, 1));
        }

        #[test]
        fn anchor_on_tail_evicted_row_clamps_to_last_row_end() {
            // Four rows, two inserted at the head, one evicted from the tail.
            let shift = HeadShift::Inserted {
                count: 2,
                tail_limit: Some(item(3, 5)),
            };
            let sel = Selection::new(item(0, 2), item(2, 1)).after_shift(shift);
            assert_eq!(sel.start, item(2, 2));
            assert_eq!(sel.end, item(3, 5));
        }

        #[test]
        fn shifts_replay_in_order() {
            let sel = Selection::caret(item(1, 3));
            let replayed = [
                HeadShift::Evicted(2),
                HeadShift::Inserted {
                    count: 3,
                    tail_limit: None,
                },
            ]
            .into_iter()
            .fold(sel, Selection::after_shift);
            assert_eq!(replayed.start, item(3, 0));
        }

        #[test]
        fn end_of_points_past_last_character() {
            let snap = snapshot(&["one", "three"]);
            assert_eq!(SelectionItem::end_of(&snap), Some(item(1, 5)));
            assert_eq!(SelectionItem::end_of(&Snapshot::default()), None);
        }
    }

    mod copy_text {
        use super::*;

        #[test]
        fn partial_single_message() {
            let snap = snapshot(&["hello big world"]);
            let sel = Selection::new(item(0, 2), item(0, 7));
            assert_eq!(sel.selected_text(&snap), "llo bi");
        }

        #[test]
        fn reversed_anchors_give_same_text() {
            let snap = snapshot(&["hello big world"]);
            let sel = Selection::new(item(0, 7), item(0, 2));
            assert_eq!(sel.selected_text(&snap), "llo bi");
        }

        #[test]
        fn multi_message_joins_with_newlines() {
            let snap = snapshot(&["one two", "three", "four five"]);
            let sel = Selection::new(item(0, 3), item(2, 4));
            assert_eq!(sel.selected_text(&snap), "two\nthree\nfour");
        }

        #[test]
        fn whole_word_boundary_keeps_inner_spaces() {
            let snap = snapshot(&["ab cd"]);
            let sel = Selection::new(item(0, 0), item(0, 4));
            assert_eq!(sel.selected_text(&snap), "ab cd");
        }

        #[test]
        fn images_copy_as_alt_text() {
            let store = MessageStore::new(4);
            store.push_back(MessageBuilder::new().text("nice").image("Kappa", 28.0, 28.0).text("!").build());
            let sel = Selection::new(item(0, 0), item(0, 6));
            assert_eq!(sel.selected_text(&store.snapshot()), "nice Kappa !");
        }

        #[test]
        fn selection_past_snapshot_end_is_clamped() {
            let snap = snapshot(&["a", "b"]);
            let sel = Selection::new(item(1, 0), item(9, 0));
            assert_eq!(sel.selected_text(&snap), "b");
        }

        #[test]
        fn empty_selection_copies_nothing() {
            let snap = snapshot(&["a"]);
            assert_eq!(Selection::caret(item(0, 0)).selected_text(&snap), "");
        }
    }
}
