//! Pointer hit-testing results

use super::types::Point;
use crate::model::MessageId;

/// Result of hit-testing a viewport coordinate against the painted rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTestResult {
    /// The point is not over any row (below the content, or empty view).
    Miss,

    /// The point is over a row.
    Hit {
        /// Row index within the view's snapshot.
        index: usize,
        /// Identity of the row's record.
        id: MessageId,
        /// The point relative to the row's top-left corner.
        relative: Point,
    },
}

impl HitTestResult {
    /// Create a miss result.
    pub fn miss() -> Self {
        Self::Miss
    }

    /// Create a hit result.
    pub fn hit(index: usize, id: MessageId, relative: Point) -> Self {
        Self::Hit {
            index,
            id,
            relative,
        }
    }

    /// Check if this was a hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// Row index if hit.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Hit { index, .. } => Some(*index),
            Self::Miss => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod constructors {
        use super::*;

        #[test]
        fn miss_is_not_a_hit() {
            let result = HitTestResult::miss();
            assert_eq!(result, HitTestResult::Miss);
            assert!(!result.is_hit());
            assert_eq!(result.index(), None);
        }

        #[test]
        fn hit_carries_fields() {
            let result = HitTestResult::hit(5, MessageId::new(9), Point::new(1.0, 2.0));
            match result {
                HitTestResult::Hit {
                    index,
                    id,
                    relative,
                } => {
                    assert_eq!(index, 5);
                    assert_eq!(id, MessageId::new(9));
                    assert_eq!(relative, Point::new(1.0, 2.0));
                }
                HitTestResult::Miss => panic!("Expected Hit, got Miss"),
            }
            assert!(result.is_hit());
            assert_eq!(result.index(), Some(5));
        }
    }
}
