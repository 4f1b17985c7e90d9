//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod key_action;
pub mod message;

// Re-export for convenience
pub use identifiers::MessageId;
pub use key_action::KeyAction;
pub use message::{
    ElementKind, ElementRole, HighlightKind, Link, MessageBuilder, MessageElement, MessageFlags,
    MessageRecord, ScrollbarHighlight,
};
