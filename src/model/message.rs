//! Message records: immutable word runs plus flags.
//!
//! A [`MessageRecord`] is produced once (usually through [`MessageBuilder`])
//! and never mutated after it enters the store. Display geometry lives in
//! the layout engine, not here.

use super::identifiers::MessageId;
use chrono::{DateTime, Utc};

/// Click target attached to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// External URL.
    Url(String),
    /// Chat user, identified by login name.
    UserInfo(String),
}

impl Link {
    /// The link payload (URL or login name).
    pub fn value(&self) -> &str {
        match self {
            Link::Url(url) => url,
            Link::UserInfo(login) => login,
        }
    }
}

/// Semantic role of an element, used by painters to pick a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementRole {
    /// Regular message body text.
    #[default]
    Body,
    /// Author name.
    Username,
    /// Timestamp prefix.
    Timestamp,
    /// Clickable URL.
    Link,
    /// Text generated by the client (notices, parse errors).
    System,
}

/// Content of a single element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// A word of text. Display text and copy text are identical.
    Text(String),
    /// An inline image (emote). Copies as its alt text.
    Image {
        /// Text used when copying or when the image cannot be shown.
        alt: String,
        /// Width at scale 1.
        width: f32,
        /// Height at scale 1.
        height: f32,
    },
    /// Preformatted timestamp.
    Timestamp(String),
}

/// One word-like unit of a message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageElement {
    kind: ElementKind,
    role: ElementRole,
    trailing_space: bool,
    tooltip: Option<String>,
    link: Option<Link>,
}

impl MessageElement {
    /// Text element with a trailing space.
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_kind(ElementKind::Text(text.into()))
    }

    /// Image element with a trailing space.
    pub fn image(alt: impl Into<String>, width: f32, height: f32) -> Self {
        Self::with_kind(ElementKind::Image {
            alt: alt.into(),
            width,
            height,
        })
    }

    /// Timestamp element with a trailing space.
    pub fn timestamp(formatted: impl Into<String>) -> Self {
        let mut element = Self::with_kind(ElementKind::Timestamp(formatted.into()));
        element.role = ElementRole::Timestamp;
        element
    }

    fn with_kind(kind: ElementKind) -> Self {
        Self {
            kind,
            role: ElementRole::Body,
            trailing_space: true,
            tooltip: None,
            link: None,
        }
    }

    /// Set the semantic role.
    pub fn with_role(mut self, role: ElementRole) -> Self {
        self.role = role;
        self
    }

    /// Set whether a space follows this element.
    pub fn with_trailing_space(mut self, trailing_space: bool) -> Self {
        self.trailing_space = trailing_space;
        self
    }

    /// Attach a hover tooltip.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Attach a click target.
    pub fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    /// Element content.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Semantic role.
    pub fn role(&self) -> ElementRole {
        self.role
    }

    /// Whether a space follows this element.
    pub fn has_trailing_space(&self) -> bool {
        self.trailing_space
    }

    /// Hover tooltip, if any.
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// Click target, if any.
    pub fn link(&self) -> Option<&Link> {
        self.link.as_ref()
    }

    /// Whether the element is character-addressable text.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text(_) | ElementKind::Timestamp(_))
    }

    /// Text shown on screen. Images display as their alt text in
    /// text-only painters.
    pub fn display_text(&self) -> &str {
        match &self.kind {
            ElementKind::Text(text) | ElementKind::Timestamp(text) => text,
            ElementKind::Image { alt, .. } => alt,
        }
    }

    /// Text placed on the clipboard.
    pub fn copy_text(&self) -> &str {
        self.display_text()
    }

    /// Number of selection positions this element occupies.
    ///
    /// Text counts characters; an image is a single position.
    pub fn char_len(&self) -> usize {
        match &self.kind {
            ElementKind::Text(text) | ElementKind::Timestamp(text) => text.chars().count(),
            ElementKind::Image { .. } => 1,
        }
    }
}

/// Message-level flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageFlags {
    /// Mentions the local user or matches a highlight phrase.
    pub highlighted: bool,
    /// Must not raise a notification when received.
    pub do_not_notify: bool,
    /// Generated by the client rather than a chat user.
    pub system: bool,
    /// Greyed out (e.g. deleted by a moderator).
    pub disabled: bool,
}

/// Kind of marker a message contributes to the scrollbar gutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HighlightKind {
    /// No marker.
    #[default]
    None,
    /// Message mentions the user.
    Mention,
    /// Client-generated notice worth marking.
    System,
}

/// Scrollbar marker descriptor carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScrollbarHighlight {
    kind: HighlightKind,
}

impl ScrollbarHighlight {
    /// Marker of the given kind.
    pub fn new(kind: HighlightKind) -> Self {
        Self { kind }
    }

    /// Marker kind.
    pub fn kind(&self) -> HighlightKind {
        self.kind
    }

    /// True when the message contributes no marker.
    pub fn is_null(&self) -> bool {
        self.kind == HighlightKind::None
    }
}

/// Immutable chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecord {
    id: MessageId,
    timestamp: Option<DateTime<Utc>>,
    login_name: Option<String>,
    elements: Vec<MessageElement>,
    flags: MessageFlags,
    scrollbar_highlight: ScrollbarHighlight,
}

impl MessageRecord {
    /// Record consisting of the given elements, without author or timestamp.
    pub fn from_elements(elements: Vec<MessageElement>) -> Self {
        Self {
            id: MessageId::UNASSIGNED,
            timestamp: None,
            login_name: None,
            elements,
            flags: MessageFlags::default(),
            scrollbar_highlight: ScrollbarHighlight::default(),
        }
    }

    /// Plain-text record, split into words on whitespace.
    pub fn plain(text: &str) -> Self {
        MessageBuilder::new().text(text).build()
    }

    /// Store-assigned identity.
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Stamp the identity. Only the store does this.
    pub(crate) fn with_id(mut self, id: MessageId) -> Self {
        self.id = id;
        self
    }

    /// When the message was sent, if known.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Author login, if any.
    pub fn login_name(&self) -> Option<&str> {
        self.login_name.as_deref()
    }

    /// Word runs in display order.
    pub fn elements(&self) -> &[MessageElement] {
        &self.elements
    }

    /// Message flags.
    pub fn flags(&self) -> MessageFlags {
        self.flags
    }

    /// Scrollbar marker for this message.
    pub fn scrollbar_highlight(&self) -> ScrollbarHighlight {
        self.scrollbar_highlight
    }

    /// Character index one past the last selectable position.
    pub fn last_char_index(&self) -> usize {
        self.elements.iter().map(MessageElement::char_len).sum()
    }

    /// Whole-message copy text (words joined by their trailing spaces).
    pub fn copy_text(&self) -> String {
        let mut out = String::new();
        for (i, element) in self.elements.iter().enumerate() {
            out.push_str(element.copy_text());
            if element.has_trailing_space() && i + 1 < self.elements.len() {
                out.push(' ');
            }
        }
        out
    }
}

/// Incremental constructor for [`MessageRecord`].
#[derive(Debug, Default)]
pub struct MessageBuilder {
    timestamp: Option<DateTime<Utc>>,
    login_name: Option<String>,
    elements: Vec<MessageElement>,
    flags: MessageFlags,
    highlight_override: Option<ScrollbarHighlight>,
}

impl MessageBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a formatted timestamp element.
    pub fn timestamp(mut self, at: DateTime<Utc>, format: &str) -> Self {
        self.timestamp = Some(at);
        self.elements
            .push(MessageElement::timestamp(at.format(format).to_string()));
        self
    }

    /// Record the send time without emitting a visible element.
    pub fn sent_at(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }

    /// Append the author name, linked to the user.
    pub fn author(mut self, login: &str, display: &str) -> Self {
        self.login_name = Some(login.to_string());
        self.elements.push(
            MessageElement::text(format!("{display}:"))
                .with_role(ElementRole::Username)
                .with_link(Link::UserInfo(login.to_string())),
        );
        self
    }

    /// Append whitespace-separated words; URL-looking words become links.
    pub fn text(mut self, text: &str) -> Self {
        for word in text.split_whitespace() {
            let element = match match_link(word) {
                Some(url) => MessageElement::text(word)
                    .with_role(ElementRole::Link)
                    .with_tooltip(format!("URL: {url}"))
                    .with_link(Link::Url(url)),
                None => MessageElement::text(word),
            };
            self.elements.push(element);
        }
        self
    }

    /// Append an arbitrary element.
    pub fn element(mut self, element: MessageElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Append an inline image.
    pub fn image(mut self, alt: &str, width: f32, height: f32) -> Self {
        self.elements.push(
            MessageElement::image(alt, width, height).with_tooltip(alt.to_string()),
        );
        self
    }

    /// Mark the message as highlighted (adds a mention marker).
    pub fn highlighted(mut self, value: bool) -> Self {
        self.flags.highlighted = value;
        self
    }

    /// Suppress notifications for this message.
    pub fn do_not_notify(mut self, value: bool) -> Self {
        self.flags.do_not_notify = value;
        self
    }

    /// Mark as client-generated.
    pub fn system(mut self, value: bool) -> Self {
        self.flags.system = value;
        self
    }

    /// Mark as disabled.
    pub fn disabled(mut self, value: bool) -> Self {
        self.flags.disabled = value;
        self
    }

    /// Override the derived scrollbar marker.
    pub fn scrollbar_highlight(mut self, highlight: ScrollbarHighlight) -> Self {
        self.highlight_override = Some(highlight);
        self
    }

    /// Finish the record. The last element never carries a trailing space.
    pub fn build(mut self) -> MessageRecord {
        if self.flags.system {
            for element in &mut self.elements {
                if element.role == ElementRole::Body {
                    element.role = ElementRole::System;
                }
            }
        }
        if let Some(last) = self.elements.last_mut() {
            last.trailing_space = false;
        }

        let scrollbar_highlight = self.highlight_override.unwrap_or_else(|| {
            if self.flags.highlighted {
                ScrollbarHighlight::new(HighlightKind::Mention)
            } else {
                ScrollbarHighlight::default()
            }
        });

        MessageRecord {
            id: MessageId::UNASSIGNED,
            timestamp: self.timestamp,
            login_name: self.login_name,
            elements: self.elements,
            flags: self.flags,
            scrollbar_highlight,
        }
    }
}

/// Return the URL a word points at, or `None` if it is not link-like.
///
/// Words with an explicit scheme are taken as-is; bare `www.` hosts get an
/// `http://` prefix.
pub fn match_link(word: &str) -> Option<String> {
    let trimmed = word.trim_end_matches(['.', ',', ')', '!', '?']);
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return (trimmed.len() > "https://".len()).then(|| trimmed.to_string());
    }
    if let Some(host) = trimmed.strip_prefix("www.") {
        let has_tld = host
            .rsplit_once('.')
            .is_some_and(|(name, tld)| !name.is_empty() && tld.chars().all(|c| c.is_ascii_alphabetic()) && !tld.is_empty());
        if has_tld || host.contains('/') {
            return Some(format!("http://{trimmed}"));
        }
    }
    None
}
