//! In-memory OPML document model.
//!
//! See <https://opml.org/spec2.opml> for the format. An `<outline>` carries no
//! explicit discriminator: whether it is a directory, a link, an inclusion or a
//! feed subscription is inferred from its fields, so [`Outline`] stays a single
//! flat struct and classification is a derived query.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const VERSION_1_0: &str = "1.0";
pub const VERSION_1_1: &str = "1.1";
pub const VERSION_2_0: &str = "2.0";

/// How the attributes of an [`Outline`] are interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutlineType {
    /// No `type` attribute: plain text or a directory.
    Text,
    /// `link`: `url` points to another OPML document or a web page.
    Link,
    /// `include`: `url` points to an OPML document to be included in place.
    Inclusion,
    /// `rss`: a feed subscription.
    Subscription,
    /// Any other tag, kept verbatim.
    Other(String),
}

impl OutlineType {
    /// Maps a `type` attribute value to its variant. `"text"` is [`OutlineType::Text`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            "link" => Self::Link,
            "include" => Self::Inclusion,
            "rss" => Self::Subscription,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Link => "link",
            Self::Inclusion => "include",
            Self::Subscription => "rss",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for OutlineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version of RSS supplied by a subscribed feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RssVersion {
    /// `RSS`
    Rss,
    /// `RSS2`
    Rss2,
    /// Any other value, kept verbatim.
    Other(String),
}

impl RssVersion {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "RSS" => Self::Rss,
            "RSS2" => Self::Rss2,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Rss => "RSS",
            Self::Rss2 => "RSS2",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for RssVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An OPML document: `<opml version="…"><head/><body/></opml>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// Free-form format version, conventionally one of the `VERSION_*` constants.
    /// Not validated.
    pub version: String,
    pub head: Head,
    pub body: Body,
}

impl Document {
    /// Creates an empty document declaring the given format version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }
}

/// Document metadata.
///
/// Optional integers are omitted from the wire form when zero, so a real zero
/// (e.g. a window at `top = 0`) cannot be told apart from an unset value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Head {
    /// The title of the document.
    pub title: String,

    /// When the document was created.
    pub date_created: Option<DateTime<Utc>>,

    /// When the document was last modified.
    pub date_modified: Option<DateTime<Utc>>,

    /// The owner of the document.
    pub owner_name: String,

    /// The email address of the owner of the document.
    pub owner_email: String,

    /// Line numbers of the outlines an outliner should expand on open.
    pub expansion_state: Vec<i64>,

    /// Which line of the outline is displayed on the top line of the window.
    pub vert_scroll_state: i64,

    /// Pixel location of the top edge of the window.
    pub window_top: i64,

    /// Pixel location of the left edge of the window.
    pub window_left: i64,

    /// Pixel location of the bottom edge of the window.
    pub window_bottom: i64,

    /// Pixel location of the right edge of the window.
    pub window_right: i64,
}

/// Top-level outlines of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Body {
    pub outlines: Vec<Outline>,
}

/// A single `<outline>` node: text, directory, link, inclusion or subscription.
///
/// Kind-specific fields are all optional and may be combined freely; nothing
/// prevents, say, a `link` outline from having children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    /// Text displayed when an outliner opens the document.
    pub text: String,

    /// The `type` attribute. `None` when absent.
    pub kind: Option<OutlineType>,

    /// Whether a breakpoint is set on this outline.
    pub is_breakpoint: bool,

    /// Whether the outline is commented.
    ///
    /// If an outline is commented, all subordinate outlines are considered to
    /// be commented as well. This is not propagated to children: consumers
    /// must apply it when walking the tree.
    pub is_comment: bool,

    /// Slash-delimited category paths.
    pub categories: Vec<String>,

    /// When the outline node was created.
    pub created: Option<DateTime<Utc>>,

    /// Link/inclusion: address of the linked or included resource.
    pub url: String,

    /// Subscription: version of RSS supplied by the feed.
    pub version: Option<RssVersion>,

    /// Subscription: top-level title of the feed.
    pub title: String,

    /// Subscription: top-level description of the feed.
    pub description: String,

    /// Subscription: top-level language of the feed.
    pub language: String,

    /// Subscription: the feed's website.
    pub html_url: String,

    /// Subscription: address of the feed itself.
    pub xml_url: String,

    /// Subordinate outlines, arbitrarily nested.
    pub outlines: Vec<Outline>,
}

impl Outline {
    /// Creates a plain text outline.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// True when the outline has at least one child, regardless of its type.
    pub fn is_directory(&self) -> bool {
        !self.outlines.is_empty()
    }

    /// The declared type, or [`OutlineType::Text`] when no type is set.
    pub fn outline_type(&self) -> OutlineType {
        self.kind.clone().unwrap_or(OutlineType::Text)
    }
}
