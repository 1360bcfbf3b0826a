//! Flat, attribute-shaped transfer forms of [`Head`] and [`Outline`].
//!
//! Composite fields are flattened to their textual encoding here (timestamps to
//! RFC 1123, lists to delimited strings) and empty values become `None`, which
//! the XML writer omits and the JSON serializer skips. Converting to the wire
//! form never fails; converting back fails on the first malformed timestamp or
//! integer list and returns nothing partial.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::error::OpmlError;
use crate::list;
use crate::model::{Head, Outline, OutlineType, RssVersion};
use crate::time;

/// `<head>` as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WireHead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expansion_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vert_scroll_state: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_top: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_left: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_bottom: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_right: Option<i64>,
}

impl WireHead {
    /// True when every field is absent, i.e. `<head/>`.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&Head> for WireHead {
    fn from(head: &Head) -> Self {
        Self {
            title: non_empty(&head.title),
            date_created: head.date_created.as_ref().map(time::encode),
            date_modified: head.date_modified.as_ref().map(time::encode),
            owner_name: non_empty(&head.owner_name),
            owner_email: non_empty(&head.owner_email),
            expansion_state: (!head.expansion_state.is_empty())
                .then(|| list::join_integers(&head.expansion_state)),
            vert_scroll_state: non_zero(head.vert_scroll_state),
            window_top: non_zero(head.window_top),
            window_left: non_zero(head.window_left),
            window_bottom: non_zero(head.window_bottom),
            window_right: non_zero(head.window_right),
        }
    }
}

impl TryFrom<WireHead> for Head {
    type Error = OpmlError;

    fn try_from(wire: WireHead) -> Result<Self, Self::Error> {
        Ok(Head {
            title: wire.title.unwrap_or_default(),
            date_created: decode_time(wire.date_created.as_deref())?,
            date_modified: decode_time(wire.date_modified.as_deref())?,
            owner_name: wire.owner_name.unwrap_or_default(),
            owner_email: wire.owner_email.unwrap_or_default(),
            expansion_state: match wire.expansion_state.as_deref() {
                Some(value) if !value.is_empty() => list::split_integers(value)?,
                _ => Vec::new(),
            },
            vert_scroll_state: wire.vert_scroll_state.unwrap_or_default(),
            window_top: wire.window_top.unwrap_or_default(),
            window_left: wire.window_left.unwrap_or_default(),
            window_bottom: wire.window_bottom.unwrap_or_default(),
            window_right: wire.window_right.unwrap_or_default(),
        })
    }
}

/// The attribute bag of an `<outline>` element. Children are carried
/// separately by the codec.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WireOutline {
    pub text: String,
    #[serde(rename = "categories", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_breakpoint: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_comment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml_url: Option<String>,
}

impl From<&Outline> for WireOutline {
    fn from(outline: &Outline) -> Self {
        Self {
            text: outline.text.clone(),
            category: (!outline.categories.is_empty())
                .then(|| list::join_categories(&outline.categories))
                .filter(|joined| !joined.is_empty()),
            created: outline.created.as_ref().map(time::encode),
            description: non_empty(&outline.description),
            html_url: non_empty(&outline.html_url),
            is_breakpoint: outline.is_breakpoint,
            is_comment: outline.is_comment,
            language: non_empty(&outline.language),
            title: non_empty(&outline.title),
            kind: outline
                .kind
                .as_ref()
                .map(|kind| kind.as_str().to_string())
                .filter(|tag| !tag.is_empty()),
            url: non_empty(&outline.url),
            version: outline
                .version
                .as_ref()
                .map(|version| version.as_str().to_string())
                .filter(|tag| !tag.is_empty()),
            xml_url: non_empty(&outline.xml_url),
        }
    }
}

impl WireOutline {
    /// Converts back to the model, adopting the already-decoded children.
    ///
    /// # Errors
    ///
    /// Fails on a malformed `created` timestamp; no partial outline is returned.
    pub fn into_outline(self, outlines: Vec<Outline>) -> Result<Outline, OpmlError> {
        Ok(Outline {
            text: self.text,
            kind: self
                .kind
                .filter(|tag| !tag.is_empty())
                .map(|tag| OutlineType::from_tag(&tag)),
            is_breakpoint: self.is_breakpoint,
            is_comment: self.is_comment,
            categories: match self.category.as_deref() {
                Some(value) if !value.is_empty() => list::split_categories(value),
                _ => Vec::new(),
            },
            created: decode_time(self.created.as_deref())?,
            url: self.url.unwrap_or_default(),
            version: self
                .version
                .filter(|tag| !tag.is_empty())
                .map(|tag| RssVersion::from_tag(&tag)),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            language: self.language.unwrap_or_default(),
            html_url: self.html_url.unwrap_or_default(),
            xml_url: self.xml_url.unwrap_or_default(),
            outlines,
        })
    }
}

/// JSON shape of an outline: the wire attributes plus nested children.
#[derive(Serialize)]
struct JsonOutline<'a> {
    #[serde(flatten)]
    attributes: WireOutline,
    #[serde(skip_serializing_if = "has_no_children")]
    outlines: &'a [Outline],
}

impl Serialize for Head {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireHead::from(self).serialize(serializer)
    }
}

impl Serialize for Outline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        JsonOutline {
            attributes: WireOutline::from(self),
            outlines: &self.outlines,
        }
        .serialize(serializer)
    }
}

fn decode_time(value: Option<&str>) -> Result<Option<DateTime<Utc>>, OpmlError> {
    match value {
        Some(value) if !value.is_empty() => time::decode(value).map(Some),
        _ => Ok(None),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn non_zero(value: i64) -> Option<i64> {
    (value != 0).then_some(value)
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn has_no_children(outlines: &&[Outline]) -> bool {
    outlines.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_head_to_wire_omits_zero_values() {
        let head = Head {
            title: "x".to_string(),
            ..Head::default()
        };

        let wire = WireHead::from(&head);
        assert_eq!(
            wire,
            WireHead {
                title: Some("x".to_string()),
                ..WireHead::default()
            }
        );
        assert!(WireHead::from(&Head::default()).is_empty());
    }

    #[test]
    fn test_head_to_wire_flattens_composites() {
        let head = Head {
            date_created: Some(Utc.with_ymd_and_hms(2005, 10, 13, 15, 34, 7).unwrap()),
            expansion_state: vec![1, 6, 13],
            window_top: 105,
            ..Head::default()
        };

        let wire = WireHead::from(&head);
        assert_eq!(
            wire.date_created.as_deref(),
            Some("Thu, 13 Oct 2005 15:34:07 GMT")
        );
        assert_eq!(wire.expansion_state.as_deref(), Some("1, 6, 13"));
        assert_eq!(wire.window_top, Some(105));
        assert_eq!(wire.window_left, None);
    }

    #[test]
    fn test_head_from_wire() {
        let wire = WireHead {
            title: Some("states.opml".to_string()),
            date_modified: Some("Sat, 18 Jun 2005 12:11:52 GMT".to_string()),
            expansion_state: Some("1,6, 13".to_string()),
            vert_scroll_state: Some(1),
            ..WireHead::default()
        };

        let head = Head::try_from(wire).unwrap();
        assert_eq!(head.title, "states.opml");
        assert_eq!(
            head.date_modified,
            Some(Utc.with_ymd_and_hms(2005, 6, 18, 12, 11, 52).unwrap())
        );
        assert_eq!(head.date_created, None);
        assert_eq!(head.expansion_state, vec![1, 6, 13]);
        assert_eq!(head.vert_scroll_state, 1);
    }

    #[test]
    fn test_head_from_wire_empty_strings_are_absent() {
        let wire = WireHead {
            date_created: Some(String::new()),
            expansion_state: Some(String::new()),
            ..WireHead::default()
        };

        let head = Head::try_from(wire).unwrap();
        assert_eq!(head, Head::default());
    }

    #[test]
    fn test_head_from_wire_rejects_bad_expansion_state() {
        let wire = WireHead {
            title: Some("t".to_string()),
            expansion_state: Some("1, a, 3".to_string()),
            ..WireHead::default()
        };

        assert!(matches!(
            Head::try_from(wire),
            Err(OpmlError::MalformedIntegerList { .. })
        ));
    }

    #[test]
    fn test_outline_to_wire() {
        let outline = Outline {
            text: "The Mets are the best team in baseball.".to_string(),
            categories: vec![
                "/Philosophy/Baseball/Mets".to_string(),
                "/Tourism/New York".to_string(),
            ],
            created: Some(Utc.with_ymd_and_hms(2005, 10, 31, 18, 21, 33).unwrap()),
            is_comment: true,
            ..Outline::default()
        };

        let wire = WireOutline::from(&outline);
        assert_eq!(
            wire.category.as_deref(),
            Some("/Philosophy/Baseball/Mets,/Tourism/New York")
        );
        assert_eq!(wire.created.as_deref(), Some("Mon, 31 Oct 2005 18:21:33 GMT"));
        assert!(wire.is_comment);
        assert!(!wire.is_breakpoint);
        assert_eq!(wire.kind, None);
        assert_eq!(wire.url, None);
    }

    #[test]
    fn test_outline_from_wire_keeps_children_in_order() {
        let wire = WireOutline {
            text: "Feeds".to_string(),
            kind: Some("rss".to_string()),
            version: Some("RSS2".to_string()),
            ..WireOutline::default()
        };
        let children = vec![Outline::text("a"), Outline::text("b")];

        let outline = wire.into_outline(children).unwrap();
        assert_eq!(outline.kind, Some(OutlineType::Subscription));
        assert_eq!(outline.version, Some(RssVersion::Rss2));
        assert_eq!(outline.outlines[0].text, "a");
        assert_eq!(outline.outlines[1].text, "b");
    }

    #[test]
    fn test_outline_from_wire_rejects_bad_created() {
        let wire = WireOutline {
            text: "bad".to_string(),
            created: Some("not-a-date".to_string()),
            ..WireOutline::default()
        };

        assert!(matches!(
            wire.into_outline(Vec::new()),
            Err(OpmlError::MalformedTimestamp { .. })
        ));
    }

    #[test]
    fn test_outline_json_field_names() {
        let outline = Outline {
            text: "Hacker News".to_string(),
            kind: Some(OutlineType::Subscription),
            html_url: "https://news.ycombinator.com/".to_string(),
            xml_url: "https://news.ycombinator.com/rss".to_string(),
            is_breakpoint: true,
            ..Outline::default()
        };

        let value = serde_json::to_value(&outline).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "text": "Hacker News",
                "html_url": "https://news.ycombinator.com/",
                "is_breakpoint": true,
                "type": "rss",
                "xml_url": "https://news.ycombinator.com/rss",
            })
        );
    }

    #[test]
    fn test_head_json_omits_empty_fields() {
        let head = Head {
            title: "Feed subscriptions".to_string(),
            owner_name: "Jane Doe".to_string(),
            ..Head::default()
        };

        let value = serde_json::to_value(&head).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "title": "Feed subscriptions", "owner_name": "Jane Doe" })
        );
    }
}
