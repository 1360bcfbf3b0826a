use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::OpmlError;
use crate::model::{Body, Document, Head, Outline};
use crate::wire::{WireHead, WireOutline};

/// Limits applied while decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// SEC-003: Maximum `<outline>` nesting depth. `None` means unlimited.
    pub max_depth: Option<usize>,
}

impl DecodeOptions {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }
}

/// An `<outline>` whose end tag has not been read yet.
struct OpenOutline {
    wire: WireOutline,
    children: Vec<Outline>,
}

/// Where the reader currently is relative to the elements we care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Root,
    Head,
    HeadField(HeadField),
    Body,
    Outline,
    /// Inside an element with no meaning to OPML; its subtree is ignored.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadField {
    Title,
    DateCreated,
    DateModified,
    OwnerName,
    OwnerEmail,
    ExpansionState,
    VertScrollState,
    WindowTop,
    WindowLeft,
    WindowBottom,
    WindowRight,
}

impl HeadField {
    fn from_name(name: &[u8]) -> Option<Self> {
        Some(match name {
            b"title" => Self::Title,
            b"dateCreated" => Self::DateCreated,
            b"dateModified" => Self::DateModified,
            b"ownerName" => Self::OwnerName,
            b"ownerEmail" => Self::OwnerEmail,
            b"expansionState" => Self::ExpansionState,
            b"vertScrollState" => Self::VertScrollState,
            b"windowTop" => Self::WindowTop,
            b"windowLeft" => Self::WindowLeft,
            b"windowBottom" => Self::WindowBottom,
            b"windowRight" => Self::WindowRight,
            _ => return None,
        })
    }

    fn element_name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::DateCreated => "dateCreated",
            Self::DateModified => "dateModified",
            Self::OwnerName => "ownerName",
            Self::OwnerEmail => "ownerEmail",
            Self::ExpansionState => "expansionState",
            Self::VertScrollState => "vertScrollState",
            Self::WindowTop => "windowTop",
            Self::WindowLeft => "windowLeft",
            Self::WindowBottom => "windowBottom",
            Self::WindowRight => "windowRight",
        }
    }

    /// Stores the collected character data into the matching wire field.
    fn assign(self, head: &mut WireHead, text: String) -> Result<(), OpmlError> {
        match self {
            Self::Title => head.title = Some(text),
            Self::DateCreated => head.date_created = Some(text),
            Self::DateModified => head.date_modified = Some(text),
            Self::OwnerName => head.owner_name = Some(text),
            Self::OwnerEmail => head.owner_email = Some(text),
            Self::ExpansionState => head.expansion_state = Some(text),
            Self::VertScrollState => head.vert_scroll_state = self.parse_integer(&text)?,
            Self::WindowTop => head.window_top = self.parse_integer(&text)?,
            Self::WindowLeft => head.window_left = self.parse_integer(&text)?,
            Self::WindowBottom => head.window_bottom = self.parse_integer(&text)?,
            Self::WindowRight => head.window_right = self.parse_integer(&text)?,
        }
        Ok(())
    }

    fn parse_integer(self, text: &str) -> Result<Option<i64>, OpmlError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<i64>()
            .map(Some)
            .map_err(|source| OpmlError::MalformedInteger {
                element: self.element_name(),
                value: text.to_string(),
                source,
            })
    }
}

/// Decodes a whole document from `reader`.
///
/// Outlines are converted from their wire form as their end tag is read, so
/// children are always complete before their parent. The first conversion
/// error aborts the decode. Character data in head fields is kept verbatim,
/// surrounding whitespace included; integer fields trim it before parsing.
///
/// # Security
///
/// - quick-xml (0.37) does not expand `<!ENTITY>` declarations; only the five
///   predefined entities and character references are resolved.
/// - `options.max_depth` bounds outline nesting.
pub(crate) fn decode_document<R: BufRead>(
    mut reader: Reader<R>,
    options: &DecodeOptions,
) -> Result<Document, OpmlError> {
    let mut document: Option<Document> = None;
    let mut head = WireHead::default();
    let mut head_text = String::new();
    let mut scopes: Vec<Scope> = Vec::new();
    let mut open: Vec<OpenOutline> = Vec::new();
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| OpmlError::XmlParse(e.to_string()))?;

        match event {
            Event::Start(e) => {
                let scope = enter(&e, &reader, &mut document, &scopes, &mut open, options)?;
                if let Scope::HeadField(_) = scope {
                    head_text.clear();
                }
                scopes.push(scope);
            }
            Event::Empty(e) => {
                let scope = enter(&e, &reader, &mut document, &scopes, &mut open, options)?;
                leave(scope, &mut document, &mut head, &mut head_text, &mut open)?;
            }
            Event::End(_) => {
                let scope = scopes
                    .pop()
                    .ok_or_else(|| OpmlError::XmlParse("unexpected closing tag".to_string()))?;
                leave(scope, &mut document, &mut head, &mut head_text, &mut open)?;
            }
            Event::Text(e) => {
                if let Some(Scope::HeadField(_)) = scopes.last() {
                    let text = e.unescape().map_err(|e| OpmlError::XmlParse(e.to_string()))?;
                    head_text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(Scope::HeadField(_)) = scopes.last() {
                    let text = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|e| OpmlError::XmlParse(e.to_string()))?;
                    head_text.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !scopes.is_empty() {
        return Err(OpmlError::XmlParse(
            "unexpected end of document: unclosed elements".to_string(),
        ));
    }

    let document = document.ok_or(OpmlError::MissingRoot)?;
    tracing::debug!(
        version = %document.version,
        outlines = document.body.outlines.len(),
        "Decoded OPML document"
    );
    Ok(document)
}

/// Classifies a newly opened element and records what it opens.
fn enter<R>(
    e: &BytesStart<'_>,
    reader: &Reader<R>,
    document: &mut Option<Document>,
    scopes: &[Scope],
    open: &mut Vec<OpenOutline>,
    options: &DecodeOptions,
) -> Result<Scope, OpmlError> {
    let name = e.name();
    let name = name.as_ref();

    let scope = match scopes.last() {
        None => {
            if document.is_some() {
                return Err(OpmlError::XmlParse(
                    "multiple root elements".to_string(),
                ));
            }
            if name != b"opml" {
                return Err(OpmlError::UnexpectedRoot(
                    String::from_utf8_lossy(name).into_owned(),
                ));
            }
            *document = Some(Document {
                version: read_version(e, reader)?,
                head: Head::default(),
                body: Body::default(),
            });
            Scope::Root
        }
        Some(Scope::Root) => match name {
            b"head" => Scope::Head,
            b"body" => Scope::Body,
            _ => Scope::Unknown,
        },
        Some(Scope::Head) => HeadField::from_name(name)
            .map(Scope::HeadField)
            .unwrap_or(Scope::Unknown),
        Some(Scope::Body | Scope::Outline) if name == b"outline" => {
            // SEC-003: Reject excessively nested OPMLs
            if let Some(max_depth) = options.max_depth {
                if open.len() >= max_depth {
                    return Err(OpmlError::MaxDepthExceeded(max_depth));
                }
            }
            open.push(OpenOutline {
                wire: read_outline_attributes(e, reader)?,
                children: Vec::new(),
            });
            Scope::Outline
        }
        Some(_) => Scope::Unknown,
    };

    if scope == Scope::Unknown {
        tracing::trace!(element = %String::from_utf8_lossy(name), "Skipping unknown OPML element");
    }
    Ok(scope)
}

/// Finishes the element that `scope` opened.
fn leave(
    scope: Scope,
    document: &mut Option<Document>,
    head: &mut WireHead,
    head_text: &mut String,
    open: &mut Vec<OpenOutline>,
) -> Result<(), OpmlError> {
    match scope {
        Scope::HeadField(field) => field.assign(head, std::mem::take(head_text))?,
        Scope::Head => {
            if let Some(document) = document.as_mut() {
                document.head = Head::try_from(std::mem::take(head))?;
            }
        }
        Scope::Outline => {
            if let Some(closed) = open.pop() {
                let outline = closed.wire.into_outline(closed.children)?;
                match open.last_mut() {
                    Some(parent) => parent.children.push(outline),
                    None => {
                        if let Some(document) = document.as_mut() {
                            document.body.outlines.push(outline);
                        }
                    }
                }
            }
        }
        Scope::Root | Scope::Body | Scope::Unknown => {}
    }
    Ok(())
}

fn read_version<R>(e: &BytesStart<'_>, reader: &Reader<R>) -> Result<String, OpmlError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| OpmlError::XmlParse(e.to_string()))?;
        if attr.key.as_ref() == b"version" {
            return attr
                .decode_and_unescape_value(reader.decoder())
                .map(|value| value.into_owned())
                .map_err(|e| OpmlError::XmlParse(e.to_string()));
        }
    }
    Ok(String::new())
}

/// Collects the attribute bag of an `<outline>`. Unknown attributes are dropped.
fn read_outline_attributes<R>(
    e: &BytesStart<'_>,
    reader: &Reader<R>,
) -> Result<WireOutline, OpmlError> {
    let mut wire = WireOutline::default();
    let decoder = reader.decoder();

    for attr in e.attributes() {
        let attr = attr.map_err(|e| OpmlError::XmlParse(e.to_string()))?;
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| OpmlError::XmlParse(e.to_string()))?
            .into_owned();

        match attr.key.as_ref() {
            b"text" => wire.text = value,
            b"category" => wire.category = Some(value),
            b"created" => wire.created = Some(value),
            b"description" => wire.description = Some(value),
            b"htmlUrl" => wire.html_url = Some(value),
            b"isBreakpoint" => wire.is_breakpoint = parse_bool("isBreakpoint", &value)?,
            b"isComment" => wire.is_comment = parse_bool("isComment", &value)?,
            b"language" => wire.language = Some(value),
            b"title" => wire.title = Some(value),
            b"type" => wire.kind = Some(value),
            b"url" => wire.url = Some(value),
            b"version" => wire.version = Some(value),
            b"xmlUrl" => wire.xml_url = Some(value),
            _ => {}
        }
    }

    Ok(wire)
}

fn parse_bool(attribute: &'static str, value: &str) -> Result<bool, OpmlError> {
    match value.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "" | "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(OpmlError::MalformedBoolean {
            attribute,
            value: value.to_string(),
        }),
    }
}
