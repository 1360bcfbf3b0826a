use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::OpmlError;
use crate::model::{Document, Head, Outline};
use crate::wire::{WireHead, WireOutline};

/// Fixed declaration written ahead of the root element.
pub(crate) const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Spaces per nesting level.
pub(crate) const INDENT_WIDTH: usize = 2;

/// Streams `document` into `output`, header first.
///
/// Each outline is converted to its wire form right before it is written, so
/// the tree is never duplicated as a whole.
pub(crate) fn encode_document<W: Write>(document: &Document, mut output: W) -> Result<(), OpmlError> {
    output.write_all(XML_HEADER.as_bytes())?;

    let mut writer = Writer::new_with_indent(output, b' ', INDENT_WIDTH);

    // <opml version="2.0">
    let mut opml = BytesStart::new("opml");
    opml.push_attribute(("version", document.version.as_str()));
    write(&mut writer, Event::Start(opml))?;

    write_head(&mut writer, &document.head)?;

    if document.body.outlines.is_empty() {
        write(&mut writer, Event::Empty(BytesStart::new("body")))?;
    } else {
        write(&mut writer, Event::Start(BytesStart::new("body")))?;
        for outline in &document.body.outlines {
            write_outline(&mut writer, outline)?;
        }
        write(&mut writer, Event::End(BytesEnd::new("body")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("opml")))?;

    writer.into_inner().flush()?;
    Ok(())
}

fn write_head<W: Write>(writer: &mut Writer<W>, head: &Head) -> Result<(), OpmlError> {
    let wire = WireHead::from(head);
    if wire.is_empty() {
        return write(writer, Event::Empty(BytesStart::new("head")));
    }

    write(writer, Event::Start(BytesStart::new("head")))?;

    let text_fields = [
        ("title", wire.title),
        ("dateCreated", wire.date_created),
        ("dateModified", wire.date_modified),
        ("ownerName", wire.owner_name),
        ("ownerEmail", wire.owner_email),
        ("expansionState", wire.expansion_state),
    ];
    for (name, value) in text_fields {
        if let Some(value) = value {
            write_text_element(writer, name, &value)?;
        }
    }

    let integer_fields = [
        ("vertScrollState", wire.vert_scroll_state),
        ("windowTop", wire.window_top),
        ("windowLeft", wire.window_left),
        ("windowBottom", wire.window_bottom),
        ("windowRight", wire.window_right),
    ];
    for (name, value) in integer_fields {
        if let Some(value) = value {
            write_text_element(writer, name, &value.to_string())?;
        }
    }

    write(writer, Event::End(BytesEnd::new("head")))
}

fn write_outline<W: Write>(writer: &mut Writer<W>, outline: &Outline) -> Result<(), OpmlError> {
    let wire = WireOutline::from(outline);

    let mut element = BytesStart::new("outline");
    element.push_attribute(("text", wire.text.as_str()));
    push_optional(&mut element, "category", wire.category.as_deref());
    push_optional(&mut element, "created", wire.created.as_deref());
    push_optional(&mut element, "description", wire.description.as_deref());
    push_optional(&mut element, "htmlUrl", wire.html_url.as_deref());
    if wire.is_breakpoint {
        element.push_attribute(("isBreakpoint", "true"));
    }
    if wire.is_comment {
        element.push_attribute(("isComment", "true"));
    }
    push_optional(&mut element, "language", wire.language.as_deref());
    push_optional(&mut element, "title", wire.title.as_deref());
    push_optional(&mut element, "type", wire.kind.as_deref());
    push_optional(&mut element, "url", wire.url.as_deref());
    push_optional(&mut element, "version", wire.version.as_deref());
    push_optional(&mut element, "xmlUrl", wire.xml_url.as_deref());

    if !outline.is_directory() {
        return write(writer, Event::Empty(element));
    }

    write(writer, Event::Start(element))?;
    for child in &outline.outlines {
        write_outline(writer, child)?;
    }
    write(writer, Event::End(BytesEnd::new("outline")))
}

fn push_optional(element: &mut BytesStart<'_>, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        element.push_attribute((name, value));
    }
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), OpmlError> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(value)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), OpmlError> {
    writer
        .write_event(event)
        .map_err(|e| OpmlError::XmlWrite(e.to_string()))
}
