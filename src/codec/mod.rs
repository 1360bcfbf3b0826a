//! Marshal/unmarshal entry points.
//!
//! Encoding writes a fixed UTF-8 declaration followed by the document,
//! indented two spaces per level. Decoding streams through quick-xml with
//! charset detection enabled, so documents declaring another encoding (e.g.
//! `ISO-8859-1`) are transcoded before their text is interpreted.

mod decode;
mod encode;

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use quick_xml::Reader;

use crate::error::OpmlError;
use crate::model::Document;

pub use decode::DecodeOptions;

/// Returns the XML encoding of a document.
pub fn marshal(document: &Document) -> Result<Vec<u8>, OpmlError> {
    let mut buf = Vec::new();
    encode::encode_document(document, &mut buf)?;
    Ok(buf)
}

/// Writes the XML encoding of a document to `output`.
pub fn marshal_to<W: Write>(document: &Document, output: W) -> Result<(), OpmlError> {
    encode::encode_document(document, output)
}

/// Returns the JSON projection of a document.
pub fn marshal_json(document: &Document) -> Result<Vec<u8>, OpmlError> {
    Ok(serde_json::to_vec(document)?)
}

/// Returns the JSON projection of a document, indented.
pub fn marshal_json_pretty(document: &Document) -> Result<Vec<u8>, OpmlError> {
    Ok(serde_json::to_vec_pretty(document)?)
}

/// Decodes an OPML document from raw bytes.
pub fn unmarshal(buf: &[u8]) -> Result<Document, OpmlError> {
    unmarshal_with(buf, &DecodeOptions::default())
}

/// Decodes an OPML document from raw bytes with explicit limits.
pub fn unmarshal_with(buf: &[u8], options: &DecodeOptions) -> Result<Document, OpmlError> {
    decode::decode_document(Reader::from_reader(buf), options)
}

/// Decodes an OPML document from a string.
pub fn unmarshal_str(data: &str) -> Result<Document, OpmlError> {
    unmarshal_str_with(data, &DecodeOptions::default())
}

/// Decodes an OPML document from a string with explicit limits.
pub fn unmarshal_str_with(data: &str, options: &DecodeOptions) -> Result<Document, OpmlError> {
    decode::decode_document(Reader::from_str(data), options)
}

/// Decodes an OPML file.
///
/// The file handle is dropped on every return path, including decode errors.
pub fn unmarshal_file(path: impl AsRef<Path>) -> Result<Document, OpmlError> {
    unmarshal_file_with(path, &DecodeOptions::default())
}

/// Decodes an OPML file with explicit limits.
pub fn unmarshal_file_with(
    path: impl AsRef<Path>,
    options: &DecodeOptions,
) -> Result<Document, OpmlError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    tracing::debug!(path = %path.display(), "Reading OPML file");
    decode::decode_document(Reader::from_reader(BufReader::new(file)), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Head, Outline};

    #[test]
    fn test_marshal_then_unmarshal() {
        let mut document = Document::new("2.0");
        document.head = Head {
            title: "My RSS Subscriptions".to_string(),
            ..Head::default()
        };
        document.body.outlines.push(Outline {
            text: "Example Blog".to_string(),
            xml_url: "https://example.com/feed.xml".to_string(),
            ..Outline::default()
        });

        let bytes = marshal(&document).unwrap();
        assert_eq!(unmarshal(&bytes).unwrap(), document);
    }

    #[test]
    fn test_unmarshal_str_matches_bytes() {
        let content = r#"<opml version="1.1"><head><title>t</title></head><body/></opml>"#;
        assert_eq!(
            unmarshal_str(content).unwrap(),
            unmarshal(content.as_bytes()).unwrap()
        );
    }

    #[test]
    fn test_unmarshal_missing_file() {
        let err = unmarshal_file("/tmp/opml_codec_test_nonexistent.opml").unwrap_err();
        assert!(matches!(err, OpmlError::Io(_)));
    }

    #[test]
    fn test_marshal_to_writer() {
        let mut out = Vec::new();
        marshal_to(&Document::new("2.0"), &mut out).unwrap();
        assert_eq!(out, marshal(&Document::new("2.0")).unwrap());
    }
}
