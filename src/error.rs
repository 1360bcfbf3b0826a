use std::num::ParseIntError;

use thiserror::Error;

/// Errors that can occur while encoding or decoding an OPML document.
///
/// Every failure aborts the whole operation: a decode never yields a
/// partially populated [`Document`](crate::Document).
#[derive(Debug, Error)]
pub enum OpmlError {
    /// A timestamp matched neither RFC 1123 nor the microsecond date-time format.
    #[error("Malformed timestamp {value:?}: {source}")]
    MalformedTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// An expansion-state token is not a valid integer.
    #[error("Malformed integer {token:?} in list: {source}")]
    MalformedIntegerList {
        token: String,
        #[source]
        source: ParseIntError,
    },

    /// A scalar head element (e.g. `windowTop`) is not a valid integer.
    #[error("Malformed integer {value:?} in <{element}>: {source}")]
    MalformedInteger {
        element: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// A boolean attribute (`isComment`, `isBreakpoint`) has an unrecognized value.
    #[error("Malformed boolean {value:?} in attribute {attribute}")]
    MalformedBoolean {
        attribute: &'static str,
        value: String,
    },

    /// XML parsing failed: the input is not well-formed.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// The document root is not an `<opml>` element.
    #[error("Expected <opml> root element, found <{0}>")]
    UnexpectedRoot(String),

    /// The input contains no root element at all.
    #[error("Missing <opml> root element")]
    MissingRoot,

    /// SEC-003: Outline nesting exceeds the configured limit.
    #[error("OPML nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),

    /// The XML writer failed.
    #[error("XML write error: {0}")]
    XmlWrite(String),

    /// File I/O error.
    #[error("Failed to read OPML file: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
}
