//! OPML (Outline Processor Markup Language) codec.
//!
//! Converts a [`Document`] tree to and from its XML wire form, with a JSON
//! projection of the same model for export.
//!
//! - [`model`] - the document tree and outline classification
//! - [`wire`] - flattened attribute-shaped transfer forms and their conversions
//! - [`time`] - OPML timestamp formats
//! - [`list`] - comma-delimited category and integer lists
//!
//! # Example
//!
//! ```
//! use opml_codec::{marshal, unmarshal_str, Document, Outline, OutlineType};
//!
//! let mut document = Document::new(opml_codec::VERSION_2_0);
//! document.head.title = "Feed subscriptions".to_string();
//! document.body.outlines.push(Outline {
//!     text: "Lobsters".to_string(),
//!     kind: Some(OutlineType::Subscription),
//!     xml_url: "https://lobste.rs/rss".to_string(),
//!     ..Outline::default()
//! });
//!
//! let xml = String::from_utf8(marshal(&document).unwrap()).unwrap();
//! assert_eq!(unmarshal_str(&xml).unwrap(), document);
//! ```

mod codec;
mod error;
pub mod list;
pub mod model;
pub mod time;
pub mod wire;

pub use codec::{
    marshal, marshal_json, marshal_json_pretty, marshal_to, unmarshal, unmarshal_file,
    unmarshal_file_with, unmarshal_str, unmarshal_str_with, unmarshal_with, DecodeOptions,
};
pub use error::OpmlError;
pub use model::{
    Body, Document, Head, Outline, OutlineType, RssVersion, VERSION_1_0, VERSION_1_1, VERSION_2_0,
};
