//! Slide and metadata extraction from Apache Tika XHTML output.
//!
//! Tika turns a `.pptx` into an XHTML document where every slide is a
//! `div.slide-content` block followed by a `div.slide-notes` block, and the
//! document properties are `meta` entries in the header.

pub mod document;
pub mod metadata;
pub mod slides;
pub mod source;

pub use document::{Block, BlockKind, MetaEntry, Paragraph, ParagraphPayload, ParsedDocument};
pub use metadata::{property, property_all, PropertyNames};
pub use slides::{extract_slides, paragraph_lines, slides_from_xml};
pub use source::{extract, obtain_xml, ExtractedPresentation, TikaConfig};
