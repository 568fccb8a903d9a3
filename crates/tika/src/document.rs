//! Parsed form of the extraction tool's XHTML output.
//!
//! Only the parts the slide extractor and metadata accessor need are kept:
//! the `head` meta entries and the top-level `div` blocks of the `body`.

use ppt2video_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Block class marking slide body text.
pub const CLASS_SLIDE_CONTENT: &str = "slide-content";

/// Block class marking speaker notes.
pub const CLASS_SLIDE_NOTES: &str = "slide-notes";

/// A `name`/`content` pair from the document header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEntry {
    pub name: String,
    pub content: String,
}

/// A single `p` element inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paragraph {
    /// Plain text paragraph (no attributes, no child elements).
    Text(String),
    /// Paragraph with attributes or nested markup. Carries no usable text.
    Structured,
}

/// The paragraphs of a block, shaped by how many `p` children it has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParagraphPayload {
    /// No `p` children.
    #[default]
    Absent,
    /// Exactly one `p` child.
    Single(Paragraph),
    /// Two or more `p` children, in document order.
    List(Vec<Paragraph>),
}

impl ParagraphPayload {
    fn from_paragraphs(mut paragraphs: Vec<Paragraph>) -> Self {
        match paragraphs.len() {
            0 => Self::Absent,
            1 => Self::Single(paragraphs.remove(0)),
            _ => Self::List(paragraphs),
        }
    }
}

/// How a block takes part in slide extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    SlideContent,
    SlideNotes,
    Other,
}

/// A top-level `div` of the document body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    /// The `class` attribute, if present.
    pub class: Option<String>,
    pub paragraphs: ParagraphPayload,
}

impl Block {
    /// Classify the block by its `class` attribute.
    pub fn kind(&self) -> BlockKind {
        match self.class.as_deref() {
            Some(CLASS_SLIDE_CONTENT) => BlockKind::SlideContent,
            Some(CLASS_SLIDE_NOTES) => BlockKind::SlideNotes,
            _ => BlockKind::Other,
        }
    }
}

/// Immutable parse result of one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    meta: Vec<MetaEntry>,
    blocks: Vec<Block>,
}

impl ParsedDocument {
    /// Parse the extraction tool's XHTML output.
    ///
    /// The root element must be `html`. Malformed or truncated XML fails the
    /// whole parse.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut builder = DocumentBuilder::default();
        let mut saw_root = false;

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::XmlError(format!("at position {}: {}", reader.buffer_position(), e))
            })?;

            match event {
                Event::Start(ref e) => {
                    check_root(&mut saw_root, builder.path.is_empty(), e)?;
                    builder.open(e, false)?;
                }
                Event::Empty(ref e) => {
                    check_root(&mut saw_root, builder.path.is_empty(), e)?;
                    builder.open(e, true)?;
                }
                Event::End(_) => builder.close(),
                Event::Text(ref e) => {
                    if builder.in_paragraph() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::XmlError(format!("Invalid text: {}", e)))?;
                        builder.push_text(&text);
                    }
                }
                Event::CData(e) => {
                    if builder.in_paragraph() {
                        builder.push_text(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::Eof => {
                    if let Some(open) = builder.path.last() {
                        return Err(Error::XmlError(format!(
                            "Unexpected end of document: unclosed <{}>",
                            String::from_utf8_lossy(open)
                        )));
                    }
                    break;
                }
                _ => {}
            }
        }

        if !saw_root {
            return Err(Error::XmlError("Document has no root element".to_string()));
        }

        let document = Self {
            meta: builder.meta,
            blocks: builder.blocks,
        };
        log::debug!(
            "Parsed document: {} meta entries, {} blocks",
            document.meta.len(),
            document.blocks.len()
        );
        Ok(document)
    }

    /// Header metadata entries in document order.
    pub fn meta(&self) -> &[MetaEntry] {
        &self.meta
    }

    /// Body blocks in document order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

fn check_root(saw_root: &mut bool, at_top: bool, e: &BytesStart) -> Result<()> {
    if !at_top {
        return Ok(());
    }
    let name = e.name();
    if local_name(name.as_ref()) != b"html" {
        return Err(Error::XmlError(format!(
            "Expected <html> root element, found <{}>",
            String::from_utf8_lossy(name.as_ref())
        )));
    }
    *saw_root = true;
    Ok(())
}

/// Paragraph being collected.
#[derive(Debug, Default)]
struct OpenParagraph {
    text: String,
    structured: bool,
}

/// Streaming state while walking the element tree.
#[derive(Debug, Default)]
struct DocumentBuilder {
    /// Local names of the currently open elements.
    path: Vec<Vec<u8>>,
    meta: Vec<MetaEntry>,
    blocks: Vec<Block>,
    block: Option<(Option<String>, Vec<Paragraph>)>,
    paragraph: Option<OpenParagraph>,
}

impl DocumentBuilder {
    fn at(&self, expected: &[&[u8]]) -> bool {
        self.path.len() == expected.len()
            && self.path.iter().zip(expected).all(|(a, b)| a.as_slice() == *b)
    }

    fn in_paragraph(&self) -> bool {
        self.paragraph.is_some() && self.path.len() == 4
    }

    fn push_text(&mut self, text: &str) {
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.text.push_str(text);
        }
    }

    fn open(&mut self, e: &BytesStart, empty: bool) -> Result<()> {
        let name = e.name();
        let local = local_name(name.as_ref()).to_vec();

        if let Some(paragraph) = self.paragraph.as_mut() {
            // Any element nested in a paragraph makes it structured.
            paragraph.structured = true;
        } else if self.at(&[b"html", b"head"]) && local == b"meta" {
            self.meta.push(MetaEntry {
                name: attribute(e, b"name")?.unwrap_or_default(),
                content: attribute(e, b"content")?.unwrap_or_default(),
            });
        } else if self.at(&[b"html", b"body"]) && local == b"div" {
            self.block = Some((attribute(e, b"class")?, Vec::new()));
            if empty {
                self.finish_block();
            }
        } else if self.at(&[b"html", b"body", b"div"]) && local == b"p" && self.block.is_some() {
            let structured = e.attributes().next().is_some();
            if empty {
                if let Some((_, paragraphs)) = self.block.as_mut() {
                    paragraphs.push(if structured {
                        Paragraph::Structured
                    } else {
                        Paragraph::Text(String::new())
                    });
                }
            } else {
                self.paragraph = Some(OpenParagraph {
                    text: String::new(),
                    structured,
                });
            }
        }

        if !empty {
            self.path.push(local);
        }
        Ok(())
    }

    fn close(&mut self) {
        self.path.pop();

        match self.path.len() {
            3 => {
                if let Some(open) = self.paragraph.take() {
                    if let Some((_, paragraphs)) = self.block.as_mut() {
                        paragraphs.push(if open.structured {
                            Paragraph::Structured
                        } else {
                            Paragraph::Text(open.text)
                        });
                    }
                }
            }
            2 => self.finish_block(),
            _ => {}
        }
    }

    fn finish_block(&mut self) {
        if let Some((class, paragraphs)) = self.block.take() {
            self.blocks.push(Block {
                class,
                paragraphs: ParagraphPayload::from_paragraphs(paragraphs),
            });
        }
    }
}

/// Read an attribute by local name, unescaping its value.
fn attribute(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::XmlError(format!("Invalid attribute: {}", e)))?;
        if local_name(attr.key.as_ref()) == key {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::XmlError(format!("Invalid attribute value: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<meta name="dc:title" content="Quarterly &amp; Review"/>
<meta name="dc:creator" content="Alice"/>
<title>Quarterly Review</title>
</head>
<body>
<div class="slide-content"><p>Intro</p>
</div>
<div class="slide-notes"/>
<div class="slide-content"><p>Line one</p><p>Line &lt;two&gt;</p></div>
<div class="slide-master-content"><p>Footer</p></div>
<div><p class="title">Styled</p><p>Mixed <b>bold</b></p><p/></div>
</body>
</html>"#;

    #[test]
    fn test_parse_meta() {
        let doc = ParsedDocument::parse(SAMPLE).unwrap();
        assert_eq!(
            doc.meta(),
            &[
                MetaEntry {
                    name: "dc:title".to_string(),
                    content: "Quarterly & Review".to_string()
                },
                MetaEntry {
                    name: "dc:creator".to_string(),
                    content: "Alice".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_blocks() {
        let doc = ParsedDocument::parse(SAMPLE).unwrap();
        let blocks = doc.blocks();
        assert_eq!(blocks.len(), 5);

        assert_eq!(blocks[0].kind(), BlockKind::SlideContent);
        assert_eq!(
            blocks[0].paragraphs,
            ParagraphPayload::Single(Paragraph::Text("Intro".to_string()))
        );

        assert_eq!(blocks[1].kind(), BlockKind::SlideNotes);
        assert_eq!(blocks[1].paragraphs, ParagraphPayload::Absent);

        assert_eq!(
            blocks[2].paragraphs,
            ParagraphPayload::List(vec![
                Paragraph::Text("Line one".to_string()),
                Paragraph::Text("Line <two>".to_string()),
            ])
        );

        assert_eq!(blocks[3].kind(), BlockKind::Other);

        assert_eq!(blocks[4].class, None);
        assert_eq!(
            blocks[4].paragraphs,
            ParagraphPayload::List(vec![
                Paragraph::Structured,
                Paragraph::Structured,
                Paragraph::Text(String::new()),
            ])
        );
    }

    #[test]
    fn test_parse_cdata_paragraph() {
        let xml = "<html><body><div class=\"slide-notes\"><p><![CDATA[a < b]]></p></div></body></html>";
        let doc = ParsedDocument::parse(xml).unwrap();
        assert_eq!(
            doc.blocks()[0].paragraphs,
            ParagraphPayload::Single(Paragraph::Text("a < b".to_string()))
        );
    }

    #[test]
    fn test_nested_divs_are_not_blocks() {
        let xml = "<html><body><div class=\"outer\"><div class=\"slide-content\"><p>x</p></div></div></body></html>";
        let doc = ParsedDocument::parse(xml).unwrap();
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].class.as_deref(), Some("outer"));
        assert_eq!(doc.blocks()[0].paragraphs, ParagraphPayload::Absent);
    }

    #[test]
    fn test_parse_rejects_malformed_xml() {
        let err = ParsedDocument::parse("<html><body><div></body></html>").unwrap_err();
        assert!(matches!(err, Error::XmlError(_)));
    }

    #[test]
    fn test_parse_rejects_truncated_xml() {
        let xml = "<html><body><div class=\"slide-content\"><p>C1</p></div>\
                   <div class=\"slide-notes\"><p>N1</p></div><div class=\"slide-content\"><p>C2";
        let err = ParsedDocument::parse(xml).unwrap_err();
        assert!(matches!(err, Error::XmlError(ref msg) if msg.contains("unclosed <p>")));

        let err = ParsedDocument::parse("<html><body>").unwrap_err();
        assert!(matches!(err, Error::XmlError(_)));
    }

    #[test]
    fn test_parse_rejects_wrong_root() {
        let err = ParsedDocument::parse("<svg/>").unwrap_err();
        assert!(matches!(err, Error::XmlError(_)));

        let err = ParsedDocument::parse("").unwrap_err();
        assert!(matches!(err, Error::XmlError(_)));
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"xhtml:div"), b"div");
        assert_eq!(local_name(b"div"), b"div");
    }
}
