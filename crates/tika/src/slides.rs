//! Slide extraction: pairing slide content blocks with their notes.

use crate::document::{BlockKind, Paragraph, ParagraphPayload, ParsedDocument};
use ppt2video_core::{Result, SlideRecord};

/// Normalize a paragraph payload into text lines.
///
/// - no paragraphs give no lines
/// - each text paragraph is split on `\n`, a lone paragraph included
/// - whitespace-only text paragraphs and structured paragraphs contribute
///   nothing
/// - if the resulting lines hold no characters at all, there are no lines
pub fn paragraph_lines(payload: &ParagraphPayload) -> Vec<String> {
    let lines: Vec<String> = match payload {
        ParagraphPayload::Absent => return Vec::new(),
        ParagraphPayload::Single(paragraph) => split_paragraph(paragraph),
        ParagraphPayload::List(paragraphs) => paragraphs.iter().flat_map(split_paragraph).collect(),
    };

    if lines.iter().all(|line| line.is_empty()) {
        return Vec::new();
    }
    lines
}

fn split_paragraph(paragraph: &Paragraph) -> Vec<String> {
    match paragraph {
        Paragraph::Text(text) if text.trim().is_empty() => Vec::new(),
        Paragraph::Text(text) => text.split('\n').map(str::to_string).collect(),
        Paragraph::Structured => Vec::new(),
    }
}

/// Pair slide content with speaker notes, in document order.
///
/// Each notes block emits one record with the most recent unpaired content
/// block. Content blocks that are never followed by notes are dropped, and
/// notes with no pending content get empty content.
pub fn extract_slides(document: &ParsedDocument) -> Vec<SlideRecord> {
    let mut slides = Vec::new();
    let mut pending: Option<Vec<String>> = None;

    for block in document.blocks() {
        match block.kind() {
            BlockKind::SlideContent => {
                if pending.is_some() {
                    log::debug!("Dropping slide content with no notes block");
                }
                pending = Some(paragraph_lines(&block.paragraphs));
            }
            BlockKind::SlideNotes => {
                let content = pending.take().unwrap_or_default();
                slides.push(SlideRecord::new(content, paragraph_lines(&block.paragraphs)));
            }
            BlockKind::Other => {}
        }
    }

    if pending.is_some() {
        log::debug!("Dropping trailing slide content with no notes block");
    }
    log::debug!("Extracted {} slides", slides.len());
    slides
}

/// Parse the extraction tool output and extract its slides.
pub fn slides_from_xml(xml: &str) -> Result<Vec<SlideRecord>> {
    let document = ParsedDocument::parse(xml)?;
    Ok(extract_slides(&document))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Paragraph {
        Paragraph::Text(s.to_string())
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn block(class: &str, body: &str) -> String {
        format!("<div class=\"{}\">{}</div>", class, body)
    }

    fn document(blocks: &[String]) -> String {
        format!("<html><head/><body>{}</body></html>", blocks.concat())
    }

    #[test]
    fn test_paragraph_lines_absent() {
        assert!(paragraph_lines(&ParagraphPayload::Absent).is_empty());
    }

    #[test]
    fn test_paragraph_lines_single_string_splits() {
        let payload = ParagraphPayload::Single(text("a\nb"));
        assert_eq!(paragraph_lines(&payload), lines(&["a", "b"]));
    }

    #[test]
    fn test_paragraph_lines_single_empty() {
        assert!(paragraph_lines(&ParagraphPayload::Single(text(""))).is_empty());
        assert!(paragraph_lines(&ParagraphPayload::Single(Paragraph::Structured)).is_empty());
    }

    #[test]
    fn test_paragraph_lines_list_flattens() {
        let payload = ParagraphPayload::List(vec![text("a\nb"), text("")]);
        assert_eq!(paragraph_lines(&payload), lines(&["a", "b"]));

        let payload = ParagraphPayload::List(vec![text("x"), Paragraph::Structured, text("y\n\nz")]);
        assert_eq!(paragraph_lines(&payload), lines(&["x", "y", "", "z"]));
    }

    #[test]
    fn test_paragraph_lines_list_without_characters_collapses() {
        let payload = ParagraphPayload::List(vec![text(""), text("")]);
        assert!(paragraph_lines(&payload).is_empty());

        let payload = ParagraphPayload::List(vec![text("\n"), Paragraph::Structured]);
        assert!(paragraph_lines(&payload).is_empty());
    }

    #[test]
    fn test_paragraph_lines_whitespace_only_is_empty() {
        assert!(paragraph_lines(&ParagraphPayload::Single(text("   "))).is_empty());

        let payload = ParagraphPayload::List(vec![text(" \n "), text("a"), text("\t")]);
        assert_eq!(paragraph_lines(&payload), lines(&["a"]));

        // Indentation inside a paragraph with text is kept.
        let payload = ParagraphPayload::Single(text("  a\n  b"));
        assert_eq!(paragraph_lines(&payload), lines(&["  a", "  b"]));
    }

    #[test]
    fn test_extract_pairs_in_order() {
        let xml = document(&[
            block("slide-content", "<p>C1</p>"),
            block("slide-notes", "<p>N1</p>"),
            block("slide-content", "<p>C2</p>"),
            block("slide-notes", "<p>N2</p>"),
        ]);
        let slides = slides_from_xml(&xml).unwrap();
        assert_eq!(
            slides,
            vec![
                SlideRecord::new(lines(&["C1"]), lines(&["N1"])),
                SlideRecord::new(lines(&["C2"]), lines(&["N2"])),
            ]
        );
    }

    #[test]
    fn test_extract_drops_content_without_notes() {
        let xml = document(&[
            block("slide-content", "<p>C1</p>"),
            block("slide-content", "<p>C2</p>"),
            block("slide-notes", "<p>N1</p>"),
            block("slide-content", "<p>C3</p>"),
        ]);
        let slides = slides_from_xml(&xml).unwrap();
        assert_eq!(slides, vec![SlideRecord::new(lines(&["C2"]), lines(&["N1"]))]);
    }

    #[test]
    fn test_extract_notes_without_content() {
        let xml = document(&[
            block("slide-notes", "<p>N0</p>"),
            block("slide-content", "<p>C1</p>"),
            block("slide-notes", "<p>N1</p>"),
            block("slide-notes", "<p>N2</p>"),
        ]);
        let slides = slides_from_xml(&xml).unwrap();
        assert_eq!(
            slides,
            vec![
                SlideRecord::new(Vec::new(), lines(&["N0"])),
                SlideRecord::new(lines(&["C1"]), lines(&["N1"])),
                SlideRecord::new(Vec::new(), lines(&["N2"])),
            ]
        );
    }

    #[test]
    fn test_extract_ignores_other_blocks() {
        let xml = document(&[
            block("slide-content", "<p>C1</p>"),
            block("slide-master-content", "<p>Footer</p>"),
            block("slide-notes", ""),
        ]);
        let slides = slides_from_xml(&xml).unwrap();
        assert_eq!(slides, vec![SlideRecord::new(lines(&["C1"]), Vec::new())]);
    }

    #[test]
    fn test_two_slide_fixture() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<meta name="dc:title" content="Deck"/>
</head>
<body>
<div class="slide-content"><p>Intro</p>
</div>
<div class="slide-notes"><p>note1</p>
</div>
<div class="slide-content"><p>Body</p>
</div>
<div class="slide-notes"><p>note2</p>
</div>
</body>
</html>"#;
        let slides = slides_from_xml(xml).unwrap();
        assert_eq!(
            slides,
            vec![
                SlideRecord::new(lines(&["Intro"]), lines(&["note1"])),
                SlideRecord::new(lines(&["Body"]), lines(&["note2"])),
            ]
        );
    }

    #[test]
    fn test_whitespace_paragraph_gives_empty_content() {
        let xml = document(&[
            block("slide-content", "<p>   </p>"),
            block("slide-notes", "<p>N1</p>"),
        ]);
        let slides = slides_from_xml(&xml).unwrap();
        assert_eq!(slides, vec![SlideRecord::new(Vec::new(), lines(&["N1"]))]);
    }

    #[test]
    fn test_truncated_output_returns_no_slides() {
        let xml = "<html><body><div class=\"slide-content\"><p>C1</p></div>\
                   <div class=\"slide-notes\"><p>N1</p></div><div class=\"slide-content\"><p>C2";
        let err = slides_from_xml(xml).unwrap_err();
        assert!(matches!(err, ppt2video_core::Error::XmlError(_)));
    }

    #[test]
    fn test_parse_failure_returns_no_slides() {
        let xml = "<html><body><div class=\"slide-notes\"><p>N1</p></div><div></body></html>";
        assert!(slides_from_xml(xml).is_err());
    }
}
