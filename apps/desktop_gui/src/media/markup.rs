//! Flattening of renderer markup into displayable text blocks.
//!
//! The renderer hands back HTML; the preview region draws text. This walk
//! keeps block structure (headings, paragraphs, list items), merges inline
//! tags into their surrounding text, and decodes the handful of entities
//! that show up in converted documents. It is not a general HTML parser.

/// A display block extracted from the renderer's markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupBlock {
    Heading { level: u8, text: String },
    Paragraph(String),
    ListItem(String),
}

enum PendingKind {
    Heading(u8),
    Paragraph,
    ListItem,
}

pub fn flatten_markup(markup: &str) -> Vec<MarkupBlock> {
    let mut blocks = Vec::new();
    let mut text = String::new();
    let mut kind = PendingKind::Paragraph;

    let mut rest = markup;
    while let Some(lt) = rest.find('<') {
        text.push_str(&rest[..lt]);
        rest = &rest[lt + 1..];
        let Some(gt) = rest.find('>') else {
            // Unterminated tag: drop the dangling remainder.
            rest = "";
            break;
        };
        let tag = &rest[..gt];
        rest = &rest[gt + 1..];

        let closing = tag.starts_with('/');
        let name: String = tag
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match name.as_str() {
            "p" | "li" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                flush(&mut blocks, &mut text, &kind);
                kind = if closing {
                    PendingKind::Paragraph
                } else {
                    match name.as_str() {
                        "p" => PendingKind::Paragraph,
                        "li" => PendingKind::ListItem,
                        heading => PendingKind::Heading(heading.as_bytes()[1] - b'0'),
                    }
                };
            }
            "br" => flush(&mut blocks, &mut text, &kind),
            // Inline tags (strong, em, a, span, ...) contribute only their
            // text content; structural wrappers (ul, ol, table, ...) have
            // nothing of their own to contribute.
            _ => {}
        }
    }
    text.push_str(rest);
    flush(&mut blocks, &mut text, &kind);

    blocks
}

fn flush(blocks: &mut Vec<MarkupBlock>, text: &mut String, kind: &PendingKind) {
    let decoded = decode_entities(text);
    text.clear();
    let collapsed = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return;
    }
    blocks.push(match kind {
        PendingKind::Heading(level) => MarkupBlock::Heading {
            level: *level,
            text: collapsed,
        },
        PendingKind::Paragraph => MarkupBlock::Paragraph(collapsed),
        PendingKind::ListItem => MarkupBlock::ListItem(collapsed),
    });
}

fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let bytes = rest.as_bytes();
        let Some(semi) = bytes[..bytes.len().min(8)].iter().position(|&b| b == b';') else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let decoded = match &rest[1..semi] {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" | "#39" => Some('\''),
            "nbsp" => Some(' '),
            _ => None,
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_paragraphs_headings_and_list_items() {
        let blocks = flatten_markup(
            "<h1>Title</h1><p>First paragraph.</p><ul><li>one</li><li>two</li></ul>",
        );
        assert_eq!(
            blocks,
            vec![
                MarkupBlock::Heading {
                    level: 1,
                    text: "Title".to_string()
                },
                MarkupBlock::Paragraph("First paragraph.".to_string()),
                MarkupBlock::ListItem("one".to_string()),
                MarkupBlock::ListItem("two".to_string()),
            ]
        );
    }

    #[test]
    fn inline_tags_merge_into_their_block() {
        let blocks = flatten_markup("<p>Some <strong>bold</strong> and <em>italic</em>.</p>");
        assert_eq!(
            blocks,
            vec![MarkupBlock::Paragraph("Some bold and italic.".to_string())]
        );
    }

    #[test]
    fn entities_are_decoded() {
        let blocks = flatten_markup("<p>Fish &amp; chips &lt;5&#39;&gt;</p>");
        assert_eq!(
            blocks,
            vec![MarkupBlock::Paragraph("Fish & chips <5'>".to_string())]
        );
    }

    #[test]
    fn unknown_entities_pass_through() {
        let blocks = flatten_markup("<p>a &bogus; b</p>");
        assert_eq!(
            blocks,
            vec![MarkupBlock::Paragraph("a &bogus; b".to_string())]
        );
    }

    #[test]
    fn whitespace_is_collapsed_within_a_block() {
        let blocks = flatten_markup("<p>\n  spaced \t out\n</p>");
        assert_eq!(blocks, vec![MarkupBlock::Paragraph("spaced out".to_string())]);
    }

    #[test]
    fn bare_text_without_tags_is_one_paragraph() {
        let blocks = flatten_markup("just text");
        assert_eq!(blocks, vec![MarkupBlock::Paragraph("just text".to_string())]);
    }

    #[test]
    fn line_breaks_split_blocks() {
        let blocks = flatten_markup("<p>one<br/>two</p>");
        assert_eq!(
            blocks,
            vec![
                MarkupBlock::Paragraph("one".to_string()),
                MarkupBlock::Paragraph("two".to_string()),
            ]
        );
    }

    #[test]
    fn unterminated_tag_drops_the_remainder() {
        let blocks = flatten_markup("<p>kept</p><p class=");
        assert_eq!(blocks, vec![MarkupBlock::Paragraph("kept".to_string())]);
    }

    #[test]
    fn empty_markup_yields_no_blocks() {
        assert!(flatten_markup("").is_empty());
        assert!(flatten_markup("<p></p><div></div>").is_empty());
    }
}
