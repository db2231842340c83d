//! Gemtext parser.
//!
//! Line-oriented: `#`..`###` headings, `=>` links, runs of `*` list items
//! collected into one flex row, ```` ``` ```` toggling preformatted blocks,
//! everything else a text paragraph. Link targets are resolved against the
//! page URL.

use tabweave_core::{DocumentParser, DocumentTree, NodeId, NodeKind, ParseError, Request};

const FENCE: &str = "```";

pub struct GemtextParser;

impl DocumentParser for GemtextParser {
    fn parse(&self, payload: &[u8], request: &Request) -> Result<DocumentTree, ParseError> {
        let text = std::str::from_utf8(payload).map_err(|e| ParseError::Encoding(e.valid_up_to()))?;
        if text.contains('\0') {
            return Err(ParseError::Malformed("binary payload".into()));
        }

        let mut doc = DocumentTree::new();
        let mut list: Option<NodeId> = None;
        let mut preformatted: Option<Vec<&str>> = None;

        for line in text.lines() {
            if let Some(block) = preformatted.as_mut() {
                if line.starts_with(FENCE) {
                    doc.push(NodeId::ROOT, NodeKind::Preformatted(block.join("\n")));
                    preformatted = None;
                } else {
                    block.push(line);
                }
                continue;
            }
            if line.starts_with(FENCE) {
                list = None;
                preformatted = Some(Vec::new());
                continue;
            }

            if let Some(item) = line.strip_prefix("* ") {
                let row = *list.get_or_insert_with(|| doc.push(NodeId::ROOT, NodeKind::FlexRow));
                doc.push(row, NodeKind::Text(item.trim().to_string()));
                continue;
            }
            list = None;

            if let Some((level, heading)) = heading(line) {
                doc.push(
                    NodeId::ROOT,
                    NodeKind::Heading {
                        level,
                        text: heading.to_string(),
                    },
                );
            } else if let Some(link) = line.strip_prefix("=>") {
                if let Some(kind) = parse_link(link, request) {
                    doc.push(NodeId::ROOT, kind);
                }
            } else if !line.trim().is_empty() {
                let body = line.strip_prefix('>').unwrap_or(line).trim();
                doc.push(NodeId::ROOT, NodeKind::Text(body.to_string()));
            }
        }

        // an unterminated block runs to the end of the document
        if let Some(block) = preformatted {
            doc.push(NodeId::ROOT, NodeKind::Preformatted(block.join("\n")));
        }
        Ok(doc)
    }
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 3 {
        return None;
    }
    Some((level as u8, line[level..].trim()))
}

fn parse_link(rest: &str, request: &Request) -> Option<NodeKind> {
    let rest = rest.trim();
    let (target, label) = match rest.split_once(char::is_whitespace) {
        Some((target, label)) => (target, label.trim()),
        None => (rest, ""),
    };
    if target.is_empty() {
        return None;
    }
    let href = request
        .url()
        .join(target)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| target.to_string());
    let label = if label.is_empty() { target } else { label };
    Some(NodeKind::Link {
        href,
        label: label.to_string(),
    })
}
