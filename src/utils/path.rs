//! Dot-path lookup on Wire Trees.
//!
//! Supports:
//! - Nested path access (e.g., "trackingSummary.pinSummary")
//! - List indexing (e.g., "priceQuotes.priceQuote[0].serviceCode")
//! - Numeric segments on lists (e.g., "links.link.1")

use crate::wire::WireNode;

/// Get a node by dot-notation path.
///
/// A bare (non-list) node answers index `0`, matching how the carrier collapses
/// single-item collections.
pub fn get_path<'a>(node: &'a WireNode, path: &str) -> Option<&'a WireNode> {
    let normalized = path.trim().trim_start_matches("$.");
    if normalized.is_empty() {
        return None;
    }

    let mut current = node;
    for part in normalized.split('.') {
        if part.is_empty() {
            return None;
        }

        if let Some(bracket_pos) = part.find('[') {
            let key = &part[..bracket_pos];
            let idx_str = part[bracket_pos + 1..].trim_end_matches(']');

            if !key.is_empty() {
                current = current.get(key)?;
            }
            current = index(current, idx_str.parse::<usize>().ok()?)?;
        } else if let WireNode::List(_) = current {
            current = index(current, part.parse::<usize>().ok()?)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current)
}

/// Text value at a path.
pub fn get_text<'a>(node: &'a WireNode, path: &str) -> Option<&'a str> {
    get_path(node, path).and_then(WireNode::as_text)
}

fn index(node: &WireNode, idx: usize) -> Option<&WireNode> {
    match node {
        WireNode::List(items) => items.get(idx),
        single if idx == 0 => Some(single),
        _ => None,
    }
}
