//! Link extraction from `<links><link rel=".." href=".."/></links>` collections.

use crate::wire::{as_list, WireNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Relation the carrier uses for printable labels.
pub const LABEL_RELATION: &str = "label";

/// Label indices must stay below this many slots per label entry.
const LABEL_SLOT_SPREAD: usize = 4;

/// One `<link>` entry, read from its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub relation: String,
    pub href: String,
    pub media_type: Option<String>,
    pub index: Option<usize>,
}

impl LinkEntry {
    /// Read a link from a node that still carries its attributes. Entries without `rel`
    /// or `href` are not links.
    pub fn from_node(node: &WireNode) -> Option<Self> {
        Some(Self {
            relation: node.attribute("rel")?.to_string(),
            href: node.attribute("href")?.to_string(),
            media_type: node.attribute("media-type").map(str::to_string),
            index: node
                .attribute("index")
                .and_then(|index| index.trim().parse().ok()),
        })
    }
}

/// Target of a relation: usually one href, several for multi-label shipments.
///
/// Label lists are sparse: slots are placed at the carrier-assigned index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkTarget {
    Single(String),
    Many(Vec<Option<String>>),
}

impl LinkTarget {
    /// The only href, or the first filled slot of a list.
    pub fn first(&self) -> Option<&str> {
        match self {
            LinkTarget::Single(href) => Some(href),
            LinkTarget::Many(slots) => slots.iter().flatten().next().map(String::as_str),
        }
    }
}

/// Relation name to target.
pub type Links = BTreeMap<String, LinkTarget>;

/// Build the relation map from a `link` node, single or repeated.
///
/// When more than one entry has the `label` relation they are gathered into a list, each
/// at its `index`; an entry without an index, or with an index at or beyond four slots per
/// label, goes after the last filled slot. Any other duplicated relation keeps its last href.
pub fn extract_links(collection: Option<&WireNode>) -> Links {
    let entries: Vec<LinkEntry> = as_list(collection)
        .into_iter()
        .filter_map(LinkEntry::from_node)
        .collect();

    let label_count = entries
        .iter()
        .filter(|entry| entry.relation == LABEL_RELATION)
        .count();
    let multiple_labels = label_count > 1;
    let slot_limit = label_count.saturating_mul(LABEL_SLOT_SPREAD);

    let mut links = Links::new();
    let mut labels: Vec<Option<String>> = Vec::new();

    for entry in entries {
        if multiple_labels && entry.relation == LABEL_RELATION {
            let slot = match entry.index.filter(|&index| index < slot_limit) {
                Some(index) => index,
                None => labels
                    .iter()
                    .rposition(Option::is_some)
                    .map_or(0, |last| last + 1),
            };
            if labels.len() <= slot {
                labels.resize(slot + 1, None);
            }
            labels[slot] = Some(entry.href);
        } else {
            links.insert(entry.relation, LinkTarget::Single(entry.href));
        }
    }

    if multiple_labels {
        links.insert(LABEL_RELATION.to_string(), LinkTarget::Many(labels));
    }
    links
}
