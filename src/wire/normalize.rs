//! Object Normalizer: the structural transform between wire shape and application shape.

use super::{Element, KeyStyle, WireNode};

/// Rewrite every child key of `node` to `style` and unwrap text-only elements.
///
/// - text nodes pass through unchanged and list items are normalized in order;
/// - an element whose only content is text (attributes aside, when `drop_attributes` is set)
///   collapses to that text;
/// - attributes are kept verbatim, including their names, unless `drop_attributes` is set;
/// - child keys are converted with [`KeyStyle::apply`] and their values normalized.
///
/// The transform is pure and idempotent.
pub fn normalize(node: &WireNode, style: KeyStyle, drop_attributes: bool) -> WireNode {
    match node {
        WireNode::Text(_) => node.clone(),
        WireNode::List(items) => WireNode::List(
            items
                .iter()
                .map(|item| normalize(item, style, drop_attributes))
                .collect(),
        ),
        WireNode::Element(element) => normalize_element(element, style, drop_attributes),
    }
}

fn normalize_element(element: &Element, style: KeyStyle, drop_attributes: bool) -> WireNode {
    let keeps_attributes = !drop_attributes && !element.attributes.is_empty();

    if let Some(text) = &element.text {
        if element.children.is_empty() && !keeps_attributes {
            return WireNode::Text(text.clone());
        }
    }

    let mut out = Element {
        attributes: if drop_attributes {
            Vec::new()
        } else {
            element.attributes.clone()
        },
        text: element.text.clone(),
        children: Vec::with_capacity(element.children.len()),
    };
    for (key, child) in &element.children {
        out.insert(style.apply(key), normalize(child, style, drop_attributes));
    }
    WireNode::Element(out)
}
