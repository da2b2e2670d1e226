//! Carrier error extraction and response shape checks.
//!
//! The carrier reports failures as a `<messages><message>` envelope, sometimes inside a 2xx
//! response and sometimes as the body of a 4xx/5xx. Both paths go through [`translate`].

use crate::error::{CarrierMessage, DomainError};
use crate::transport::TransportError;
use crate::utils::path::get_path;
use crate::wire::{as_list, xml, WireNode};
use crate::{Error, Result};

/// Carrier messages carried by a parsed body, if any.
///
/// Both the single `<message>` and the repeated form are accepted. Entries without a code
/// and a description are not recognizable messages.
pub fn translate(tree: &WireNode) -> Option<Vec<CarrierMessage>> {
    let messages = tree.get("messages")?;
    let collected: Vec<CarrierMessage> = as_list(messages.get("message"))
        .into_iter()
        .filter_map(carrier_message)
        .collect();

    if collected.is_empty() {
        None
    } else {
        Some(collected)
    }
}

fn carrier_message(node: &WireNode) -> Option<CarrierMessage> {
    let code = node.get("code").and_then(WireNode::as_text);
    let description = node.get("description").and_then(WireNode::as_text);
    if code.is_none() && description.is_none() {
        return None;
    }
    Some(CarrierMessage {
        code: code.unwrap_or_default().trim().to_string(),
        description: description.unwrap_or_default().trim().to_string(),
    })
}

/// Turn a failed exchange into the error the caller sees.
///
/// A non-2xx body holding carrier messages becomes a [`Error::Carrier`]; anything else is
/// returned as the original transport error.
pub fn translate_error_response(error: TransportError) -> Error {
    let messages = error
        .response_body()
        .and_then(|body| xml::parse(body).ok())
        .and_then(|tree| translate(&tree));

    match messages {
        Some(messages) => Error::Carrier(DomainError::from_messages(messages)),
        None => Error::Transport(error),
    }
}

/// Require `path` in a success response.
pub fn check_result_format<'a>(tree: &'a WireNode, path: &str) -> Result<&'a WireNode> {
    get_path(tree, path).ok_or_else(|| Error::shape(path, tree))
}

/// Require a text value at `key` below `node`; `base` names `node` in the diagnostic.
pub(crate) fn required_text(node: &WireNode, base: &str, key: &str) -> Result<String> {
    node.get(key)
        .and_then(WireNode::as_text)
        .map(str::to_string)
        .ok_or_else(|| Error::shape(format!("{base}.{key}"), node))
}
