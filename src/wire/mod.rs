//! Wire Tree model for the carrier's XML protocol.
//!
//! XML documents are parsed into [`WireNode`] values. Attributes and element text are
//! carried as typed fields of [`Element`] instead of reserved map keys, so a field that
//! happens to be called `$` or `_` on the wire can never be confused with them.
//!
//! Repeated child elements are merged into a [`WireNode::List`]; a single occurrence stays a
//! bare node. Code that expects a collection must therefore go through [`as_list`] before it
//! looks at items.

pub mod casing;
pub mod normalize;
pub mod xml;

use serde_json::{Map, Value};

pub use casing::KeyStyle;
pub use normalize::normalize;

/// Key used for retained attributes when a tree is rendered as an application object.
pub const ATTRIBUTES_KEY: &str = "$";

/// Key used for element text that sits beside attributes or children in an application object.
pub const TEXT_KEY: &str = "_";

/// A node of the Wire Tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireNode {
    /// Scalar text content. Empty elements parse to empty text.
    Text(String),
    /// Several sibling elements sharing one name.
    List(Vec<WireNode>),
    /// An element carrying attributes, children, or both.
    Element(Element),
}

/// Keyed content of an element.
///
/// Child names are unique; insertion order is preserved so serialized documents keep the
/// order the caller supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<(String, WireNode)>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_child(mut self, name: impl Into<String>, node: WireNode) -> Self {
        self.insert(name, node);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&WireNode> {
        self.children
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut WireNode> {
        self.children
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    /// Insert or replace a child, keeping the position of a replaced entry.
    pub fn insert(&mut self, name: impl Into<String>, node: WireNode) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(slot) => *slot = node,
            None => self.children.push((name, node)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<WireNode> {
        let position = self.children.iter().position(|(key, _)| key == name)?;
        Some(self.children.remove(position).1)
    }

    /// Add a child the way a parser sees siblings: a second occurrence of a name turns the
    /// existing entry into a list.
    pub fn append_child(&mut self, name: impl Into<String>, node: WireNode) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(WireNode::List(items)) => items.push(node),
            Some(existing) => {
                let first = std::mem::replace(existing, WireNode::List(Vec::with_capacity(2)));
                if let WireNode::List(items) = existing {
                    items.push(first);
                    items.push(node);
                }
            }
            None => self.children.push((name, node)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.text.is_none() && self.children.is_empty()
    }
}

impl WireNode {
    pub fn text(value: impl Into<String>) -> Self {
        WireNode::Text(value.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            WireNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            WireNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Child lookup on element nodes. Text and list nodes have no named children.
    pub fn get(&self, name: &str) -> Option<&WireNode> {
        self.as_element().and_then(|element| element.get(name))
    }

    /// Textual value of a node: plain text, or the text of an element that carries
    /// attributes next to it.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            WireNode::Text(text) => Some(text),
            WireNode::Element(element) => element.text.as_deref(),
            WireNode::List(_) => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.as_element().and_then(|element| element.attribute(name))
    }

    /// Build a Wire Tree from an application object.
    ///
    /// Objects become elements, arrays become repeated elements, and scalars become text.
    /// An object entry named [`ATTRIBUTES_KEY`] holding an object is read back as attributes
    /// and an entry named [`TEXT_KEY`] holding a scalar as element text, mirroring
    /// [`WireNode::to_value`].
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => WireNode::Text(String::new()),
            Value::Bool(flag) => WireNode::Text(flag.to_string()),
            Value::Number(number) => WireNode::Text(number.to_string()),
            Value::String(text) => WireNode::Text(text.clone()),
            Value::Array(items) => WireNode::List(items.iter().map(WireNode::from_value).collect()),
            Value::Object(map) => {
                let mut element = Element::new();
                for (key, entry) in map {
                    match (key.as_str(), entry) {
                        (ATTRIBUTES_KEY, Value::Object(attributes)) => {
                            for (name, attribute) in attributes {
                                element.set_attribute(name.clone(), scalar_to_string(attribute));
                            }
                        }
                        (TEXT_KEY, scalar) if !scalar.is_object() && !scalar.is_array() => {
                            element.text = Some(scalar_to_string(scalar));
                        }
                        _ => element.insert(key.clone(), WireNode::from_value(entry)),
                    }
                }
                WireNode::Element(element)
            }
        }
    }

    /// Render the tree as an application object.
    pub fn to_value(&self) -> Value {
        match self {
            WireNode::Text(text) => Value::String(text.clone()),
            WireNode::List(items) => Value::Array(items.iter().map(WireNode::to_value).collect()),
            WireNode::Element(element) => {
                let mut map = Map::new();
                if !element.attributes.is_empty() {
                    let attributes = element
                        .attributes
                        .iter()
                        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                        .collect();
                    map.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attributes));
                }
                if let Some(text) = &element.text {
                    map.insert(TEXT_KEY.to_string(), Value::String(text.clone()));
                }
                for (key, node) in &element.children {
                    map.insert(key.clone(), node.to_value());
                }
                Value::Object(map)
            }
        }
    }
}

/// Coerce an optional collection node into its items.
///
/// The carrier serializes a repeated element as a list only when it occurs more than once,
/// so every collection boundary reads its items through this function.
pub fn as_list(node: Option<&WireNode>) -> Vec<&WireNode> {
    match node {
        None => Vec::new(),
        Some(WireNode::List(items)) => items.iter().collect(),
        Some(single) => vec![single],
    }
}

/// Attach an `xmlns` attribute to every top-level element of a request payload.
///
/// A payload is an element whose children are document roots, so `{"mailingScenario": {..}}`
/// gains the namespace on `mailingScenario`.
pub fn set_namespace(payload: &mut WireNode, xmlns: &str) {
    let Some(document) = payload.as_element_mut() else {
        return;
    };
    for (_, root) in document.children.iter_mut() {
        match root {
            WireNode::Element(element) => element.set_attribute("xmlns", xmlns),
            WireNode::Text(text) => {
                let mut element = Element::new().with_attribute("xmlns", xmlns);
                if !text.is_empty() {
                    element.text = Some(std::mem::take(text));
                }
                *root = WireNode::Element(element);
            }
            WireNode::List(items) => {
                for item in items.iter_mut() {
                    if let Some(element) = item.as_element_mut() {
                        element.set_attribute("xmlns", xmlns);
                    }
                }
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
