//! The owned node tree and fragment parsing.

use html5ever::tendril::TendrilSink;
use html5ever::{namespace_url, ns, parse_fragment, LocalName, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::core::AmpifyError;

/// One markup node.
///
/// Trees are owned top-down: children belong to their parent and no node is
/// shared between trees. Tag rules mutate element nodes in place during
/// traversal; text and comments pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An element node: tag name, ordered attributes, children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
    /// Cause string recorded when a dimension lookup failed and the element
    /// reverted to its original tag. Never serialized.
    pub failure: Option<String>,
}

/// A single attribute. Attribute order is preserved through conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Element {
    /// Creates an element with no attributes or children.
    pub fn new(name: &str) -> Element {
        Element {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
            failure: None,
        }
    }

    /// Returns the value of the named attribute.
    pub fn attr(&self, attr_name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == attr_name)
            .map(|attr| attr.value.as_str())
    }

    /// Sets an attribute value.
    ///
    /// An existing attribute is updated in place so its position in the
    /// attribute sequence survives; a new attribute is appended at the end.
    pub fn set_attr(&mut self, attr_name: &str, attr_value: &str) {
        for attr in self.attrs.iter_mut() {
            if attr.name == attr_name {
                attr.value = attr_value.to_string();
                return;
            }
        }

        self.attrs.push(Attr {
            name: attr_name.to_string(),
            value: attr_value.to_string(),
        });
    }

    /// True when the attribute exists with a non-empty value.
    pub fn has_attr_value(&self, attr_name: &str) -> bool {
        self.attr(attr_name).map_or(false, |value| !value.is_empty())
    }
}

/// Parses an HTML fragment (body context) into a sequence of owned nodes.
pub fn html_to_nodes(html: &str) -> Result<Vec<Node>, AmpifyError> {
    let dom: RcDom = parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), LocalName::from("body")),
        vec![],
    )
    .from_utf8()
    .read_from(&mut html.as_bytes())
    .map_err(|err| AmpifyError::Parse(err.to_string()))?;

    // Fragment parsing wraps the content in a synthetic html element
    let document_children = dom.document.children.borrow();
    match document_children.first() {
        Some(root) => Ok(convert_children(root)),
        None => Ok(Vec::new()),
    }
}

fn convert_children(handle: &Handle) -> Vec<Node> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(convert_node)
        .collect()
}

fn convert_node(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| Attr {
                    name: attr.name.local.to_string(),
                    value: attr.value.to_string(),
                })
                .collect();

            // Template children live in the template contents fragment
            let children = match template_contents.borrow().as_ref() {
                Some(contents) if name.local.as_ref() == "template" => convert_children(contents),
                _ => convert_children(handle),
            };

            Some(Node::Element(Element {
                name: name.local.to_string(),
                attrs,
                children,
                failure: None,
            }))
        }
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(Node::Comment(contents.to_string())),
        // Doctypes and processing instructions cannot occur inside a fragment
        _ => None,
    }
}
