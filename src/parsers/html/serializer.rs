use std::io;

use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::{namespace_url, ns, LocalName, QualName};

use crate::core::AmpifyError;

use super::dom::{Element, Node};

/// Renders a node tree back to an HTML string.
///
/// Void elements come out without a closing tag, attributes keep their
/// order, and attributes with empty values render as `attr=""`.
pub fn nodes_to_html(nodes: &[Node]) -> Result<String, AmpifyError> {
    let mut buf: Vec<u8> = Vec::new();

    serialize(&mut buf, &SerializableNodes(nodes), SerializeOpts::default())
        .map_err(|err| AmpifyError::Serialize(err.to_string()))?;

    String::from_utf8(buf).map_err(|err| AmpifyError::Serialize(err.to_string()))
}

struct SerializableNodes<'a>(&'a [Node]);

impl Serialize for SerializableNodes<'_> {
    fn serialize<S>(&self, serializer: &mut S, _traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        for node in self.0 {
            serialize_node(node, serializer)?;
        }
        Ok(())
    }
}

fn serialize_node<S>(node: &Node, serializer: &mut S) -> io::Result<()>
where
    S: Serializer,
{
    match node {
        Node::Element(element) => serialize_element(element, serializer),
        Node::Text(text) => serializer.write_text(text),
        Node::Comment(text) => serializer.write_comment(text),
    }
}

fn serialize_element<S>(element: &Element, serializer: &mut S) -> io::Result<()>
where
    S: Serializer,
{
    // The html namespace is what makes the serializer apply void-element
    // and raw-text rules
    let name = QualName::new(None, ns!(html), LocalName::from(element.name.as_str()));
    let attr_names: Vec<QualName> = element
        .attrs
        .iter()
        .map(|attr| QualName::new(None, ns!(), LocalName::from(attr.name.as_str())))
        .collect();

    serializer.start_elem(
        name.clone(),
        attr_names
            .iter()
            .zip(element.attrs.iter())
            .map(|(attr_name, attr)| (attr_name, attr.value.as_str())),
    )?;

    for child in element.children.iter() {
        serialize_node(child, serializer)?;
    }

    serializer.end_elem(name)
}
