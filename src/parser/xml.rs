//! XML reading for statechart descriptions
//!
//! Reads an SCXML-like document into a generic element tree with `quick-xml`,
//! then converts that tree into the raw statechart model. Tag names are
//! compared after stripping a configured fixed-length namespace prefix, so
//! descriptions using expanded `{uri}` qualifiers still classify correctly.

use crate::error::{Error, Result};
use crate::parser::{NodeKind, RawDocument, RawNode, RawTransition};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// A generic XML element with its attributes and child elements.
/// Text content is irrelevant to the statechart schema and is discarded.
#[derive(Debug, Clone)]
struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse a statechart description into the raw model.
///
/// `ns_prefix_len` is the number of leading characters stripped from every
/// tag name before comparison.
pub fn parse_document(xml: &str, ns_prefix_len: usize) -> Result<RawDocument> {
    let root = read_tree(xml)?;
    document_from_element(&root, ns_prefix_len)
}

fn read_tree(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(element_from(&e)?),
            Event::Empty(e) => {
                let element = element_from(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::xml("unbalanced closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Eof => break,
            // Text, comments, processing instructions and declarations
            // carry no statechart structure
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::xml("unclosed element at end of document"));
    }
    root.ok_or_else(|| Error::xml("document contains no root element"))
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(Error::xml("multiple root elements"))
    }
}

/// Tag name with the namespace prefix stripped
fn local(name: &str, ns_prefix_len: usize) -> &str {
    name.get(ns_prefix_len..).unwrap_or(name)
}

fn document_from_element(root: &XmlElement, ns: usize) -> Result<RawDocument> {
    let initial = root
        .attr("initial")
        .ok_or_else(|| Error::missing_attribute(local(&root.name, ns), "initial"))?
        .to_string();

    let mut states = Vec::new();
    for child in &root.children {
        if let Some(node) = node_from_element(child, ns)? {
            states.push(node);
        }
    }

    Ok(RawDocument { initial, states })
}

fn node_from_element(element: &XmlElement, ns: usize) -> Result<Option<RawNode>> {
    let tag = local(&element.name, ns);
    let kind = match tag {
        "parallel" => NodeKind::Parallel,
        "state" => match (element.attr("initial"), element.attr("src")) {
            (Some(_), _) => NodeKind::Compound,
            (None, Some(_)) => NodeKind::Sourced,
            (None, None) => NodeKind::Leaf,
        },
        // executable content, data models etc. are not state nodes
        _ => return Ok(None),
    };

    let id = element
        .attr("id")
        .ok_or_else(|| Error::missing_attribute(tag, "id"))?
        .to_string();

    let mut transitions = Vec::new();
    let mut children = Vec::new();
    for child in &element.children {
        if local(&child.name, ns) == "transition" {
            transitions.push(transition_from_element(child, ns));
        } else if let Some(node) = node_from_element(child, ns)? {
            children.push(node);
        }
    }

    Ok(Some(RawNode {
        id,
        kind,
        initial: element.attr("initial").map(str::to_string),
        src: element.attr("src").map(str::to_string),
        transitions,
        children,
    }))
}

fn transition_from_element(element: &XmlElement, ns: usize) -> RawTransition {
    let mut send_events = Vec::new();
    for child in &element.children {
        if local(&child.name, ns) == "send" {
            match child.attr("event") {
                Some(event) => send_events.push(event.to_string()),
                None => tracing::warn!("send element without an event name, skipping"),
            }
        }
    }

    RawTransition {
        event: element.attr("event").map(str::to_string),
        target: element.attr("target").map(str::to_string),
        cond: element.attr("cond").map(str::to_string),
        send_events,
    }
}
