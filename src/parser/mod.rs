//! TMX reader: turns map text into the element-tree document model.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};
use crate::model::{Element, MapDocument, Node};

/// Parses one `.tmx` document.
///
/// Whitespace-only text (pretty-printing indentation) is dropped; any other
/// text — csv tile data in particular — is kept. Comments and processing
/// instructions are not part of the model.
pub fn parse(xml: &str) -> Result<MapDocument> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::map(format!("xml at byte {}: {e}", reader.buffer_position())))?;
        match event {
            Event::Start(start) => stack.push(element_from(&start)?),
            Event::Empty(start) => {
                let el = element_from(&start)?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| Error::map("unbalanced closing tag"))?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| Error::map(format!("text node: {e}")))?;
                if let Some(parent) = stack.last_mut() {
                    if !text.trim().is_empty() {
                        parent.children.push(Node::Text(text.into_owned()));
                    }
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    parent.children.push(Node::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::map("unclosed element"));
    }
    let root = root.ok_or_else(|| Error::map("no root element"))?;
    if root.name != "map" {
        return Err(Error::map(format!(
            "root element is <{}>, expected <map>",
            root.name
        )));
    }
    Ok(MapDocument { root })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(el)),
        None => {
            if root.is_some() {
                return Err(Error::map("multiple root elements"));
            }
            *root = Some(el);
        }
    }
    Ok(())
}

fn element_from(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut el = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::map(format!("attribute: {e}")))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::map(format!("attribute '{key}': {e}")))?
            .into_owned();
        el.attrs.push((key, value));
    }
    Ok(el)
}
