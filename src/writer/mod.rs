//! TMX writer: serializes the document model back to Tiled's textual form
//! so the game's map loader accepts the output unmodified.

use std::fmt::Display;
use std::fs;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Error, Result};
use crate::model::{Element, MapDocument, Node};

/// Serializes the whole document, XML declaration included.
pub fn to_tmx(doc: &MapDocument) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_err)?;
    write_element(&mut writer, &doc.root)?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::map(format!("serialized map is not utf-8: {e}")))
}

/// Writes the document to `dest`.
pub fn emit(doc: &MapDocument, dest: &Path) -> Result<()> {
    let tmx = to_tmx(doc)?;
    fs::write(dest, tmx)?;
    Ok(())
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, el: &Element) -> Result<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (key, value) in &el.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if el.children.is_empty() {
        writer.write_event(Event::Empty(start)).map_err(write_err)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(write_err)?;
    for child in &el.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(write_err)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(el.name.as_str())))
        .map_err(write_err)?;
    Ok(())
}

fn write_err(e: impl Display) -> Error {
    Error::map(format!("writing xml: {e}"))
}
