//! FCPXML parse and serialize glue over quick-xml events.
//!
//! Only the XML surface FCPXML actually uses is supported: elements,
//! attributes, and text content. Comments and processing instructions are
//! skipped on read and not re-emitted.

use fcpx_core::{FcpxError, Result};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::tree::{NodeId, XmlDocument};

/// Resolve a general entity reference to its character: the five predefined
/// XML entities plus numeric (`#NN` / `#xNN`) forms.
fn resolve_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let (radix, digits) = num.strip_prefix('x').map_or((10, num), |hex| (16, hex));
        return u32::from_str_radix(digits, radix)
            .ok()
            .and_then(char::from_u32);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

impl XmlDocument {
    /// Parse an FCPXML string into an arena tree.
    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);
        let decoder = reader.decoder();

        let mut doc = XmlDocument::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut buf = Vec::new();

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| FcpxError::Xml(format!("parse error at {}: {e}", reader.error_position())))?;

            match event {
                Event::Start(ref e) => {
                    let id = doc.start_element(e, stack.last().copied(), decoder)?;
                    stack.push(id);
                }
                Event::Empty(ref e) => {
                    doc.start_element(e, stack.last().copied(), decoder)?;
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(ref t) => {
                    if let Some(&current) = stack.last() {
                        let text = t
                            .xml_content()
                            .map_err(|e| FcpxError::Xml(format!("bad text content: {e}")))?;
                        // Whitespace-only runs are indentation between elements.
                        if !text.trim().is_empty() {
                            doc.node_mut(current)
                                .text
                                .get_or_insert_with(String::new)
                                .push_str(&text);
                        }
                    }
                }
                Event::GeneralRef(ref e) => {
                    if let Some(&current) = stack.last() {
                        let name = std::str::from_utf8(e.as_ref())
                            .map_err(|e| FcpxError::Xml(format!("bad entity name: {e}")))?;
                        let resolved = resolve_entity(name)
                            .ok_or_else(|| FcpxError::Xml(format!("unknown entity `&{name};`")))?;
                        doc.node_mut(current)
                            .text
                            .get_or_insert_with(String::new)
                            .push(resolved);
                    }
                }
                Event::CData(ref t) => {
                    if let Some(&current) = stack.last() {
                        let text = String::from_utf8_lossy(t);
                        doc.node_mut(current)
                            .text
                            .get_or_insert_with(String::new)
                            .push_str(&text);
                    }
                }
                Event::Eof => break,
                // Declaration, doctype, comments, PIs carry no tree content.
                _ => {}
            }
            buf.clear();
        }

        if doc.root().is_none() {
            return Err(FcpxError::Xml("document has no root element".into()));
        }
        debug!(nodes = doc.len(), "parsed FCPXML document");
        Ok(doc)
    }

    fn start_element(
        &mut self,
        e: &BytesStart<'_>,
        parent: Option<NodeId>,
        decoder: Decoder,
    ) -> Result<NodeId> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let id = self.create_element(name);
        for attr in e.attributes() {
            let attr = attr.map_err(|e| FcpxError::Xml(format!("bad attribute: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .decode_and_unescape_value(decoder)
                .map_err(|e| FcpxError::Xml(format!("bad attribute value: {e}")))?
                .into_owned();
            self.node_mut(id).attributes.push((key, value));
        }
        match parent {
            Some(parent) => self.append_child(parent, id),
            None => {
                if self.root().is_some() {
                    return Err(FcpxError::Xml("multiple root elements".into()));
                }
                self.set_root(id);
            }
        }
        Ok(id)
    }

    /// Serialize back to FCPXML text with declaration and DOCTYPE.
    pub fn to_xml(&self) -> Result<String> {
        let root = self
            .root()
            .ok_or_else(|| FcpxError::Xml("document has no root element".into()))?;

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| FcpxError::Xml(e.to_string()))?;
        writer
            .write_event(Event::DocType(BytesText::from_escaped("fcpxml")))
            .map_err(|e| FcpxError::Xml(e.to_string()))?;
        self.write_node(&mut writer, root)?;

        let bytes = writer.into_inner();
        String::from_utf8(bytes).map_err(|e| FcpxError::Xml(e.to_string()))
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<()> {
        let node = self.node(id);
        let mut start = BytesStart::new(node.name.as_str());
        for (key, value) in &node.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        let has_text = node.text.as_deref().is_some_and(|t| !t.is_empty());
        if node.children.is_empty() && !has_text {
            writer
                .write_event(Event::Empty(start))
                .map_err(|e| FcpxError::Xml(e.to_string()))?;
            return Ok(());
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| FcpxError::Xml(e.to_string()))?;
        if let Some(text) = node.text.as_deref() {
            if !text.is_empty() {
                writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(|e| FcpxError::Xml(e.to_string()))?;
            }
        }
        for &child in &node.children {
            self.write_node(writer, child)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(node.name.as_str())))
            .map_err(|e| FcpxError::Xml(e.to_string()))?;
        Ok(())
    }
}
