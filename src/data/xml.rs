use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::model::{XmlAttribute, XmlDeclaration, XmlDocument, XmlElement, XmlNode};

/// A well-formedness problem at a byte offset of the parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlSyntaxError {
    pub offset: usize,
    pub message: String,
}

impl XmlSyntaxError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tree builder
// ---------------------------------------------------------------------------

/// Parse `text` as a single XML document with exactly one root element.
///
/// Comments, processing instructions and the doctype are dropped;
/// whitespace-only text is dropped and other text is trimmed.
pub fn parse_document(text: &str) -> Result<XmlDocument, XmlSyntaxError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);
    // end names are matched against `stack` so the error can point at the open tag
    reader.check_end_names(false);

    let mut declaration = None;
    let mut root: Option<XmlElement> = None;
    // Open elements with the offset just past their start tag.
    let mut stack: Vec<(XmlElement, usize)> = Vec::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                let offset = reader.buffer_position().saturating_sub(1);
                return Err(XmlSyntaxError::new(offset, e.to_string()));
            }
        };
        let offset = reader.buffer_position();
        let at = offset.saturating_sub(1);

        match event {
            Event::Decl(decl) => {
                if root.is_some() || !stack.is_empty() {
                    return Err(XmlSyntaxError::new(at, "XML declaration after content"));
                }
                declaration = Some(read_declaration(&decl).map_err(|m| XmlSyntaxError::new(at, m))?);
            }
            Event::Start(tag) => {
                if root.is_some() && stack.is_empty() {
                    return Err(extra_content(at));
                }
                let element = read_element(&tag).map_err(|m| XmlSyntaxError::new(at, m))?;
                stack.push((element, offset));
            }
            Event::Empty(tag) => {
                let element = read_element(&tag).map_err(|m| XmlSyntaxError::new(at, m))?;
                attach(&mut stack, &mut root, element, at)?;
            }
            Event::End(tag) => {
                let found = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
                let Some(depth) = stack.iter().rposition(|(el, _)| el.name == found) else {
                    return Err(XmlSyntaxError::new(at, format!("unexpected closing tag </{found}>")));
                };
                if depth + 1 != stack.len() {
                    // the innermost open element is the one left unclosed
                    let (open, start) = &stack[stack.len() - 1];
                    return Err(XmlSyntaxError::new(
                        start.saturating_sub(1),
                        format!("unclosed element <{}> closed by </{found}>", open.name),
                    ));
                }
                if let Some((element, _)) = stack.pop() {
                    attach(&mut stack, &mut root, element, at)?;
                }
            }
            Event::Text(content) => {
                let text = content
                    .unescape()
                    .map_err(|e| XmlSyntaxError::new(at, e.to_string()))?;
                push_text(&mut stack, text, at)?;
            }
            Event::CData(content) => {
                let raw = content.into_inner();
                push_text(&mut stack, String::from_utf8_lossy(&raw), at)?;
            }
            Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some((open, start)) = stack.pop() {
        return Err(XmlSyntaxError::new(
            start.saturating_sub(1),
            format!("unclosed element <{}>", open.name),
        ));
    }

    match root {
        Some(root) => Ok(XmlDocument { declaration, root }),
        None => Err(XmlSyntaxError::new(text.len(), "no root element found")),
    }
}

fn extra_content(offset: usize) -> XmlSyntaxError {
    XmlSyntaxError::new(offset, "extra content after the root element")
}

fn attach(
    stack: &mut [(XmlElement, usize)],
    root: &mut Option<XmlElement>,
    element: XmlElement,
    at: usize,
) -> Result<(), XmlSyntaxError> {
    match stack.last_mut() {
        Some((parent, _)) => parent.children.push(XmlNode::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(extra_content(at)),
    }
    Ok(())
}

fn push_text(
    stack: &mut [(XmlElement, usize)],
    text: Cow<'_, str>,
    at: usize,
) -> Result<(), XmlSyntaxError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some((parent, _)) => {
            parent.children.push(XmlNode::Text(trimmed.to_string()));
            Ok(())
        }
        None => Err(XmlSyntaxError::new(at, "text outside the root element")),
    }
}

fn read_element(tag: &BytesStart<'_>) -> Result<XmlElement, String> {
    let name = std::str::from_utf8(tag.name().as_ref())
        .map_err(|e| format!("tag name is not UTF-8: {e}"))?
        .to_string();

    let mut element = XmlElement::new(name);
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| format!("attribute name is not UTF-8: {e}"))?
            .to_string();
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        element.attributes.push(XmlAttribute {
            name: key,
            value: value.into_owned(),
        });
    }
    Ok(element)
}

fn read_declaration(decl: &quick_xml::events::BytesDecl<'_>) -> Result<XmlDeclaration, String> {
    let version = decl.version().map_err(|e| e.to_string())?;
    let encoding = decl.encoding().transpose().map_err(|e| e.to_string())?;
    let standalone = decl.standalone().transpose().map_err(|e| e.to_string())?;

    Ok(XmlDeclaration {
        version: lossy(version),
        encoding: encoding.map(lossy),
        standalone: standalone.map(lossy),
    })
}

fn lossy(bytes: Cow<'_, [u8]>) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}
