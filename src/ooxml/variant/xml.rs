//! XML reading and writing of variant elements.
//!
//! Elements are written with the conventional `vt:` prefix. On read any
//! prefix is dropped and only local names are kept; namespace declarations
//! are the caller's concern.

use super::element::{Element, VariantElement};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

/// Prefix bound to the `docPropsVTypes` namespace.
pub const VT_PREFIX: &str = "vt";

impl VariantElement {
    /// Serialize this element and its children.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        self.write_xml(&mut writer)?;

        let result = writer.into_inner().into_inner();
        String::from_utf8(result)
            .map_err(|e| OoxmlError::Xml(format!("Invalid UTF-8 in generated XML: {}", e)))
    }

    /// Write this element to an existing XML writer.
    pub fn write_xml<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let name = format!("{}:{}", VT_PREFIX, self.tag_name());
        let mut start = BytesStart::new(name.as_str());
        for attribute in self.attributes() {
            start.push_attribute(attribute);
        }

        if self.children().is_empty() && self.inner_text().is_empty() {
            writer
                .write_event(Event::Empty(start))
                .map_err(|e| OoxmlError::Xml(format!("Failed to write <{}/>: {}", name, e)))?;
            return Ok(());
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| OoxmlError::Xml(format!("Failed to write <{}>: {}", name, e)))?;
        if !self.inner_text().is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(self.inner_text())))
                .map_err(|e| OoxmlError::Xml(format!("Failed to write text of <{}>: {}", name, e)))?;
        }
        for child in self.children() {
            child.write_xml(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(name.as_str())))
            .map_err(|e| OoxmlError::Xml(format!("Failed to close <{}>: {}", name, e)))?;
        Ok(())
    }

    /// Parse the first element of an XML fragment.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event()? {
                Event::Start(e) => return read_subtree(&mut reader, &e),
                Event::Empty(e) => return element_from_start(&e),
                Event::Eof => {
                    return Err(OoxmlError::Xml("No variant element found".to_string()));
                },
                _ => {},
            }
        }
    }
}

/// Read the rest of an element whose start tag has just been consumed.
pub(crate) fn read_subtree(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<VariantElement> {
    let mut stack = vec![element_from_start(start)?];
    // Text and entity references arrive as separate events; unescape them together.
    let mut raw_text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                flush_text(&mut raw_text, &mut stack)?;
                stack.push(element_from_start(&e)?);
            },
            Event::Empty(e) => {
                flush_text(&mut raw_text, &mut stack)?;
                let child = element_from_start(&e)?;
                if let Some(parent) = stack.last_mut() {
                    parent.append_child(child);
                }
            },
            Event::Text(e) => raw_text.push_str(utf8(e.as_ref())?),
            Event::GeneralRef(e) => {
                raw_text.push('&');
                raw_text.push_str(utf8(e.as_ref())?);
                raw_text.push(';');
            },
            Event::CData(e) => {
                flush_text(&mut raw_text, &mut stack)?;
                let text = utf8(e.as_ref())?;
                if let Some(top) = stack.last_mut() {
                    top.push_text(text);
                }
            },
            Event::End(_) => {
                flush_text(&mut raw_text, &mut stack)?;
                let Some(done) = stack.pop() else {
                    return Err(OoxmlError::Xml("Unbalanced variant element".to_string()));
                };
                match stack.last_mut() {
                    Some(parent) => parent.append_child(done),
                    None => return Ok(done),
                }
            },
            Event::Eof => {
                return Err(OoxmlError::Xml(
                    "Unexpected end of XML inside variant element".to_string(),
                ));
            },
            _ => {},
        }
    }
}

fn flush_text(raw_text: &mut String, stack: &mut [VariantElement]) -> Result<()> {
    if raw_text.is_empty() {
        return Ok(());
    }
    {
        let text = unescape(raw_text)
            .map_err(|e| OoxmlError::Xml(format!("Invalid escape in text: {}", e)))?;
        if let Some(top) = stack.last_mut() {
            top.push_text(&text);
        }
    }
    raw_text.clear();
    Ok(())
}

pub(crate) fn element_from_start(start: &BytesStart) -> Result<VariantElement> {
    let local_name = start.local_name();
    let mut element = VariantElement::new(utf8(local_name.as_ref())?);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| OoxmlError::Xml(format!("Failed to parse attribute: {}", e)))?;
        if attr.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let key = attr.key.local_name();
        let value = unescape(utf8(&attr.value)?)
            .map_err(|e| OoxmlError::Xml(format!("Invalid escape in attribute: {}", e)))?;
        element.set_attribute(utf8(key.as_ref())?, &value);
    }

    Ok(element)
}

#[inline]
fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| OoxmlError::Xml(format!("Invalid UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::variant::{Value, decode, encode_from_runtime_type};

    #[test]
    fn test_write_leaf() {
        let element = VariantElement::make("lpwstr", "a < b & c");
        assert_eq!(element.to_xml().unwrap(), "<vt:lpwstr>a &lt; b &amp; c</vt:lpwstr>");
        assert_eq!(VariantElement::make("empty", "").to_xml().unwrap(), "<vt:empty/>");
    }

    #[test]
    fn test_write_vector() {
        let value = Value::object_vector([Value::I32(1), Value::from("a")]);
        let element: VariantElement = encode_from_runtime_type(&value).unwrap();
        assert_eq!(
            element.to_xml().unwrap(),
            concat!(
                r#"<vt:vector size="2" baseType="variant">"#,
                "<vt:variant><vt:i4>1</vt:i4></vt:variant>",
                "<vt:variant><vt:lpwstr>a</vt:lpwstr></vt:variant>",
                "</vt:vector>"
            )
        );
    }

    #[test]
    fn test_read_strips_prefix_and_unescapes() {
        let element = VariantElement::from_xml("<vt:lpwstr>Tom &amp; Jerry &#x41;</vt:lpwstr>").unwrap();
        assert_eq!(element.tag_name(), "lpwstr");
        assert_eq!(element.inner_text(), "Tom & Jerry A");
    }

    #[test]
    fn test_read_nested_with_whitespace() {
        let xml = r#"<vt:vector xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes" size="2" baseType="lpstr">
            <vt:lpstr> padded </vt:lpstr>
            <vt:lpstr/>
        </vt:vector>"#;
        let element = VariantElement::from_xml(xml).unwrap();

        assert_eq!(element.attribute("size"), Some("2"));
        assert_eq!(element.attributes().count(), 2);
        assert_eq!(element.children().len(), 2);
        assert_eq!(element.children()[0].inner_text(), " padded ");

        assert_eq!(
            decode(&element).unwrap(),
            Value::Vector {
                element_kind: crate::ooxml::variant::VariantKind::Lpstr,
                items: vec![Value::from(" padded "), Value::from("")],
            }
        );
    }

    #[test]
    fn test_xml_round_trip() {
        let value = Value::string_array(["x&y", "<z>"]);
        let element: VariantElement = encode_from_runtime_type(&value).unwrap();
        let parsed = VariantElement::from_xml(&element.to_xml().unwrap()).unwrap();
        assert_eq!(parsed, element);
        assert_eq!(decode(&parsed).unwrap(), value);
    }

    #[test]
    fn test_truncated_xml() {
        assert!(VariantElement::from_xml("<vt:vector><vt:i4>1</vt:i4>").is_err());
        assert!(VariantElement::from_xml("").is_err());
    }
}
