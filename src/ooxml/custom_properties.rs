//! OOXML custom document properties.
//!
//! This module provides functionality to add, read, modify, and remove custom
//! document properties stored in the `docProps/custom.xml` part of Office Open
//! XML (OOXML) packages.
//!
//! Every property value is a variant element (`vt:lpwstr`, `vt:i4`,
//! `vt:vector`, ...) and goes through the [`variant`](crate::ooxml::variant)
//! codec, so any [`Value`] the codec supports can be stored.
//!
//! # Example Usage
//!
//! ```rust
//! use oxvariant::ooxml::custom_properties::CustomProperties;
//! use oxvariant::ooxml::variant::{Value, VariantKind};
//!
//! let mut props = CustomProperties::new();
//!
//! // Add various types of properties
//! props.add_property("ProjectName", "MyProject");
//! props.add_property("Version", 42i32);
//! props.add_property("Budget", 12345.67f64);
//! props.add_property("Tags", Value::object_vector([Value::from("draft"), Value::I32(3)]));
//! props.add_property_with_kind("Owner", VariantKind::BString, "ops_team")?;
//!
//! // Get property value
//! assert_eq!(props.get_property("Version"), Some(&Value::I32(42)));
//!
//! // Round-trip through docProps/custom.xml
//! let xml = props.to_xml()?;
//! let parsed = CustomProperties::from_xml(&xml)?;
//! assert_eq!(parsed.get_property("Owner"), Some(&Value::from("ops_team")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::variant::xml::{element_from_start, read_subtree};
use crate::ooxml::variant::{
    Element, Value, VariantElement, VariantError, VariantKind, decode, encode,
    encode_from_runtime_type, runtime_kind,
};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;
use std::io::Cursor;

/// Fixed GUID format ID for custom properties as per OOXML specification.
///
/// All custom properties must use this format ID.
const FORMAT_ID: &str = "{D5CDD505-2E9C-101B-9397-08002B2CF9AE}";

/// XML namespace for custom properties.
const CUSTOM_PROPERTIES_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/custom-properties";

/// VTypes namespace for variant types.
const VTYPES_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";

/// First property ID available to custom properties.
const FIRST_PID: i32 = 2;

/// A single custom property with name, value, and internal ID.
#[derive(Debug, Clone)]
struct CustomProperty {
    /// Property value
    value: Value,
    /// Kind to write; inferred from the value when `None`
    kind: Option<VariantKind>,
    /// Internal property ID (pid attribute)
    pid: i32,
}

/// Collection of custom document properties.
///
/// Properties keep their `pid` across updates. Properties read from XML
/// remember their original variant kind, so an `lpstr` is written back as an
/// `lpstr` rather than the inferred `lpwstr`.
#[derive(Debug, Clone)]
pub struct CustomProperties {
    /// Map of property names to properties
    properties: HashMap<String, CustomProperty>,
    /// Next available property ID
    next_pid: i32,
}

impl Default for CustomProperties {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomProperties {
    /// Create a new empty custom properties collection.
    pub fn new() -> Self {
        Self {
            properties: HashMap::new(),
            next_pid: FIRST_PID,
        }
    }

    /// Add a new custom property, inferring its variant kind on write.
    ///
    /// If a property with the same name already exists, it is replaced
    /// and the old value returned.
    ///
    /// # Example
    ///
    /// ```rust
    /// use oxvariant::ooxml::custom_properties::CustomProperties;
    ///
    /// let mut props = CustomProperties::new();
    /// props.add_property("Author", "John Doe");
    /// props.add_property("Version", 1i32);
    /// ```
    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.insert(name.into(), value.into(), None)
    }

    /// Add a property that is written as a specific variant kind.
    ///
    /// Fails if the value does not have the shape `kind` requires.
    pub fn add_property_with_kind(
        &mut self,
        name: impl Into<String>,
        kind: VariantKind,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        let value = value.into();
        if !value.fits(kind) {
            return Err(VariantError::KindMismatch {
                kind,
                found: value.type_name(),
            }
            .into());
        }
        Ok(self.insert(name.into(), value, Some(kind)))
    }

    /// Set a property value (alias for `add_property`).
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.add_property(name, value)
    }

    fn insert(&mut self, name: String, value: Value, kind: Option<VariantKind>) -> Option<Value> {
        // If property exists, keep its PID, otherwise allocate new one
        let pid = match self.properties.get(&name) {
            Some(existing) => existing.pid,
            None => {
                let pid = self.next_pid;
                self.next_pid += 1;
                pid
            },
        };

        self.properties
            .insert(name, CustomProperty { value, kind, pid })
            .map(|p| p.value)
    }

    /// Get a property value by name.
    pub fn get_property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name).map(|p| &p.value)
    }

    /// Get the variant kind a property will be written as.
    pub fn property_kind(&self, name: &str) -> Option<VariantKind> {
        let property = self.properties.get(name)?;
        property.kind.or_else(|| runtime_kind(&property.value))
    }

    /// Remove a property by name, returning its value if it existed.
    pub fn remove_property(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name).map(|p| p.value)
    }

    /// Check if a property with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Get the number of custom properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Get an iterator over all property names.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(|s| s.as_str())
    }

    /// Get an iterator over all properties (name and value pairs).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties
            .iter()
            .map(|(name, prop)| (name.as_str(), &prop.value))
    }

    /// Clear all custom properties.
    pub fn clear(&mut self) {
        self.properties.clear();
        self.next_pid = FIRST_PID;
    }

    /// Generate XML content for `docProps/custom.xml`.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        // XML declaration
        writer
            .write_event(Event::Decl(quick_xml::events::BytesDecl::new(
                "1.0",
                Some("UTF-8"),
                Some("yes"),
            )))
            .map_err(|e| OoxmlError::Xml(format!("Failed to write XML declaration: {}", e)))?;

        // Root <Properties> element
        let mut properties_elem = BytesStart::new("Properties");
        properties_elem.push_attribute(("xmlns", CUSTOM_PROPERTIES_NS));
        properties_elem.push_attribute(("xmlns:vt", VTYPES_NS));

        writer
            .write_event(Event::Start(properties_elem))
            .map_err(|e| OoxmlError::Xml(format!("Failed to write Properties element: {}", e)))?;

        // Sort properties by PID for consistent output
        let mut sorted_props: Vec<_> = self.properties.iter().collect();
        sorted_props.sort_by_key(|(_, p)| p.pid);

        let mut pid_buffer = itoa::Buffer::new();
        for (name, prop) in sorted_props {
            let value_elem: VariantElement = match prop.kind {
                Some(kind) => encode(kind, &prop.value, None)?,
                None => encode_from_runtime_type(&prop.value)?,
            };

            let mut property_elem = BytesStart::new("property");
            property_elem.push_attribute(("fmtid", FORMAT_ID));
            property_elem.push_attribute(("pid", pid_buffer.format(prop.pid)));
            property_elem.push_attribute(("name", name.as_str()));

            writer
                .write_event(Event::Start(property_elem))
                .map_err(|e| OoxmlError::Xml(format!("Failed to write property element: {}", e)))?;

            value_elem.write_xml(&mut writer)?;

            writer
                .write_event(Event::End(BytesEnd::new("property")))
                .map_err(|e| OoxmlError::Xml(format!("Failed to close property element: {}", e)))?;
        }

        // Close root element
        writer
            .write_event(Event::End(BytesEnd::new("Properties")))
            .map_err(|e| OoxmlError::Xml(format!("Failed to close Properties element: {}", e)))?;

        let result = writer.into_inner().into_inner();
        String::from_utf8(result)
            .map_err(|e| OoxmlError::Xml(format!("Invalid UTF-8 in generated XML: {}", e)))
    }

    /// Parse custom properties from `docProps/custom.xml` content.
    ///
    /// A property whose value element cannot be decoded is left out rather
    /// than failing the whole part. Malformed XML is an error.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut properties = HashMap::new();
        let mut max_pid = FIRST_PID - 1;

        // Current property being parsed
        let mut current: Option<(String, Option<i32>)> = None;

        loop {
            let value_elem = match reader.read_event()? {
                Event::Start(e) if e.local_name().as_ref() == b"property" => {
                    current = Some(parse_property_attributes(&e)?);
                    continue;
                },
                Event::Start(e) if current.is_some() => read_subtree(&mut reader, &e)?,
                Event::Empty(e) if current.is_some() => element_from_start(&e)?,
                Event::End(e) if e.local_name().as_ref() == b"property" => {
                    current = None;
                    continue;
                },
                Event::Eof => break,
                _ => continue,
            };

            let Some((name, pid)) = current.take() else {
                continue;
            };
            let value = match decode(&value_elem) {
                Ok(value) => value,
                Err(_err) => {
                    #[cfg(feature = "logging")]
                    log::debug!("skipping custom property {:?}: {}", name, _err);
                    continue;
                },
            };

            let pid = pid.unwrap_or(max_pid + 1);
            max_pid = max_pid.max(pid);
            let property = CustomProperty {
                value,
                kind: VariantKind::from_tag(value_elem.tag_name()),
                pid,
            };
            properties.insert(name, property);
        }

        Ok(Self {
            properties,
            next_pid: max_pid + 1,
        })
    }
}

fn parse_property_attributes(start: &BytesStart) -> Result<(String, Option<i32>)> {
    let mut name = None;
    let mut pid = None;

    for attr in start.attributes() {
        let attr = attr.map_err(|e| OoxmlError::Xml(format!("Failed to parse attribute: {}", e)))?;
        match attr.key.as_ref() {
            b"name" => {
                let value = attr
                    .unescape_value()
                    .map_err(|e| OoxmlError::Xml(format!("Invalid property name: {}", e)))?;
                name = Some(value.into_owned());
            },
            b"pid" => pid = atoi_simd::parse::<i32>(&attr.value).ok(),
            _ => {},
        }
    }

    name.map(|name| (name, pid))
        .ok_or_else(|| OoxmlError::InvalidFormat("Custom property without a name".to_string()))
}
