//! Element model consumed by the variant codec.
//!
//! The codec never touches a document object model directly. Anything that
//! can name its tag, expose its text, attributes and children, and build a
//! new leaf node can be decoded from or encoded into. [`VariantElement`] is
//! the owned tree used by this crate's own XML reader and writer.

use smallvec::SmallVec;

/// A node of a variant element tree.
///
/// Tag names are local names (`i4`, `vector`), never namespace-qualified.
pub trait Element: Sized {
    /// Create a leaf node with the given tag name and text.
    fn make(tag_name: &str, text: &str) -> Self;

    /// Local tag name of this node.
    fn tag_name(&self) -> &str;

    /// Text content of this node.
    fn inner_text(&self) -> &str;

    /// Get an attribute value by name.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Set an attribute, replacing any previous value.
    fn set_attribute(&mut self, name: &str, value: &str);

    /// Child elements in document order.
    fn child_elements(&self) -> impl Iterator<Item = &Self>;

    /// Append a child element.
    fn append_child(&mut self, child: Self);
}

/// An owned variant element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantElement {
    tag: String,
    text: String,
    attributes: SmallVec<[(String, String); 3]>,
    children: Vec<VariantElement>,
}

impl VariantElement {
    /// Create an element without text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: VariantElement) -> Self {
        self.children.push(child);
        self
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Child elements as a slice.
    #[inline]
    pub fn children(&self) -> &[VariantElement] {
        &self.children
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

impl Element for VariantElement {
    fn make(tag_name: &str, text: &str) -> Self {
        Self {
            tag: tag_name.to_string(),
            text: text.to_string(),
            ..Self::default()
        }
    }

    #[inline]
    fn tag_name(&self) -> &str {
        &self.tag
    }

    #[inline]
    fn inner_text(&self) -> &str {
        &self.text
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }

    fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter()
    }

    fn append_child(&mut self, child: Self) {
        self.children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_replaces() {
        let mut element = VariantElement::new("vector");
        element.set_attribute("size", "1");
        element.set_attribute("baseType", "i4");
        element.set_attribute("size", "2");

        assert_eq!(element.attribute("size"), Some("2"));
        assert_eq!(element.attribute("baseType"), Some("i4"));
        assert_eq!(element.attributes().count(), 2);
        assert_eq!(element.attribute("missing"), None);
    }

    #[test]
    fn test_children_keep_document_order() {
        let element = VariantElement::new("vector")
            .with_child(VariantElement::make("i4", "1"))
            .with_child(VariantElement::make("i4", "2"));

        let texts: Vec<_> = element.child_elements().map(|c| c.inner_text()).collect();
        assert_eq!(texts, ["1", "2"]);
    }
}
