//! Output markup tree and its HTML serialization

use serde::Serialize;

use super::node::Attributes;
use crate::helpers::html_escape;

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta", "source", "wbr"];

/// A node of the rendered markup tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Markup {
    Element(Element),
    Text(String),
    /// Trusted HTML emitted verbatim
    Raw(String),
    Fragment(Vec<Markup>),
}

impl Markup {
    /// Serialize to an HTML string
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Markup::Text(text) => out.push_str(&html_escape(text)),
            Markup::Raw(html) => out.push_str(html),
            Markup::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
            Markup::Element(el) => el.write_html(out),
        }
    }

    /// The element, when this node is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Markup::Element(el) => Some(el),
            _ => None,
        }
    }
}

impl From<Element> for Markup {
    fn from(el: Element) -> Self {
        Markup::Element(el)
    }
}

/// An HTML element with ordered attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub name: String,
    pub attrs: Attributes,
    pub children: Vec<Markup>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing any existing value
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Apply a set of attributes on top of the current ones
    pub fn attrs<'a>(mut self, attrs: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        for (key, value) in attrs {
            self.attrs.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Markup>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&html_escape(value));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.name.as_str()) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_element() {
        let el = Element::new("a")
            .attr("href", "/a?b=1&c=2")
            .child(Markup::Text("Tom & <Jerry>".to_string()));
        assert_eq!(
            Markup::from(el).to_html(),
            r#"<a href="/a?b=1&amp;c=2">Tom &amp; &lt;Jerry&gt;</a>"#
        );
    }

    #[test]
    fn test_void_element() {
        let el = Element::new("img").attr("src", "/x.png").attr("alt", "");
        assert_eq!(Markup::from(el).to_html(), r#"<img src="/x.png" alt="">"#);
    }

    #[test]
    fn test_raw_and_fragment() {
        let markup = Markup::Fragment(vec![
            Markup::Raw("<pre>x</pre>".to_string()),
            Markup::Text("y".to_string()),
        ]);
        assert_eq!(markup.to_html(), "<pre>x</pre>y");
    }

    #[test]
    fn test_attr_overrides() {
        let el = Element::new("a").attr("target", "_blank").attr("target", "_self");
        assert_eq!(el.get("target"), Some("_self"));
        assert_eq!(el.attrs.len(), 1);
    }
}
