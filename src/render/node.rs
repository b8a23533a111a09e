//! Compiled document tree consumed by the renderer

use indexmap::IndexMap;
use serde::Serialize;

use super::grid::GridColumns;
use super::handlers::HandlerTag;
use super::link::{classify, LinkKind};

/// Ordered attribute map, preserving source order in the output
pub type Attributes = IndexMap<String, String>;

/// The compiled body of one document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Body {
    pub nodes: Vec<Node>,
}

impl Body {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All link nodes in document order
    pub fn links(&self) -> Vec<&LinkNode> {
        let mut links = Vec::new();
        for node in &self.nodes {
            node.collect_links(&mut links);
        }
        links
    }

    /// Plain text of the whole body
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.nodes {
            node.push_text(&mut text);
        }
        text
    }
}

/// A node of the compiled tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    Text(String),
    /// Pre-rendered HTML (raw blocks, highlighted code)
    Raw(String),
    Element(ElementNode),
    Link(LinkNode),
    Image(ImageNode),
    Callout(CalloutNode),
    MultiImage(MultiImageNode),
}

impl Node {
    /// Handler tag this node dispatches on
    pub fn tag(&self) -> HandlerTag {
        match self {
            Node::Link(link) => match classify(&link.target) {
                LinkKind::Internal => HandlerTag::InternalLink,
                LinkKind::Anchor => HandlerTag::Anchor,
                LinkKind::External => HandlerTag::ExternalLink,
            },
            Node::Image(_) => HandlerTag::Image,
            Node::Callout(_) => HandlerTag::Callout,
            Node::MultiImage(_) => HandlerTag::MultiImage,
            Node::Text(_) | Node::Raw(_) | Node::Element(_) => HandlerTag::Generic,
        }
    }

    /// Child nodes, if this node has any
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(el) => &el.children,
            Node::Link(link) => &link.children,
            Node::Callout(callout) => &callout.children,
            Node::Text(_) | Node::Raw(_) | Node::Image(_) | Node::MultiImage(_) => &[],
        }
    }

    fn collect_links<'a>(&'a self, out: &mut Vec<&'a LinkNode>) {
        if let Node::Link(link) = self {
            out.push(link);
        }
        for child in self.children() {
            child.collect_links(out);
        }
    }

    pub(crate) fn push_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Image(image) => out.push_str(&image.alt),
            _ => {
                for child in self.children() {
                    child.push_text(out);
                }
            }
        }
    }
}

/// Generic element passed through unchanged
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementNode {
    pub name: String,
    pub attrs: Attributes,
    pub children: Vec<Node>,
}

impl ElementNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkNode {
    pub target: String,
    pub attrs: Attributes,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageNode {
    pub src: String,
    pub alt: String,
    /// Everything except `src` and `alt` (dimensions, title, class, ...)
    pub attrs: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalloutNode {
    pub emoji: String,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiImageNode {
    pub columns: GridColumns,
    pub children: Vec<ImageNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(target: &str) -> Node {
        Node::Link(LinkNode {
            target: target.to_string(),
            attrs: Attributes::new(),
            children: vec![Node::Text("x".to_string())],
        })
    }

    #[test]
    fn test_link_tags() {
        assert_eq!(link("/about").tag(), HandlerTag::InternalLink);
        assert_eq!(link("#top").tag(), HandlerTag::Anchor);
        assert_eq!(link("https://a.b").tag(), HandlerTag::ExternalLink);
        assert_eq!(Node::Text("t".into()).tag(), HandlerTag::Generic);
    }

    #[test]
    fn test_links_are_collected_recursively() {
        let mut p = ElementNode::new("p");
        p.children.push(link("/a"));
        let body = Body::new(vec![
            Node::Element(p),
            Node::Callout(CalloutNode {
                emoji: "💡".to_string(),
                children: vec![link("#b")],
            }),
        ]);
        let targets: Vec<_> = body.links().iter().map(|l| l.target.as_str()).collect();
        assert_eq!(targets, vec!["/a", "#b"]);
        assert_eq!(body.text(), "xx");
    }
}
