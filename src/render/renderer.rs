//! Renderer - dispatches compiled nodes through the substitution table

use super::handlers::SubstitutionTable;
use super::markup::{Element, Markup};
use super::node::{Body, Node};
use crate::helpers::join_root;

/// Class list of the article wrapping every rendered body
const ARTICLE_CLASS: &str = "prose prose-quoteless prose-neutral dark:prose-invert";

/// Renders compiled bodies. Holds no mutable state.
#[derive(Debug, Clone)]
pub struct Renderer<'a> {
    table: &'a SubstitutionTable,
    root: String,
}

impl<'a> Renderer<'a> {
    pub fn new(table: &'a SubstitutionTable) -> Self {
        Self {
            table,
            root: "/".to_string(),
        }
    }

    /// Set the site root internal routes are resolved against
    pub fn with_root(mut self, root: &str) -> Self {
        self.root = root.to_string();
        self
    }

    /// Render a whole body into an `<article>`
    pub fn render(&self, body: &Body) -> Markup {
        Element::new("article")
            .attr("class", ARTICLE_CLASS)
            .children(self.render_nodes(&body.nodes))
            .into()
    }

    /// Render a body to an HTML string
    pub fn render_html(&self, body: &Body) -> String {
        self.render(body).to_html()
    }

    /// Render one node with the handler registered for its tag
    pub fn render_node(&self, node: &Node) -> Markup {
        let handler = self.table.lookup(node.tag());
        handler(self, node)
    }

    pub fn render_nodes(&self, nodes: &[Node]) -> Vec<Markup> {
        nodes.iter().map(|node| self.render_node(node)).collect()
    }

    /// Resolve an internal route against the site root
    pub fn route(&self, target: &str) -> String {
        join_root(&self.root, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Attributes, ElementNode, ImageNode, LinkNode};

    fn sample_body() -> Body {
        let mut p = ElementNode::new("p");
        p.children = vec![
            Node::Text("See ".to_string()),
            Node::Link(LinkNode {
                target: "https://example.com".to_string(),
                attrs: Attributes::new(),
                children: vec![Node::Text("this".to_string())],
            }),
        ];
        Body::new(vec![
            Node::Element(p),
            Node::Image(ImageNode {
                src: "/me.jpg".to_string(),
                alt: "me".to_string(),
                attrs: Attributes::new(),
            }),
        ])
    }

    #[test]
    fn test_render_wraps_in_article() {
        let table = SubstitutionTable::standard();
        let html = Renderer::new(&table).render_html(&sample_body());
        assert!(html.starts_with(r#"<article class="prose prose-quoteless"#));
        assert!(html.ends_with("</article>"));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
        assert!(html.contains(r#"<img src="/me.jpg" alt="me" class="rounded-lg">"#));
    }

    #[test]
    fn test_render_is_idempotent() {
        let table = SubstitutionTable::standard();
        let renderer = Renderer::new(&table);
        let body = sample_body();
        assert_eq!(renderer.render(&body), renderer.render(&body));
    }

    #[test]
    fn test_empty_body() {
        let table = SubstitutionTable::standard();
        let html = Renderer::new(&table).render_html(&Body::default());
        assert_eq!(html, format!(r#"<article class="{}"></article>"#, ARTICLE_CLASS));
    }
}
