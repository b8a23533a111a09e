//! Substitution table: node tag to rendering handler

use std::collections::HashMap;

use serde::Serialize;

use super::link::LinkKind;
use super::markup::{Element, Markup};
use super::node::{ImageNode, Node};
use super::renderer::Renderer;

/// Presentation class added to every image
pub const IMAGE_CLASS: &str = "rounded-lg";

const CALLOUT_CLASS: &str = "flex bg-neutral-100 dark:bg-neutral-900 border border-neutral-200 dark:border-neutral-800 rounded-lg p-4 my-8";

/// Closed set of handler keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandlerTag {
    InternalLink,
    Anchor,
    ExternalLink,
    Image,
    Callout,
    MultiImage,
    Generic,
}

/// A rendering handler for one node tag
pub type Handler = fn(&Renderer<'_>, &Node) -> Markup;

/// Fixed mapping from [`HandlerTag`] to [`Handler`]
#[derive(Clone)]
pub struct SubstitutionTable {
    handlers: HashMap<HandlerTag, Handler>,
}

impl SubstitutionTable {
    /// A table with no substitutions; everything renders through the passthrough
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// The site's substitution rules
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.register(HandlerTag::InternalLink, render_internal_link);
        table.register(HandlerTag::Anchor, render_anchor);
        table.register(HandlerTag::ExternalLink, render_external_link);
        table.register(HandlerTag::Image, render_rounded_image);
        table.register(HandlerTag::Callout, render_callout);
        table.register(HandlerTag::MultiImage, render_multi_image);
        table.register(HandlerTag::Generic, render_generic);
        table
    }

    /// Register a handler, returning the one it replaced
    pub fn register(&mut self, tag: HandlerTag, handler: Handler) -> Option<Handler> {
        self.handlers.insert(tag, handler)
    }

    pub fn contains(&self, tag: HandlerTag) -> bool {
        self.handlers.contains_key(&tag)
    }

    /// Handler for a tag, falling back to the generic passthrough
    pub fn lookup(&self, tag: HandlerTag) -> Handler {
        self.handlers
            .get(&tag)
            .or_else(|| self.handlers.get(&HandlerTag::Generic))
            .copied()
            .unwrap_or(render_generic)
    }
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for SubstitutionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<_> = self.handlers.keys().collect();
        tags.sort_by_key(|t| format!("{:?}", t));
        f.debug_struct("SubstitutionTable").field("tags", &tags).finish()
    }
}

/// Build an anchor for a link node with the given behavior
fn link_element(renderer: &Renderer<'_>, node: &Node, kind: LinkKind) -> Markup {
    let Node::Link(link) = node else {
        return render_generic(renderer, node);
    };

    let href = match kind {
        LinkKind::Internal => renderer.route(&link.target),
        LinkKind::Anchor | LinkKind::External => link.target.clone(),
    };

    let mut el = Element::new("a").attr("href", href);
    for (key, value) in kind.default_attrs() {
        el = el.attr(*key, *value);
    }
    el.attrs(&link.attrs)
        .children(renderer.render_nodes(&link.children))
        .into()
}

fn render_internal_link(renderer: &Renderer<'_>, node: &Node) -> Markup {
    link_element(renderer, node, LinkKind::Internal)
}

fn render_anchor(renderer: &Renderer<'_>, node: &Node) -> Markup {
    link_element(renderer, node, LinkKind::Anchor)
}

fn render_external_link(renderer: &Renderer<'_>, node: &Node) -> Markup {
    link_element(renderer, node, LinkKind::External)
}

fn render_rounded_image(renderer: &Renderer<'_>, node: &Node) -> Markup {
    match node {
        Node::Image(image) => image_element(image)
            .attr("class", IMAGE_CLASS)
            .attrs(&image.attrs)
            .into(),
        _ => render_generic(renderer, node),
    }
}

fn render_callout(renderer: &Renderer<'_>, node: &Node) -> Markup {
    let Node::Callout(callout) = node else {
        return render_generic(renderer, node);
    };

    Element::new("div")
        .attr("class", CALLOUT_CLASS)
        .child(
            Element::new("div")
                .attr("class", "flex items-center w-4 mr-4")
                .child(Markup::Text(callout.emoji.clone())),
        )
        .child(
            Element::new("div")
                .attr("class", "w-full callout")
                .children(renderer.render_nodes(&callout.children)),
        )
        .into()
}

fn render_multi_image(renderer: &Renderer<'_>, node: &Node) -> Markup {
    let Node::MultiImage(grid) = node else {
        return render_generic(renderer, node);
    };

    let images = grid
        .children
        .iter()
        .map(|image| renderer.render_node(&Node::Image(image.clone())));

    Element::new("div")
        .attr(
            "class",
            format!("grid {} gap-2 justify-start", grid.columns.class()),
        )
        .children(images)
        .into()
}

fn image_element(image: &ImageNode) -> Element {
    Element::new("img")
        .attr("src", image.src.clone())
        .attr("alt", image.alt.clone())
}

/// Structural passthrough with no substitutions applied
fn render_generic(renderer: &Renderer<'_>, node: &Node) -> Markup {
    match node {
        Node::Text(text) => Markup::Text(text.clone()),
        Node::Raw(html) => Markup::Raw(html.clone()),
        Node::Element(el) => Element::new(el.name.clone())
            .attrs(&el.attrs)
            .children(renderer.render_nodes(&el.children))
            .into(),
        Node::Link(link) => Element::new("a")
            .attr("href", link.target.clone())
            .attrs(&link.attrs)
            .children(renderer.render_nodes(&link.children))
            .into(),
        Node::Image(image) => image_element(image).attrs(&image.attrs).into(),
        Node::Callout(callout) => Element::new("div")
            .child(Markup::Text(callout.emoji.clone()))
            .children(renderer.render_nodes(&callout.children))
            .into(),
        Node::MultiImage(grid) => Element::new("div")
            .children(
                grid.children
                    .iter()
                    .map(|image| Markup::from(image_element(image).attrs(&image.attrs))),
            )
            .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CalloutNode, GridColumns, LinkNode, MultiImageNode};

    fn link(target: &str, attrs: &[(&str, &str)]) -> Node {
        Node::Link(LinkNode {
            target: target.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            children: vec![Node::Text("label".to_string())],
        })
    }

    fn image(src: &str, attrs: &[(&str, &str)]) -> ImageNode {
        ImageNode {
            src: src.to_string(),
            alt: format!("alt for {}", src),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn render(node: &Node) -> Markup {
        let table = SubstitutionTable::standard();
        Renderer::new(&table).render_node(node)
    }

    #[test]
    fn test_internal_link() {
        let markup = render(&link("/blog/my-post", &[]));
        let el = markup.as_element().unwrap();
        assert_eq!(el.get("href"), Some("/blog/my-post"));
        assert_eq!(el.get("target"), None);
        assert_eq!(el.get("rel"), None);
        assert_eq!(el.get("data-route"), Some("internal"));
    }

    #[test]
    fn test_internal_link_under_sub_path() {
        let table = SubstitutionTable::standard();
        let renderer = Renderer::new(&table).with_root("/site/");
        let markup = renderer.render_node(&link("/about", &[]));
        assert_eq!(markup.as_element().unwrap().get("href"), Some("/site/about"));
    }

    #[test]
    fn test_anchor_link() {
        let markup = render(&link("#section-2", &[("title", "Jump")]));
        assert_eq!(
            markup.to_html(),
            r##"<a href="#section-2" title="Jump">label</a>"##
        );
    }

    #[test]
    fn test_external_link() {
        let markup = render(&link("https://github.com/x", &[]));
        assert_eq!(
            markup.to_html(),
            r#"<a href="https://github.com/x" target="_blank" rel="noopener noreferrer">label</a>"#
        );
    }

    #[test]
    fn test_external_link_caller_attrs_win() {
        let markup = render(&link("https://a.b", &[("rel", "me")]));
        let el = markup.as_element().unwrap();
        assert_eq!(el.get("rel"), Some("me"));
        assert_eq!(el.get("target"), Some("_blank"));
    }

    #[test]
    fn test_image_passthrough() {
        let node = Node::Image(image("/img/cat.png", &[("width", "400"), ("height", "300")]));
        let markup = render(&node);
        let el = markup.as_element().unwrap();
        assert_eq!(el.name, "img");
        assert_eq!(el.get("src"), Some("/img/cat.png"));
        assert_eq!(el.get("alt"), Some("alt for /img/cat.png"));
        assert_eq!(el.get("width"), Some("400"));
        assert_eq!(el.get("height"), Some("300"));
        assert_eq!(el.get("class"), Some(IMAGE_CLASS));
        assert_eq!(el.attrs.len(), 5);
    }

    #[test]
    fn test_callout() {
        let node = Node::Callout(CalloutNode {
            emoji: "💡".to_string(),
            children: vec![Node::Text("Note".to_string())],
        });
        let html = render(&node).to_html();
        assert!(html.contains(r#"<div class="flex items-center w-4 mr-4">💡</div>"#));
        assert!(html.contains(r#"<div class="w-full callout">Note</div>"#));
        assert!(html.starts_with(r#"<div class="flex bg-neutral-100"#));
    }

    #[test]
    fn test_multi_image_columns() {
        for columns in GridColumns::ALL {
            let node = Node::MultiImage(MultiImageNode {
                columns,
                children: vec![image("/a.png", &[]), image("/b.png", &[])],
            });
            let markup = render(&node);
            let el = markup.as_element().unwrap();
            let class = el.get("class").unwrap();
            assert!(class.contains(columns.class()));
            assert_eq!(
                class.matches("grid-cols-").count(),
                1,
                "exactly one column class"
            );
            assert_eq!(el.children.len(), 2);
            for child in &el.children {
                assert_eq!(child.as_element().unwrap().get("class"), Some(IMAGE_CLASS));
            }
        }
    }

    #[test]
    fn test_unregistered_tag_uses_passthrough() {
        let table = SubstitutionTable::empty();
        let renderer = Renderer::new(&table);
        let markup = renderer.render_node(&link("https://a.b", &[]));
        assert_eq!(markup.to_html(), r#"<a href="https://a.b">label</a>"#);
    }

    #[test]
    fn test_register_replaces_handler() {
        fn shout(_: &Renderer<'_>, _: &Node) -> Markup {
            Markup::Text("!".to_string())
        }
        let mut table = SubstitutionTable::standard();
        assert!(table.register(HandlerTag::Callout, shout).is_some());
        let node = Node::Callout(CalloutNode {
            emoji: String::new(),
            children: Vec::new(),
        });
        assert_eq!(Renderer::new(&table).render_node(&node).to_html(), "!");
    }
}
