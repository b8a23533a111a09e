//! Markdown compilation into the renderer's document tree
//!
//! Bodies are parsed with pulldown-cmark. Component tags written as HTML
//! (`<Image />`, `<Callout>`, `<MultiImage>`) become their own node kinds;
//! any other HTML is carried through as a raw node.

use std::collections::HashSet;

use lazy_static::lazy_static;
use pulldown_cmark::{
    Alignment, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd,
};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::helpers::html_escape;
use crate::render::{
    Attributes, Body, CalloutNode, ElementNode, GridColumns, ImageNode, LinkNode, MultiImageNode,
    Node,
};

lazy_static! {
    static ref COMPONENT_TAG: Regex = Regex::new(
        r#"<(/?)(Image|Callout|MultiImage)\b((?:[^>"'{}]|"[^"]*"|'[^']*'|\{[^}]*\})*?)(/?)>"#
    )
    .unwrap();
    static ref COMPONENT_ATTR: Regex =
        Regex::new(r#"([A-Za-z_][\w-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|\{([^}]*)\})"#).unwrap();
}

/// Compiles markdown bodies, highlighting fenced code with syntect
pub struct Compiler {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
    line_numbers: bool,
}

impl Compiler {
    /// Create a compiler with default highlighting
    pub fn new() -> Self {
        Self::from_config(&HighlightConfig::default())
    }

    /// Create a compiler from the site's highlight settings
    pub fn from_config(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            highlight: config.enable,
            line_numbers: config.line_number,
        }
    }

    /// Compile a markdown body (front-matter already stripped)
    pub fn compile(&self, markdown: &str) -> Body {
        let mut tree = TreeBuilder::default();
        self.build(markdown, &mut tree);
        tree.finish()
    }

    /// Feed the events of `markdown` into `tree`
    fn build(&self, markdown: &str, tree: &mut TreeBuilder) {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut code_block: Option<(Option<String>, String)> = None;
        let mut html_block: Option<String> = None;

        for event in parser {
            if let Some((lang, content)) = code_block.as_mut() {
                match event {
                    Event::Text(text) => content.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let highlighted = self.highlight_code(content, lang.as_deref());
                        tree.push_node(Node::Raw(highlighted));
                        code_block = None;
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            let lang = lang.split_whitespace().next().unwrap_or("").to_string();
                            (!lang.is_empty()).then_some(lang)
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::Start(Tag::HtmlBlock) => html_block = Some(String::new()),
                Event::End(TagEnd::HtmlBlock) => {
                    if let Some(html) = html_block.take() {
                        tree.push_html(self, &html, true);
                    }
                }
                Event::Html(html) => match html_block.as_mut() {
                    Some(buffer) => buffer.push_str(&html),
                    None => tree.push_html(self, &html, true),
                },
                Event::InlineHtml(html) => tree.push_html(self, &html, false),
                Event::Start(tag) => tree.start(tag),
                Event::End(TagEnd::TableHead) => {
                    tree.close_markdown();
                    tree.close_markdown();
                    tree.in_table_head = false;
                }
                Event::End(_) => tree.close_markdown(),
                Event::Text(text) => tree.push_node(Node::Text(text.into_string())),
                Event::Code(code) => {
                    let mut el = ElementNode::new("code");
                    el.children.push(Node::Text(code.into_string()));
                    tree.push_node(Node::Element(el));
                }
                Event::SoftBreak => tree.push_node(Node::Text("\n".to_string())),
                Event::HardBreak => tree.push_node(Node::Element(ElementNode::new("br"))),
                Event::Rule => tree.push_node(Node::Element(ElementNode::new("hr"))),
                Event::TaskListMarker(checked) => {
                    let mut el = ElementNode::new("input");
                    el.attrs.insert("type".into(), "checkbox".into());
                    el.attrs.insert("disabled".into(), String::new());
                    if checked {
                        el.attrs.insert("checked".into(), String::new());
                    }
                    tree.push_node(Node::Element(el));
                }
                _ => {}
            }
        }
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let plain = || {
            format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            )
        };

        if !self.highlight {
            return plain();
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
        else {
            return plain();
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) if self.line_numbers => add_line_numbers(&highlighted, lang),
            Ok(highlighted) => highlighted,
            Err(e) => {
                tracing::debug!("Highlighting failed for {}: {}", lang, e);
                plain()
            }
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap highlighted code in a two-column table with a line number gutter
fn add_line_numbers(code: &str, lang: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let gutter: Vec<String> = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect();

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        html_escape(lang),
        gutter.join("\n"),
        lines.join("\n")
    )
}

/// An open node waiting for its children
enum Frame {
    Element(ElementNode),
    Link(LinkNode),
    Image(ImageNode),
    Callout(CalloutNode),
    MultiImage(GridColumns, Vec<Node>),
}

impl Frame {
    fn is_component(&self) -> bool {
        matches!(self, Frame::Callout(_) | Frame::MultiImage(..))
    }

    fn component_name(&self) -> Option<&'static str> {
        match self {
            Frame::Callout(_) => Some("Callout"),
            Frame::MultiImage(..) => Some("MultiImage"),
            _ => None,
        }
    }

    fn into_node(self) -> Node {
        match self {
            Frame::Element(el) => Node::Element(el),
            Frame::Link(link) => Node::Link(link),
            Frame::Image(image) => Node::Image(image),
            Frame::Callout(callout) => Node::Callout(callout),
            Frame::MultiImage(columns, children) => {
                let mut images = Vec::new();
                collect_images(children, &mut images);
                Node::MultiImage(MultiImageNode {
                    columns,
                    children: images,
                })
            }
        }
    }
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Keep only the images of a grid, unwrapping paragraphs and links
fn collect_images(nodes: Vec<Node>, out: &mut Vec<ImageNode>) {
    for node in nodes {
        match node {
            Node::Image(image) => out.push(image),
            Node::Element(el) => collect_images(el.children, out),
            Node::Link(link) => collect_images(link.children, out),
            Node::Text(text) if text.trim().is_empty() => {}
            other => tracing::debug!("Dropping non-image node from grid: {:?}", other.tag()),
        }
    }
}

#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<Frame>,
    in_table_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
    /// Heading ids already handed out in this document
    used_ids: HashSet<String>,
}

impl TreeBuilder {
    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(Frame::Image(image)) => node.push_text(&mut image.alt),
            Some(Frame::Element(el)) => el.children.push(node),
            Some(Frame::Link(link)) => link.children.push(node),
            Some(Frame::Callout(callout)) => callout.children.push(node),
            Some(Frame::MultiImage(_, children)) => children.push(node),
            None => self.root.push(node),
        }
    }

    /// Turn a finished frame into a node of its parent
    fn close_frame(&mut self, frame: Frame) {
        let frame = match frame {
            Frame::Element(mut el) if is_heading(&el.name) => {
                match el.attrs.get("id") {
                    Some(id) => {
                        self.used_ids.insert(id.clone());
                    }
                    None => {
                        let mut plain = String::new();
                        for child in &el.children {
                            child.push_text(&mut plain);
                        }
                        let base = slug::slugify(plain);
                        if !base.is_empty() {
                            let id = self.unique_id(&base);
                            el.attrs.insert("id".to_string(), id);
                        }
                    }
                }
                Frame::Element(el)
            }
            other => other,
        };
        self.push_node(frame.into_node());
    }

    /// `base`, or `base-N` for the first N not taken yet
    fn unique_id(&mut self, base: &str) -> String {
        let mut id = base.to_string();
        let mut n = 0;
        while self.used_ids.contains(&id) {
            n += 1;
            id = format!("{}-{}", base, n);
        }
        self.used_ids.insert(id.clone());
        id
    }

    fn open_element(&mut self, name: &str) {
        self.stack.push(Frame::Element(ElementNode::new(name)));
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open_element("p"),
            Tag::Heading {
                level, id, classes, attrs, ..
            } => {
                let mut el = ElementNode::new(format!("h{}", level as usize));
                if let Some(id) = id {
                    el.attrs.insert("id".to_string(), id.into_string());
                }
                if !classes.is_empty() {
                    let classes: Vec<String> = classes.iter().map(|c| c.to_string()).collect();
                    el.attrs.insert("class".to_string(), classes.join(" "));
                }
                for (key, value) in attrs {
                    el.attrs.insert(
                        key.into_string(),
                        value.map(CowStr::into_string).unwrap_or_default(),
                    );
                }
                self.stack.push(Frame::Element(el));
            }
            Tag::BlockQuote(_) => self.open_element("blockquote"),
            Tag::List(Some(start)) => {
                let mut el = ElementNode::new("ol");
                if start != 1 {
                    el.attrs.insert("start".to_string(), start.to_string());
                }
                self.stack.push(Frame::Element(el));
            }
            Tag::List(None) => self.open_element("ul"),
            Tag::Item => self.open_element("li"),
            Tag::Emphasis => self.open_element("em"),
            Tag::Strong => self.open_element("strong"),
            Tag::Strikethrough => self.open_element("del"),
            Tag::Table(alignments) => {
                self.alignments = alignments;
                self.open_element("table");
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.cell_index = 0;
                self.open_element("thead");
                self.open_element("tr");
            }
            Tag::TableRow => {
                self.cell_index = 0;
                self.open_element("tr");
            }
            Tag::TableCell => {
                let mut el = ElementNode::new(if self.in_table_head { "th" } else { "td" });
                let align = match self.alignments.get(self.cell_index) {
                    Some(Alignment::Left) => Some("left"),
                    Some(Alignment::Center) => Some("center"),
                    Some(Alignment::Right) => Some("right"),
                    _ => None,
                };
                if let Some(align) = align {
                    el.attrs
                        .insert("style".to_string(), format!("text-align: {}", align));
                }
                self.cell_index += 1;
                self.stack.push(Frame::Element(el));
            }
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let target = match link_type {
                    LinkType::Email => format!("mailto:{}", &*dest_url),
                    _ => dest_url.into_string(),
                };
                let mut attrs = Attributes::new();
                if !title.is_empty() {
                    attrs.insert("title".to_string(), title.into_string());
                }
                self.stack.push(Frame::Link(LinkNode {
                    target,
                    attrs,
                    children: Vec::new(),
                }));
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut attrs = Attributes::new();
                if !title.is_empty() {
                    attrs.insert("title".to_string(), title.into_string());
                }
                self.stack.push(Frame::Image(ImageNode {
                    src: dest_url.into_string(),
                    alt: String::new(),
                    attrs,
                }));
            }
            _ => self.open_element("div"),
        }
    }

    /// Close the innermost markdown element, implicitly closing any
    /// component left open inside it
    fn close_markdown(&mut self) {
        while let Some(frame) = self.stack.pop() {
            let component = frame.component_name();
            self.close_frame(frame);
            match component {
                Some(name) => tracing::debug!("Implicitly closing <{}>", name),
                None => return,
            }
        }
        tracing::warn!("Unbalanced markdown end event");
    }

    /// Close the innermost open component with the given name
    fn close_component(&mut self, name: &str) {
        let Some(pos) = self
            .stack
            .iter()
            .rposition(|f| f.component_name() == Some(name))
        else {
            tracing::warn!("Closing tag </{}> without matching open tag", name);
            return;
        };

        while self.stack.len() > pos {
            if let Some(frame) = self.stack.pop() {
                self.close_frame(frame);
            }
        }
    }

    /// Split raw HTML into component tags and passthrough HTML.
    ///
    /// Inside an HTML block, text sitting in an open component is markdown
    /// and is compiled into the component.
    fn push_html(&mut self, compiler: &Compiler, html: &str, block: bool) {
        let mut last = 0;
        for caps in COMPONENT_TAG.captures_iter(html) {
            let Some(whole) = caps.get(0) else { continue };
            self.push_segment(compiler, &html[last..whole.start()], block);
            last = whole.end();

            let closing = !caps[1].is_empty();
            let name = &caps[2];
            let attrs = parse_component_attrs(&caps[3]);
            let self_closing = !caps[4].is_empty();

            if closing {
                self.close_component(name);
                continue;
            }

            match name {
                "Image" => {
                    self.push_node(Node::Image(image_from_attrs(attrs)));
                }
                "Callout" => {
                    let callout = CalloutNode {
                        emoji: attrs.get("emoji").cloned().unwrap_or_default(),
                        children: Vec::new(),
                    };
                    self.open_component(Frame::Callout(callout), self_closing);
                }
                _ => {
                    let columns = GridColumns::from_attr(attrs.get("cols").map(String::as_str));
                    self.open_component(Frame::MultiImage(columns, Vec::new()), self_closing);
                }
            }
        }
        self.push_segment(compiler, &html[last..], block);
    }

    fn push_segment(&mut self, compiler: &Compiler, html: &str, block: bool) {
        let in_component = self.stack.last().is_some_and(Frame::is_component);
        if block && in_component {
            self.push_markdown(compiler, html);
        } else {
            self.push_raw(html);
        }
    }

    /// Compile nested markdown into the current frame, sharing heading ids
    fn push_markdown(&mut self, compiler: &Compiler, markdown: &str) {
        if markdown.trim().is_empty() {
            return;
        }

        let mut nested = TreeBuilder {
            used_ids: std::mem::take(&mut self.used_ids),
            ..Default::default()
        };
        compiler.build(&dedent(markdown), &mut nested);
        nested.close_all();

        self.used_ids = nested.used_ids;
        for node in nested.root {
            self.push_node(node);
        }
    }

    fn open_component(&mut self, frame: Frame, self_closing: bool) {
        if self_closing {
            self.close_frame(frame);
        } else {
            self.stack.push(frame);
        }
    }

    fn push_raw(&mut self, html: &str) {
        if !html.trim().is_empty() {
            self.push_node(Node::Raw(html.to_string()));
        }
    }

    fn close_all(&mut self) {
        while let Some(frame) = self.stack.pop() {
            if frame.is_component() {
                tracing::warn!(
                    "Unclosed <{}> at end of document",
                    frame.component_name().unwrap_or_default()
                );
            }
            self.close_frame(frame);
        }
    }

    fn finish(mut self) -> Body {
        self.close_all();
        Body::new(self.root)
    }
}

/// Strip the indentation shared by all non-blank lines
fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse JSX-style attributes: `a="x"`, `a='x'`, `a={x}`
fn parse_component_attrs(source: &str) -> Attributes {
    COMPONENT_ATTR
        .captures_iter(source)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().to_string())
                .or_else(|| {
                    caps.get(4).map(|m| {
                        let v = m.as_str().trim();
                        v.trim_matches(|c| c == '"' || c == '\'' || c == '`')
                            .to_string()
                    })
                })
                .unwrap_or_default();
            (caps[1].to_string(), value)
        })
        .collect()
}

fn image_from_attrs(mut attrs: Attributes) -> ImageNode {
    let src = attrs.shift_remove("src").unwrap_or_default();
    let alt = attrs.shift_remove("alt").unwrap_or_default();
    ImageNode { src, alt, attrs }
}
