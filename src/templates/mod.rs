//! Built-in site templates using the Tera template engine
//!
//! The layouts are embedded in the binary; rendered document bodies are
//! inserted as already-escaped HTML.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::{strip_html, truncate};
use crate::render::Attributes;

/// Template renderer with the embedded site layouts
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all layouts loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Bodies are pre-rendered markup; values are escaped with `| escape` where needed
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("page.html", include_str!("site/page.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("partials/head.html", include_str!("site/partials/head.html")),
            (
                "partials/sidebar.html",
                include_str!("site/partials/sidebar.html"),
            ),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    Ok(tera::Value::String(truncate(&s, length, None)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub root: String,
    pub language: String,
    pub menu: Vec<NavItem>,
    pub blog_path: String,
    pub current_year: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub name: String,
    pub path: String,
    /// Link attributes for the path's [`LinkKind`](crate::render::LinkKind)
    pub attrs: Attributes,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub slug: String,
    pub date: String,
    pub date_iso: String,
    pub summary: String,
    pub image: Option<String>,
    pub path: String,
    pub permalink: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub title: String,
    pub description: Option<String>,
    pub path: String,
    pub permalink: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteData {
        SiteData {
            title: "Mark Neumann".to_string(),
            description: "Researcher, Engineer.".to_string(),
            author: "Mark Neumann".to_string(),
            url: "https://markneumann.xyz".to_string(),
            root: "/".to_string(),
            language: "en".to_string(),
            menu: vec![
                NavItem {
                    name: "blog".to_string(),
                    path: "/blog/".to_string(),
                    attrs: [("data-route".to_string(), "internal".to_string())]
                        .into_iter()
                        .collect(),
                },
                NavItem {
                    name: "github".to_string(),
                    path: "https://github.com/x".to_string(),
                    attrs: [
                        ("target".to_string(), "_blank".to_string()),
                        ("rel".to_string(), "noopener noreferrer".to_string()),
                    ]
                    .into_iter()
                    .collect(),
                },
            ],
            blog_path: "/blog/".to_string(),
            current_year: "2024".to_string(),
        }
    }

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_render_page() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert("current_path", "/about/");
        context.insert("page_title", "About");
        context.insert(
            "page",
            &PageData {
                title: "About".to_string(),
                description: None,
                path: "/about/".to_string(),
                permalink: "https://markneumann.xyz/about/".to_string(),
                content: "<article><p>Hi</p></article>".to_string(),
            },
        );
        let html = renderer.render("page.html", &context).unwrap();
        assert!(html.contains("<title>About | Mark Neumann</title>"));
        assert!(html.contains("<article><p>Hi</p></article>"));
        assert!(html.contains(r#"<a href="/blog/" data-route="internal" class="#));
        assert!(html.contains(
            r#"<a href="https://github.com/x" target="_blank" rel="noopener noreferrer" class="#
        ));
    }

    #[test]
    fn test_meta_description_is_plain_and_short() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert("current_path", "/blog/");
        context.insert(
            "page_description",
            &format!("An <em>emphatic</em> start {}", "word ".repeat(60)),
        );
        context.insert("posts", &Vec::<PostData>::new());
        let html = renderer.render("blog.html", &context).unwrap();

        let start = html.find(r#"<meta name="description" content=""#).unwrap();
        let rest = &html[start + r#"<meta name="description" content=""#.len()..];
        let description = &rest[..rest.find('"').unwrap()];
        assert!(description.starts_with("An emphatic start word"));
        assert!(description.ends_with("..."));
        assert!(description.chars().count() <= 160);
        assert!(html.contains("No posts yet."));
    }

    #[test]
    fn test_truncate_filter() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(8));
        let out = truncate_chars_filter(&tera::Value::from("Hello World"), &args).unwrap();
        assert_eq!(out, tera::Value::from("Hello..."));
    }
}
