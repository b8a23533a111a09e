//! Generator module - assembles rendered documents into static HTML pages

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use tera::Context;
use walkdir::WalkDir;

use crate::content::{ContentRegistry, Page, Post};
use crate::helpers::url_for;
use crate::render::{classify, LinkKind, Renderer, SubstitutionTable};
use crate::templates::{NavItem, NavPost, PageData, PostData, SiteData, TemplateRenderer};
use crate::Folio;

/// Static site generator
pub struct Generator {
    folio: Folio,
    templates: TemplateRenderer,
    table: SubstitutionTable,
}

impl Generator {
    /// Create a new generator using the standard substitution table
    pub fn new(folio: &Folio) -> Result<Self> {
        Self::with_table(folio, SubstitutionTable::standard())
    }

    /// Create a generator with a custom substitution table
    pub fn with_table(folio: &Folio, table: SubstitutionTable) -> Result<Self> {
        Ok(Self {
            folio: folio.clone(),
            templates: TemplateRenderer::new()?,
            table,
        })
    }

    fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.table).with_root(&self.folio.config.root)
    }

    /// Generate the entire site, returning the number of HTML files written
    pub fn generate(&self, registry: &ContentRegistry) -> Result<usize> {
        fs::create_dir_all(&self.folio.public_dir)?;

        self.copy_source_assets()?;

        let site_data = self.build_site_data();
        let mut written = 0;

        written += self.generate_pages(&registry.pages, &site_data)?;
        written += self.generate_post_pages(&registry.posts, &site_data)?;
        written += self.generate_blog_index(registry, &site_data)?;

        Ok(written)
    }

    /// Build site data for templates
    fn build_site_data(&self) -> SiteData {
        let config = &self.folio.config;
        SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.url.clone(),
            root: url_for(config, "/"),
            language: config.language.clone(),
            menu: config
                .menu
                .iter()
                .map(|item| self.nav_item(&item.name, &item.path))
                .collect(),
            blog_path: self.blog_path(),
            current_year: chrono::Local::now().year().to_string(),
        }
    }

    /// Menu entries are classified like body links; internal routes get the
    /// site root and a trailing slash
    fn nav_item(&self, name: &str, path: &str) -> NavItem {
        let kind = classify(path);
        let path = match kind {
            LinkKind::Internal => {
                let path = url_for(&self.folio.config, path);
                if path.ends_with('/') {
                    path
                } else {
                    format!("{}/", path)
                }
            }
            LinkKind::Anchor | LinkKind::External => path.to_string(),
        };
        let attrs = kind
            .default_attrs()
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        NavItem {
            name: name.to_string(),
            path,
            attrs,
        }
    }

    fn blog_path(&self) -> String {
        url_for(
            &self.folio.config,
            &format!("{}/", self.folio.config.blog_dir.trim_matches('/')),
        )
    }

    fn base_context(&self, site_data: &SiteData, current_path: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("current_path", current_path);
        context
    }

    fn post_data(&self, post: &Post, content: String) -> PostData {
        PostData {
            title: post.title.clone(),
            slug: post.slug.clone(),
            date: post
                .published_at
                .format(&self.folio.config.date_format)
                .to_string(),
            date_iso: post.published_at.format("%Y-%m-%d").to_string(),
            summary: post.summary.clone(),
            image: post.image.clone(),
            path: url_for(&self.folio.config, &post.path),
            permalink: post.permalink.clone(),
            content,
        }
    }

    /// Generate standalone pages
    fn generate_pages(&self, pages: &[Page], site_data: &SiteData) -> Result<usize> {
        let renderer = self.renderer();

        for page in pages {
            let data = PageData {
                title: page.title.clone(),
                description: page.description.clone(),
                path: url_for(&self.folio.config, &page.path),
                permalink: page.permalink.clone(),
                content: renderer.render_html(&page.body),
            };

            let mut context = self.base_context(site_data, &data.path);
            if !page.is_home() {
                context.insert("page_title", &page.title);
            }
            context.insert("page_description", &page.description.clone().unwrap_or_default());
            context.insert("page", &data);

            let html = self.templates.render("page.html", &context)?;
            self.write_page(&page.path, &html)?;
        }

        Ok(pages.len())
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, posts: &[Post], site_data: &SiteData) -> Result<usize> {
        let renderer = self.renderer();

        for post in posts {
            let data = self.post_data(post, renderer.render_html(&post.body));

            let mut context = self.base_context(site_data, &data.path);
            context.insert("page_title", &post.title);
            context.insert("page_description", &post.summary);
            context.insert("post", &data);

            let nav = |p: &Post| NavPost {
                title: p.title.clone(),
                path: url_for(&self.folio.config, &p.path),
            };
            if let Some(prev) = post.prev(posts) {
                context.insert("prev_post", &nav(prev));
            }
            if let Some(next) = post.next(posts) {
                context.insert("next_post", &nav(next));
            }

            let html = self.templates.render("post.html", &context)?;
            self.write_page(&post.path, &html)?;
        }

        Ok(posts.len())
    }

    /// Generate the blog listing, and the home page when no page claims `/`
    fn generate_blog_index(&self, registry: &ContentRegistry, site_data: &SiteData) -> Result<usize> {
        let posts: Vec<PostData> = registry
            .posts
            .iter()
            .map(|p| self.post_data(p, String::new()))
            .collect();

        let blog_dir = format!("/{}/", self.folio.config.blog_dir.trim_matches('/'));
        let mut targets = Vec::new();
        if registry.page(&blog_dir).is_none() {
            targets.push(blog_dir);
        } else {
            tracing::warn!("A page already occupies {}, skipping blog index", blog_dir);
        }
        if registry.page("/").is_none() {
            targets.push("/".to_string());
        }

        for target in &targets {
            let mut context = self.base_context(site_data, &url_for(&self.folio.config, target));
            context.insert("page_title", "Blog");
            context.insert("page_description", &self.folio.config.description);
            context.insert("posts", &posts);

            let html = self.templates.render("blog.html", &context)?;
            self.write_page(target, &html)?;
        }

        Ok(targets.len())
    }

    /// Write `html` to `<public>/<path>/index.html`
    fn write_page(&self, path: &str, html: &str) -> Result<PathBuf> {
        let output_path = output_path(&self.folio.public_dir, path);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(output_path)
    }

    /// Copy source assets (images, etc.) to public directory
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.folio.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            if matches!(ext, Some("md" | "markdown" | "mdx")) {
                continue;
            }

            let relative = path.strip_prefix(source_dir)?;
            let hidden = relative
                .components()
                .any(|c| c.as_os_str().to_string_lossy().starts_with('_'));
            if hidden {
                continue;
            }

            let dest = self.folio.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
        }

        Ok(())
    }
}

/// Output file for a site path
fn output_path(public_dir: &Path, path: &str) -> PathBuf {
    let clean_path = path.trim_matches('/');
    if clean_path.is_empty() {
        public_dir.join("index.html")
    } else {
        public_dir.join(clean_path).join("index.html")
    }
}
