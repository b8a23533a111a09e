//! Content loader - builds the content registry from the source directory

use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{Compiler, ContentError, FrontMatter, Page, Post};
use crate::helpers::{full_url_for, post_path, truncate};
use crate::render::Body;
use crate::Folio;

/// Length of summaries derived from the body when front-matter has none
const SUMMARY_LENGTH: usize = 160;

/// Every document of the site, loaded once and passed to whatever needs it
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    /// Newest first
    pub posts: Vec<Post>,
    pub pages: Vec<Page>,
}

impl ContentRegistry {
    pub fn new(mut posts: Vec<Post>, pages: Vec<Page>) -> Self {
        posts.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        Self { posts, pages }
    }

    pub fn post(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn page(&self, path: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.path == path)
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.pages.is_empty()
    }
}

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    compiler: Compiler,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Self {
        let compiler = Compiler::from_config(&folio.config.highlight);
        Self { folio, compiler }
    }

    /// Load posts and pages into a registry
    pub fn load(&self) -> Result<ContentRegistry> {
        let posts = self.load_posts()?;
        let pages = self.load_pages()?;
        Ok(ContentRegistry::new(posts, pages))
    }

    /// Load all posts from source/_posts, in walk order
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.folio.source_dir.join("_posts");
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !(path.is_file() && is_markdown_file(path)) {
                continue;
            }
            match self.load_post(path) {
                Ok(post) if post.draft && !self.folio.config.render_drafts => {
                    tracing::debug!("Skipping draft {:?}", path);
                }
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
            }
        }

        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, raw_body) = FrontMatter::parse(&content)?;

        let published_at = fm
            .parse_published_at()
            .or_else(|| file_modified(path))
            .unwrap_or_else(|| Local::now().date_naive());

        let slug = file_stem(path);
        let title = fm.title.clone().unwrap_or_else(|| slug.clone());

        let body = self.compiler.compile(raw_body);
        self.check_links(path, &body)?;

        let summary = fm
            .summary
            .clone()
            .unwrap_or_else(|| summarize(&body));

        let config = &self.folio.config;
        let mut post = Post::new(slug, title, published_at, self.relative_source(path));
        post.path = post_path(config, &post.slug);
        post.permalink = full_url_for(config, &post.path);
        post.full_source = path.to_path_buf();
        post.summary = summary;
        post.image = fm.image;
        post.draft = fm.draft;
        post.body = body;
        post.extra = fm.extra;

        Ok(post)
    }

    /// Load all pages (markdown outside `_`-prefixed directories)
    pub fn load_pages(&self) -> Result<Vec<Page>> {
        let mut pages = Vec::new();

        for entry in WalkDir::new(&self.folio.source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            let relative = path.strip_prefix(&self.folio.source_dir).unwrap_or(path);
            let hidden = relative
                .components()
                .next()
                .and_then(|c| c.as_os_str().to_str())
                .is_some_and(|first| first.starts_with('_'));
            if hidden {
                continue;
            }

            if path.is_file() && is_markdown_file(path) {
                match self.load_page(path) {
                    Ok(page) => pages.push(page),
                    Err(e) => tracing::warn!("Failed to load page {:?}: {}", path, e),
                }
            }
        }

        pages.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(pages)
    }

    /// Load a single page from a file
    fn load_page(&self, path: &Path) -> Result<Page> {
        let content = fs::read_to_string(path)?;
        let (fm, raw_body) = FrontMatter::parse(&content)?;

        let title = fm.title.clone().unwrap_or_else(|| file_stem(path));
        let source = self.relative_source(path);

        let body = self.compiler.compile(raw_body);
        self.check_links(path, &body)?;

        let mut page = Page::new(title, source.clone());
        page.path = page_path(&source);
        page.permalink = full_url_for(&self.folio.config, &page.path);
        page.full_source = path.to_path_buf();
        page.description = fm.description.or(fm.summary);
        page.body = body;
        page.extra = fm.extra;

        Ok(page)
    }

    /// Report links with an empty target; fatal under `strict_links`
    fn check_links(&self, path: &Path, body: &Body) -> Result<(), ContentError> {
        let count = body.links().iter().filter(|l| l.target.is_empty()).count();
        if count == 0 {
            return Ok(());
        }

        if self.folio.config.strict_links {
            return Err(ContentError::EmptyLinkTarget {
                path: path.to_path_buf(),
                count,
            });
        }

        tracing::warn!(
            "{:?}: {} link(s) with an empty target will open as external links",
            path,
            count
        );
        Ok(())
    }

    fn relative_source(&self, path: &Path) -> String {
        path.strip_prefix(&self.folio.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

/// Site path of a page from its source path
fn page_path(source: &str) -> String {
    let without_ext = source
        .trim_end_matches(".mdx")
        .trim_end_matches(".md")
        .trim_end_matches(".markdown");

    let path = if without_ext == "index" || without_ext.ends_with("/index") {
        without_ext.trim_end_matches("index").to_string()
    } else {
        format!("{}/", without_ext)
    };

    format!("/{}", path.trim_start_matches('/'))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string()
}

fn file_modified(path: &Path) -> Option<NaiveDate> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    Some(chrono::DateTime::<Local>::from(modified).date_naive())
}

fn summarize(body: &Body) -> String {
    let text = body.text();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&text, SUMMARY_LENGTH, None)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e, "md" | "markdown" | "mdx"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site() -> (TempDir, Folio) {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        write(
            &source,
            "_posts/older.md",
            "---\ntitle: Older\npublishedAt: '2021-05-01'\nsummary: The old one.\n---\nBody [home](/).\n",
        );
        write(
            &source,
            "_posts/newer.mdx",
            "---\ntitle: Newer\npublishedAt: '2023-09-12'\n---\nA body without a summary in front-matter.\n",
        );
        write(
            &source,
            "_posts/wip.md",
            "---\ntitle: Draft\npublishedAt: '2024-01-01'\ndraft: true\n---\nNot yet.\n",
        );
        write(&source, "index.md", "---\ntitle: Home\n---\nHello.\n");
        write(
            &source,
            "about.md",
            "---\ntitle: About\ndescription: Who I am.\n---\nResearcher.\n",
        );
        write(&source, "projects/index.md", "# Projects\n");
        let folio = Folio::new(tmp.path()).unwrap();
        (tmp, folio)
    }

    #[test]
    fn test_load_posts_sorted_newest_first() {
        let (_tmp, folio) = site();
        let registry = ContentLoader::new(&folio).load().unwrap();
        let slugs: Vec<_> = registry.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);

        let older = registry.post("older").unwrap();
        assert_eq!(older.title, "Older");
        assert_eq!(older.summary, "The old one.");
        assert_eq!(older.path, "/blog/older/");
        assert_eq!(older.permalink, "http://example.com/blog/older/");
        assert_eq!(older.source, "_posts/older.md");
    }

    #[test]
    fn test_summary_falls_back_to_body() {
        let (_tmp, folio) = site();
        let registry = ContentLoader::new(&folio).load().unwrap();
        let newer = registry.post("newer").unwrap();
        assert_eq!(newer.summary, "A body without a summary in front-matter.");
    }

    #[test]
    fn test_drafts_rendered_when_enabled() {
        let (_tmp, mut folio) = site();
        folio.config.render_drafts = true;
        let registry = ContentLoader::new(&folio).load().unwrap();
        assert_eq!(registry.posts.len(), 3);
        assert_eq!(registry.posts[0].slug, "wip");
    }

    #[test]
    fn test_load_pages() {
        let (_tmp, folio) = site();
        let registry = ContentLoader::new(&folio).load().unwrap();
        let paths: Vec<_> = registry.pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/about/", "/projects/"]);
        assert!(registry.page("/").unwrap().is_home());
        assert_eq!(
            registry.page("/about/").unwrap().description.as_deref(),
            Some("Who I am.")
        );
        assert_eq!(registry.page("/projects/").unwrap().title, "index");
    }

    #[test]
    fn test_empty_link_target_strict() {
        let (tmp, mut folio) = site();
        write(
            &tmp.path().join("source"),
            "_posts/broken.md",
            "---\ntitle: Broken\npublishedAt: '2022-01-01'\n---\n[click]()\n",
        );

        let registry = ContentLoader::new(&folio).load().unwrap();
        assert!(registry.post("broken").is_some());

        folio.config.strict_links = true;
        let loader = ContentLoader::new(&folio);
        let err = loader
            .load_post(&tmp.path().join("source/_posts/broken.md"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::EmptyLinkTarget { count: 1, .. })
        ));
        let registry = loader.load().unwrap();
        assert!(registry.post("broken").is_none());
    }

    #[test]
    fn test_registry_orders_posts() {
        let date = |d: u32| NaiveDate::from_ymd_opt(2022, 3, d).unwrap();
        let post = |slug: &str, day: u32| {
            Post::new(slug.to_string(), slug.to_string(), date(day), format!("{}.md", slug))
        };
        let registry = ContentRegistry::new(
            vec![post("b", 1), post("c", 9), post("a", 1)],
            Vec::new(),
        );
        let slugs: Vec<_> = registry.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_page_path() {
        assert_eq!(page_path("index.md"), "/");
        assert_eq!(page_path("about.md"), "/about/");
        assert_eq!(page_path("projects/index.mdx"), "/projects/");
        assert_eq!(page_path("notes/advisory.md"), "/notes/advisory/");
    }
}
