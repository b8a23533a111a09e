//! Post and Page models

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::render::Body;

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// URL-friendly name, taken from the file stem
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub published_at: NaiveDate,

    /// One-paragraph summary shown in listings
    pub summary: String,

    /// Cover image reference
    pub image: Option<String>,

    /// Hidden unless drafts are rendered
    pub draft: bool,

    /// Source file path (relative)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (without root)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,

    /// Compiled body
    #[serde(skip)]
    pub body: Body,

    /// Custom front-matter fields
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(slug: String, title: String, published_at: NaiveDate, source: String) -> Self {
        Self {
            slug,
            title,
            published_at,
            summary: String::new(),
            image: None,
            draft: false,
            full_source: PathBuf::from(&source),
            source,
            path: String::new(),
            permalink: String::new(),
            body: Body::default(),
            extra: HashMap::new(),
        }
    }

    /// Get the previous (older) post in a newest-first list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }

    /// Get the next (newer) post in a newest-first list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        pos.checked_sub(1).and_then(|i| posts.get(i))
    }
}

/// A standalone page (home, about, projects, ...)
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Page title
    pub title: String,

    /// Short description shown under the title
    pub description: Option<String>,

    /// Source file path (relative)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (without root)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,

    /// Compiled body
    #[serde(skip)]
    pub body: Body,

    /// Custom front-matter fields
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Page {
    /// Create a new page with minimal required fields
    pub fn new(title: String, source: String) -> Self {
        Self {
            title,
            description: None,
            full_source: PathBuf::from(&source),
            source,
            path: String::new(),
            permalink: String::new(),
            body: Body::default(),
            extra: HashMap::new(),
        }
    }

    /// Whether this page is the site's home page
    pub fn is_home(&self) -> bool {
        self.path == "/"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str) -> Post {
        Post::new(
            slug.to_string(),
            slug.to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            format!("_posts/{}.md", slug),
        )
    }

    #[test]
    fn test_prev_next() {
        let posts = vec![post("newest"), post("middle"), post("oldest")];
        assert_eq!(posts[1].prev(&posts).map(|p| p.slug.as_str()), Some("oldest"));
        assert_eq!(posts[1].next(&posts).map(|p| p.slug.as_str()), Some("newest"));
        assert!(posts[0].next(&posts).is_none());
        assert!(posts[2].prev(&posts).is_none());
    }
}
