//! List site content

use anyhow::Result;

use crate::content::ContentLoader;
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let registry = ContentLoader::new(folio).load()?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", registry.posts.len());
            for post in &registry.posts {
                println!(
                    "  {} - {} [{}]{}",
                    post.published_at.format("%Y-%m-%d"),
                    post.title,
                    post.source,
                    if post.draft { " (draft)" } else { "" }
                );
            }
        }
        "page" | "pages" => {
            println!("Pages ({}):", registry.pages.len());
            for page in &registry.pages {
                println!("  {} {} [{}]", page.path, page.title, page.source);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, page", content_type);
        }
    }

    Ok(())
}
