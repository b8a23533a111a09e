//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Scaffold a new post under `_posts`, returning its path
pub fn create_post(folio: &Folio, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let today = chrono::Local::now().date_naive();

    let target_dir = folio.source_dir.join("_posts");
    fs::create_dir_all(&target_dir)?;

    let slug = slug
        .map(str::to_string)
        .unwrap_or_else(|| slug::slugify(title));
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }
    let file_path = target_dir.join(format!("{}.mdx", slug));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        "---\ntitle: {}\npublishedAt: '{}'\nsummary: ''\n---\n\n",
        serde_yaml::to_string(title)?.trim_end(),
        today.format("%Y-%m-%d")
    );
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}
