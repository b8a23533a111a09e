//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    pub blog_dir: String,

    // Writing
    pub render_drafts: bool,
    /// Reject documents containing links with an empty target
    pub strict_links: bool,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Date format (chrono strftime)
    pub date_format: String,

    // Navigation chrome, in display order
    #[serde(default)]
    pub menu: Vec<MenuItem>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),
            blog_dir: "blog".to_string(),

            render_drafts: false,
            strict_links: false,
            highlight: HighlightConfig::default(),

            date_format: "%B %-d, %Y".to_string(),

            menu: default_menu(),
            extra: HashMap::new(),
        }
    }
}

fn default_menu() -> Vec<MenuItem> {
    [
        ("home", "/"),
        ("about", "/about"),
        ("blog", "/blog"),
        ("projects", "/projects"),
        ("advisory", "/advisory"),
    ]
    .into_iter()
    .map(|(name, path)| MenuItem {
        name: name.to_string(),
        path: path.to_string(),
    })
    .collect()
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// A navigation entry shown in the sidebar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

/// Code block highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}
