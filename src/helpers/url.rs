//! URL helper functions

use crate::config::SiteConfig;

/// Join a site-absolute path onto the site root
///
/// # Examples
/// ```ignore
/// join_root("/blog/", "/about") // -> "/blog/about"
/// ```
pub fn join_root(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a URL with the configured root path
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    join_root(&config.root, path)
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Site-relative path of a post
pub fn post_path(config: &SiteConfig, slug: &str) -> String {
    format!("/{}/{}/", config.blog_dir.trim_matches('/'), slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com/".to_string();
        config.root = "/site/".to_string();
        config
    }

    #[test]
    fn test_join_root() {
        assert_eq!(join_root("/", "/blog/x"), "/blog/x");
        assert_eq!(join_root("/site/", "/blog/x"), "/site/blog/x");
        assert_eq!(join_root("/site", ""), "/site/");
        assert_eq!(join_root("/", "/"), "/");
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/site/css/style.css");
        assert_eq!(url_for(&config, "about/"), "/site/about/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/about/"),
            "https://example.com/site/about/"
        );
    }

    #[test]
    fn test_post_path() {
        let config = SiteConfig::default();
        assert_eq!(post_path(&config, "hello"), "/blog/hello/");
    }
}
