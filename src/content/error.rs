//! Typed errors raised by the content layer

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Invalid JSON front-matter: {0}")]
    FrontMatter(String),

    #[error("{path:?}: {count} link(s) with an empty target")]
    EmptyLinkTarget { path: PathBuf, count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ContentError::EmptyLinkTarget {
            path: PathBuf::from("_posts/a.md"),
            count: 2,
        };
        assert_eq!(err.to_string(), r#""_posts/a.md": 2 link(s) with an empty target"#);
        assert_eq!(
            ContentError::FrontMatter("eof".to_string()).to_string(),
            "Invalid JSON front-matter: eof"
        );
    }
}
