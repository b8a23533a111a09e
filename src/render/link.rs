//! Link classification by target prefix

use serde::Serialize;

/// How a hyperlink behaves once rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    /// Route inside the site (`/...`), no new browsing context
    Internal,
    /// Fragment on the current page (`#...`)
    Anchor,
    /// Everything else, opened in a new tab with opener isolation
    External,
}

impl LinkKind {
    /// Attributes the link receives before caller-supplied ones are applied.
    ///
    /// `data-route="internal"` is a plain marker on in-site links; no script
    /// reads it.
    pub fn default_attrs(self) -> &'static [(&'static str, &'static str)] {
        match self {
            LinkKind::Internal => &[("data-route", "internal")],
            LinkKind::Anchor => &[],
            LinkKind::External => &[("target", "_blank"), ("rel", "noopener noreferrer")],
        }
    }
}

/// Classify a link target.
///
/// Total over all strings. An empty target matches neither prefix and is
/// classified as [`LinkKind::External`].
pub fn classify(target: &str) -> LinkKind {
    if target.starts_with('/') {
        LinkKind::Internal
    } else if target.starts_with('#') {
        LinkKind::Anchor
    } else {
        LinkKind::External
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_targets() {
        assert_eq!(classify("/blog/my-post"), LinkKind::Internal);
        assert_eq!(classify("/"), LinkKind::Internal);
        assert_eq!(classify("//cdn.example.com/x.js"), LinkKind::Internal);
    }

    #[test]
    fn test_anchor_targets() {
        assert_eq!(classify("#section-2"), LinkKind::Anchor);
        assert_eq!(classify("#"), LinkKind::Anchor);
    }

    #[test]
    fn test_external_targets() {
        for target in [
            "https://github.com/x",
            "http://example.com",
            "mailto:a@b.com",
            "foo.html",
            "./relative",
            " /leading-space",
        ] {
            assert_eq!(classify(target), LinkKind::External, "{}", target);
        }
    }

    #[test]
    fn test_empty_target_falls_through() {
        assert_eq!(classify(""), LinkKind::External);
    }

    #[test]
    fn test_external_attrs() {
        let attrs = LinkKind::External.default_attrs();
        assert!(attrs.contains(&("target", "_blank")));
        assert!(attrs.contains(&("rel", "noopener noreferrer")));
        assert!(LinkKind::Anchor.default_attrs().is_empty());
        assert!(!LinkKind::Internal
            .default_attrs()
            .iter()
            .any(|(k, _)| *k == "target" || *k == "rel"));
    }
}
