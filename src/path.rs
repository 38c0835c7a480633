//! Path resolution - turns link hrefs into comparable same-origin paths

use url::Url;

use crate::error::{NavError, NavResult};

/// Resolves hrefs relative to the current page
#[derive(Debug, Clone)]
pub struct PathResolver {
    base: Url,
    index_document: String,
}

impl PathResolver {
    /// Create a resolver for the page at `location`
    pub fn new(location: &str, index_document: &str) -> NavResult<Self> {
        let base = Url::parse(location).map_err(|source| NavError::InvalidLocation {
            location: location.to_string(),
            source,
        })?;
        Ok(Self {
            base,
            index_document: index_document.to_string(),
        })
    }

    /// Normalized path of the current page
    pub fn current_path(&self) -> String {
        normalize_path(self.base.path(), &self.index_document)
    }

    /// Resolve an href to a normalized same-origin path.
    ///
    /// Returns `None` when the href is not comparable with the current page:
    /// empty, a bare fragment, unparseable, another scheme or another origin.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        let target = self.base.join(href).ok()?;
        if target.cannot_be_a_base() || !is_same_origin(&self.base, &target) {
            return None;
        }

        Some(normalize_path(target.path(), &self.index_document))
    }
}

/// Scheme, host and effective port all match.
///
/// Unlike `Url::origin`, two host-less `file:` URLs compare equal here.
pub fn is_same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Canonical form of a path: leading slash, no query or fragment, no
/// trailing slash, and the root mapped to `/<index_document>`.
pub fn normalize_path(path: &str, index_document: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');

    if trimmed.is_empty() {
        return format!("/{}", index_document);
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(location: &str) -> PathResolver {
        PathResolver::new(location, "index.html").unwrap()
    }

    #[test]
    fn test_root_forms_are_canonical() {
        for path in ["", "/", "/index.html", "/index.html/", "//"] {
            assert_eq!(normalize_path(path, "index.html"), "/index.html", "path {:?}", path);
        }
    }

    #[test]
    fn test_normalize_strips_query_and_fragment() {
        assert_eq!(normalize_path("/chronik.html?year=2020#top", "index.html"), "/chronik.html");
        assert_eq!(normalize_path("/verein/#vorstand", "index.html"), "/verein");
        assert_eq!(normalize_path("?q=1", "index.html"), "/index.html");
    }

    #[test]
    fn test_normalize_adds_leading_slash() {
        assert_eq!(normalize_path("chronik.html", "index.html"), "/chronik.html");
    }

    #[test]
    fn test_custom_index_document() {
        assert_eq!(normalize_path("/", "start.htm"), "/start.htm");
    }

    #[test]
    fn test_relative_href() {
        let r = resolver("https://example.org/chronik.html");
        assert_eq!(r.current_path(), "/chronik.html");
        assert_eq!(r.resolve("chronik.html").as_deref(), Some("/chronik.html"));
        assert_eq!(r.resolve("./kontakt.html?x=1").as_deref(), Some("/kontakt.html"));
    }

    #[test]
    fn test_relative_href_from_subdirectory() {
        let r = resolver("https://example.org/verein/vorstand.html");
        assert_eq!(r.resolve("../index.html").as_deref(), Some("/index.html"));
        assert_eq!(r.resolve("../").as_deref(), Some("/index.html"));
        assert_eq!(r.resolve("chronik.html").as_deref(), Some("/verein/chronik.html"));
    }

    #[test]
    fn test_absolute_same_origin() {
        let r = resolver("https://example.org/");
        assert_eq!(r.current_path(), "/index.html");
        assert_eq!(r.resolve("https://example.org/").as_deref(), Some("/index.html"));
        assert_eq!(r.resolve("https://EXAMPLE.org:443/a.html").as_deref(), Some("/a.html"));
    }

    #[test]
    fn test_not_comparable() {
        let r = resolver("https://example.org/index.html");
        for href in [
            "",
            "   ",
            "#",
            "#section",
            "mailto:info@example.org",
            "tel:+491234",
            "javascript:void(0)",
            "http://example.org/index.html",
            "https://example.org:8443/index.html",
            "https://other.example/index.html",
            "//cdn.example.net/x.html",
            "https://[::1",
        ] {
            assert_eq!(r.resolve(href), None, "href {:?}", href);
        }
    }

    #[test]
    fn test_file_scheme_is_same_origin() {
        let r = resolver("file:///home/site/chronik.html");
        assert_eq!(r.resolve("chronik.html").as_deref(), Some("/home/site/chronik.html"));
    }

    #[test]
    fn test_invalid_location() {
        let err = PathResolver::new("not a url", "index.html").unwrap_err();
        assert!(matches!(err, NavError::InvalidLocation { .. }));
    }
}
