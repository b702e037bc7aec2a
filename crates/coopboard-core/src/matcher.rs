//! Paths that bypass the edge gate entirely.
//!
//! Patterns are glob-like strings:
//!
//! - `/favicon.ico` matches exactly
//! - `/static/**` matches the directory and everything under it
//! - `*.png` matches any path ending in `.png`

use std::fmt;

pub const AUTH_CALLBACK_PATH: &str = "/auth/callback";

const DEFAULT_EXCLUSIONS: &[&str] = &[
    "/static/**",
    "/assets/**",
    "/_image/**",
    "/favicon.ico",
    "*.svg",
    "*.png",
    "*.jpg",
    "*.jpeg",
    "*.gif",
    "*.webp",
    "*.ico",
    AUTH_CALLBACK_PATH,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    Prefix(String),
    /// Extension without the leading dot, lowercase.
    Extension(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let pattern = pattern.trim();

        if let Some(ext) = pattern.strip_prefix("*.") {
            return PathPattern::Extension(ext.to_ascii_lowercase());
        }

        if let Some(dir) = pattern
            .strip_suffix("/**")
            .or_else(|| pattern.strip_suffix("/*"))
        {
            return PathPattern::Prefix(dir.to_string());
        }

        PathPattern::Exact(pattern.to_string())
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(exact) => path == exact,
            PathPattern::Prefix(dir) => {
                path == dir
                    || path
                        .strip_prefix(dir.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            PathPattern::Extension(ext) => path
                .rsplit_once('.')
                .is_some_and(|(stem, found)| {
                    !stem.is_empty() && !found.contains('/') && found.eq_ignore_ascii_case(ext)
                }),
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPattern::Exact(exact) => f.write_str(exact),
            PathPattern::Prefix(dir) => write!(f, "{dir}/**"),
            PathPattern::Extension(ext) => write!(f, "*.{ext}"),
        }
    }
}

/// Ordered exclusion list consulted before the gate runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionMatcher {
    patterns: Vec<PathPattern>,
}

impl Default for ExclusionMatcher {
    fn default() -> Self {
        Self::with_patterns(DEFAULT_EXCLUSIONS.iter().copied())
    }
}

impl ExclusionMatcher {
    pub fn with_patterns<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            patterns: patterns
                .into_iter()
                .filter(|p| !p.trim().is_empty())
                .map(PathPattern::parse)
                .collect(),
        }
    }

    /// Defaults plus deployment-specific patterns.
    pub fn extended<'a>(extra: impl IntoIterator<Item = &'a str>) -> Self {
        let mut matcher = Self::default();
        matcher.patterns.extend(
            extra
                .into_iter()
                .filter(|p| !p.trim().is_empty())
                .map(PathPattern::parse),
        );
        matcher
    }

    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_patterns() {
        assert_eq!(
            PathPattern::parse("/favicon.ico"),
            PathPattern::Exact("/favicon.ico".into())
        );
        assert_eq!(
            PathPattern::parse("/static/**"),
            PathPattern::Prefix("/static".into())
        );
        assert_eq!(
            PathPattern::parse("*.PNG"),
            PathPattern::Extension("png".into())
        );
    }

    #[test]
    fn test_default_exclusions() {
        let matcher = ExclusionMatcher::default();

        for path in [
            "/static/chunks/app.js",
            "/assets/logo.css",
            "/_image/resize",
            "/favicon.ico",
            "/images/building.JPG",
            "/broker/floorplan.png",
            "/auth/callback",
        ] {
            assert!(matcher.is_excluded(path), "{path} should be excluded");
        }
    }

    #[test]
    fn test_gate_runs_for_pages_and_api() {
        let matcher = ExclusionMatcher::default();

        for path in [
            "/",
            "/broker/submit",
            "/sign-in",
            "/api/session",
            "/staticky",
            "/auth/callback/extra",
            "/reports.pngs",
        ] {
            assert!(!matcher.is_excluded(path), "{path} should reach the gate");
        }
    }

    #[test]
    fn test_extension_requires_file_name() {
        let pattern = PathPattern::parse("*.svg");
        assert!(pattern.matches("/icons/a.svg"));
        assert!(!pattern.matches("/icons.svg/edit"));
    }

    #[test]
    fn test_extended_keeps_defaults() {
        let matcher = ExclusionMatcher::extended(["/robots.txt", " "]);
        assert!(matcher.is_excluded("/robots.txt"));
        assert!(matcher.is_excluded("/favicon.ico"));
        assert_eq!(
            matcher.patterns().len(),
            ExclusionMatcher::default().patterns().len() + 1
        );
    }

    #[test]
    fn test_display_round_trips() {
        for pattern in ExclusionMatcher::default().patterns() {
            assert_eq!(&PathPattern::parse(&pattern.to_string()), pattern);
        }
    }
}
