//! Request path canonicalization.
//!
//! The page bundle is served from the percent-decoded path with empty and
//! dot segments resolved, so the gate has to classify that same path. Two
//! forms come out of here:
//!
//! - [`normalize_path`]: the decoded path the policy and exclusion list see
//! - [`canonical_form`]: the still-encoded path with `//`, `.` and `..`
//!   resolved, for redirecting non-canonical requests

/// Percent-decodes `raw` and resolves its segments.
///
/// Returns `None` for paths that do not start with `/`, do not decode to
/// UTF-8, or decode to a backslash or control character.
pub fn normalize_path(raw: &str) -> Option<String> {
    if !raw.starts_with('/') {
        return None;
    }

    let decoded = urlencoding::decode(raw).ok()?;
    if decoded.chars().any(|c| c == '\\' || c.is_control()) {
        return None;
    }

    Some(resolve_segments(&decoded))
}

/// Canonical spelling of the encoded path `raw`, or `None` when `raw` is
/// already canonical.
pub fn canonical_form(raw: &str) -> Option<String> {
    let resolved = resolve_segments(raw);
    (resolved != raw).then_some(resolved)
}

/// Drops empty and `.` segments and lets `..` pop one segment, never above
/// the root. A trailing slash survives.
fn resolve_segments(path: &str) -> String {
    let trailing = matches!(path.rsplit('/').next(), Some("" | "." | ".."));

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut out = String::with_capacity(path.len());
    for segment in segments {
        out.push('/');
        out.push_str(segment);
    }
    if trailing {
        out.push('/');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_decodes_percent_escapes() {
        assert_eq!(normalize_path("/%62roker/submit/").as_deref(), Some("/broker/submit/"));
        assert_eq!(normalize_path("/broker%2Fsubmit").as_deref(), Some("/broker/submit"));
        assert_eq!(normalize_path("/a%20b").as_deref(), Some("/a b"));
    }

    #[test]
    fn test_normalize_collapses_slashes_and_dots() {
        assert_eq!(normalize_path("//broker/submit/").as_deref(), Some("/broker/submit/"));
        assert_eq!(normalize_path("/static/../broker").as_deref(), Some("/broker"));
        assert_eq!(normalize_path("/static/%2e%2e/broker").as_deref(), Some("/broker"));
        assert_eq!(normalize_path("/./board//queue").as_deref(), Some("/board/queue"));
        assert_eq!(normalize_path("/../../board").as_deref(), Some("/board"));
        assert_eq!(normalize_path("/board/.").as_deref(), Some("/board/"));
        assert_eq!(normalize_path("/").as_deref(), Some("/"));
    }

    #[test]
    fn test_normalize_rejects_hostile_input() {
        assert_eq!(normalize_path("broker"), None);
        assert_eq!(normalize_path("/broker%5Csubmit"), None);
        assert_eq!(normalize_path("/broker%00"), None);
        assert_eq!(normalize_path("/%ff%fe"), None);
    }

    #[test]
    fn test_canonical_form() {
        assert_eq!(canonical_form("/broker/submit"), None);
        assert_eq!(canonical_form("/broker/submit/"), None);
        assert_eq!(canonical_form("/%62roker"), None);
        assert_eq!(canonical_form("/"), None);

        assert_eq!(canonical_form("//broker/submit").as_deref(), Some("/broker/submit"));
        assert_eq!(canonical_form("/board/./queue").as_deref(), Some("/board/queue"));
        assert_eq!(canonical_form("/static/../agent").as_deref(), Some("/agent"));
        assert_eq!(canonical_form("//").as_deref(), Some("/"));
    }
}
