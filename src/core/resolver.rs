//! RFC 3986 §5.2 reference resolution.

use tracing::trace;

use crate::error::ValidationError;
use crate::url::EncodedUrl;

/// Resolve `reference` against `base`.
///
/// `base` must carry a scheme. The result takes the reference's components
/// from the first one it defines (scheme, authority, path, query) and the
/// base's for the rest; a relative path is merged onto the base path and
/// dot-segments are removed.
///
/// # Examples
///
/// ```
/// use hyperurl::{resolve, EncodedUrl};
///
/// let base = EncodedUrl::parse("http://a/b/c/d;p?q").unwrap();
/// let reference = EncodedUrl::parse("../g").unwrap();
/// assert_eq!(resolve(&base, &reference).unwrap().to_text(), "http://a/b/g");
/// ```
pub fn resolve(base: &EncodedUrl, reference: &EncodedUrl) -> Result<EncodedUrl, ValidationError> {
    if base.scheme.is_empty() {
        return Err(ValidationError::RelativeBase(base.to_text()));
    }
    trace!(base = %base, reference = %reference, "resolving reference");

    // Step 1: absolute reference
    if !reference.scheme.is_empty() {
        let mut target = reference.clone();
        target.path = remove_dot_segments(&reference.path);
        return Ok(target);
    }

    // Step 2: network-path reference
    if reference.uses_netloc {
        let mut target = reference.clone();
        target.scheme = base.scheme.clone();
        target.default_port = base.default_port;
        target.path = remove_dot_segments(&reference.path);
        return Ok(target);
    }

    let mut target = base.clone();
    target.fragment = reference.fragment.clone();

    if reference.path.is_empty() && !reference.rooted {
        // Step 3: same-document or query-only reference
        target.path = remove_dot_segments(&base.path);
        if reference.query.is_some() {
            target.query = reference.query.clone();
        }
    } else if reference.rooted {
        // Step 4: absolute-path reference
        target.path = remove_dot_segments(&reference.path);
        target.rooted = true;
        target.query = reference.query.clone();
    } else {
        // Step 5: relative-path reference
        target.path = remove_dot_segments(&merge(base, reference));
        target.rooted = base.rooted || base.uses_netloc;
        target.query = reference.query.clone();
    }

    Ok(target)
}

/// RFC 3986 §5.2.3: the base path without its last segment, followed by
/// the reference path.
fn merge(base: &EncodedUrl, reference: &EncodedUrl) -> Vec<String> {
    let keep = base.path.len().saturating_sub(1);
    base.path[..keep]
        .iter()
        .chain(reference.path.iter())
        .cloned()
        .collect()
}

/// RFC 3986 §5.2.4 over path segments.
///
/// `.` is dropped and `..` removes the previous output segment; a `..` with
/// nothing left to remove is dropped. If the input ends in a dot-segment the
/// output keeps a trailing slash.
///
/// # Examples
///
/// ```
/// use hyperurl::remove_dot_segments;
///
/// assert_eq!(remove_dot_segments(&["a", "b", "..", "c"]), ["a", "c"]);
/// assert_eq!(remove_dot_segments(&["a", "b", "."]), ["a", "b", ""]);
/// assert_eq!(remove_dot_segments(&["..", "..", "g"]), ["g"]);
/// ```
pub fn remove_dot_segments<S: AsRef<str>>(segments: &[S]) -> Vec<String> {
    let mut output: Vec<&str> = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment.as_ref() {
            "." => {}
            ".." => {
                output.pop();
            }
            other => output.push(other),
        }
    }

    if matches!(segments.last().map(AsRef::as_ref), Some(".") | Some("..")) {
        output.push("");
    }

    output.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(base: &str, reference: &str) -> String {
        let base = EncodedUrl::parse(base).unwrap();
        let reference = EncodedUrl::parse(reference).unwrap();
        resolve(&base, &reference).unwrap().to_text()
    }

    #[test]
    fn test_remove_dot_segments() {
        let empty: [&str; 0] = [];
        assert_eq!(remove_dot_segments(&empty), Vec::<String>::new());
        assert_eq!(remove_dot_segments(&["a", ".", "b"]), ["a", "b"]);
        assert_eq!(remove_dot_segments(&[".."]), [""]);
        assert_eq!(remove_dot_segments(&["a", "", ".."]), ["a", ""]);
        assert_eq!(remove_dot_segments(&["mid", "content=5", "..", "6"]), ["mid", "6"]);
    }

    #[test]
    fn test_relative_base_rejected() {
        let base = EncodedUrl::parse("/just/a/path").unwrap();
        let reference = EncodedUrl::parse("x").unwrap();
        assert_eq!(
            resolve(&base, &reference).unwrap_err(),
            ValidationError::RelativeBase("/just/a/path".to_string())
        );
    }

    #[test]
    fn test_merge_onto_authority_with_empty_path() {
        assert_eq!(click("http://example.com", "a/b"), "http://example.com/a/b");
    }

    #[test]
    fn test_merge_onto_rootless_base() {
        assert_eq!(click("urn:a:b", "c"), "urn:c");
    }

    #[test]
    fn test_query_only_reference_keeps_path() {
        assert_eq!(click("http://h/a/./b?x=1#f", "?y=2"), "http://h/a/b?y=2");
        assert_eq!(click("http://h/a?x=1#f", "#g"), "http://h/a?x=1#g");
    }

    #[test]
    fn test_network_path_reference() {
        assert_eq!(click("https://a/b", "//other/./x?q"), "https://other/x?q");
    }
}
