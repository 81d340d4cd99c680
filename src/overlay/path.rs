//! Inner-path normalization rules
//!
//! Inner paths use the match-and-cancel rule for `..`: every `segment/../`
//! pair collapses, scanning from the left, and a `../` left with no
//! preceding segment to cancel is dropped entirely rather than rejected.
//! This is deliberately not standard path canonicalization; callers rely on
//! the lenient behavior.

/// Normalize the inner portion of a virtual path.
///
/// `"a/b/../c"` becomes `"a/c"`, `"../x"` becomes `"x"`, and one trailing
/// separator is stripped. An empty result addresses the archive root.
pub fn normalize_inner_path(raw: &str) -> String {
    let mut path = raw.to_string();

    // Collapse "segment/../" left to right
    while let Some(pos) = path.find("/../") {
        let seg_start = path[..pos].rfind('/').map_or(0, |p| p + 1);
        path.replace_range(seg_start..pos + 4, "");
    }

    // Leading ascents with nothing left to cancel are dropped
    while let Some(rest) = path.strip_prefix("../") {
        path = rest.to_string();
    }

    if path.ends_with('/') || path.ends_with('\\') {
        path.pop();
    }

    path
}

/// Normalize a raw entry name reported by an archive reader.
///
/// Backslash separators become forward slashes and the trailing separator of
/// a directory marker is stripped, so cached names compare exactly against
/// normalized inner paths.
pub fn normalize_entry_name(raw: &str) -> String {
    let mut name = raw.replace('\\', "/");
    if name.ends_with('/') {
        name.pop();
    }
    name
}
