//! Canonical path arithmetic for asset references.
//!
//! Paths here are URL-style strings (always `/`-separated), not
//! [`std::path::Path`]s: they name files relative to the site root
//! (`/src/assets/logo.png`) regardless of the host platform.

/// Resolve `relative` against `base_dir` into a canonical absolute path.
///
/// Both inputs are split into segments and replayed onto a stack: normal
/// segments are pushed, `..` pops, `.` and empty segments are dropped. A
/// `relative` that starts with `/` ignores `base_dir`.
///
/// - `("/src/docs/notes/", "./img.png")` → `/src/docs/notes/img.png`
/// - `("/src/docs/notes/", "../../assets/a.png")` → `/src/assets/a.png`
/// - `("/src/docs/", "/src//assets/./a.png")` → `/src/assets/a.png`
///
/// A `..` with nothing left to pop is ignored, so the result never climbs
/// above `/`.
pub fn normalize_path(base_dir: &str, relative: &str) -> String {
    let base = if relative.starts_with('/') {
        ""
    } else {
        base_dir
    };

    let mut stack: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(relative.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            s => stack.push(s),
        }
    }

    format!("/{}", stack.join("/"))
}

/// Join path segments under `root`, producing a directory path with a
/// trailing slash (`/src/allDocuments/notes/`).
pub fn dir_path<'a>(root: &str, segments: impl IntoIterator<Item = &'a str>) -> String {
    let mut dir = normalize_path("/", root);
    for segment in segments {
        if !dir.ends_with('/') {
            dir.push('/');
        }
        dir.push_str(segment);
    }
    if !dir.ends_with('/') {
        dir.push('/');
    }
    dir
}

/// Parent directory of a canonical path (`/src/assets` → `/src`).
pub fn parent_dir(path: &str) -> &str {
    match path.trim_end_matches('/').rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}
