//! Image reference rewriting.
//!
//! Articles embed images two ways, and both are rewritten in place:
//!
//! ```text
//! <img src="../../assets/flow.png" width="300" />   HTML
//! ![diagram](./img.png "caption")                    Markdown
//! ```
//!
//! Only the path portion changes; attributes, alt text and titles are kept
//! byte for byte. References the [`AssetMap`] cannot resolve stay untouched
//! and are reported back so the loader can warn about them. External URLs are
//! skipped without being reported.

use crate::assets::{AssetMap, is_external};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static HTML_IMG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b(?:[^>]*?\s)?src\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});

static MD_IMG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[[^\]]*\]\(\s*(?:<([^>\n]*)>|([^)\s]+))").expect("valid regex")
});

/// Result of rewriting one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewrite {
    pub content: String,
    /// References that did not resolve, in document order.
    pub missing: Vec<String>,
}

/// Replace every resolvable image path in `text`.
///
/// `doc_dir` is the canonical directory of the document (`/src/allDocuments/notes/`),
/// against which relative references are resolved.
pub fn rewrite_images(text: &str, doc_dir: &str, assets: &AssetMap) -> Rewrite {
    let mut spans: Vec<Range<usize>> = image_paths(&HTML_IMG_RE, text)
        .chain(image_paths(&MD_IMG_RE, text))
        .collect();
    spans.sort_by_key(|r| r.start);

    let mut content = String::with_capacity(text.len());
    let mut missing = Vec::new();
    let mut cursor = 0;

    for span in spans {
        // An <img> written inside Markdown alt text can overlap a match.
        if span.start < cursor {
            continue;
        }
        let raw = &text[span.clone()];
        if is_external(raw) {
            continue;
        }
        match assets.resolve(raw, doc_dir) {
            Some(url) => {
                content.push_str(&text[cursor..span.start]);
                content.push_str(url);
                cursor = span.end;
            }
            None => missing.push(raw.to_string()),
        }
    }
    content.push_str(&text[cursor..]);

    Rewrite { content, missing }
}

/// Byte ranges of the path capture in every match of `re`.
fn image_paths<'t>(re: &'t Regex, text: &'t str) -> impl Iterator<Item = Range<usize>> + 't {
    re.captures_iter(text).filter_map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.range())
            .filter(|r| !r.is_empty())
    })
}
