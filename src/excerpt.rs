//! Plain-text article previews.

use regex::Regex;
use std::sync::LazyLock;

static IMG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<img\s+.*?/?>").expect("valid regex"));

static MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#*`_\[\]()]+").expect("valid regex"));

/// Strip `<img>` tags and Markdown punctuation from `text`, then cut it to
/// `max_chars` characters.
///
/// `ellipsis` is appended only when something was cut. The cut is a raw
/// character count: words may be split.
pub fn make_excerpt(text: &str, max_chars: usize, ellipsis: &str) -> String {
    let without_images = IMG_TAG_RE.replace_all(text, "");
    let plain = MARKUP_RE.replace_all(&without_images, "");
    truncate_chars(&plain, max_chars, ellipsis)
}

fn truncate_chars(text: &str, max_chars: usize, ellipsis: &str) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{}", &text[..cut], ellipsis),
    }
}
