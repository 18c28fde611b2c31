//! The site's routing table.
//!
//! Five routes exist. Each maps to a URL under the configured base and to the
//! `index.html` file that serves it, so the static output works on any plain
//! file server:
//!
//! | Route | URL | Output file |
//! |-------|-----|-------------|
//! | `home` | `{base}` | `index.html` |
//! | `post-detail` | `{base}post/{id}/` | `post/{id}/index.html` |
//! | `about` | `{base}about/` | `about/index.html` |
//! | `contact` | `{base}contact/` | `contact/index.html` |
//! | `category` | `{base}category/{path}/` | `category/{path}/index.html` |
//!
//! URLs are percent-encoded per segment; ids and category paths keep their
//! `/` separators. [`Route::from_url`] is the inverse of [`Route::href`].

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use std::path::PathBuf;

/// Characters escaped inside a path segment. Non-ASCII is always escaped.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Post { id: String },
    About,
    Contact,
    Category { path: String },
}

impl Route {
    pub fn post(id: &str) -> Self {
        Route::Post { id: id.to_string() }
    }

    pub fn category(path: &str) -> Self {
        Route::Category {
            path: path.to_string(),
        }
    }

    /// Route name, as used in navigation state.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Post { .. } => "post-detail",
            Route::About => "about",
            Route::Contact => "contact",
            Route::Category { .. } => "category",
        }
    }

    /// Path below the base, without leading slash (`post/工作总结-foo/`).
    fn relative(&self) -> String {
        match self {
            Route::Home => String::new(),
            Route::Post { id } => format!("post/{id}/"),
            Route::About => "about/".to_string(),
            Route::Contact => "contact/".to_string(),
            Route::Category { path } => format!("category/{path}/"),
        }
    }

    /// Encoded URL of this route under `base` (which ends with `/`).
    pub fn href(&self, base: &str) -> String {
        format!("{base}{}", encode_path(&self.relative()))
    }

    /// File that serves this route, relative to the output directory.
    pub fn output_file(&self) -> PathBuf {
        let mut file = PathBuf::new();
        for segment in self.relative().split('/').filter(|s| !s.is_empty()) {
            file.push(segment);
        }
        file.push("index.html");
        file
    }

    /// Match a browser URL path against the table. The query string and
    /// fragment are ignored; a missing trailing slash is tolerated.
    pub fn from_url(url: &str, base: &str) -> Option<Route> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let decoded = percent_decode_str(path).decode_utf8().ok()?;
        let rest = decoded
            .strip_prefix(base)
            .or_else(|| (&*decoded == base.trim_end_matches('/')).then_some(""))?;
        let rest = rest.trim_end_matches('/');

        if rest.is_empty() {
            return Some(Route::Home);
        }
        match rest {
            "about" => return Some(Route::About),
            "contact" => return Some(Route::Contact),
            _ => {}
        }
        if let Some(id) = rest.strip_prefix("post/").filter(|s| !s.is_empty()) {
            return Some(Route::post(id));
        }
        if let Some(path) = rest.strip_prefix("category/").filter(|s| !s.is_empty()) {
            return Some(Route::category(path));
        }
        None
    }
}

/// Percent-encode every segment of a `/`-separated path.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
