//! CLI output formatting for the pipeline stages.
//!
//! Output is information-centric: every entity leads with its positional
//! index and title, with secondary context on indented lines below it.
//!
//! ## Load
//!
//! ```text
//! Categories
//! 001 前端 (2 articles)
//!     001 react (1 article)
//!         001 hooks
//!             Excerpt: useEffect 的依赖数组...
//!     002 vue (1 article)
//!         001 响应式
//!
//! Pages
//!     about: about.md
//!     contact: placeholder
//!
//! Assets
//!     4 files
//! ```
//!
//! ## Generate
//!
//! ```text
//! home → index.html
//! post-detail 前端/vue-响应式 → post/前端/vue-响应式/index.html
//! about 关于 → about/index.html
//!
//! Generated 5 posts, 2 pages, 6 categories, 4 assets
//! ```
//!
//! Each stage has a pure `format_*` function returning lines and a `print_*`
//! wrapper that writes them to stdout.

use crate::generate::GeneratedSite;
use crate::load::Manifest;
use crate::types::{CategoryChild, CategoryNode};

/// Longest excerpt shown in load output, in characters.
const EXCERPT_PREVIEW: usize = 40;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn counted(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Truncate to `max` characters, appending `...` if truncated.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ============================================================================
// Load output
// ============================================================================

/// Format the load manifest as a content inventory.
pub fn format_load_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];
    for (i, node) in manifest.categories.iter().enumerate() {
        format_category(node, i + 1, 0, manifest, &mut lines);
    }

    lines.push(String::new());
    lines.push("Pages".to_string());
    let config = &manifest.config;
    for (name, file, body) in [
        ("about", &config.pages.about, &manifest.pages.about),
        ("contact", &config.pages.contact, &manifest.pages.contact),
    ] {
        let status = if body.is_some() {
            file.as_str()
        } else {
            "placeholder"
        };
        lines.push(format!("{}{}: {}", indent(1), name, status));
    }

    lines.push(String::new());
    lines.push("Assets".to_string());
    lines.push(format!("{}{}", indent(1), counted(manifest.assets.len(), "file", "files")));
    lines
}

fn format_category(
    node: &CategoryNode,
    position: usize,
    depth: usize,
    manifest: &Manifest,
    lines: &mut Vec<String>,
) {
    lines.push(format!(
        "{}{} {} ({})",
        indent(depth),
        format_index(position),
        node.name,
        counted(node.article_count(), "article", "articles")
    ));
    for (i, child) in node.children.iter().enumerate() {
        match child {
            CategoryChild::Category(sub) => format_category(sub, i + 1, depth + 1, manifest, lines),
            CategoryChild::Article(leaf) => {
                lines.push(format!(
                    "{}{} {}",
                    indent(depth + 1),
                    format_index(i + 1),
                    leaf.title
                ));
                let excerpt = manifest
                    .articles
                    .iter()
                    .find(|a| a.id == leaf.id)
                    .map(|a| a.excerpt.trim())
                    .filter(|e| !e.is_empty());
                if let Some(excerpt) = excerpt {
                    lines.push(format!(
                        "{}Excerpt: {}",
                        indent(depth + 2),
                        truncate_chars(excerpt, EXCERPT_PREVIEW)
                    ));
                }
            }
        }
    }
}

pub fn print_load_output(manifest: &Manifest) {
    for line in format_load_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate output
// ============================================================================

/// Format the list of written pages and a summary line.
pub fn format_generate_output(site: &GeneratedSite) -> Vec<String> {
    let mut lines = Vec::new();
    let (mut posts, mut pages, mut categories) = (0, 0, 0);

    for page in &site.pages {
        let file = page.file.to_string_lossy().replace('\\', "/");
        match page.route {
            "home" => lines.push(format!("home → {file}")),
            route => {
                match route {
                    "post-detail" => posts += 1,
                    "category" => categories += 1,
                    _ => pages += 1,
                }
                lines.push(format!("{} {} → {}", route, page.title, file));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}, {}",
        counted(posts, "post", "posts"),
        counted(pages, "page", "pages"),
        counted(categories, "category", "categories"),
        counted(site.assets_copied, "asset", "assets")
    ));
    lines
}

pub fn print_generate_output(site: &GeneratedSite) {
    for line in format_generate_output(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
