//! # Inkpost
//!
//! A static blog generator for a directory of Markdown articles. The
//! filesystem is the data source: directories become categories, Markdown
//! files become articles, and images next to them (or in the shared asset
//! directory) are fingerprinted and linked from the rewritten content.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Load      site/     →  manifest.json   (documents + assets → articles, tree)
//! 2. Generate  manifest  →  dist/           (final HTML site)
//! ```
//!
//! The manifest is human-readable JSON, so the load result can be inspected
//! before anything is rendered.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | Stage 1: reads documents, rewrites images, builds the manifest |
//! | [`generate`] | Stage 2: renders the manifest to HTML with Maud |
//! | [`source`] | Document enumeration behind the [`source::DocumentSource`] trait |
//! | [`path`] | Path normalization over `/`-separated virtual paths |
//! | [`assets`] | Asset scan, fingerprinting and reference resolution |
//! | [`rewrite`] | Image reference rewriting in Markdown and inline HTML |
//! | [`excerpt`] | Plain-text previews |
//! | [`categories`] | Category tree construction |
//! | [`routes`] | The URL routing table |
//! | [`markdown`] | Markdown rendering with copy buttons on code blocks |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Shared types serialized into the manifest |
//! | [`output`] | CLI output formatting |
//!
//! # Articles From Paths
//!
//! Everything about an article comes from its path below the documents root:
//!
//! ```text
//! allDocuments/工作总结/foo.md      → category 工作总结, title foo, id 工作总结-foo
//! allDocuments/前端/vue/响应式.md   → category 前端/vue, title 响应式
//! allDocuments/欢迎.md              → category 未分类, title 欢迎
//! ```
//!
//! Date and author are site-wide placeholders from the config. There is no
//! front matter.

pub mod assets;
pub mod categories;
pub mod config;
pub mod excerpt;
pub mod generate;
pub mod load;
pub mod markdown;
pub mod output;
pub mod path;
pub mod rewrite;
pub mod routes;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
