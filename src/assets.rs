//! Asset index and image reference resolution.
//!
//! The [`AssetMap`] is built once per build by walking the asset directory and
//! the documents directory. Every non-Markdown file becomes an entry keyed by
//! its canonical site-relative path:
//!
//! ```text
//! site/src/assets/logo.png             → /src/assets/logo.png
//! site/src/allDocuments/notes/img.png  → /src/allDocuments/notes/img.png
//! ```
//!
//! Each entry records where the generate stage will copy the file and the URL
//! it will be served from. Output names are fingerprinted with the first eight
//! hex digits of the content's SHA-256 so that a changed image gets a new URL:
//!
//! ```text
//! /src/assets/logo.png → assets/logo-3f2a9c1b.png → /xqw-blog/assets/logo-3f2a9c1b.png
//! ```
//!
//! ## Resolution
//!
//! [`AssetMap::resolve`] translates a raw reference found in a document
//! through exactly one of three forms:
//!
//! | Reference | Form | Canonical path |
//! |-----------|------|----------------|
//! | `@/assets/logo.png` | alias (`@` → `/src`) | `/src/assets/logo.png` |
//! | `assets/logo.png` | asset-directory-relative | `/src/assets/logo.png` |
//! | `./img.png`, `../x/y.png`, `/src/...` | filesystem-relative | against the document directory |
//!
//! The canonical path is looked up exactly first. On a miss, the reference
//! with its leading `./`, `../` and `/` segments dropped is matched against the
//! end of every key, so `../logo.png` and `logo.png` still find
//! `/src/assets/logo.png`. A reference with no match resolves to `None`; the
//! caller keeps the original text.

use crate::config::BlogConfig;
use crate::path::{normalize_path, parent_dir};
use crate::routes::encode_path;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A servable file discovered by the asset scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Final URL, including the site base.
    pub url: String,
    /// Path inside the output directory (`assets/logo-3f2a9c1b.png`).
    /// Empty for entries that are not copied.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,
}

/// Read-only table from canonical source path to [`Asset`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetMap {
    /// Canonical asset root, e.g. `/src/assets`.
    assets_root: String,
    /// Alias prefix → canonical target, e.g. `@` → `/src`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    aliases: BTreeMap<String, String>,
    entries: BTreeMap<String, Asset>,
}

impl AssetMap {
    pub fn new(assets_root: &str, aliases: BTreeMap<String, String>) -> Self {
        Self {
            assets_root: normalize_path("/", assets_root),
            aliases,
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: &str, asset: Asset) {
        self.entries.insert(normalize_path("/", key), asset);
    }

    pub fn get(&self, key: &str) -> Option<&Asset> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Asset)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolve a raw reference written in a document living in `doc_dir`.
    ///
    /// Returns the asset URL, or `None` when the reference is external or
    /// nothing in the map matches.
    pub fn resolve(&self, raw: &str, doc_dir: &str) -> Option<&str> {
        let reference = lookup_form(raw)?;
        let (canonical, rest) = self.translate(&reference, doc_dir);

        if let Some(asset) = self.entries.get(&canonical) {
            return Some(&asset.url);
        }

        let tail = suffix_form(rest);
        if tail.is_empty() {
            return None;
        }
        let needle = format!("/{tail}");
        self.entries
            .iter()
            .find(|(key, _)| key.ends_with(&needle))
            .map(|(key, asset)| {
                debug!(reference = raw, key = key.as_str(), "asset matched by suffix");
                asset.url.as_str()
            })
    }

    /// Map a reference to its canonical path. Also returns the part of the
    /// reference left after any alias prefix, used for suffix matching.
    fn translate<'r>(&self, reference: &'r str, doc_dir: &str) -> (String, &'r str) {
        let alias = self
            .aliases
            .iter()
            .filter_map(|(alias, target)| strip_alias(reference, alias).map(|rest| (target, rest)))
            .max_by_key(|(_, rest)| std::cmp::Reverse(rest.len()));
        if let Some((target, rest)) = alias {
            return (normalize_path(target, rest), rest);
        }

        let asset_dir = self.assets_root.rsplit('/').next().unwrap_or_default();
        if !asset_dir.is_empty()
            && reference
                .strip_prefix(asset_dir)
                .is_some_and(|rest| rest.starts_with('/'))
        {
            return (
                normalize_path(parent_dir(&self.assets_root), reference),
                reference,
            );
        }

        (normalize_path(doc_dir, reference), reference)
    }
}

/// Strip query/fragment and percent-encoding. `None` for references that
/// point outside the site.
fn lookup_form(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || is_external(trimmed) {
        return None;
    }

    let path = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string());
    Some(decoded)
}

/// Whether a reference points outside the site (another host, inline data,
/// or a fragment of the current page).
pub fn is_external(reference: &str) -> bool {
    let reference = reference.trim();
    reference.contains("://")
        || reference.starts_with("//")
        || reference.starts_with('#')
        || reference.starts_with("data:")
        || reference.starts_with("blob:")
        || reference.starts_with("mailto:")
}

/// `@/assets/x.png` with alias `@` → `Some("assets/x.png")`.
fn strip_alias<'r>(reference: &'r str, alias: &str) -> Option<&'r str> {
    let alias = alias.trim_end_matches('/');
    if alias.is_empty() {
        return None;
    }
    let rest = reference.strip_prefix(alias)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest.trim_start_matches('/'))
    } else {
        None
    }
}

/// Reference with leading `.`, `..` and empty segments dropped.
fn suffix_form(reference: &str) -> String {
    reference
        .split('/')
        .skip_while(|s| matches!(*s, "" | "." | ".."))
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// First eight hex digits of the SHA-256 of `bytes`.
pub fn fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let hex = format!("{:x}", digest);
    hex[..8].to_string()
}

/// `logo.png` + `3f2a9c1b` → `logo-3f2a9c1b.png`.
pub fn fingerprinted_name(file_name: &str, hash: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{hash}.{ext}"),
        _ => format!("{file_name}-{hash}"),
    }
}

/// Build the asset map for a site.
///
/// Walks `<source_dir>/<assets_dir>` and `<source_dir>/<documents_dir>` under
/// `site_root`, skipping hidden entries and Markdown files. Missing
/// directories contribute nothing.
pub fn scan_assets(site_root: &Path, config: &BlogConfig) -> Result<AssetMap, AssetError> {
    let mut map = AssetMap::new(&config.assets_root(), config.aliases.clone());

    for dir in [config.assets_path(site_root), config.documents_path(site_root)] {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "asset directory missing, skipped");
            continue;
        }
        let walker = WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || is_markdown(entry.path()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(site_root) else {
                continue;
            };
            let key = canonical_key(relative);
            if map.entries.contains_key(&key) {
                continue;
            }

            let bytes = fs::read(entry.path())?;
            let file_name = entry.file_name().to_string_lossy();
            let output = format!("assets/{}", fingerprinted_name(&file_name, &fingerprint(&bytes)));
            let url = format!("{}{}", config.base, encode_path(&output));
            debug!(key = key.as_str(), url = url.as_str(), "asset indexed");
            map.insert(&key, Asset { url, output });
        }
    }

    info!(assets = map.len(), "asset scan complete");
    Ok(map)
}

/// Site-relative filesystem path → `/a/b/c.png`.
fn canonical_key(relative: &Path) -> String {
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("/{}", segments.join("/"))
}

pub(crate) fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}
