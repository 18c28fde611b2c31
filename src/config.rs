//! Blog configuration.
//!
//! Loaded from an optional `config.toml` in the site root. User values are
//! merged key by key over the stock defaults, so a config file only needs the
//! keys it changes:
//!
//! ```toml
//! title = "星期wu~"
//! base = "/xqw-blog/"
//!
//! [articles]
//! excerpt_length = 80
//! ```
//!
//! ## Site Layout
//!
//! The directory names are configurable; the defaults describe this layout:
//!
//! ```text
//! site/
//! ├── config.toml
//! ├── about.md                # [pages] about
//! ├── contact.md              # [pages] contact
//! └── src/                    # source_dir
//!     ├── assets/             # assets_dir
//!     └── allDocuments/       # documents_dir
//! ```
//!
//! Run `inkpost gen-config` for the fully documented stock file. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Blog configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// Site title shown in the header and the `<title>` of the home page.
    pub title: String,
    /// URL prefix the site is served under. Starts and ends with `/`.
    pub base: String,
    /// Source directory under the site root.
    pub source_dir: String,
    /// Markdown documents directory under `source_dir`.
    pub documents_dir: String,
    /// Asset directory under `source_dir`.
    pub assets_dir: String,
    /// Reference prefixes and the canonical directory they stand for.
    pub aliases: BTreeMap<String, String>,
    pub articles: ArticlesConfig,
    pub pages: PagesConfig,
    pub viewer: ViewerConfig,
    pub colors: ColorConfig,
}

impl Default for BlogConfig {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert("@".to_string(), "/src".to_string());
        Self {
            title: "星期wu~".to_string(),
            base: "/".to_string(),
            source_dir: "src".to_string(),
            documents_dir: "allDocuments".to_string(),
            assets_dir: "assets".to_string(),
            aliases,
            articles: ArticlesConfig::default(),
            pages: PagesConfig::default(),
            viewer: ViewerConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl BlogConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base.starts_with('/') || !self.base.ends_with('/') {
            return Err(ConfigError::Validation(
                "base must start and end with '/'".into(),
            ));
        }
        for (key, value) in [
            ("source_dir", &self.source_dir),
            ("documents_dir", &self.documents_dir),
            ("assets_dir", &self.assets_dir),
        ] {
            if value.is_empty() || value.contains('/') || value.contains('\\') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a single directory name"
                )));
            }
        }
        for (alias, target) in &self.aliases {
            if alias.trim_end_matches('/').is_empty() {
                return Err(ConfigError::Validation("alias names must not be empty".into()));
            }
            if !target.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "alias '{alias}' must point to an absolute path"
                )));
            }
        }
        if self.articles.excerpt_length == 0 {
            return Err(ConfigError::Validation(
                "articles.excerpt_length must be greater than 0".into(),
            ));
        }
        if self.articles.uncategorized.is_empty() || self.articles.uncategorized.contains('/') {
            return Err(ConfigError::Validation(
                "articles.uncategorized must be a non-empty name without '/'".into(),
            ));
        }
        Ok(())
    }

    /// Canonical documents root, e.g. `/src/allDocuments`.
    pub fn documents_root(&self) -> String {
        format!("/{}/{}", self.source_dir, self.documents_dir)
    }

    /// Canonical asset root, e.g. `/src/assets`.
    pub fn assets_root(&self) -> String {
        format!("/{}/{}", self.source_dir, self.assets_dir)
    }

    pub fn documents_path(&self, site_root: &Path) -> PathBuf {
        site_root.join(&self.source_dir).join(&self.documents_dir)
    }

    pub fn assets_path(&self, site_root: &Path) -> PathBuf {
        site_root.join(&self.source_dir).join(&self.assets_dir)
    }
}

/// How articles are derived from documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArticlesConfig {
    /// Maximum excerpt length in characters (ellipsis not counted).
    pub excerpt_length: usize,
    /// Appended to truncated excerpts.
    pub ellipsis: String,
    /// Category of documents directly in the documents root.
    pub uncategorized: String,
    /// Date shown on every article.
    pub date: String,
    /// Author shown on every article.
    pub author: String,
}

impl Default for ArticlesConfig {
    fn default() -> Self {
        Self {
            excerpt_length: 100,
            ellipsis: "...".to_string(),
            uncategorized: "未分类".to_string(),
            date: "2025-11-17".to_string(),
            author: "博主".to_string(),
        }
    }
}

/// Markdown bodies of the standalone pages, relative to the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    pub about: String,
    pub contact: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            about: "about.md".to_string(),
            contact: "contact.md".to_string(),
        }
    }
}

/// Article viewer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Label of the button placed before every code block.
    pub copy_label: String,
    /// Label shown for two seconds after a successful copy.
    pub copied_label: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            copy_label: "复制代码".to_string(),
            copied_label: "✓ 复制成功".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text: article meta, excerpts, navigation.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
    /// Background of code blocks.
    pub code_background: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#252933".to_string(),
            text_muted: "#8a919f".to_string(),
            border: "#e4e6eb".to_string(),
            link: "#1e80ff".to_string(),
            link_hover: "#0958d9".to_string(),
            code_background: "#f8f8f8".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121212".to_string(),
            text: "#e3e3e3".to_string(),
            text_muted: "#8a919f".to_string(),
            border: "#2f3033".to_string(),
            link: "#4c9bff".to_string(),
            link_hover: "#8bbcff".to_string(),
            code_background: "#1e1e1e".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(BlogConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from the site root as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(site_root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = site_root.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<BlogConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BlogConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the site root, falling back to the
/// stock defaults when the file is absent.
pub fn load_config(site_root: &Path) -> Result<BlogConfig, ConfigError> {
    resolve_config(load_raw_config(site_root)?)
}

/// Returns a fully-commented stock `config.toml`. Used by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# inkpost configuration
# =====================
# All settings are optional. Values shown are the defaults.
# Unknown keys cause an error.

# Site title, shown in the header.
title = "星期wu~"

# URL prefix the site is served under (e.g. "/my-repo/" for GitHub Pages).
# Must start and end with '/'.
base = "/"

# Layout below the site root: <source_dir>/<documents_dir> holds the Markdown
# articles, <source_dir>/<assets_dir> holds shared images.
source_dir = "src"
documents_dir = "allDocuments"
assets_dir = "assets"

# ---------------------------------------------------------------------------
# Reference aliases
# ---------------------------------------------------------------------------
# An image reference starting with an alias is resolved against its target:
# "@/assets/logo.png" -> "/src/assets/logo.png".
[aliases]
"@" = "/src"

# ---------------------------------------------------------------------------
# Articles
# ---------------------------------------------------------------------------
[articles]
# Excerpt length in characters; the ellipsis is appended when cut.
excerpt_length = 100
ellipsis = "..."

# Category of documents placed directly in the documents directory.
uncategorized = "未分类"

# Shown on every article.
date = "2025-11-17"
author = "博主"

# ---------------------------------------------------------------------------
# Standalone pages (Markdown files relative to the site root)
# ---------------------------------------------------------------------------
[pages]
about = "about.md"
contact = "contact.md"

# ---------------------------------------------------------------------------
# Article viewer
# ---------------------------------------------------------------------------
[viewer]
copy_label = "复制代码"
copied_label = "✓ 复制成功"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#252933"
text_muted = "#8a919f"
border = "#e4e6eb"
link = "#1e80ff"
link_hover = "#0958d9"
code_background = "#f8f8f8"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121212"
text = "#e3e3e3"
text_muted = "#8a919f"
border = "#2f3033"
link = "#4c9bff"
link_hover = "#8bbcff"
code_background = "#1e1e1e"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    fn vars(scheme: &ColorScheme, indent: &str) -> String {
        [
            ("bg", &scheme.background),
            ("text", &scheme.text),
            ("text-muted", &scheme.text_muted),
            ("border", &scheme.border),
            ("link", &scheme.link),
            ("link-hover", &scheme.link_hover),
            ("code-bg", &scheme.code_background),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}--color-{name}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
    }

    format!(
        ":root {{\n{}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}\n    }}\n}}",
        vars(&colors.light, "    "),
        vars(&colors.dark, "        "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_layout() {
        let config = BlogConfig::default();
        assert_eq!(config.documents_root(), "/src/allDocuments");
        assert_eq!(config.assets_root(), "/src/assets");
        assert_eq!(config.aliases.get("@").map(String::as_str), Some("/src"));
        assert_eq!(config.base, "/");
    }

    #[test]
    fn default_article_placeholders() {
        let config = BlogConfig::default();
        assert_eq!(config.articles.excerpt_length, 100);
        assert_eq!(config.articles.uncategorized, "未分类");
        assert_eq!(config.articles.date, "2025-11-17");
        assert_eq!(config.articles.author, "博主");
    }

    #[test]
    fn defaults_validate() {
        BlogConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
base = "/xqw-blog/"

[articles]
excerpt_length = 40
"##;
        let config: BlogConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.base, "/xqw-blog/");
        assert_eq!(config.articles.excerpt_length, 40);
        // Defaults preserved
        assert_eq!(config.articles.ellipsis, "...");
        assert_eq!(config.documents_dir, "allDocuments");
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let parsed: BlogConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = BlogConfig::default();
        assert_eq!(parsed.title, defaults.title);
        assert_eq!(parsed.base, defaults.base);
        assert_eq!(parsed.aliases, defaults.aliases);
        assert_eq!(parsed.viewer.copy_label, defaults.viewer.copy_label);
        assert_eq!(parsed.colors.dark.background, defaults.colors.dark.background);
    }

    #[test]
    fn merge_overrides_nested_keys_only() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("[colors.light]\nbackground = \"#fafafa\"").unwrap();
        let config: BlogConfig = merge_toml(base, overlay).try_into().unwrap();
        assert_eq!(config.colors.light.background, "#fafafa");
        assert_eq!(config.colors.light.text, "#252933");
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.base, "/");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "title = \"Notes\"\nbase = \"/notes/\"\n\n[aliases]\n\"~\" = \"/src/assets\"\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Notes");
        assert_eq!(config.base, "/notes/");
        // Alias tables merge with the stock alias
        assert_eq!(config.aliases.len(), 2);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "title = [unclosed").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_keys_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[articles]\nexcerpt = 3\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn base_without_slashes_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "base = \"blog\"\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn zero_excerpt_length_rejected() {
        let mut config = BlogConfig::default();
        config.articles.excerpt_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn nested_directory_names_rejected() {
        let mut config = BlogConfig::default();
        config.documents_dir = "docs/all".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn relative_alias_target_rejected() {
        let mut config = BlogConfig::default();
        config.aliases.insert("~".to_string(), "src".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn color_css_has_both_schemes() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#1a1a1a".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0;"));
        assert!(css.contains("--color-bg: #1a1a1a;"));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
        assert!(css.contains("--color-code-bg:"));
    }
}
