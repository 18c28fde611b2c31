//! Article loading and manifest generation.
//!
//! Stage 1 of the build. Reads the site configuration, indexes assets, turns
//! every Markdown document into an [`Article`] and folds the articles into the
//! category tree. The result is a [`Manifest`] the generate stage consumes.
//!
//! ## Identity From Paths
//!
//! Nothing is read from front matter; a document's place in the tree is its
//! identity:
//!
//! ```text
//! allDocuments/welcome.md          → category "未分类",   title "welcome"
//! allDocuments/工作总结/foo.md     → category "工作总结", title "foo"
//! allDocuments/前端/vue/响应式.md  → category "前端/vue", title "响应式"
//! ```
//!
//! The id is `category-title`. Two documents with the same category and title
//! share an id; this is reported as a warning and both articles are kept.

use crate::assets::{self, AssetMap, is_markdown};
use crate::categories::build_categories;
use crate::config::{self, BlogConfig};
use crate::excerpt::make_excerpt;
use crate::path::dir_path;
use crate::rewrite::rewrite_images;
use crate::source::{DocumentSource, FsSource, SourceError};
use crate::types::{Article, CategoryNode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Asset error: {0}")]
    Asset(#[from] assets::AssetError),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Manifest output from the load stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub articles: Vec<Article>,
    pub categories: Vec<CategoryNode>,
    #[serde(default)]
    pub pages: StandalonePages,
    pub assets: AssetMap,
    pub config: BlogConfig,
}

/// Markdown bodies of the about and contact pages, when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandalonePages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Run the load stage over the site at `site_root`.
pub fn load(site_root: &Path) -> Result<Manifest, LoadError> {
    let config = config::load_config(site_root)?;
    let assets = assets::scan_assets(site_root, &config)?;
    let source = FsSource::new(config.documents_path(site_root));

    let articles = load_articles(&source, &assets, &config)?;
    let categories = build_categories(&articles, &config);
    let pages = StandalonePages {
        about: read_page(site_root, &config.pages.about, &assets)?,
        contact: read_page(site_root, &config.pages.contact, &assets)?,
    };

    info!(
        articles = articles.len(),
        categories = categories.len(),
        assets = assets.len(),
        "load complete"
    );

    Ok(Manifest {
        articles,
        categories,
        pages,
        assets,
        config,
    })
}

/// Turn every Markdown document of `source` into an [`Article`].
///
/// Non-Markdown entries and empty documents are skipped. Articles come back
/// in the source's enumeration order.
pub fn load_articles(
    source: &dyn DocumentSource,
    assets: &AssetMap,
    config: &BlogConfig,
) -> Result<Vec<Article>, LoadError> {
    let documents_root = config.documents_root();
    let mut articles = Vec::new();
    let mut seen_ids = HashSet::new();

    for document in source.documents()? {
        if !is_markdown(Path::new(&document.path)) {
            continue;
        }
        if document.content.is_empty() {
            debug!(path = document.path.as_str(), "empty document skipped");
            continue;
        }

        let identity = ArticleIdentity::from_path(&document.path, &config.articles.uncategorized);
        if identity.directories.first() == Some(&config.articles.uncategorized.as_str()) {
            warn!(
                path = document.path.as_str(),
                "directory shares the uncategorized name, filed as uncategorized"
            );
        }
        let doc_dir = dir_path(&documents_root, identity.directories.iter().copied());

        let rewritten = rewrite_images(&document.content, &doc_dir, assets);
        for reference in &rewritten.missing {
            warn!(
                document = document.path.as_str(),
                reference = reference.as_str(),
                "image reference not found, left unchanged"
            );
        }

        let excerpt = make_excerpt(
            &rewritten.content,
            config.articles.excerpt_length,
            &config.articles.ellipsis,
        );
        let id = format!("{}-{}", identity.category, identity.title);
        if !seen_ids.insert(id.clone()) {
            warn!(id = id.as_str(), path = document.path.as_str(), "duplicate article id");
        }
        debug!(id = id.as_str(), "article loaded");

        articles.push(Article {
            id,
            title: identity.title.to_string(),
            date: config.articles.date.clone(),
            author: config.articles.author.clone(),
            category: identity.category,
            excerpt,
            content: rewritten.content,
        });
    }

    Ok(articles)
}

/// Category and title derived from a document path.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleIdentity<'p> {
    pub category: String,
    pub title: &'p str,
    /// Directory segments between the documents root and the file.
    pub directories: Vec<&'p str>,
}

impl<'p> ArticleIdentity<'p> {
    /// `工作总结/foo.md` → category `工作总结`, title `foo`.
    /// A path with a single segment gets the `uncategorized` category.
    pub fn from_path(path: &'p str, uncategorized: &str) -> Self {
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let file_name = segments.pop().unwrap_or_default();
        let category = if segments.is_empty() {
            uncategorized.to_string()
        } else {
            segments.join("/")
        };
        Self {
            category,
            title: strip_markdown_extension(file_name),
            directories: segments,
        }
    }
}

fn strip_markdown_extension(file_name: &str) -> &str {
    let cut = file_name.len().saturating_sub(3);
    match file_name.get(cut..) {
        Some(ext) if ext.eq_ignore_ascii_case(".md") => &file_name[..cut],
        _ => file_name,
    }
}

/// Read a standalone page body, resolving its images relative to the site
/// root. A missing file is not an error.
fn read_page(
    site_root: &Path,
    relative: &str,
    assets: &AssetMap,
) -> Result<Option<String>, LoadError> {
    if relative.is_empty() {
        return Ok(None);
    }
    let path = site_root.join(relative);
    if !path.is_file() {
        debug!(page = relative, "standalone page not present");
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let rewritten = rewrite_images(&content, "/", assets);
    for reference in &rewritten.missing {
        warn!(
            document = relative,
            reference = reference.as_str(),
            "image reference not found, left unchanged"
        );
    }
    Ok(Some(rewritten.content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Asset;
    use crate::source::MemorySource;
    use crate::test_helpers::*;

    fn load_table(table: &[(&str, &str)]) -> Vec<Article> {
        let config = BlogConfig::default();
        let assets = AssetMap::new(&config.assets_root(), config.aliases.clone());
        load_articles(&MemorySource::from_table(table), &assets, &config).unwrap()
    }

    // =========================================================================
    // Identity
    // =========================================================================

    #[test]
    fn single_segment_is_uncategorized() {
        let id = ArticleIdentity::from_path("welcome.md", "未分类");
        assert_eq!(id.category, "未分类");
        assert_eq!(id.title, "welcome");
        assert!(id.directories.is_empty());
    }

    #[test]
    fn one_directory_is_the_category() {
        let articles = load_table(&[("工作总结/foo.md", "content")]);
        assert_eq!(articles[0].category, "工作总结");
        assert_eq!(articles[0].title, "foo");
        assert_eq!(articles[0].id, "工作总结-foo");
    }

    #[test]
    fn nested_directories_join_into_category() {
        let id = ArticleIdentity::from_path("前端/vue/响应式.md", "未分类");
        assert_eq!(id.category, "前端/vue");
        assert_eq!(id.title, "响应式");
        assert_eq!(id.directories, vec!["前端", "vue"]);
    }

    #[test]
    fn only_the_final_extension_is_stripped() {
        let id = ArticleIdentity::from_path("notes/v1.2.md", "未分类");
        assert_eq!(id.title, "v1.2");
        let id = ArticleIdentity::from_path("notes/README.MD", "未分类");
        assert_eq!(id.title, "README");
        let id = ArticleIdentity::from_path("notes/页面配置？低代码？.md", "未分类");
        assert_eq!(id.title, "页面配置？低代码？");
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn placeholders_filled_from_config() {
        let articles = load_table(&[("a.md", "x")]);
        assert_eq!(articles[0].date, "2025-11-17");
        assert_eq!(articles[0].author, "博主");
    }

    #[test]
    fn non_markdown_and_empty_documents_skipped() {
        let articles = load_table(&[
            ("a.md", "x"),
            ("notes.txt", "not markdown"),
            ("b/empty.md", ""),
            ("b/c.md", "y"),
        ]);
        let ids: Vec<&str> = articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["未分类-a", "b-c"]);
    }

    #[test]
    fn enumeration_order_preserved() {
        let articles = load_table(&[("z.md", "1"), ("a/b.md", "2"), ("m.md", "3")]);
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["z", "b", "m"]);
    }

    #[test]
    fn duplicate_ids_are_kept() {
        let articles = load_table(&[("a/x.md", "first"), ("a/x.md", "second")]);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, articles[1].id);
    }

    #[test]
    fn excerpt_bounded_and_stripped() {
        let body = format!("# Heading\n\n{}", "字".repeat(300));
        let articles = load_table(&[("long.md", &body)]);
        let excerpt = &articles[0].excerpt;
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), 103);
        assert!(!excerpt.contains('#'));
    }

    #[test]
    fn images_resolved_against_document_directory() {
        let config = BlogConfig::default();
        let mut assets = AssetMap::new(&config.assets_root(), config.aliases.clone());
        assets.insert(
            "/src/allDocuments/notes/img.png",
            Asset {
                url: "/assets/img-1234.png".to_string(),
                output: String::new(),
            },
        );
        let source = MemorySource::from_table(&[
            ("notes/post.md", "![pic](./img.png)"),
            ("other.md", "![pic](./img.png) ![gone](./gone.png)"),
        ]);

        let articles = load_articles(&source, &assets, &config).unwrap();
        assert_eq!(articles[0].content, "![pic](/assets/img-1234.png)");
        // From the root, ./img.png canonicalises elsewhere but the suffix still matches.
        assert_eq!(
            articles[1].content,
            "![pic](/assets/img-1234.png) ![gone](./gone.png)"
        );
    }

    #[test]
    fn excerpt_built_from_rewritten_content() {
        let config = BlogConfig::default();
        let mut assets = AssetMap::new(&config.assets_root(), config.aliases.clone());
        assets.insert(
            "/src/assets/a.png",
            Asset {
                url: "/assets/a-0000.png".to_string(),
                output: String::new(),
            },
        );
        let source = MemorySource::from_table(&[("p.md", "<img src=\"@/assets/a.png\" /> text")]);
        let articles = load_articles(&source, &assets, &config).unwrap();
        assert_eq!(articles[0].excerpt, " text");
    }

    // =========================================================================
    // Full stage over fixtures
    // =========================================================================

    #[test]
    fn load_fixture_site() {
        let tmp = setup_fixtures();
        let manifest = load(tmp.path()).unwrap();

        assert_eq!(manifest.config.base, "/xqw-blog/");
        assert_eq!(manifest.articles.len(), 5);

        let foo = find_article(&manifest, "工作总结-foo");
        assert_eq!(foo.category, "工作总结");
        assert_eq!(foo.title, "foo");
    }

    #[test]
    fn fixture_images_rewritten_to_fingerprinted_urls() {
        let tmp = setup_fixtures();
        let manifest = load(tmp.path()).unwrap();

        let reactivity = find_article(&manifest, "前端/vue-响应式");
        assert!(reactivity.content.contains("](/xqw-blog/assets/img-"));
        // Unresolvable reference kept verbatim
        assert!(reactivity.content.contains("![missing](./missing.png)"));

        let foo = find_article(&manifest, "工作总结-foo");
        assert!(foo.content.contains("<img src=\"/xqw-blog/assets/flow-"));
        assert!(foo.content.contains("width=\"300\""));
    }

    #[test]
    fn fixture_standalone_pages_loaded() {
        let tmp = setup_fixtures();
        let manifest = load(tmp.path()).unwrap();
        assert!(manifest.pages.about.as_deref().unwrap().contains("# 关于"));
        assert!(manifest.pages.contact.is_none());
    }

    #[test]
    fn fixture_category_tree() {
        let tmp = setup_fixtures();
        let manifest = load(tmp.path()).unwrap();
        assert_tree_shape(
            &manifest.categories,
            &[("前端", &["react", "vue"]), ("工作总结", &[]), ("未分类", &[])],
        );
    }

    #[test]
    fn missing_documents_directory_is_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = load(tmp.path());
        assert!(matches!(
            result,
            Err(LoadError::Source(SourceError::MissingRoot(_)))
        ));
    }

    #[test]
    fn manifest_survives_json() {
        let tmp = setup_fixtures();
        let manifest = load(tmp.path()).unwrap();
        let json = serde_json::to_string(&manifest).unwrap();
        let back: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.articles, manifest.articles);
        assert_eq!(back.categories, manifest.categories);
        assert_eq!(back.assets.len(), manifest.assets.len());
    }
}
