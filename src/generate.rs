//! HTML site generation.
//!
//! Stage 2 of the build. Takes the load manifest and writes the static site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): every article as a card with its excerpt
//! - **Post detail** (`/post/{id}/index.html`): the rendered article
//! - **About** / **Contact** (`/about/index.html`, `/contact/index.html`):
//!   rendered from the configured Markdown files, or a short placeholder
//! - **Category** (`/category/{path}/index.html`): articles under a category,
//!   the targets of the navigation tree's links
//!
//! Every page carries the category tree as a sidebar. Assets are copied to
//! their fingerprinted names under `assets/`.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Article bodies are rendered by [`crate::markdown`] and inserted
//! pre-escaped; everything else is escaped by maud.

use crate::categories::node_path;
use crate::config::{self, BlogConfig};
use crate::load::Manifest;
use crate::markdown::{first_heading, render_markdown};
use crate::routes::Route;
use crate::types::{Article, CategoryChild, CategoryNode};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Asset {key} could not be copied: {source}")]
    Asset {
        key: String,
        source: std::io::Error,
    },
}

/// What the generate stage wrote.
#[derive(Debug, Default)]
pub struct GeneratedSite {
    pub pages: Vec<GeneratedPage>,
    pub assets_copied: usize,
}

#[derive(Debug)]
pub struct GeneratedPage {
    /// Route name (`home`, `post-detail`, ...).
    pub route: &'static str,
    pub title: String,
    /// Output file, relative to the output directory.
    pub file: PathBuf,
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/copy.js");

const HOME_LABEL: &str = "首页";
const ABOUT_LABEL: &str = "关于";
const CONTACT_LABEL: &str = "联系";

/// Read the manifest at `manifest_path` and generate the site.
pub fn generate(
    manifest_path: &Path,
    site_root: &Path,
    output_dir: &Path,
) -> Result<GeneratedSite, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    generate_site(&manifest, site_root, output_dir)
}

/// Write every page of `manifest` into `output_dir` and copy its assets from
/// `site_root`.
pub fn generate_site(
    manifest: &Manifest,
    site_root: &Path,
    output_dir: &Path,
) -> Result<GeneratedSite, GenerateError> {
    let config = &manifest.config;
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    );
    let chrome = Chrome {
        config,
        categories: &manifest.categories,
        css: &css,
    };

    fs::create_dir_all(output_dir)?;
    let mut site = GeneratedSite::default();

    let home = render_home(&manifest.articles, &chrome);
    write_page(output_dir, Route::Home, config.title.clone(), home, &mut site)?;

    for article in &manifest.articles {
        let page = render_post(article, &chrome);
        write_page(
            output_dir,
            Route::post(&article.id),
            article.title.clone(),
            page,
            &mut site,
        )?;
    }

    for (route, label, body) in [
        (Route::About, ABOUT_LABEL, &manifest.pages.about),
        (Route::Contact, CONTACT_LABEL, &manifest.pages.contact),
    ] {
        let title = body
            .as_deref()
            .and_then(first_heading)
            .unwrap_or_else(|| label.to_string());
        let page = render_standalone(&route, &title, body.as_deref(), &chrome);
        write_page(output_dir, route, title, page, &mut site)?;
    }

    for (path, node) in flatten_categories(&manifest.categories) {
        let articles: Vec<&Article> = manifest
            .articles
            .iter()
            .filter(|a| a.category == path || a.category.starts_with(&format!("{path}/")))
            .collect();
        let page = render_category(&path, node, &articles, &chrome);
        write_page(output_dir, Route::category(&path), path.clone(), page, &mut site)?;
    }

    site.assets_copied = copy_assets(manifest, site_root, output_dir)?;

    info!(
        pages = site.pages.len(),
        assets = site.assets_copied,
        output = %output_dir.display(),
        "site generated"
    );
    Ok(site)
}

fn write_page(
    output_dir: &Path,
    route: Route,
    title: String,
    markup: Markup,
    site: &mut GeneratedSite,
) -> Result<(), GenerateError> {
    let file = route.output_file();
    let target = output_dir.join(&file);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, markup.into_string())?;
    debug!(file = %file.display(), "page written");
    site.pages.push(GeneratedPage {
        route: route.name(),
        title,
        file,
    });
    Ok(())
}

fn copy_assets(
    manifest: &Manifest,
    site_root: &Path,
    output_dir: &Path,
) -> Result<usize, GenerateError> {
    let mut copied = 0;
    for (key, asset) in manifest.assets.iter() {
        if asset.output.is_empty() {
            continue;
        }
        let source = site_root.join(key.trim_start_matches('/'));
        let target = output_dir.join(&asset.output);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source, &target).map_err(|source| GenerateError::Asset {
            key: key.to_string(),
            source,
        })?;
        copied += 1;
    }
    Ok(copied)
}

/// Every category node paired with its full `/`-joined path, depth first.
pub fn flatten_categories(tree: &[CategoryNode]) -> Vec<(String, &CategoryNode)> {
    fn walk<'a>(
        node: &'a CategoryNode,
        prefix: Option<&str>,
        out: &mut Vec<(String, &'a CategoryNode)>,
    ) {
        let path = match prefix {
            Some(prefix) => format!("{prefix}/{}", node.name),
            None => node.name.clone(),
        };
        out.push((path.clone(), node));
        for sub in node.categories() {
            walk(sub, Some(&path), out);
        }
    }

    let mut out = Vec::new();
    for node in tree {
        walk(node, None, &mut out);
    }
    out
}

// ============================================================================
// HTML Components
// ============================================================================

/// Shared page furniture.
struct Chrome<'a> {
    config: &'a BlogConfig,
    categories: &'a [CategoryNode],
    css: &'a str,
}

/// Renders the base HTML document structure.
fn base_document(title: &str, chrome: &Chrome, current: &Route, content: Markup) -> Markup {
    let full_title = if title == chrome.config.title {
        title.to_string()
    } else {
        format!("{} - {}", title, chrome.config.title)
    };

    html! {
        (DOCTYPE)
        html lang="zh-CN" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (full_title) }
                style { (PreEscaped(chrome.css)) }
            }
            body data-route=(current.name()) {
                (site_header(chrome.config, current))
                div.layout {
                    aside.sidebar {
                        (render_category_tree(chrome.categories, current))
                    }
                    main.content {
                        (content)
                    }
                }
            }
        }
    }
}

/// Renders the site header with the four top-level routes.
fn site_header(config: &BlogConfig, current: &Route) -> Markup {
    let links = [
        (Route::Home, HOME_LABEL),
        (Route::About, ABOUT_LABEL),
        (Route::Contact, CONTACT_LABEL),
    ];
    html! {
        header.site-header {
            a.site-title href=(Route::Home.href(&config.base)) { (config.title) }
            nav.site-nav {
                @for (route, label) in &links {
                    a class=[(route == current).then_some("current")] href=(route.href(&config.base)) {
                        (label)
                    }
                }
            }
        }
    }
}

/// Renders the navigation tree.
pub fn render_category_tree(tree: &[CategoryNode], current: &Route) -> Markup {
    html! {
        nav.category-tree {
            ul {
                @for node in tree {
                    (render_category_node(node, current))
                }
            }
        }
    }
}

fn render_category_node(node: &CategoryNode, current: &Route) -> Markup {
    html! {
        li.category {
            details open {
                summary {
                    a href=(node.href) { (node.name) }
                    " "
                    span.count { "(" (node.article_count()) ")" }
                }
                ul {
                    @for child in &node.children {
                        @match child {
                            CategoryChild::Category(sub) => (render_category_node(sub, current)),
                            CategoryChild::Article(article) => {
                                @let is_current = matches!(current, Route::Post { id } if *id == article.id);
                                li class=(if is_current { "article current" } else { "article" }) {
                                    a href=(article.href) { (article.title) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn article_meta(article: &Article, config: &BlogConfig) -> Markup {
    let node = node_path(&article.category, &config.articles.uncategorized);
    let category_href = Route::category(node).href(&config.base);
    html! {
        p.article-meta {
            time { (article.date) }
            " · "
            span.author { (article.author) }
            " · "
            a.category-link href=(category_href) { (article.category) }
        }
    }
}

fn article_card(article: &Article, config: &BlogConfig) -> Markup {
    html! {
        article.article-card {
            h2 {
                a href=(Route::post(&article.id).href(&config.base)) { (article.title) }
            }
            (article_meta(article, config))
            p.excerpt { (article.excerpt) }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page with every article.
fn render_home(articles: &[Article], chrome: &Chrome) -> Markup {
    let content = html! {
        section.article-list {
            @if articles.is_empty() {
                p.empty { "还没有文章" }
            }
            @for article in articles {
                (article_card(article, chrome.config))
            }
        }
    };
    base_document(&chrome.config.title, chrome, &Route::Home, content)
}

/// Renders a single article.
fn render_post(article: &Article, chrome: &Chrome) -> Markup {
    let body = render_markdown(&article.content, &chrome.config.viewer);
    let route = Route::post(&article.id);
    let content = html! {
        article.post {
            header.post-header {
                h1 { (article.title) }
                (article_meta(article, chrome.config))
            }
            div.markdown-body {
                (PreEscaped(body))
            }
        }
        script { (PreEscaped(JS)) }
    };
    base_document(&article.title, chrome, &route, content)
}

/// Renders the about or contact page.
fn render_standalone(route: &Route, title: &str, body: Option<&str>, chrome: &Chrome) -> Markup {
    let content = html! {
        article.standalone {
            @match body {
                Some(markdown) => {
                    div.markdown-body {
                        (PreEscaped(render_markdown(markdown, &chrome.config.viewer)))
                    }
                    script { (PreEscaped(JS)) }
                }
                None => {
                    h1 { (title) }
                    p.placeholder { "这里还没有内容。" }
                }
            }
        }
    };
    base_document(title, chrome, route, content)
}

/// Renders the listing page of one category.
fn render_category(
    path: &str,
    node: &CategoryNode,
    articles: &[&Article],
    chrome: &Chrome,
) -> Markup {
    let route = Route::category(path);
    let content = html! {
        section.category-page {
            h1 { (node.name) }
            @if path != node.name {
                p.category-path { (path) }
            }
            @for article in articles {
                (article_card(article, chrome.config))
            }
        }
    };
    base_document(path, chrome, &route, content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::build_categories;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn article(category: &str, title: &str, content: &str) -> Article {
        Article {
            id: format!("{category}-{title}"),
            title: title.to_string(),
            date: "2025-11-17".to_string(),
            author: "博主".to_string(),
            category: category.to_string(),
            excerpt: format!("{title} excerpt"),
            content: content.to_string(),
        }
    }

    fn chrome_for<'a>(config: &'a BlogConfig, tree: &'a [CategoryNode]) -> Chrome<'a> {
        Chrome {
            config,
            categories: tree,
            css: "",
        }
    }

    #[test]
    fn home_lists_articles_with_links() {
        let config = BlogConfig::default();
        let articles = vec![article("工作总结", "foo", "body")];
        let tree = build_categories(&articles, &config);
        let html = render_home(&articles, &chrome_for(&config, &tree)).into_string();

        assert!(html.contains("foo excerpt"));
        assert!(html.contains(&Route::post("工作总结-foo").href("/")));
        assert!(html.contains("data-route=\"home\""));
    }

    #[test]
    fn empty_home_has_placeholder() {
        let config = BlogConfig::default();
        let html = render_home(&[], &chrome_for(&config, &[])).into_string();
        assert!(html.contains("还没有文章"));
    }

    #[test]
    fn post_renders_markdown_and_copy_script() {
        let config = BlogConfig::default();
        let post = article("notes", "hello", "# Hello\n\n```\nlet x = 1;\n```\n");
        let html = render_post(&post, &chrome_for(&config, &[])).into_string();

        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("btn-copy"));
        assert!(html.contains("navigator.clipboard"));
        assert!(html.contains("<title>hello - 星期wu~</title>"));
    }

    #[test]
    fn current_article_marked_in_tree() {
        let config = BlogConfig::default();
        let articles = vec![article("a", "x", ""), article("a", "y", "")];
        let tree = build_categories(&articles, &config);
        let html = render_category_tree(&tree, &Route::post("a-y")).into_string();
        assert_eq!(html.matches("class=\"article current\"").count(), 1);
    }

    #[test]
    fn uncategorized_subdirectory_links_to_flat_node() {
        let config = BlogConfig::default();
        let post = article("未分类/sub", "p", "");
        let html = article_meta(&post, &config).into_string();
        assert!(html.contains(&format!("href=\"{}\"", Route::category("未分类").href("/"))));
    }

    #[test]
    fn header_marks_current_route() {
        let config = BlogConfig::default();
        let html = site_header(&config, &Route::About).into_string();
        assert!(html.contains("class=\"current\" href=\"/about/\""));
    }

    #[test]
    fn standalone_placeholder_when_missing() {
        let config = BlogConfig::default();
        let html = render_standalone(&Route::Contact, "联系", None, &chrome_for(&config, &[]))
            .into_string();
        assert!(html.contains("这里还没有内容"));
    }

    #[test]
    fn titles_are_escaped() {
        let config = BlogConfig::default();
        let post = article("a", "<script>alert('x')</script>", "");
        let html = render_post(&post, &chrome_for(&config, &[])).into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn flatten_walks_depth_first() {
        let config = BlogConfig::default();
        let articles = vec![
            article("a/b", "1", ""),
            article("a/c/d", "2", ""),
            article("e", "3", ""),
        ];
        let tree = build_categories(&articles, &config);
        let paths: Vec<String> = flatten_categories(&tree).into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a", "a/b", "a/c", "a/c/d", "e"]);
    }

    #[test]
    fn generate_fixture_site() {
        let tmp = setup_fixtures();
        let out = TempDir::new().unwrap();
        let manifest = crate::load::load(tmp.path()).unwrap();

        let site = generate_site(&manifest, tmp.path(), out.path()).unwrap();

        assert!(out.path().join("index.html").exists());
        assert!(out.path().join("about/index.html").exists());
        assert!(out.path().join("contact/index.html").exists());
        assert!(out.path().join("post/工作总结-foo/index.html").exists());
        assert!(out.path().join("post/前端/vue-响应式/index.html").exists());
        assert!(out.path().join("category/前端/vue/index.html").exists());
        assert_eq!(site.assets_copied, manifest.assets.len());

        let about = site.pages.iter().find(|p| p.route == "about").unwrap();
        assert_eq!(about.title, "关于");

        for (_, asset) in manifest.assets.iter() {
            assert!(out.path().join(&asset.output).exists(), "{}", asset.output);
        }
    }

    #[test]
    fn category_page_includes_descendants() {
        let tmp = setup_fixtures();
        let out = TempDir::new().unwrap();
        let manifest = crate::load::load(tmp.path()).unwrap();
        generate_site(&manifest, tmp.path(), out.path()).unwrap();

        let html = fs::read_to_string(out.path().join("category/前端/index.html")).unwrap();
        assert!(html.contains("响应式"));
        assert!(html.contains("hooks"));
    }
}
