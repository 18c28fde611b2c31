//! Shared types used across pipeline stages.
//!
//! These types are serialized into the load manifest and read back by the
//! generate stage.

use serde::{Deserialize, Serialize};

/// One blog post, derived from a single Markdown file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// `category + "-" + title`. Not guaranteed unique: two files with the
    /// same category and title share an id.
    pub id: String,
    /// File name without the `.md` extension.
    pub title: String,
    pub date: String,
    pub author: String,
    /// Directory path below the documents root (`前端/vue`), or the
    /// uncategorized name for files at the root.
    pub category: String,
    /// Plain-text preview.
    pub excerpt: String,
    /// Markdown/HTML body with image references rewritten.
    pub content: String,
}

/// A category in the navigation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    /// Path segment this node stands for.
    pub name: String,
    /// Category page URL for the segments up to and including this one.
    pub href: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryChild>,
}

/// Entry below a category: a sub-category or an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryChild {
    Category(CategoryNode),
    Article(ArticleRef),
}

/// Leaf of the navigation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRef {
    pub id: String,
    pub title: String,
    pub href: String,
}

impl CategoryNode {
    /// Sub-categories, in order.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryNode> {
        self.children.iter().filter_map(|c| match c {
            CategoryChild::Category(node) => Some(node),
            CategoryChild::Article(_) => None,
        })
    }

    /// Articles filed directly under this node, in order.
    pub fn articles(&self) -> impl Iterator<Item = &ArticleRef> {
        self.children.iter().filter_map(|c| match c {
            CategoryChild::Article(article) => Some(article),
            CategoryChild::Category(_) => None,
        })
    }

    /// Number of articles in this node and all of its descendants.
    pub fn article_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| match c {
                CategoryChild::Category(node) => node.article_count(),
                CategoryChild::Article(_) => 1,
            })
            .sum()
    }
}
