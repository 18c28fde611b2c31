//! Category tree construction.
//!
//! Folds the flat article list into the navigation tree. Every segment of an
//! article's category becomes a node, shared by all articles with the same
//! prefix; the article itself hangs off the node of its last segment:
//!
//! ```text
//! 前端/vue/响应式   ─┐        前端
//! 前端/react/hooks  ─┼──▶     ├── vue
//! 工作总结/foo      ─┘        │   └── 响应式
//!                             ├── react
//!                             │   └── hooks
//!                             工作总结
//!                             └── foo
//! ```
//!
//! Each level keeps the order in which names were first seen, so the tree
//! follows the article list rather than any sort order.

use crate::config::BlogConfig;
use crate::routes::Route;
use crate::types::{Article, ArticleRef, CategoryChild, CategoryNode};
use std::collections::HashMap;

/// Build the category tree for `articles`.
///
/// Articles in the uncategorized category form a single top-level node with
/// no sub-categories, including articles from a directory that happens to
/// carry the uncategorized name.
pub fn build_categories(articles: &[Article], config: &BlogConfig) -> Vec<CategoryNode> {
    let mut root = Branch::default();
    for article in articles {
        let leaf = ArticleRef {
            id: article.id.clone(),
            title: article.title.clone(),
            href: Route::post(&article.id).href(&config.base),
        };
        let segments: Vec<&str> = node_path(&article.category, &config.articles.uncategorized)
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        root.insert(&segments, 0, leaf, &config.base);
    }

    root.entries
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Branch(branch) => Some(branch.into_node()),
            // Every article has at least one category segment.
            Entry::Leaf(_) => None,
        })
        .collect()
}

/// A node under construction: children in first-seen order plus a name
/// index into them.
#[derive(Default)]
struct Branch {
    name: String,
    href: String,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

enum Entry {
    Branch(Branch),
    Leaf(ArticleRef),
}

impl Branch {
    /// File `leaf` under `segments[depth..]`, creating nodes as needed.
    fn insert(&mut self, segments: &[&str], depth: usize, leaf: ArticleRef, base: &str) {
        let Some(&name) = segments.get(depth) else {
            self.entries.push(Entry::Leaf(leaf));
            return;
        };

        let position = match self.index.get(name) {
            Some(&position) => position,
            None => {
                let path = segments[..=depth].join("/");
                self.entries.push(Entry::Branch(Branch {
                    name: name.to_string(),
                    href: Route::category(&path).href(base),
                    ..Branch::default()
                }));
                self.index.insert(name.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };

        if let Entry::Branch(child) = &mut self.entries[position] {
            child.insert(segments, depth + 1, leaf, base);
        }
    }

    fn into_node(self) -> CategoryNode {
        CategoryNode {
            name: self.name,
            href: self.href,
            children: self
                .entries
                .into_iter()
                .map(|entry| match entry {
                    Entry::Branch(branch) => CategoryChild::Category(branch.into_node()),
                    Entry::Leaf(leaf) => CategoryChild::Article(leaf),
                })
                .collect(),
        }
    }
}

/// Path of the tree node an article with `category` is filed under. A
/// directory named like the uncategorized node folds into it.
pub fn node_path<'a>(category: &'a str, uncategorized: &str) -> &'a str {
    match category.split('/').next() {
        Some(first) if first == uncategorized => first,
        _ => category,
    }
}

/// Find the node for a `/`-separated category path.
pub fn find_category<'a>(tree: &'a [CategoryNode], path: &str) -> Option<&'a CategoryNode> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let first = segments.next()?;
    let mut node = tree.iter().find(|n| n.name == first)?;
    for segment in segments {
        node = node.categories().find(|n| n.name == segment)?;
    }
    Some(node)
}
