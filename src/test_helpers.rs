//! Shared test utilities for the inkpost test suite.
//!
//! Provides fixture setup, lookup helpers, and category tree assertions that
//! work with load-stage data structures (`Manifest`, `Article`, `CategoryNode`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = load(tmp.path()).unwrap();
//!
//! let foo = find_article(&manifest, "工作总结-foo");
//! assert_eq!(foo.title, "foo");
//!
//! assert_tree_shape(&manifest.categories, &[
//!     ("前端", &["react", "vue"]),
//!     ("工作总结", &[]),
//! ]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::load::Manifest;
use crate::types::{Article, CategoryNode};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups, panicking with a clear message on miss
// =========================================================================

/// Find an article by id. Panics if not found.
pub fn find_article<'a>(manifest: &'a Manifest, id: &str) -> &'a Article {
    manifest
        .articles
        .iter()
        .find(|a| a.id == id)
        .unwrap_or_else(|| {
            panic!(
                "article '{id}' not found. Available: {:?}",
                article_ids(manifest)
            )
        })
}

/// All article ids in manifest order.
pub fn article_ids(manifest: &Manifest) -> Vec<&str> {
    manifest.articles.iter().map(|a| a.id.as_str()).collect()
}

// =========================================================================
// Category tree helpers
// =========================================================================

/// Top-level category names in order.
pub fn category_names(tree: &[CategoryNode]) -> Vec<&str> {
    tree.iter().map(|n| n.name.as_str()).collect()
}

/// Sub-category names under a top-level category. Panics if not found.
pub fn subcategory_names<'a>(tree: &'a [CategoryNode], parent: &str) -> Vec<&'a str> {
    tree.iter()
        .find(|n| n.name == parent)
        .map(|n| n.categories().map(|c| c.name.as_str()).collect())
        .unwrap_or_else(|| {
            panic!(
                "category '{parent}' not found. Available: {:?}",
                category_names(tree)
            )
        })
}

/// Assert that the two top levels of the category tree match an expected
/// shape.
///
/// Each entry is `(name, sub-categories)`. Use `&[]` for a category that
/// only holds articles.
pub fn assert_tree_shape(tree: &[CategoryNode], expected: &[(&str, &[&str])]) {
    let expected_names: Vec<&str> = expected.iter().map(|(n, _)| *n).collect();
    assert_eq!(
        category_names(tree),
        expected_names,
        "top-level categories mismatch"
    );

    for (name, children) in expected {
        assert_eq!(
            subcategory_names(tree, name),
            children.to_vec(),
            "sub-categories of '{name}' mismatch"
        );
    }
}
