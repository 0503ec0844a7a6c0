//! Page discovery for file-system routed sites.
//!
//! A content tree marks each routable page with a leaf file (for example
//! `page.tsx`). [`discover`] walks the tree, derives the public URL path of
//! every page and flags the ones kept out of the sitemap.

pub mod cancel;
pub mod normalize;
pub mod walk;

pub use cancel::CancellationToken;
pub use normalize::{clean_pathname, normalize, normalize_all};
pub use walk::walk;

use pagemap_core::{Config, ExcludePattern, PagePath, Result};
use std::path::Path;

/// Scan `content_root` and return every page in traversal order.
///
/// Excluded pages stay in the result with `excluded` set. Any error aborts
/// the whole scan; nothing partial is returned.
pub fn discover(
    content_root: &Path,
    leaf_file: &str,
    exclude: &[ExcludePattern],
    cancel: Option<&CancellationToken>,
) -> Result<Vec<PagePath>> {
    let raw = walk(content_root, leaf_file, cancel)?;
    let pages = normalize_all(raw, exclude)?;

    tracing::info!(
        root = %content_root.display(),
        pages = pages.len(),
        excluded = pages.iter().filter(|p| p.excluded).count(),
        "discovered pages"
    );

    Ok(pages)
}

/// [`discover`] with the content root, leaf marker and excludes from `config`
pub fn discover_site(config: &Config, cancel: Option<&CancellationToken>) -> Result<Vec<PagePath>> {
    discover(
        &config.content_root,
        &config.leaf_file,
        &config.exclude,
        cancel,
    )
}
