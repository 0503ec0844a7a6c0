use crate::clock::Clock;
use pagemap_core::{PagePath, SitemapEntry, SitemapPolicy};

/// Build sitemap entries for every public page.
///
/// Excluded pages are dropped. All entries share one timestamp read from
/// `clock`, and priorities follow `policy` (root vs. everything else).
pub fn to_sitemap_entries(
    pages: &[PagePath],
    base_url: &str,
    clock: &dyn Clock,
    policy: &SitemapPolicy,
) -> Vec<SitemapEntry> {
    let last_modified = clock.now();

    pages
        .iter()
        .filter(|page| !page.excluded)
        .map(|page| SitemapEntry {
            url: page_url(base_url, &page.pathname),
            last_modified,
            change_frequency: policy.change_frequency,
            priority: policy.priority_for(page).clamp(0.0, 1.0),
        })
        .collect()
}

/// Join a base URL and a page path; the root keeps its trailing slash
pub fn page_url(base_url: &str, pathname: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if pathname == "/" || pathname.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, pathname.trim_start_matches('/'))
    }
}
