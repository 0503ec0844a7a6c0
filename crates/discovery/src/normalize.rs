use pagemap_core::{Error, ExcludePattern, PagePath, RawPageEntry, Result};
use std::collections::{HashMap, HashSet};

/// Derive the public URL path of one page file.
///
/// The leaf file name is dropped, route-group segments such as
/// `(marketing)` are removed and separator runs collapse to one. An empty
/// result is the site root `/`. The path is marked excluded when any
/// pattern matches it.
pub fn normalize(raw: &RawPageEntry, exclude: &[ExcludePattern]) -> PagePath {
    let pathname = clean_pathname(&raw.dir_segments().join("/"));
    let excluded = exclude.iter().any(|pattern| pattern.matches(&pathname));

    PagePath {
        pathname,
        excluded,
        source: raw.clone(),
    }
}

/// Normalize a whole scan, keeping its order.
///
/// Identical entries are folded into one. Two different files that land on
/// the same public path are an error unless that path is excluded.
pub fn normalize_all(raw: Vec<RawPageEntry>, exclude: &[ExcludePattern]) -> Result<Vec<PagePath>> {
    let mut pages: Vec<PagePath> = Vec::with_capacity(raw.len());
    let mut claimed: HashMap<String, usize> = HashMap::new();
    let mut seen: HashSet<RawPageEntry> = HashSet::new();

    for entry in raw {
        if !seen.insert(entry.clone()) {
            continue;
        }

        let page = normalize(&entry, exclude);

        if page.excluded {
            tracing::debug!(page = %page.source, pathname = %page.pathname, "excluded");
        } else if let Some(&index) = claimed.get(&page.pathname) {
            return Err(Error::Collision {
                pathname: page.pathname,
                first: pages[index].source.clone(),
                second: entry,
            });
        } else {
            claimed.insert(page.pathname.clone(), pages.len());
        }

        pages.push(page);
    }

    Ok(pages)
}

/// Turn a `/`-separated directory path into a canonical URL path
pub fn clean_pathname(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty() && !is_group_segment(segment))
        .collect();

    format!("/{}", segments.join("/"))
}

/// `(name)` segments organize files without appearing in the URL
fn is_group_segment(segment: &str) -> bool {
    segment.len() >= 2 && segment.starts_with('(') && segment.ends_with(')')
}
