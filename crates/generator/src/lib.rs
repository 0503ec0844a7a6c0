// Sitemap and robots.txt generation from discovered pages

pub mod clock;
pub mod entries;
pub mod robots;
pub mod sitemap;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entries::{page_url, to_sitemap_entries};
pub use robots::render_robots;
pub use sitemap::render_sitemap;

use pagemap_core::{Config, PagePath, ROBOTS_FILE_NAME};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct GeneratedSite {
    pub sitemap_path: PathBuf, // relative to the output directory
    pub sitemap: String,
    pub robots: String,
    pub url_count: usize,
}

impl GeneratedSite {
    /// (path relative to output, contents) for every generated file
    pub fn files(&self) -> [(&Path, &str); 2] {
        [
            (self.sitemap_path.as_path(), self.sitemap.as_str()),
            (Path::new(ROBOTS_FILE_NAME), self.robots.as_str()),
        ]
    }
}

/// Render both documents for a scanned site
pub fn generate_site(config: &Config, pages: &[PagePath], clock: &dyn Clock) -> GeneratedSite {
    let entries = to_sitemap_entries(pages, &config.base_url, clock, &config.sitemap);
    tracing::debug!(urls = entries.len(), "rendering sitemap");

    GeneratedSite {
        sitemap_path: config.sitemap_output.clone(),
        sitemap: render_sitemap(&entries),
        robots: render_robots(&config.robots, &config.sitemap_url()),
        url_count: entries.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pagemap_core::RawPageEntry;

    fn page(pathname: &str, excluded: bool) -> PagePath {
        PagePath {
            pathname: pathname.to_string(),
            excluded,
            source: RawPageEntry::parse("page.tsx"),
        }
    }

    #[test]
    fn test_generate_site() {
        let config = Config::default()
            .with_base_url("https://example.com")
            .unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        let pages = vec![page("/", false), page("/about", false), page("/auth", true)];

        let site = generate_site(&config, &pages, &clock);

        assert_eq!(site.url_count, 2);
        let files = site.files();
        assert_eq!(files[0].0, Path::new("sitemap.xml"));
        assert_eq!(files[1].0, Path::new("robots.txt"));
        assert!(site.sitemap.contains("<loc>https://example.com/about</loc>"));
        assert!(!site.sitemap.contains("/auth"));
        assert!(site.robots.contains("Sitemap: https://example.com/sitemap.xml"));
    }
}
