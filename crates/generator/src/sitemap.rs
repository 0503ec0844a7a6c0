//! Sitemap document rendering.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01T00:00:00Z</lastmod>
//!     <changefreq>daily</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use chrono::SecondsFormat;
use pagemap_core::SitemapEntry;
use quick_xml::escape::escape;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Serialize entries into a sitemap XML document, keeping their order
pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::with_capacity(256 + entries.len() * 192);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for entry in entries {
        let lastmod = entry
            .last_modified
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        xml.push_str("  <url>\n");
        push_element(&mut xml, "loc", &entry.url);
        push_element(&mut xml, "lastmod", &lastmod);
        push_element(&mut xml, "changefreq", entry.change_frequency.as_str());
        push_element(&mut xml, "priority", &format_priority(entry.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Shortest exact form, with one decimal kept on whole numbers (`1.0`)
fn format_priority(priority: f32) -> String {
    if priority.fract() == 0.0 {
        format!("{:.1}", priority)
    } else {
        priority.to_string()
    }
}

fn push_element(xml: &mut String, name: &str, text: &str) {
    xml.push_str("    <");
    xml.push_str(name);
    xml.push('>');
    xml.push_str(&escape(text));
    xml.push_str("</");
    xml.push_str(name);
    xml.push_str(">\n");
}
