use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback site URL when none is configured
pub const DEFAULT_BASE_URL: &str = "https://lyberty.ai";

/// File name that marks a directory as a routable page
pub const DEFAULT_LEAF_FILE: &str = "page.tsx";

/// Content root scanned when none is configured
pub const DEFAULT_CONTENT_ROOT: &str = "src/app";

/// Paths kept out of the sitemap
pub const DEFAULT_EXCLUDES: &[&str] = &["playground", "auth", "api", "protected", "edit"];

/// Path prefixes robots are asked not to crawl
pub const DEFAULT_DISALLOW: &[&str] = &[
    "/private/",
    "/admin/",
    "/playground/",
    "/auth/",
    "/api/",
    "/protected/",
    "/edit/",
];

pub const SITEMAP_FILE_NAME: &str = "sitemap.xml";
pub const ROBOTS_FILE_NAME: &str = "robots.txt";

/// A page file found during a scan, relative to the content root.
///
/// Stored as path segments; the last segment is the leaf file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct RawPageEntry {
    segments: Vec<String>,
}

impl RawPageEntry {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Build an entry from a `/`-separated relative path (useful for testing)
    pub fn parse(relative: &str) -> Self {
        Self::new(relative.split('/').map(str::to_string).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Leaf file name (last segment)
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Directory segments between the content root and the leaf file
    pub fn dir_segments(&self) -> &[String] {
        match self.segments.split_last() {
            Some((_, dirs)) => dirs,
            None => &[],
        }
    }
}

impl fmt::Display for RawPageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl From<RawPageEntry> for String {
    fn from(entry: RawPageEntry) -> Self {
        entry.to_string()
    }
}

/// Canonical public URL path for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePath {
    /// Leading slash, no trailing slash except for the root
    pub pathname: String,
    pub excluded: bool,
    pub source: RawPageEntry,
}

impl PagePath {
    pub fn is_root(&self) -> bool {
        self.pathname == "/"
    }
}

/// How often a page is expected to change (sitemaps.org vocabulary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One advertised URL in the sitemap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    /// Always within `0.0..=1.0`
    pub priority: f32,
}

/// Priority and freshness assigned to sitemap entries
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapPolicy {
    pub change_frequency: ChangeFrequency,
    pub root_priority: f32,
    pub default_priority: f32,
}

impl Default for SitemapPolicy {
    fn default() -> Self {
        Self {
            change_frequency: ChangeFrequency::Daily,
            root_priority: 1.0,
            default_priority: 0.8,
        }
    }
}

impl SitemapPolicy {
    pub fn priority_for(&self, page: &PagePath) -> f32 {
        if page.is_root() {
            self.root_priority
        } else {
            self.default_priority
        }
    }
}

/// Static crawl rules served as robots.txt
#[derive(Debug, Clone, PartialEq)]
pub struct RobotsPolicy {
    pub user_agent: String,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
}

impl Default for RobotsPolicy {
    fn default() -> Self {
        Self {
            user_agent: "*".to_string(),
            allow: vec!["/".to_string()],
            disallow: DEFAULT_DISALLOW.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Matcher that keeps a URL path out of the sitemap.
///
/// Plain strings match as substrings; a `re:` prefix compiles the rest as a
/// regular expression.
#[derive(Debug, Clone)]
pub enum ExcludePattern {
    Substring(String),
    Regex(Regex),
}

impl ExcludePattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        if let Some(expr) = pattern.strip_prefix("re:") {
            let regex = Regex::new(expr).map_err(|e| {
                Error::ConfigParse(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
            return Ok(ExcludePattern::Regex(regex));
        }

        if pattern.is_empty() {
            return Err(Error::ConfigParse(
                "Empty exclude pattern would exclude every page".to_string(),
            ));
        }

        Ok(ExcludePattern::Substring(pattern.to_string()))
    }

    pub fn matches(&self, pathname: &str) -> bool {
        match self {
            ExcludePattern::Substring(s) => pathname.contains(s.as_str()),
            ExcludePattern::Regex(re) => re.is_match(pathname),
        }
    }

    /// Parse a list of patterns, keeping their order
    pub fn parse_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Self>> {
        patterns.iter().map(|p| Self::parse(p.as_ref())).collect()
    }

    pub fn defaults() -> Vec<Self> {
        DEFAULT_EXCLUDES
            .iter()
            .map(|s| ExcludePattern::Substring(s.to_string()))
            .collect()
    }
}

impl fmt::Display for ExcludePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExcludePattern::Substring(s) => f.write_str(s),
            ExcludePattern::Regex(re) => write!(f, "re:{}", re.as_str()),
        }
    }
}
