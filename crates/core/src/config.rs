use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "pagemap.toml";

/// Validated configuration for one site
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute http(s) URL without a trailing slash
    pub base_url: String,
    pub content_root: PathBuf,
    pub leaf_file: String,
    pub exclude: Vec<ExcludePattern>,
    pub sitemap: SitemapPolicy,
    /// File name of the sitemap, relative to the output directory
    pub sitemap_output: PathBuf,
    pub robots: RobotsPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            content_root: PathBuf::from(DEFAULT_CONTENT_ROOT),
            leaf_file: DEFAULT_LEAF_FILE.to_string(),
            exclude: ExcludePattern::defaults(),
            sitemap: SitemapPolicy::default(),
            sitemap_output: PathBuf::from(SITEMAP_FILE_NAME),
            robots: RobotsPolicy::default(),
        }
    }
}

impl Config {
    /// Replace the base URL, validating it first
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = validate_base_url(base_url)?;
        Ok(self)
    }

    /// Absolute URL of the sitemap, as advertised in robots.txt
    pub fn sitemap_url(&self) -> String {
        let file = self.sitemap_output.to_string_lossy().replace('\\', "/");
        format!("{}/{}", self.base_url, file)
    }
}

/// Raw TOML configuration structure
/// This matches the pagemap.toml file structure exactly; every section is optional
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    site: RawSite,
    #[serde(default)]
    pages: RawPages,
    #[serde(default)]
    sitemap: RawSitemap,
    #[serde(default)]
    robots: RawRobots,
}

#[derive(Debug, Default, Deserialize)]
struct RawSite {
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPages {
    root: Option<String>,
    leaf: Option<String>,
    exclude: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSitemap {
    change_frequency: Option<ChangeFrequency>,
    root_priority: Option<f32>,
    default_priority: Option<f32>,
    output: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRobots {
    user_agent: Option<String>,
    allow: Option<Vec<String>>,
    disallow: Option<Vec<String>>,
}

/// Parse pagemap.toml from a file path.
///
/// A relative `pages.root` is resolved against the directory holding the
/// config file, so the tool behaves the same from any working directory.
pub fn parse_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let mut config = parse_config_str(&content)?;

    if config.content_root.is_relative()
        && let Some(dir) = path.parent()
    {
        config.content_root = dir.join(&config.content_root);
    }

    tracing::debug!(
        config = %path.display(),
        content_root = %config.content_root.display(),
        base_url = %config.base_url,
        "loaded configuration"
    );

    Ok(config)
}

/// Parse pagemap.toml from a string (useful for testing)
pub fn parse_config_str(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)?;
    let defaults = Config::default();

    let base_url = match raw.site.base_url {
        Some(url) => validate_base_url(&url)?,
        None => defaults.base_url,
    };

    let content_root = match raw.pages.root {
        Some(root) if root.trim().is_empty() => {
            return Err(Error::ConfigParse(
                "Empty path in 'pages.root' field".to_string(),
            ));
        }
        Some(root) => PathBuf::from(root),
        None => defaults.content_root,
    };

    let leaf_file = match raw.pages.leaf {
        Some(leaf) => validate_leaf_file(&leaf)?,
        None => defaults.leaf_file,
    };

    let exclude = match raw.pages.exclude {
        Some(patterns) => ExcludePattern::parse_all(&patterns)?,
        None => defaults.exclude,
    };

    let sitemap = SitemapPolicy {
        change_frequency: raw
            .sitemap
            .change_frequency
            .unwrap_or(defaults.sitemap.change_frequency),
        root_priority: validate_priority(
            raw.sitemap.root_priority,
            defaults.sitemap.root_priority,
            "sitemap.root_priority",
        )?,
        default_priority: validate_priority(
            raw.sitemap.default_priority,
            defaults.sitemap.default_priority,
            "sitemap.default_priority",
        )?,
    };

    let sitemap_output = match raw.sitemap.output {
        Some(output) => validate_path(&output, "sitemap.output")?,
        None => defaults.sitemap_output,
    };

    let robots = RobotsPolicy {
        user_agent: raw.robots.user_agent.unwrap_or(defaults.robots.user_agent),
        allow: raw.robots.allow.unwrap_or(defaults.robots.allow),
        disallow: raw.robots.disallow.unwrap_or(defaults.robots.disallow),
    };

    Ok(Config {
        base_url,
        content_root,
        leaf_file,
        exclude,
        sitemap,
        sitemap_output,
        robots,
    })
}

/// Check that a base URL is an absolute http(s) URL and strip any trailing slash
pub fn validate_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::ConfigParse(format!("Invalid base_url '{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigParse(format!(
            "base_url must use http or https, got '{}'",
            raw
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(Error::ConfigParse(format!(
            "base_url must not carry a query or fragment: '{}'",
            raw
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// The leaf marker is compared against single directory entry names
fn validate_leaf_file(leaf: &str) -> Result<String> {
    let leaf = leaf.trim();
    if leaf.is_empty() || leaf == "." || leaf == ".." || leaf.contains(['/', '\\']) {
        return Err(Error::ConfigParse(format!(
            "'pages.leaf' must be a plain file name, got '{}'",
            leaf
        )));
    }
    Ok(leaf.to_string())
}

fn validate_priority(value: Option<f32>, default: f32, field_name: &str) -> Result<f32> {
    match value {
        None => Ok(default),
        Some(p) if (0.0..=1.0).contains(&p) => Ok(p),
        Some(p) => Err(Error::ConfigParse(format!(
            "'{}' must be between 0.0 and 1.0, got {}",
            field_name, p
        ))),
    }
}

/// Validate and convert a path string to PathBuf.
///
/// Output files must stay inside the output directory, so this rejects:
/// - Absolute paths (starting with `/` or Windows drive letters)
/// - Paths containing parent directory references (`..`)
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    let path = Path::new(path_str);

    // Reject absolute paths
    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    // Check for parent directory references
    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    // Ensure path is not empty
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    Ok(path.to_path_buf())
}
