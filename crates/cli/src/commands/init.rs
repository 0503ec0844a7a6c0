use anyhow::{Context, Result};
use pagemap_core::config::{CONFIG_FILE_NAME, validate_base_url};
use pagemap_core::{
    DEFAULT_BASE_URL, DEFAULT_CONTENT_ROOT, DEFAULT_DISALLOW, DEFAULT_EXCLUDES, DEFAULT_LEAF_FILE,
    SITEMAP_FILE_NAME,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Escape a string for safe inclusion in TOML per TOML v1.0.0 spec
///
/// The template carries comments, so it is written by hand instead of
/// going through toml serialization.
///
/// See: https://toml.io/en/v1.0.0#string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn toml_string_array(items: &[&str]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|s| format!("\"{}\"", toml_escape_string(s)))
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Write a starter pagemap.toml into `path`.
///
/// The template spells out every default so the file documents itself.
pub fn run(path: PathBuf, base_url: Option<String>, force: bool) -> Result<()> {
    println!("Initializing pagemap in: {}", path.display());

    if !path.is_dir() {
        anyhow::bail!(
            "Directory '{}' does not exist. Create it first: mkdir {}",
            path.display(),
            path.display()
        );
    }

    let config_path = path.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists at {}\nHint: Pass --force to overwrite it",
            CONFIG_FILE_NAME,
            config_path.display()
        );
    }

    let base_url = match base_url {
        Some(url) => validate_base_url(&url).context("Invalid --base-url")?,
        None => DEFAULT_BASE_URL.to_string(),
    };

    write_config(&path, &base_url)?;

    println!("✓ Wrote {}", config_path.display());
    if !path.join(DEFAULT_CONTENT_ROOT).is_dir() {
        println!(
            "⚠ Content root '{}' not found yet; edit [pages].root if your pages live elsewhere",
            DEFAULT_CONTENT_ROOT
        );
    }

    println!("\nNext steps:");
    println!("  1. Check [pages] root and leaf in {}", CONFIG_FILE_NAME);
    println!("  2. List pages: pagemap routes {}", path.display());
    println!("  3. Build: pagemap build {} --output public", path.display());

    Ok(())
}

fn write_config(base: &Path, base_url: &str) -> Result<()> {
    let content = render_config_template(base_url);
    fs::write(base.join(CONFIG_FILE_NAME), content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;
    Ok(())
}

fn render_config_template(base_url: &str) -> String {
    format!(
        r#"# pagemap configuration

[site]
# Absolute URL advertised in the sitemap.
# Overridden by --base-url or the WEBSITE_URL environment variable.
base_url = "{base_url}"

[pages]
# Directory scanned for pages, relative to this file
root = "{root}"
# File name that marks a directory as a page
leaf = "{leaf}"
# URL paths containing any of these are left out of the sitemap.
# Prefix an entry with "re:" to use a regular expression.
exclude = {exclude}

[sitemap]
# always | hourly | daily | weekly | monthly | yearly | never
change_frequency = "daily"
root_priority = 1.0
default_priority = 0.8
output = "{output}"

[robots]
user_agent = "*"
allow = ["/"]
disallow = {disallow}
"#,
        base_url = toml_escape_string(base_url),
        root = toml_escape_string(DEFAULT_CONTENT_ROOT),
        leaf = toml_escape_string(DEFAULT_LEAF_FILE),
        exclude = toml_string_array(DEFAULT_EXCLUDES),
        output = SITEMAP_FILE_NAME,
        disallow = toml_string_array(DEFAULT_DISALLOW),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagemap_core::config::parse_config_str;
    use pagemap_core::{RobotsPolicy, SitemapPolicy};
    use tempfile::TempDir;

    #[test]
    fn test_toml_escape_string() {
        assert_eq!(toml_escape_string(r#"Test "Quote""#), r#"Test \"Quote\""#);
        assert_eq!(toml_escape_string(r"Test\Back"), r"Test\\Back");
        assert_eq!(toml_escape_string("Test\nNewline"), r"Test\nNewline");
        assert_eq!(toml_escape_string("Normal String"), "Normal String");
    }

    #[test]
    fn test_toml_string_array() {
        assert_eq!(toml_string_array(&[]), "[]");
        assert_eq!(toml_string_array(&["a", "b\"c"]), r#"["a", "b\"c"]"#);
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config = parse_config_str(&render_config_template(DEFAULT_BASE_URL)).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.content_root, PathBuf::from(DEFAULT_CONTENT_ROOT));
        assert_eq!(config.leaf_file, DEFAULT_LEAF_FILE);
        let exclude: Vec<String> = config.exclude.iter().map(|p| p.to_string()).collect();
        assert_eq!(exclude, DEFAULT_EXCLUDES);
        assert_eq!(config.sitemap, SitemapPolicy::default());
        assert_eq!(config.robots, RobotsPolicy::default());
    }

    #[test]
    fn test_run_writes_config() {
        let dir = TempDir::new().unwrap();
        run(
            dir.path().to_path_buf(),
            Some("https://example.com/".to_string()),
            false,
        )
        .unwrap();

        let content = fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        let config = parse_config_str(&content).unwrap();
        assert_eq!(config.base_url, "https://example.com");
    }

    #[test]
    fn test_run_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "# mine\n").unwrap();

        let result = run(dir.path().to_path_buf(), None, false);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));
        assert_eq!(
            fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap(),
            "# mine\n"
        );

        run(dir.path().to_path_buf(), None, true).unwrap();
        let content = fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(content.contains("[pages]"));
    }

    #[test]
    fn test_run_rejects_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(run(dir.path().join("missing"), None, false).is_err());
    }

    #[test]
    fn test_run_rejects_invalid_base_url() {
        let dir = TempDir::new().unwrap();
        let result = run(dir.path().to_path_buf(), Some("example".to_string()), false);
        assert!(result.is_err());
        assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
    }
}
