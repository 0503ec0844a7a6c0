use anyhow::{Context, Result};
use pagemap_core::config::{CONFIG_FILE_NAME, parse_config};
use pagemap_core::Config;
use std::path::Path;

/// Load the site configuration for `path`.
///
/// Without a pagemap.toml the built-in defaults apply, with the content
/// root resolved against `path`. A `base_url` override wins over both.
pub fn load_config(path: &Path, base_url: Option<&str>) -> Result<Config> {
    if !path.is_dir() {
        anyhow::bail!("Site directory does not exist: {}", path.display());
    }

    let config_path = path.join(CONFIG_FILE_NAME);
    let config = if config_path.exists() {
        parse_config(&config_path)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?
    } else {
        tracing::info!(
            "{} not found in {}, using defaults",
            CONFIG_FILE_NAME,
            path.display()
        );
        let defaults = Config::default();
        Config {
            content_root: path.join(&defaults.content_root),
            ..defaults
        }
    };

    match base_url {
        Some(url) => config
            .with_base_url(url)
            .with_context(|| format!("Invalid --base-url '{}'", url)),
        None => Ok(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.content_root, dir.path().join("src/app"));
        assert_eq!(config.base_url, "https://lyberty.ai");
    }

    #[test]
    fn test_load_config_reads_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[site]\nbase_url = \"https://example.com\"\n\n[pages]\nroot = \"app\"\n",
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.base_url, "https://example.com");
        assert_eq!(config.content_root, dir.path().join("app"));
    }

    #[test]
    fn test_load_config_base_url_override() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), Some("https://staging.example.com/")).unwrap();
        assert_eq!(config.base_url, "https://staging.example.com");

        assert!(load_config(dir.path(), Some("nope")).is_err());
    }

    #[test]
    fn test_load_config_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = load_config(&dir.path().join("missing"), None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_load_config_reports_bad_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[sitemap]\nroot_priority = 3.0\n").unwrap();

        let err = load_config(dir.path(), None).unwrap_err();
        assert!(format!("{:#}", err).contains("sitemap.root_priority"));
    }
}
