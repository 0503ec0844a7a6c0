use anyhow::{Context, Result};
use pagemap_core::PagePath;
use pagemap_discovery::{CancellationToken, discover_site};
use serde::Serialize;
use std::path::PathBuf;

use super::build::install_cancel_handler;
use super::site::load_config;

#[derive(Debug, Serialize)]
struct RouteRow<'a> {
    pathname: &'a str,
    excluded: bool,
    source: String,
}

/// Print every discovered page, excluded ones included
pub fn run(path: PathBuf, json: bool) -> Result<()> {
    let config = load_config(&path, None)?;

    let cancel = CancellationToken::new();
    install_cancel_handler(&cancel)?;

    let pages = discover_site(&config, Some(&cancel)).with_context(|| {
        format!(
            "Failed to discover pages in {}",
            config.content_root.display()
        )
    })?;

    if json {
        println!("{}", render_json(&pages)?);
    } else {
        print!("{}", render_table(&pages));
    }

    Ok(())
}

fn render_json(pages: &[PagePath]) -> Result<String> {
    let rows: Vec<RouteRow<'_>> = pages
        .iter()
        .map(|page| RouteRow {
            pathname: &page.pathname,
            excluded: page.excluded,
            source: page.source.to_string(),
        })
        .collect();
    serde_json::to_string_pretty(&rows).context("Failed to serialize routes")
}

fn render_table(pages: &[PagePath]) -> String {
    if pages.is_empty() {
        return "No pages found\n".to_string();
    }

    let width = pages.iter().map(|p| p.pathname.len()).max().unwrap_or(0);
    let mut out = String::new();

    for page in pages {
        let marker = if page.excluded { "✗" } else { "✓" };
        out.push_str(&format!(
            "{} {:<width$}  {}\n",
            marker,
            page.pathname,
            page.source,
            width = width
        ));
    }

    let public = pages.iter().filter(|p| !p.excluded).count();
    out.push_str(&format!(
        "\n{} page(s), {} public, {} excluded\n",
        pages.len(),
        public,
        pages.len() - public
    ));
    out
}
