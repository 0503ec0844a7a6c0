use anyhow::{Context, Result};
use pagemap_discovery::{CancellationToken, discover_site};
use pagemap_generator::{Clock, GeneratedSite, SystemClock, generate_site};
use std::fs;
use std::path::{Path, PathBuf};

use super::site::load_config;

/// Build sitemap.xml and robots.txt for deployment
pub fn run(path: PathBuf, output: PathBuf, base_url: Option<String>) -> Result<()> {
    println!("🔨 Building sitemap...");
    println!("   Site: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let cancel = CancellationToken::new();
    install_cancel_handler(&cancel)?;

    let site = build_site(&path, &output, base_url.as_deref(), &SystemClock, &cancel)?;

    println!("✓ Sitemap: {} URL(s)", site.url_count);
    for (file, _) in site.files() {
        println!("   ✓ Wrote {}", output.join(file).display());
    }
    println!();
    println!("✅ Build complete!");

    Ok(())
}

/// First Ctrl+C cancels the scan; a second one exits immediately
pub fn install_cancel_handler(cancel: &CancellationToken) -> Result<()> {
    let handle = cancel.clone();
    ctrlc::set_handler(move || {
        if interrupt(&handle) {
            std::process::exit(130);
        }
        eprintln!("\n   Cancelling... (press Ctrl+C again to exit)");
    })
    .context("Failed to set Ctrl+C handler")
}

/// Cancel the token, returning true if it was already cancelled
fn interrupt(cancel: &CancellationToken) -> bool {
    if cancel.is_cancelled() {
        return true;
    }
    cancel.cancel();
    false
}

/// Scan the site, render both documents and write them under `output`.
///
/// Nothing is written unless the whole scan succeeds.
pub fn build_site(
    path: &Path,
    output: &Path,
    base_url: Option<&str>,
    clock: &dyn Clock,
    cancel: &CancellationToken,
) -> Result<GeneratedSite> {
    let config = load_config(path, base_url)?;
    tracing::info!(
        content_root = %config.content_root.display(),
        base_url = %config.base_url,
        "building sitemap"
    );

    let pages = discover_site(&config, Some(cancel)).with_context(|| {
        format!(
            "Failed to discover pages in {}",
            config.content_root.display()
        )
    })?;

    let site = generate_site(&config, &pages, clock);
    write_site(&site, output)?;

    Ok(site)
}

fn write_site(site: &GeneratedSite, output: &Path) -> Result<()> {
    for (file, contents) in site.files() {
        let dest = output.join(file);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&dest, contents).with_context(|| format!("Failed to write {}", dest.display()))?;
        tracing::debug!(file = %dest.display(), bytes = contents.len(), "wrote");
    }
    Ok(())
}
