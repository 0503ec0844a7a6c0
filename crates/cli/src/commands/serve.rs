use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use pagemap_core::Config;
use pagemap_discovery::discover_site;
use pagemap_generator::{SystemClock, generate_site, render_robots};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::trace::TraceLayer;

use super::site::load_config;

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// Serve the sitemap and robots.txt over HTTP.
///
/// The sitemap is rebuilt from a fresh scan on every request, so pages
/// added while the server runs show up without a restart. A failing scan
/// answers 500 with the error message.
///
/// # Arguments
///
/// * `path` - Site directory containing pagemap.toml
/// * `port` - Port to serve on (default: 8080)
/// * `base_url` - Optional override of the configured base URL
pub async fn run(path: PathBuf, port: u16, base_url: Option<String>) -> Result<()> {
    println!("🌐 Starting sitemap server...");
    println!("   Site: {}", path.display());

    let config = load_config(&path, base_url.as_deref())?;
    println!("   ✓ Content root: {}", config.content_root.display());
    println!("   ✓ Base URL: {}", config.base_url);

    let sitemap_route = sitemap_route(&config);
    let app = router(config);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Serving at: http://localhost:{}{}", port, sitemap_route);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

fn router(config: Config) -> Router {
    let sitemap_route = sitemap_route(&config);
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route(&sitemap_route, get(sitemap_handler))
        .route("/robots.txt", get(robots_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn sitemap_route(config: &Config) -> String {
    format!(
        "/{}",
        config.sitemap_output.to_string_lossy().replace('\\', "/")
    )
}

async fn sitemap_handler(State(state): State<AppState>) -> Response {
    let config = state.config.clone();

    // The scan is blocking file-system work
    let result = tokio::task::spawn_blocking(move || {
        let pages = discover_site(&config, None)?;
        Ok::<_, pagemap_core::Error>(generate_site(&config, &pages, &SystemClock))
    })
    .await;

    match result {
        Ok(Ok(site)) => (
            [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
            site.sitemap,
        )
            .into_response(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "sitemap scan failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "sitemap task panicked");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn robots_handler(State(state): State<AppState>) -> Response {
    let body = render_robots(&state.config.robots, &state.config.sitemap_url());
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    println!("\n   Shutting down...");
}
