use pagemap_core::RobotsPolicy;

/// Render a robots.txt body for one user-agent group plus the sitemap location
pub fn render_robots(policy: &RobotsPolicy, sitemap_url: &str) -> String {
    let mut txt = String::new();

    txt.push_str(&format!("User-agent: {}\n", policy.user_agent));
    for path in &policy.allow {
        txt.push_str(&format!("Allow: {}\n", path));
    }
    for path in &policy.disallow {
        txt.push_str(&format!("Disallow: {}\n", path));
    }
    txt.push('\n');
    txt.push_str(&format!("Sitemap: {}\n", sitemap_url));

    txt
}
