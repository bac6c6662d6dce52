//! Root endpoint handler for the landing page.
//!
//! This module provides the `/` endpoint handler that links to the
//! demo error pages and the embedded assets.

use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use tracing::{debug, instrument};

use crate::config::{DEFAULT_BIND_ADDR, DEFAULT_PORT};
use crate::state::SharedState;

/// Footer text for human-readable HTTP endpoints.
pub const FOOTER_TEXT: &str = "cloudflare-error-page demo server";

/// Handler for the root `/` endpoint.
#[instrument(skip(state))]
pub async fn root_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing / request");

    let version = env!("CARGO_PKG_VERSION");

    let uptime_secs = state.start_time.elapsed().as_secs();
    let hours = uptime_secs / 3600;
    let minutes = (uptime_secs % 3600) / 60;
    let seconds = uptime_secs % 60;
    let uptime_str = format!("{}h {}m {}s", hours, minutes, seconds);

    let on_off = |flag: bool| if flag { "on" } else { "off" };
    let allow_html = on_off(state.render_options.allow_html);
    let use_cdn = on_off(state.render_options.use_cdn);

    let listen = format!(
        "{}:{}",
        state.config.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR),
        state.config.port.unwrap_or(DEFAULT_PORT)
    );

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Cloudflare Error Page</title>
    <style>
        body {{ font-family: -apple-system, 'Segoe UI', sans-serif; margin: 2em auto; max-width: 760px; color: #313131; }}
        h1 {{ font-weight: 300; border-bottom: 2px solid #f38020; }}
        dl {{ display: grid; grid-template-columns: max-content auto; gap: 0.3em 1.5em; }}
        dt {{ color: #666; }}
        a {{ color: #f38020; }}
        li {{ margin: 0.8em 0; }}
        footer {{ margin-top: 2em; color: #999; font-size: 0.85em; }}
    </style>
</head>
<body>
<h1>Cloudflare Error Page</h1>

<dl>
    <dt>Version</dt><dd>{version}</dd>
    <dt>Listen</dt><dd>{listen}</dd>
    <dt>Uptime</dt><dd>{uptime}</dd>
    <dt>Allow HTML</dt><dd>{allow_html}</dd>
    <dt>CDN assets</dt><dd>{use_cdn}</dd>
</dl>

<h2>Endpoints</h2>
<ul>
    <li><a href="/error">/error</a>: demo page with Cloudflare as the error source</li>
    <li><a href="/error?code=502&amp;title=Bad%20gateway&amp;source=host">/error?code=502&amp;source=host</a>: query overrides for error code, title and error source</li>
    <li><a href="/cdn-cgi/styles/main.css">/cdn-cgi/styles/main.css</a>: embedded stylesheet used with local assets</li>
</ul>

<footer>{footer}</footer>
</body>
</html>"#,
        version = version,
        listen = listen,
        uptime = uptime_str,
        allow_html = allow_html,
        use_cdn = use_cdn,
        footer = FOOTER_TEXT
    );

    Html(html)
}
