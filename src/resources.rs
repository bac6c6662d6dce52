//! Embedded static assets (stylesheet and icons).
//!
//! Pages rendered without the CDN reference these files at root-relative
//! `/cdn-cgi/...` paths. A server can look them up with [`get_resource`] or
//! write them out from [`resources`].

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Directory the embedded tree lives under.
pub const RESOURCES_DIR: &str = "resources";

/// A single embedded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Path relative to [`RESOURCES_DIR`], e.g. `cdn-cgi/styles/main.css`.
    pub path: &'static str,
    pub content_type: &'static str,
    pub bytes: &'static [u8],
}

macro_rules! embed {
    ($path:literal, $content_type:literal) => {
        Resource {
            path: $path,
            content_type: $content_type,
            bytes: include_bytes!(concat!("../resources/", $path)),
        }
    };
}

static RESOURCES: &[Resource] = &[
    embed!("cdn-cgi/styles/main.css", "text/css; charset=utf-8"),
    embed!("cdn-cgi/images/cf-icon-browser.svg", "image/svg+xml"),
    embed!("cdn-cgi/images/cf-icon-cloud.svg", "image/svg+xml"),
    embed!("cdn-cgi/images/cf-icon-server.svg", "image/svg+xml"),
    embed!("cdn-cgi/images/cf-icon-ok.svg", "image/svg+xml"),
    embed!("cdn-cgi/images/cf-icon-error.svg", "image/svg+xml"),
];

static INDEX: Lazy<HashMap<&'static str, &'static Resource>> =
    Lazy::new(|| RESOURCES.iter().map(|r| (r.path, r)).collect());

/// All embedded files.
pub fn resources() -> &'static [Resource] {
    RESOURCES
}

/// Joins `filename` onto [`RESOURCES_DIR`].
pub fn resource_path(filename: &str) -> String {
    format!("{}/{}", RESOURCES_DIR, filename.trim_start_matches('/'))
}

/// Looks up an embedded file.
///
/// Accepts paths with or without a leading `/` or `resources/` prefix, so both
/// a request path (`/cdn-cgi/styles/main.css`) and the output of
/// [`resource_path`] resolve.
pub fn get_resource(path: &str) -> Option<&'static Resource> {
    let path = path.trim_start_matches('/');
    let path = path
        .strip_prefix(RESOURCES_DIR)
        .and_then(|p| p.strip_prefix('/'))
        .unwrap_or(path);
    INDEX.get(path).copied()
}
