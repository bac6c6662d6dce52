//! Cloudflare-style Error Page Library
//!
//! Renders the familiar "browser / Cloudflare / host" edge error page from a
//! loosely typed parameter bag. Every parameter is optional; anything missing
//! or of the wrong type falls back to a default, so rendering only fails if
//! the template itself cannot be executed.
//!
//! # Features
//!
//! - **Defaulting**: Timestamp, ray id, error code, titles, body text and link groups
//! - **Status Row**: Per-component location, name, status text and color, plus error source highlight
//! - **Escaping Control**: Caller HTML in body text is escaped unless explicitly allowed
//! - **Embedded Assets**: Stylesheet and icons for self-hosted pages
//!
//! # Usage
//!
//! ```rust
//! use cloudflare_error_page::{render, ParameterBag, RenderOptions};
//! use serde_json::json;
//!
//! let params = cloudflare_error_page::params::from_value(json!({
//!     "error_code": 502,
//!     "title": "Bad gateway",
//!     "cloudflare_status": { "status": "ok" },
//!     "host_status": { "status": "error", "location": "example.com" },
//!     "error_source": "host",
//! }));
//!
//! let html = render(&params, None).unwrap();
//! assert!(html.contains("Error code 502"));
//!
//! // Escape caller HTML and reference locally served assets
//! let opts = RenderOptions { allow_html: false, use_cdn: false };
//! let html = render(&ParameterBag::new(), Some(&opts)).unwrap();
//! assert!(html.contains("href=\"/cdn-cgi/styles/main.css\""));
//! ```

pub mod page;
pub mod params;
pub mod resources;
pub mod status;

// Re-export main types for convenience
pub use page::{render, render_page, RenderError, RenderOptions};
pub use params::{fill_params, ParameterBag};
pub use resources::{get_resource, resource_path, resources, Resource};
pub use status::{prepare_status, Component, StatusPresentation};
