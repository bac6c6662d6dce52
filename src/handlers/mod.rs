//! HTTP endpoint handlers for the demo server.
//!
//! This module provides handlers for all HTTP endpoints:
//! - `/`: Landing page with links to the demo pages
//! - `/error`: Rendered error page
//! - `/cdn-cgi/*`: Embedded stylesheet and icons

pub mod error_page;
pub mod resources;
pub mod root;

// Re-export handlers
pub use error_page::error_page_handler;
pub use resources::resource_handler;
pub use root::root_handler;
