//! Application state management for the demo server.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers.

use cloudflare_error_page::{ParameterBag, RenderOptions};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests.
pub struct AppState {
    pub config: Arc<Config>,
    /// Options passed to every render call.
    pub render_options: RenderOptions,
    /// Page parameters from the config file, applied over the demo defaults.
    pub page_params: ParameterBag,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            render_options: config.render_options(),
            page_params: config.page.clone(),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }
}
