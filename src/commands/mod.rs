//! CLI command implementations for cloudflare-error-page.
//!
//! This module provides implementations for all CLI subcommands:
//! - `render`: Render an error page to a file
//! - `resources`: List or export embedded assets
//! - `config`: Configuration file generation

pub mod config;
pub mod render;
pub mod resources;

// Re-export command functions
pub use config::command_config;
pub use render::command_render;
pub use resources::command_resources;
