//! Render command implementation.
//!
//! Renders a page from a params file or a built-in preset and writes it to a
//! file or stdout.

use anyhow::{Context, Result};
use cloudflare_error_page::params::from_value;
use cloudflare_error_page::{render, ParameterBag, RenderOptions};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::Preset;

/// Renders an error page.
pub fn command_render(
    params_file: Option<PathBuf>,
    preset: Preset,
    output: PathBuf,
    options: RenderOptions,
) -> Result<()> {
    let params = match &params_file {
        Some(path) => load_params(path)?,
        None => {
            debug!("Using preset {:?}", preset);
            preset_params(preset)
        }
    };

    let html = render(&params, Some(&options)).context("Failed to render error page")?;

    if output.to_string_lossy() == "-" {
        print!("{}", html);
    } else {
        fs::write(&output, html)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Rendered page written to {}", output.display());
        println!("✅ Error page generated successfully: {}", output.display());
    }

    Ok(())
}

/// Reads page parameters from a JSON or YAML file.
///
/// A file whose top level is not a mapping yields an empty bag.
pub fn load_params(path: &Path) -> Result<ParameterBag> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read params file {}", path.display()))?;

    let value: Value = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?,
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?,
    };

    Ok(from_value(value))
}

/// Parameters for the built-in presets.
pub fn preset_params(preset: Preset) -> ParameterBag {
    let value = match preset {
        Preset::Default => json!({
            "browser_status": { "status": "ok" },
            "cloudflare_status": { "status": "error", "status_text": "Error" },
            "host_status": { "status": "ok", "location": "example.com" },
            "error_source": "cloudflare",
            "what_happened": "<p>There is an internal server error on Cloudflare's network.</p>",
            "what_can_i_do": "<p>Please try again in a few minutes.</p>",
        }),
        Preset::Catastrophic => json!({
            "title": "Catastrophic infrastructure failure",
            "more_information": { "for": "no information" },
            "browser_status": { "status": "error", "status_text": "Out of Memory" },
            "cloudflare_status": {
                "status": "error",
                "location": "Everywhere",
                "status_text": "Error",
            },
            "host_status": {
                "status": "error",
                "location": "example.com",
                "status_text": "On Fire",
            },
            "error_source": "cloudflare",
            "what_happened": "<p>There is a catastrophic failure.</p>",
            "what_can_i_do": "<p>Please try again in a few years.</p>",
        }),
    };
    from_value(value)
}
