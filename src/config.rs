//! Configuration management for cloudflare-error-page.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use cloudflare_error_page::params::{get_error_code, get_str};
use cloudflare_error_page::{Component, ParameterBag, RenderOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::{Args, ConfigFormat, LogLevel};

// Default configuration constants
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Default config file locations, checked in order.
const DEFAULT_CONFIG_PATHS: [&str; 6] = [
    "/etc/cloudflare-error-page/config.yaml",
    "/etc/cloudflare-error-page/config.yml",
    "/etc/cloudflare-error-page/config.json",
    "./cloudflare-error-page.yaml",
    "./cloudflare-error-page.yml",
    "./cloudflare-error-page.json",
];

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub port: Option<u16>,
    pub bind: Option<String>,

    // Logging
    pub log_level: Option<String>,

    // Rendering
    #[serde(alias = "allow-html")]
    pub allow_html: Option<bool>,
    #[serde(alias = "use-cdn")]
    pub use_cdn: Option<bool>,

    /// Page parameters applied on top of the demo defaults
    #[serde(default)]
    pub page: ParameterBag,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: Some(DEFAULT_PORT),
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            log_level: Some("info".into()),
            allow_html: Some(true),
            use_cdn: Some(true),
            page: ParameterBag::new(),
        }
    }
}

impl Config {
    /// Render options with unset flags taking the library defaults.
    pub fn render_options(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        RenderOptions {
            allow_html: self.allow_html.unwrap_or(defaults.allow_html),
            use_cdn: self.use_cdn.unwrap_or(defaults.use_cdn),
        }
    }

    /// Effective log level; unknown names fall back to info.
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(|level| LogLevel::from_str(level, true).ok())
            .unwrap_or(LogLevel::Info)
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<()> {
    if let Some(bind) = cfg.bind.as_deref() {
        if bind.parse::<IpAddr>().is_err() {
            bail!("Invalid bind address '{}', expected an IP address", bind);
        }
    }

    if cfg.port == Some(0) {
        bail!("Invalid port 0, expected 1-65535");
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::from_str(level, true).is_err() {
            bail!(
                "Invalid log_level '{}', expected off, error, warn, info, debug or trace",
                level
            );
        }
    }

    if let Some(code) = get_error_code(&cfg.page) {
        if !(100..=599).contains(&code) {
            bail!("Invalid page.error_code {}, expected 100-599", code);
        }
    }

    if let Some(source) = get_str(&cfg.page, "error_source") {
        if !source.is_empty() && Component::from_id(source).is_none() {
            bail!(
                "Invalid page.error_source '{}', expected browser, cloudflare or host",
                source
            );
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    // Override with CLI args
    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }

    // Only override port if the user supplied it on the CLI.
    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }

    if let Some(level) = &args.log_level {
        config.log_level = Some(format!("{:?}", level).to_lowercase());
    }

    // Rendering flags only ever narrow the defaults
    if args.no_html {
        config.allow_html = Some(false);
    }
    if args.local_assets {
        config.use_cdn = Some(false);
    }

    Ok(config)
}

/// Loads configuration from `path`, or from the first existing default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                bail!("Config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => match DEFAULT_CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON config {}", path.display()))?,
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML config {}", path.display()))?,
        _ => {
            // Default to YAML
            serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML config {}", path.display()))?
        }
    };

    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Serializes configuration in the requested format.
pub fn format_config(config: &Config, format: &ConfigFormat) -> Result<String> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        // Going through a Value puts scalar keys ahead of tables at every level
        ConfigFormat::Toml => toml::to_string_pretty(&toml::Value::try_from(config)?)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: &ConfigFormat) -> Result<()> {
    println!("{}", format_config(config, format)?);
    Ok(())
}
