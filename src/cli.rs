//! CLI arguments and subcommands for cloudflare-error-page.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Built-in parameter sets for the render command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Cloudflare itself is the error source, everything else works
    Default,
    /// Every component is failing
    Catastrophic,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "cloudflare-error-page",
    about = "Render Cloudflare-style edge error pages",
    long_about = "Render Cloudflare-style edge error pages.\n\n\
                  Without a subcommand, starts a small demo server that serves the rendered \
                  page at /error and the embedded stylesheet and icons under /cdn-cgi/.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Bind to specific interface/IP
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Log level (overrides log_level from the config file; default info)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Escape caller-supplied HTML in body text
    #[arg(long)]
    pub no_html: bool,

    /// Reference assets at /cdn-cgi/ on this server instead of the CDN
    #[arg(long)]
    pub local_assets: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render an error page to a file
    Render {
        /// JSON or YAML file with page parameters (overrides --preset)
        #[arg(long)]
        params: Option<PathBuf>,

        /// Built-in parameter set used when no params file is given
        #[arg(long, value_enum, default_value = "default")]
        preset: Preset,

        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long, default_value = "error.html")]
        output: PathBuf,

        /// Escape caller-supplied HTML in body text
        #[arg(long)]
        no_html: bool,

        /// Reference assets with root-relative /cdn-cgi/ paths
        #[arg(long)]
        local_assets: bool,
    },

    /// List embedded assets, or export them into a directory
    Resources {
        /// Target directory; files keep their cdn-cgi/ layout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Generate configuration files
    Config {
        /// Output file path
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}
