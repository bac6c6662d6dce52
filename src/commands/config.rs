//! Config command implementation.
//!
//! Generates configuration files in various formats.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{format_config, Config};

/// Generates configuration files.
pub fn command_config(output: Option<PathBuf>, format: ConfigFormat, commented: bool) -> Result<()> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("cloudflare-error-page.yaml"));

    let mut content = format_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# Cloudflare Error Page Configuration
# ===================================
#
# Server Configuration
# --------------------
# bind: "0.0.0.0"              # Bind IP (0.0.0.0 = all interfaces)
# port: 8080                   # HTTP port
#
# Logging
# -------
# log_level: "info"            # off, error, warn, info, debug, trace
#
# Rendering
# ---------
# allow_html: true             # Emit caller HTML in body text verbatim
# use_cdn: true                # Reference assets on cloudflare.com instead of /cdn-cgi/
#
# Page Parameters
# ---------------
# page:                        # Applied over the demo defaults for /error
#   error_code: 502
#   title: "Bad gateway"
#   error_source: "host"       # browser, cloudflare or host
#   host_status:
#     status: "error"
#     location: "example.com"
#     status_text: "Unreachable"
#   more_information:
#     hidden: false
#     link: "https://www.cloudflare.com/"
#     text: "cloudflare.com"
#     for: "more information"
#   perf_sec_by:
#     link: "https://www.cloudflare.com/"
#     text: "Cloudflare"
#   creator_info:
#     hidden: true
"#;

    format!("{comments}\n{yaml}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_config_roundtrips_through_loader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("generated.yaml");

        command_config(Some(path.clone()), ConfigFormat::Yaml, true).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Cloudflare Error Page Configuration"));

        let loaded = crate::config::load_config(Some(&path)).unwrap();
        assert_eq!(loaded.port, Config::default().port);
        assert_eq!(loaded.use_cdn, Some(true));
    }
}
