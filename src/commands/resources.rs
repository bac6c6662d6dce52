//! Resources command implementation.
//!
//! Lists the embedded assets or writes them out for static hosting.

use anyhow::{Context, Result};
use cloudflare_error_page::resources;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lists or exports embedded resources.
pub fn command_resources(output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(dir) => {
            let written = export_resources(&dir)?;
            println!(
                "✅ Exported {} resources to: {}",
                written.len(),
                dir.display()
            );
        }
        None => {
            println!("📦 Embedded resources");
            println!("=====================");
            for resource in resources() {
                println!(
                    "   /{:40} {:>6} bytes  {}",
                    resource.path,
                    resource.bytes.len(),
                    resource.content_type
                );
            }
        }
    }
    Ok(())
}

/// Writes every embedded resource below `dir`, keeping its relative path.
pub fn export_resources(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(resources().len());

    for resource in resources() {
        let target = dir.join(resource.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&target, resource.bytes)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        debug!("Wrote {}", target.display());
        written.push(target);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_resources() {
        let dir = TempDir::new().unwrap();
        let written = export_resources(dir.path()).unwrap();

        assert_eq!(written.len(), resources().len());
        let css = dir.path().join("cdn-cgi/styles/main.css");
        assert!(css.exists());
        assert!(fs::metadata(css).unwrap().len() > 0);
    }
}
