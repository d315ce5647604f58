//! Print the theme stylesheet.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use folio_render::{minify_css, theme_css, RenderConfig};

/// Run the css command.
pub fn run(config: &RenderConfig, minify: bool, output: Option<&Path>) -> Result<()> {
    let css = theme_css(config).context("Failed to generate theme CSS")?;
    let css = if minify {
        minify_css(&css).context("Failed to minify CSS")?
    } else {
        css
    };

    match output {
        Some(path) => {
            fs::write(path, &css).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{css}"),
    }
    Ok(())
}
