//! Render a single page.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use folio_render::{DocumentRenderer, RenderConfig};

/// Run the render command, writing HTML to `output` or stdout.
pub async fn run(config: RenderConfig, file: &Path, output: Option<&Path>) -> Result<()> {
    let start = Instant::now();

    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let renderer = DocumentRenderer::new(config);
    let doc = renderer
        .render(&source, None)
        .await
        .with_context(|| format!("Failed to render {}", file.display()))?;

    if doc.frontmatter.as_ref().is_some_and(|f| f.draft) {
        tracing::warn!("{} is marked as a draft", file.display());
    }

    let html = doc.to_html();
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).context("Failed to create output directory")?;
            }
            fs::write(path, &html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                "Rendered {} to {} in {}ms",
                doc.title().unwrap_or("untitled page"),
                path.display(),
                start.elapsed().as_millis()
            );
        }
        None => println!("{html}"),
    }

    Ok(())
}
