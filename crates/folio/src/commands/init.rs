//! Initialize a folio project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command in `root`.
pub fn run(root: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");

    let content_dir = root.join("content");
    if !content_dir.exists() {
        fs::create_dir_all(&content_dir).context("Failed to create content directory")?;
    }

    let config_path = root.join("folio.toml");
    if !config_path.exists() || yes {
        fs::write(&config_path, DEFAULT_CONFIG).context("Failed to write folio.toml")?;
        tracing::info!("Created folio.toml");
    } else {
        tracing::warn!("folio.toml already exists. Use --yes to overwrite.");
    }

    let sample_path = content_dir.join("hello.mdx");
    if !sample_path.exists() || yes {
        fs::write(&sample_path, SAMPLE_PAGE).context("Failed to write hello.mdx")?;
        tracing::info!("Created content/hello.mdx");
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio render content/hello.mdx' to see the output.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# folio configuration

# Directory checked by `folio check`
content_dir = "content"

# Links to this host render as internal links
# site_host = "example.com"

[themes]
light = "InspiredGitHub"
dark = "base16-ocean.dark"

[classes]
code = "code"
pre = "pre"
image = "rounded-lg"

[images]
endpoint = "/_image"
widths = [640, 750, 828, 1080, 1200, 1920]
quality = 75
"#;

const SAMPLE_PAGE: &str = r#"---
title: Hello, folio
publishedAt: "2024-01-01"
summary: A first page.
tags: [meta]
---

# Hello, folio

Plain URLs such as https://www.rust-lang.org become links.

<MarkdownAlert type="tip">

Headings get anchors, code gets highlighted.

</MarkdownAlert>

```rust title="main.rs"
fn main() {
    println!("Hello!");
}
```

Footnotes work too[^1].

[^1]: Like this one.
"#;
