//! Frontmatter extraction and parsing.

use serde::Deserialize;

/// Parsed frontmatter from a content page.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    /// Page title
    #[serde(default)]
    pub title: String,

    /// Publication date as written (e.g. `2024-03-01`)
    #[serde(default)]
    pub published_at: Option<String>,

    /// Short summary for listings and meta tags
    #[serde(default)]
    pub summary: Option<String>,

    /// Cover image path
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Drafts are parsed like any other page; hiding them is up to the caller
    #[serde(default)]
    pub draft: bool,
}

/// Extract frontmatter from MDX content.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    // An empty block is valid and yields default frontmatter.
    let frontmatter: Frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Shipping a Rust rewrite
publishedAt: 2024-03-01
summary: Notes from the migration
tags: [rust, web]
---

# Shipping a Rust rewrite
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title, "Shipping a Rust rewrite");
        assert_eq!(fm.published_at.as_deref(), Some("2024-03-01"));
        assert_eq!(fm.summary.as_deref(), Some("Notes from the migration"));
        assert_eq!(fm.tags, vec!["rust".to_string(), "web".to_string()]);
        assert!(!fm.draft);
        assert!(content.starts_with("# Shipping a Rust rewrite"));
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn handles_empty_block() {
        let (fm, content) = extract_frontmatter("---\n---\nBody").unwrap();

        assert_eq!(fm, Some(Frontmatter::default()));
        assert_eq!(content, "Body");
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }
}
