//! Check that every page in a directory parses.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

/// A page that failed to parse.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub line: Option<usize>,
    pub message: String,
}

/// Find all `.md`/`.mdx` files under `dir`, sorted.
pub fn discover(dir: &Path) -> Vec<PathBuf> {
    let mut pages: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext == "md" || ext == "mdx"
        })
        .collect();
    pages.sort();
    pages
}

/// Parse every page, collecting failures.
pub fn check_pages(pages: &[PathBuf]) -> Vec<Failure> {
    let mut failures = Vec::new();

    for path in pages {
        let result = fs::read_to_string(path)
            .map_err(|e| (None, e.to_string()))
            .and_then(|source| {
                folio_mdx::parse_mdx(&source)
                    .map(|_| ())
                    .map_err(|e| (e.line(), e.to_string()))
            });

        if let Err((line, message)) = result {
            failures.push(Failure {
                path: path.clone(),
                line,
                message,
            });
        }
    }

    failures
}

/// Run the check command.
pub fn run(dir: &Path) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!("Directory not found: {}", dir.display());
    }

    let pages = discover(dir);
    let failures = check_pages(&pages);

    for failure in &failures {
        match failure.line {
            Some(line) => {
                tracing::error!("{}:{}: {}", failure.path.display(), line, failure.message)
            }
            None => tracing::error!("{}: {}", failure.path.display(), failure.message),
        }
    }

    if !failures.is_empty() {
        anyhow::bail!("{} of {} pages failed to parse", failures.len(), pages.len());
    }

    tracing::info!("Checked {} pages, no errors", pages.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn finds_markdown_files_only() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("posts")).unwrap();
        fs::write(temp.path().join("a.mdx"), "# A").unwrap();
        fs::write(temp.path().join("posts/b.md"), "# B").unwrap();
        fs::write(temp.path().join("notes.txt"), "skip").unwrap();

        let pages = discover(temp.path());

        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.extension().is_some_and(|e| e != "txt")));
    }

    #[test]
    fn reports_failures_with_lines() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("good.mdx"), "# Fine\n").unwrap();
        fs::write(temp.path().join("bad.mdx"), "# Title\n\n<Highlight>\n\nnever closed\n").unwrap();

        let failures = check_pages(&discover(temp.path()));

        assert_eq!(failures.len(), 1);
        assert!(failures[0].path.ends_with("bad.mdx"));
        assert_eq!(failures[0].line, Some(3));
        assert!(run(temp.path()).is_err());
    }

    #[test]
    fn clean_directory_passes() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("ok.mdx"), "Hello https://example.com\n").unwrap();

        assert!(run(temp.path()).is_ok());
        assert!(run(&temp.path().join("missing")).is_err());
    }
}
