//! Code fence info strings.

/// Parsed info string of a fenced code block (```` ```rust title="main.rs" ````).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FenceInfo {
    /// Declared language, lowercased (e.g. "rust")
    pub language: Option<String>,

    /// Everything after the language, trimmed
    pub meta: Option<String>,
}

impl FenceInfo {
    /// Parse a fence info string.
    pub fn parse(info: &str) -> Self {
        let info = info.trim();
        let (language, meta) = match info.split_once(char::is_whitespace) {
            Some((lang, rest)) => (lang, rest.trim()),
            None => (info, ""),
        };

        // `{rust}` and `language-rust` are common spellings in imported posts.
        let language = language
            .trim_start_matches('{')
            .trim_end_matches('}')
            .trim_start_matches("language-")
            .to_lowercase();

        Self {
            language: (!language.is_empty()).then_some(language),
            meta: (!meta.is_empty()).then(|| meta.to_string()),
        }
    }

    /// Title of the block from the meta string, if any.
    ///
    /// Supports formats like:
    /// - `rust title="main.rs"`
    /// - `rust filename="main.rs"`
    /// - `rust file=main.rs`
    pub fn title(&self) -> Option<String> {
        let meta = self.meta.as_deref()?;
        extract_title(meta)
    }
}

fn extract_title(meta: &str) -> Option<String> {
    for key in ["title=\"", "filename=\""] {
        if let Some(start) = meta.find(key) {
            let rest = &meta[start + key.len()..];
            if let Some(end) = rest.find('"') {
                return Some(rest[..end].to_string());
            }
        }
    }

    if let Some(start) = meta.find("file=") {
        let rest = &meta[start + 5..];
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let filename = rest[..end].trim_matches('"');
        if !filename.is_empty() {
            return Some(filename.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language() {
        assert_eq!(FenceInfo::parse("rust").language.as_deref(), Some("rust"));
        assert_eq!(FenceInfo::parse("TSX live").language.as_deref(), Some("tsx"));
        assert_eq!(FenceInfo::parse("{python}").language.as_deref(), Some("python"));
        assert_eq!(FenceInfo::parse("language-go").language.as_deref(), Some("go"));
        assert_eq!(FenceInfo::parse("").language, None);
        assert_eq!(FenceInfo::parse("   ").language, None);
    }

    #[test]
    fn keeps_meta() {
        let info = FenceInfo::parse("rust  title=\"main.rs\" {1,3}");

        assert_eq!(info.meta.as_deref(), Some("title=\"main.rs\" {1,3}"));
        assert_eq!(FenceInfo::parse("rust").meta, None);
    }

    #[test]
    fn extracts_title() {
        assert_eq!(
            FenceInfo::parse("rust title=\"main.rs\"").title(),
            Some("main.rs".to_string())
        );
        assert_eq!(
            FenceInfo::parse("tsx filename=\"Button.tsx\"").title(),
            Some("Button.tsx".to_string())
        );
        assert_eq!(
            FenceInfo::parse("tsx file=Button.tsx live").title(),
            Some("Button.tsx".to_string())
        );
        assert_eq!(FenceInfo::parse("tsx live").title(), None);
    }
}
