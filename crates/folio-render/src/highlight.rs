//! Syntax highlighting service.
//!
//! The document renderer asks a [`Highlighter`] for token lines colored in
//! two themes at once; the code block component turns them into
//! `--folio-light`/`--folio-dark` style variables. [`SyntectHighlighter`]
//! is the default implementation.

use std::future::Future;
use std::sync::Arc;

use serde::Deserialize;
use syntect::highlighting::{Color, Style, Theme, ThemeSet};
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use folio_components::{Highlighted, Token};

/// Light and dark theme names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemePair {
    pub light: String,
    pub dark: String,
}

impl Default for ThemePair {
    fn default() -> Self {
        Self {
            light: "InspiredGitHub".to_string(),
            dark: "base16-ocean.dark".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("no syntax for language '{0}'")]
    UnknownLanguage(String),

    #[error("theme not found: {0}")]
    UnknownTheme(String),

    #[error("failed to parse source: {0}")]
    Parse(#[from] syntect::parsing::ParsingError),

    #[error("invalid scope stack: {0}")]
    Scope(#[from] syntect::parsing::ScopeError),

    #[error("highlight task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Highlights source code for a pair of themes.
pub trait Highlighter: Send + Sync {
    fn highlight(
        &self,
        code: &str,
        language: &str,
        themes: &ThemePair,
    ) -> impl Future<Output = Result<Highlighted, HighlightError>> + Send;
}

/// Background and foreground of a theme, as CSS colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: Option<String>,
    pub foreground: Option<String>,
}

/// Highlighter backed by syntect's bundled syntaxes and themes.
///
/// Highlighting runs on tokio's blocking pool. Cloning is cheap.
#[derive(Clone)]
pub struct SyntectHighlighter {
    inner: Arc<Inner>,
}

struct Inner {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SyntectHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntectHighlighter")
            .field("syntaxes", &self.inner.syntaxes.syntaxes().len())
            .field("themes", &self.inner.themes.themes.len())
            .finish()
    }
}

/// Fence names syntect does not know under that name.
fn syntax_token(language: &str) -> &str {
    match language {
        "ts" | "tsx" | "typescript" | "jsx" | "mjs" | "cjs" | "javascript" => "js",
        "sh" | "shell" | "zsh" | "console" | "shellscript" => "bash",
        "yml" => "yaml",
        "rust" => "rs",
        "python" => "py",
        "golang" => "go",
        "c++" | "cxx" => "cpp",
        "c#" | "csharp" => "cs",
        "ruby" => "rb",
        "markdown" | "mdx" => "md",
        other => other,
    }
}

impl SyntectHighlighter {
    /// Load the bundled syntax and theme sets.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                syntaxes: SyntaxSet::load_defaults_newlines(),
                themes: ThemeSet::load_defaults(),
            }),
        }
    }

    /// Whether `language` can be highlighted.
    pub fn supports(&self, language: &str) -> bool {
        self.inner.find_syntax(language).is_some()
    }

    /// Names of the bundled themes, sorted.
    pub fn theme_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.themes.themes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Page colors of the light and dark theme.
    pub fn theme_colors(
        &self,
        themes: &ThemePair,
    ) -> Result<(ThemeColors, ThemeColors), HighlightError> {
        let colors = |name: &str| {
            self.inner.theme(name).map(|theme| ThemeColors {
                background: theme.settings.background.map(css_color),
                foreground: theme.settings.foreground.map(css_color),
            })
        };
        Ok((colors(&themes.light)?, colors(&themes.dark)?))
    }
}

impl Inner {
    fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        let language = language.trim().to_ascii_lowercase();
        let token = syntax_token(&language);
        self.syntaxes
            .find_syntax_by_token(token)
            .or_else(|| self.syntaxes.find_syntax_by_name(&language))
    }

    fn theme(&self, name: &str) -> Result<&Theme, HighlightError> {
        self.themes
            .themes
            .get(name)
            .ok_or_else(|| HighlightError::UnknownTheme(name.to_string()))
    }

    fn highlight(
        &self,
        code: &str,
        language: &str,
        themes: &ThemePair,
    ) -> Result<Highlighted, HighlightError> {
        let syntax = self
            .find_syntax(language)
            .ok_or_else(|| HighlightError::UnknownLanguage(language.to_string()))?;
        let light = syntect::highlighting::Highlighter::new(self.theme(&themes.light)?);
        let dark = syntect::highlighting::Highlighter::new(self.theme(&themes.dark)?);

        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut lines = Vec::new();

        for line in LinesWithEndings::from(code) {
            let ops = state.parse_line(line, &self.syntaxes)?;
            let mut tokens = Vec::new();
            let mut start = 0;

            for (pos, op) in ops {
                if pos > start {
                    push_token(&mut tokens, &line[start..pos], &stack, &light, &dark);
                    start = pos;
                }
                stack.apply(&op)?;
            }
            if start < line.len() {
                push_token(&mut tokens, &line[start..], &stack, &light, &dark);
            }
            lines.push(tokens);
        }

        Ok(Highlighted { lines })
    }
}

/// Append a token, merging with the previous one when the colors match.
/// Line endings are dropped.
fn push_token(
    tokens: &mut Vec<Token>,
    text: &str,
    stack: &ScopeStack,
    light: &syntect::highlighting::Highlighter<'_>,
    dark: &syntect::highlighting::Highlighter<'_>,
) {
    let text = text.trim_end_matches(['\n', '\r']);
    if text.is_empty() {
        return;
    }

    let color = |style: Style| Some(css_color(style.foreground));
    let light = color(light.style_for_stack(stack.as_slice()));
    let dark = color(dark.style_for_stack(stack.as_slice()));

    match tokens.last_mut() {
        Some(last) if last.light == light && last.dark == dark => last.text.push_str(text),
        _ => tokens.push(Token {
            text: text.to_string(),
            light,
            dark,
        }),
    }
}

fn css_color(color: Color) -> String {
    if color.a == 0xff {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", color.r, color.g, color.b, color.a)
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(
        &self,
        code: &str,
        language: &str,
        themes: &ThemePair,
    ) -> impl Future<Output = Result<Highlighted, HighlightError>> + Send {
        let inner = Arc::clone(&self.inner);
        let code = code.to_string();
        let language = language.to_string();
        let themes = themes.clone();

        async move {
            tokio::task::spawn_blocking(move || inner.highlight(&code, &language, &themes)).await?
        }
    }
}
