//! Theme stylesheet for rendered pages.
//!
//! Code tokens carry both theme colors as CSS variables; this stylesheet
//! picks one per `prefers-color-scheme` and adds base rules for alerts,
//! heading anchors, highlights and footnotes.

use std::fmt::Write;

use folio_components::code::{DARK_VAR, LIGHT_VAR};
use folio_components::AlertKind;

use crate::config::RenderConfig;
use crate::highlight::{HighlightError, SyntectHighlighter, ThemeColors};

#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error(transparent)]
    Theme(#[from] HighlightError),

    #[error("CSS parse error: {0}")]
    Parse(String),

    #[error("CSS minify error: {0}")]
    Minify(String),
}

/// GitHub's alert accent colors.
fn alert_color(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Note => "#0969da",
        AlertKind::Tip => "#1a7f37",
        AlertKind::Important => "#8250df",
        AlertKind::Warning => "#9a6700",
        AlertKind::Caution => "#cf222e",
    }
}

/// Selector of highlighted code containers for the configured `pre` class.
fn code_selector(pre_class: &str) -> String {
    let classes: Vec<&str> = pre_class.split_whitespace().collect();
    if classes.is_empty() {
        ".folio".to_string()
    } else {
        format!(".{}.folio", classes.join("."))
    }
}

fn block_colors(out: &mut String, selector: &str, colors: &ThemeColors, var: &str) {
    let _ = writeln!(out, "{selector} {{");
    if let Some(background) = &colors.background {
        let _ = writeln!(out, "  background-color: {background};");
    }
    if let Some(foreground) = &colors.foreground {
        let _ = writeln!(out, "  color: {foreground};");
    }
    let _ = writeln!(out, "}}\n");
    let _ = writeln!(out, "{selector} span[style] {{\n  color: var({var});\n}}");
}

/// Generate the page stylesheet for `config`'s themes and classes.
pub fn theme_css(config: &RenderConfig) -> Result<String, CssError> {
    let highlighter = SyntectHighlighter::new();
    let (light, dark) = highlighter.theme_colors(&config.themes)?;
    let code = code_selector(&config.classes.pre);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "/* Code themes: {} (light), {} (dark) */\n",
        config.themes.light, config.themes.dark
    );
    block_colors(&mut out, &code, &light, LIGHT_VAR);
    let _ = writeln!(out, "\n@media (prefers-color-scheme: dark) {{");
    block_colors(&mut out, &code, &dark, DARK_VAR);
    let _ = writeln!(out, "}}\n");

    let _ = writeln!(
        out,
        "{code} {{\n  overflow-x: auto;\n  padding: 1rem;\n  border-radius: 0.5rem;\n}}\n\n\
         {code} .line {{\n  min-height: 1.5em;\n}}\n"
    );

    out.push_str(BASE_CSS);

    for kind in AlertKind::ALL {
        let _ = writeln!(
            out,
            "\n.markdown-alert-{name} {{\n  border-left-color: {color};\n}}\n\n\
             .markdown-alert-{name} .markdown-alert-title {{\n  color: {color};\n}}",
            name = kind.as_str(),
            color = alert_color(kind),
        );
    }

    Ok(out)
}

/// Minify CSS using lightningcss.
pub fn minify_css(css: &str) -> Result<String, CssError> {
    use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

    let stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| CssError::Parse(e.to_string()))?;

    let minified = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| CssError::Minify(e.to_string()))?;

    Ok(minified.code)
}

const BASE_CSS: &str = r##"/* Headings */
h1 .anchor,
h2 .anchor,
h3 .anchor,
h4 .anchor,
h5 .anchor,
h6 .anchor {
  margin-right: 0.25em;
  text-decoration: none;
}

h1:hover .anchor::before,
h2:hover .anchor::before,
h3:hover .anchor::before,
h4:hover .anchor::before,
h5:hover .anchor::before,
h6:hover .anchor::before {
  content: "#";
}

/* Alerts */
.markdown-alert {
  margin: 1rem 0;
  padding: 0.5rem 1rem;
  border-left: 0.25em solid #d0d7de;
}

.markdown-alert-title {
  font-weight: 600;
  margin-bottom: 0.25rem;
}

/* Highlights */
mark.highlight {
  padding: 0 0.2em;
  border-radius: 0.2em;
}

mark.highlight-yellow { background-color: #fff8c5; }
mark.highlight-green { background-color: #dafbe1; }
mark.highlight-blue { background-color: #ddf4ff; }
mark.highlight-red { background-color: #ffebe9; }

/* Footnotes */
.footnotes {
  margin-top: 3rem;
  font-size: 0.875em;
}

.footnote-ref,
.footnote-backref {
  text-decoration: none;
}

/* LeetCode links */
.leetcode-difficulty {
  font-size: 0.75em;
  font-weight: 600;
}

.leetcode-easy { color: #1a7f37; }
.leetcode-medium { color: #9a6700; }
.leetcode-hard { color: #cf222e; }
"##;
