//! Document rendering for folio content pages.
//!
//! Parses MDX, highlights code blocks through a [`Highlighter`] and renders
//! every element through the merged override table.

pub mod config;
pub mod css;
pub mod highlight;
pub mod renderer;

pub use config::RenderConfig;
pub use css::{minify_css, theme_css, CssError};
pub use highlight::{HighlightError, Highlighter, SyntectHighlighter, ThemeColors, ThemePair};
pub use renderer::{DocumentRenderer, RenderError, RenderedDocument};
