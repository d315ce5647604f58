//! Code blocks and inline code.

use crate::component::{Component, RenderContext};
use crate::element::{Element, PreProps};
use crate::view::{View, ViewElement};

/// CSS variable holding a token's light-theme color.
pub const LIGHT_VAR: &str = "--folio-light";
/// CSS variable holding a token's dark-theme color.
pub const DARK_VAR: &str = "--folio-dark";

/// Highlighted source, one token list per line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Highlighted {
    pub lines: Vec<Vec<Token>>,
}

/// A run of source text with its colors in the light and dark themes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Token {
    pub text: String,
    pub light: Option<String>,
    pub dark: Option<String>,
}

impl Token {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Inline style setting both theme variables, `None` for uncolored text.
    pub fn style(&self) -> Option<String> {
        let vars: Vec<String> = [(LIGHT_VAR, &self.light), (DARK_VAR, &self.dark)]
            .into_iter()
            .filter_map(|(var, color)| color.as_ref().map(|c| format!("{var}:{c}")))
            .collect();
        (!vars.is_empty()).then(|| vars.join(";"))
    }

    fn into_view(self) -> View {
        match self.style() {
            Some(style) => ViewElement::new("span")
                .attr("style", style)
                .child(self.text)
                .into(),
            None => View::Text(self.text),
        }
    }
}

impl Highlighted {
    /// Plain lines of `code` with no colors.
    pub fn plain(code: &str) -> Self {
        Self {
            lines: code.lines().map(|line| vec![Token::plain(line)]).collect(),
        }
    }
}

/// The `pre` override: wraps token lines in the styled container.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeBlock;

impl CodeBlock {
    pub fn render_block(&self, props: PreProps, cx: &RenderContext<'_>) -> View {
        let highlighted = props
            .highlighted
            .unwrap_or_else(|| Highlighted::plain(&props.code));

        let mut lines = Vec::with_capacity(highlighted.lines.len() * 2);
        for (i, tokens) in highlighted.lines.into_iter().enumerate() {
            if i > 0 {
                lines.push(View::text("\n"));
            }
            lines.push(
                ViewElement::new("span")
                    .attr("class", "line")
                    .children(tokens.into_iter().map(Token::into_view))
                    .into(),
            );
        }

        let mut code = ViewElement::new("code");
        let mut pre = ViewElement::new("pre").class(&cx.classes.pre).class("folio");
        if let Some(language) = &props.language {
            pre = pre.attr("data-language", language.clone());
            code = code.attr("class", format!("language-{language}"));
        }

        pre.attrs(props.attrs).child(code.children(lines)).into()
    }
}

impl Component for CodeBlock {
    fn render(&self, element: Element, cx: &RenderContext<'_>) -> View {
        match element {
            Element::Pre(props) => self.render_block(props, cx),
            other => other.into_default_view(),
        }
    }
}

/// The `code` override: inline code with the stable code class.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineCode;

impl Component for InlineCode {
    fn render(&self, element: Element, cx: &RenderContext<'_>) -> View {
        match element {
            Element::Code(props) => ViewElement::new("code")
                .class(&cx.classes.code)
                .attrs(props.attrs)
                .children(props.children)
                .into(),
            other => other.into_default_view(),
        }
    }
}
