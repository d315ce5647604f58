//! Typed elements handed to components.
//!
//! The document renderer converts every node of the source tree into an
//! [`Element`] whose children are already rendered. Components receive the
//! element by value and return a [`View`].

use std::fmt;

use folio_mdx::{Attrs, Props};

use crate::code::Highlighted;
use crate::heading::HeadingLevel;
use crate::view::{View, ViewElement};

/// An element ready to be rendered, with kind-specific props.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Heading(HeadingProps),
    Paragraph(BasicProps),
    Anchor(AnchorProps),
    /// Inline code
    Code(BasicProps),
    /// Code block
    Pre(PreProps),
    Table(BasicProps),
    Img(ImgProps),
    Component(ComponentProps),
    Tag(TagProps),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicProps {
    pub attrs: Attrs,
    pub children: Vec<View>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadingProps {
    pub level: HeadingLevel,
    pub attrs: Attrs,
    pub children: Vec<View>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorProps {
    pub href: String,
    pub title: Option<String>,
    pub attrs: Attrs,
    pub children: Vec<View>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreProps {
    pub language: Option<String>,
    pub meta: Option<String>,
    pub code: String,
    /// Token lines from the highlighting service, absent when it was not
    /// asked or could not help
    pub highlighted: Option<Highlighted>,
    pub attrs: Attrs,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImgProps {
    pub src: String,
    pub alt: String,
    pub title: Option<String>,
    pub attrs: Attrs,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentProps {
    pub name: String,
    pub props: Props,
    pub children: Vec<View>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagProps {
    pub tag: String,
    pub attrs: Attrs,
    pub children: Vec<View>,
}

/// Key of an entry in the override table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKey {
    Heading(HeadingLevel),
    Paragraph,
    Anchor,
    Code,
    Pre,
    Table,
    Img,
    /// Any other lowercase tag
    Tag(String),
    /// Capitalised custom component such as `MarkdownAlert`
    Component(String),
}

impl From<&str> for ElementKey {
    fn from(name: &str) -> Self {
        if name.starts_with(|c: char| c.is_ascii_uppercase()) {
            return ElementKey::Component(name.to_string());
        }
        match name {
            "p" => ElementKey::Paragraph,
            "a" => ElementKey::Anchor,
            "code" => ElementKey::Code,
            "pre" => ElementKey::Pre,
            "table" => ElementKey::Table,
            "img" => ElementKey::Img,
            _ => heading_level(name)
                .map(ElementKey::Heading)
                .unwrap_or_else(|| ElementKey::Tag(name.to_string())),
        }
    }
}

fn heading_level(name: &str) -> Option<HeadingLevel> {
    let digit = name.strip_prefix('h')?;
    HeadingLevel::new(digit.parse().ok()?).ok()
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKey::Heading(level) => write!(f, "{level}"),
            ElementKey::Paragraph => f.write_str("p"),
            ElementKey::Anchor => f.write_str("a"),
            ElementKey::Code => f.write_str("code"),
            ElementKey::Pre => f.write_str("pre"),
            ElementKey::Table => f.write_str("table"),
            ElementKey::Img => f.write_str("img"),
            ElementKey::Tag(name) | ElementKey::Component(name) => f.write_str(name),
        }
    }
}

impl Element {
    /// The override table key this element dispatches on.
    pub fn key(&self) -> ElementKey {
        match self {
            Element::Heading(props) => ElementKey::Heading(props.level),
            Element::Paragraph(_) => ElementKey::Paragraph,
            Element::Anchor(_) => ElementKey::Anchor,
            Element::Code(_) => ElementKey::Code,
            Element::Pre(_) => ElementKey::Pre,
            Element::Table(_) => ElementKey::Table,
            Element::Img(_) => ElementKey::Img,
            Element::Component(props) => ElementKey::Component(props.name.clone()),
            Element::Tag(props) => ElementKey::Tag(props.tag.clone()),
        }
    }

    /// Render without any component: the plain HTML element.
    ///
    /// Custom components nobody registered render as their children.
    pub fn into_default_view(self) -> View {
        match self {
            Element::Heading(props) => ViewElement::new(props.level.tag())
                .attrs(props.attrs)
                .children(props.children)
                .into(),
            Element::Paragraph(props) => basic("p", props),
            Element::Code(props) => basic("code", props),
            Element::Table(props) => basic("table", props),
            Element::Anchor(props) => {
                let mut a = ViewElement::new("a").attr("href", props.href);
                if let Some(title) = props.title {
                    a = a.attr("title", title);
                }
                a.attrs(props.attrs).children(props.children).into()
            }
            Element::Pre(props) => {
                let mut code = ViewElement::new("code");
                if let Some(language) = &props.language {
                    code = code.attr("class", format!("language-{language}"));
                }
                ViewElement::new("pre")
                    .attrs(props.attrs)
                    .child(code.child(props.code))
                    .into()
            }
            Element::Img(props) => {
                let mut img = ViewElement::new("img")
                    .attr("src", props.src)
                    .attr("alt", props.alt);
                if let Some(title) = props.title {
                    img = img.attr("title", title);
                }
                img.attrs(props.attrs).into()
            }
            Element::Component(props) => View::Fragment(props.children),
            Element::Tag(props) => ViewElement::new(props.tag)
                .attrs(props.attrs)
                .children(props.children)
                .into(),
        }
    }
}

fn basic(tag: &str, props: BasicProps) -> View {
    ViewElement::new(tag)
        .attrs(props.attrs)
        .children(props.children)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_keys() {
        assert_eq!(
            ElementKey::from("h3"),
            ElementKey::Heading(HeadingLevel::new(3).unwrap())
        );
        assert_eq!(ElementKey::from("p"), ElementKey::Paragraph);
        assert_eq!(ElementKey::from("table"), ElementKey::Table);
        assert_eq!(ElementKey::from("Table"), ElementKey::Component("Table".into()));
        assert_eq!(ElementKey::from("h7"), ElementKey::Tag("h7".into()));
        assert_eq!(ElementKey::from("header"), ElementKey::Tag("header".into()));
    }

    #[test]
    fn keys_display_as_written() {
        for name in ["h1", "h6", "p", "a", "code", "pre", "img", "blockquote", "LeetCodeLink"] {
            assert_eq!(ElementKey::from(name).to_string(), name);
        }
    }

    #[test]
    fn element_key_matches_kind() {
        let element = Element::Component(ComponentProps {
            name: "MarkdownAlert".into(),
            ..Default::default()
        });

        assert_eq!(element.key(), ElementKey::from("MarkdownAlert"));
    }

    #[test]
    fn unknown_component_renders_children() {
        let element = Element::Component(ComponentProps {
            name: "Unknown".into(),
            props: Props::new(),
            children: vec![View::text("kept")],
        });

        assert_eq!(element.into_default_view().to_html(), "kept");
    }

    #[test]
    fn default_code_block_is_plain() {
        let element = Element::Pre(PreProps {
            language: Some("rust".into()),
            code: "let x = 1 < 2;\n".into(),
            ..Default::default()
        });

        assert_eq!(
            element.into_default_view().to_html(),
            "<pre><code class=\"language-rust\">let x = 1 &lt; 2;\n</code></pre>"
        );
    }
}
