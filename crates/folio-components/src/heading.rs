//! Linkable headings.

use std::fmt;

use folio_mdx::{slugify, Attrs};

use crate::component::{Component, RenderContext};
use crate::element::Element;
use crate::view::{View, ViewElement};

/// A heading level, always within 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadingLevel(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("heading level must be between 1 and 6, got {0}")]
pub struct InvalidHeadingLevel(pub u8);

impl HeadingLevel {
    pub fn new(level: u8) -> Result<Self, InvalidHeadingLevel> {
        if (1..=6).contains(&level) {
            Ok(Self(level))
        } else {
            Err(InvalidHeadingLevel(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The HTML tag for this level.
    pub fn tag(self) -> &'static str {
        ["h1", "h2", "h3", "h4", "h5", "h6"][usize::from(self.0 - 1)]
    }

    /// Levels 1 through 6 in order.
    pub fn all() -> impl Iterator<Item = HeadingLevel> {
        (1..=6).map(HeadingLevel)
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = InvalidHeadingLevel;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Renders headings of one fixed level with a slug id and a self-link.
#[derive(Debug, Clone, Copy)]
pub struct HeadingComponent {
    level: HeadingLevel,
}

/// Build the heading renderer for `level`.
pub fn make_heading(level: u8) -> Result<HeadingComponent, InvalidHeadingLevel> {
    Ok(HeadingComponent {
        level: HeadingLevel::new(level)?,
    })
}

impl HeadingComponent {
    pub fn level(&self) -> HeadingLevel {
        self.level
    }

    /// `<hN id="slug"><a href="#slug" class="anchor"></a>children</hN>`
    ///
    /// An author-supplied `id` replaces the slug in both places.
    pub fn render_heading(&self, attrs: Attrs, children: Vec<View>) -> View {
        let (ids, attrs): (Attrs, Attrs) = attrs.into_iter().partition(|(name, _)| name == "id");
        let id = match ids.into_iter().map(|(_, id)| id).find(|id| !id.is_empty()) {
            Some(id) => id,
            None => slugify(&View::Fragment(children.clone()).text_content()),
        };

        ViewElement::new(self.level.tag())
            .attr("id", id.clone())
            .attrs(attrs)
            .child(
                ViewElement::new("a")
                    .attr("href", format!("#{id}"))
                    .attr("class", "anchor"),
            )
            .children(children)
            .into()
    }
}

impl Component for HeadingComponent {
    fn render(&self, element: Element, _cx: &RenderContext<'_>) -> View {
        match element {
            Element::Heading(props) => self.render_heading(props.attrs, props.children),
            other => other.into_default_view(),
        }
    }
}
