//! The component seam.

use serde::Deserialize;

use crate::element::Element;
use crate::image::ImageLoader;
use crate::view::View;

/// Everything a component may consult besides its element.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Host of the site itself; links to it are internal
    pub site_host: Option<&'a str>,
    pub classes: &'a ClassNames,
    pub images: &'a dyn ImageLoader,
}

impl<'a> RenderContext<'a> {
    pub fn new(classes: &'a ClassNames, images: &'a dyn ImageLoader) -> Self {
        Self {
            site_host: None,
            classes,
            images,
        }
    }

    pub fn with_site_host(mut self, host: Option<&'a str>) -> Self {
        self.site_host = host;
        self
    }
}

/// Stable style classes applied by the default components.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    /// Inline code
    pub code: String,
    /// Code block container
    pub pre: String,
    /// Default class of the `Image` component
    pub image: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            code: "code".to_string(),
            pre: "pre".to_string(),
            image: "rounded-lg".to_string(),
        }
    }
}

/// Renders one kind of element.
///
/// Closures with the matching signature are components too, which keeps
/// one-off overrides short:
///
/// ```
/// use folio_components::{Element, OverrideTable, RenderContext, View};
///
/// let table = OverrideTable::new()
///     .with_fn("hr", |_: Element, _: &RenderContext<'_>| View::text("* * *"));
/// assert!(table.contains(&"hr".into()));
/// ```
pub trait Component: Send + Sync {
    fn render(&self, element: Element, cx: &RenderContext<'_>) -> View;
}

impl<F> Component for F
where
    F: Fn(Element, &RenderContext<'_>) -> View + Send + Sync,
{
    fn render(&self, element: Element, cx: &RenderContext<'_>) -> View {
        self(element, cx)
    }
}
