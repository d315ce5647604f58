//! Alert callouts and inline highlights.

use folio_mdx::Props;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::component::{Component, RenderContext};
use crate::element::{ComponentProps, Element};
use crate::view::{View, ViewElement};

/// Kinds of alert, as in GitHub's `> [!NOTE]` syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    pub const ALL: [AlertKind; 5] = [
        AlertKind::Note,
        AlertKind::Tip,
        AlertKind::Important,
        AlertKind::Warning,
        AlertKind::Caution,
    ];

    /// Case-insensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::Note => "note",
            AlertKind::Tip => "tip",
            AlertKind::Important => "important",
            AlertKind::Warning => "warning",
            AlertKind::Caution => "caution",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertKind::Note => "Note",
            AlertKind::Tip => "Tip",
            AlertKind::Important => "Important",
            AlertKind::Warning => "Warning",
            AlertKind::Caution => "Caution",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AlertProps {
    #[serde(rename = "type", alias = "kind")]
    kind: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct HighlightProps {
    color: Option<String>,
}

/// Deserialize component props, falling back to defaults on mismatch.
pub(crate) fn props_or_default<T: DeserializeOwned + Default>(name: &str, props: &Props) -> T {
    serde_json::from_value(Value::Object(props.clone())).unwrap_or_else(|err| {
        tracing::warn!(component = name, error = %err, "ignoring invalid props");
        T::default()
    })
}

/// `<MarkdownAlert type="warning">` callout box.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownAlert;

impl MarkdownAlert {
    pub fn render_alert(&self, props: ComponentProps) -> View {
        let AlertProps { kind, title } = props_or_default(&props.name, &props.props);
        let kind = kind.as_deref().and_then(|name| {
            let found = AlertKind::from_name(name);
            if found.is_none() {
                tracing::debug!(kind = name, "unknown alert kind");
            }
            found
        });

        let modifier = kind.map_or("default", AlertKind::as_str);
        let title = title.or_else(|| kind.map(|k| k.label().to_string()));

        let mut alert = ViewElement::new("div")
            .attr("class", format!("markdown-alert markdown-alert-{modifier}"))
            .attr("role", "note");
        if let Some(title) = title {
            alert = alert.child(
                ViewElement::new("p")
                    .attr("class", "markdown-alert-title")
                    .child(title),
            );
        }
        alert.children(props.children).into()
    }
}

impl Component for MarkdownAlert {
    fn render(&self, element: Element, _cx: &RenderContext<'_>) -> View {
        match element {
            Element::Component(props) => self.render_alert(props),
            other => other.into_default_view(),
        }
    }
}

/// `<Highlight color="yellow">` inline mark.
#[derive(Debug, Clone, Copy, Default)]
pub struct Highlight;

impl Component for Highlight {
    fn render(&self, element: Element, _cx: &RenderContext<'_>) -> View {
        let props = match element {
            Element::Component(props) => props,
            other => return other.into_default_view(),
        };

        let HighlightProps { color } = props_or_default(&props.name, &props.props);
        let mut mark = ViewElement::new("mark").class("highlight");
        match color.as_deref().map(str::trim) {
            Some(color) if is_class_safe(color) => {
                mark = mark.class(&format!("highlight-{}", color.to_ascii_lowercase()));
            }
            Some(color) => tracing::debug!(color, "ignoring highlight color"),
            None => {}
        }
        mark.children(props.children).into()
    }
}

fn is_class_safe(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
