//! The override table: which component renders which element.
//!
//! [`OverrideTable::defaults`] builds the site's standard table. A caller
//! may pass its own table per render; [`OverrideTable::merged`] lays it over
//! the defaults with the caller winning key by key. Elements whose key is in
//! neither table render with their default HTML.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::alert::{Highlight, MarkdownAlert};
use crate::anchor::Anchor;
use crate::code::{CodeBlock, InlineCode};
use crate::component::{Component, RenderContext};
use crate::element::{Element, ElementKey};
use crate::heading::{make_heading, HeadingLevel};
use crate::image::RoundedImage;
use crate::leetcode::LeetCodeLink;
use crate::paragraph::AutoLinkParagraph;
use crate::table::DataTable;
use crate::view::View;

/// Map from element key to a shared component.
#[derive(Clone, Default)]
pub struct OverrideTable {
    entries: HashMap<ElementKey, Arc<dyn Component>>,
}

impl OverrideTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard component set.
    pub fn defaults() -> Self {
        let mut table = Self::new();

        for level in HeadingLevel::all() {
            // Levels from `all()` are always valid.
            if let Ok(heading) = make_heading(level.get()) {
                table.insert(ElementKey::Heading(level), heading);
            }
        }

        table
            .with("p", AutoLinkParagraph)
            .with("a", Anchor)
            .with("code", InlineCode)
            .with("pre", CodeBlock)
            .with("Image", RoundedImage)
            .with("Table", DataTable)
            .with("MarkdownAlert", MarkdownAlert)
            .with("Highlight", Highlight)
            .with("LeetCodeLink", LeetCodeLink)
    }

    /// Register `component` under `key`, replacing any earlier entry.
    pub fn insert(&mut self, key: impl Into<ElementKey>, component: impl Component + 'static) {
        self.entries.insert(key.into(), Arc::new(component));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: &str, component: impl Component + 'static) -> Self {
        self.insert(key, component);
        self
    }

    /// Register a closure.
    pub fn with_fn<F>(self, key: &str, render: F) -> Self
    where
        F: Fn(Element, &RenderContext<'_>) -> View + Send + Sync + 'static,
    {
        self.with(key, render)
    }

    pub fn get(&self, key: &ElementKey) -> Option<&Arc<dyn Component>> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &ElementKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A copy of `self` with every entry of `caller` laid over it.
    pub fn merged(&self, caller: &OverrideTable) -> Self {
        let mut entries = self.entries.clone();
        for (key, component) in &caller.entries {
            entries.insert(key.clone(), Arc::clone(component));
        }
        Self { entries }
    }

    /// Render `element` with its registered component, or its default HTML.
    pub fn render(&self, element: Element, cx: &RenderContext<'_>) -> View {
        let key = element.key();
        match self.entries.get(&key) {
            Some(component) => component.render(element, cx),
            None => {
                if matches!(key, ElementKey::Component(_)) {
                    tracing::debug!(component = %key, "no override registered, rendering children");
                }
                element.into_default_view()
            }
        }
    }
}

impl fmt::Debug for OverrideTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.entries.keys().map(ToString::to_string).collect();
        keys.sort();
        f.debug_struct("OverrideTable").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ClassNames;
    use crate::element::{BasicProps, ComponentProps, HeadingProps};
    use crate::image::ResponsiveImageLoader;
    use pretty_assertions::assert_eq;

    fn heading(level: u8, text: &str) -> Element {
        Element::Heading(HeadingProps {
            level: HeadingLevel::new(level).unwrap(),
            attrs: Vec::new(),
            children: vec![View::text(text)],
        })
    }

    fn render(table: &OverrideTable, element: Element) -> String {
        let classes = ClassNames::default();
        let images = ResponsiveImageLoader::default();
        let cx = RenderContext::new(&classes, &images);
        table.render(element, &cx).to_html()
    }

    #[test]
    fn defaults_cover_standard_keys() {
        let table = OverrideTable::defaults();

        for key in [
            "h1", "h2", "h3", "h4", "h5", "h6", "p", "a", "code", "pre", "Image", "Table",
            "MarkdownAlert", "Highlight", "LeetCodeLink",
        ] {
            assert!(table.contains(&key.into()), "missing {key}");
        }
        assert_eq!(table.len(), 15);
        assert!(!table.contains(&"img".into()));
    }

    #[test]
    fn caller_override_wins() {
        let caller = OverrideTable::new()
            .with_fn("h2", |_: Element, _: &RenderContext<'_>| View::text("custom"));
        let merged = OverrideTable::defaults().merged(&caller);

        assert_eq!(merged.len(), 15);
        assert_eq!(render(&merged, heading(2, "Intro")), "custom");
        assert_eq!(
            render(&merged, heading(3, "Intro")),
            r##"<h3 id="intro"><a href="#intro" class="anchor"></a>Intro</h3>"##
        );
    }

    #[test]
    fn caller_can_add_keys() {
        let caller = OverrideTable::new().with_fn(
            "blockquote",
            |element: Element, _: &RenderContext<'_>| {
                View::Fragment(vec![View::text("> "), element.into_default_view()])
            },
        );
        let merged = OverrideTable::defaults().merged(&caller);

        let quote = Element::Tag(crate::element::TagProps {
            tag: "blockquote".into(),
            attrs: Vec::new(),
            children: vec![View::text("q")],
        });
        assert_eq!(render(&merged, quote), "&gt; <blockquote>q</blockquote>");
    }

    #[test]
    fn missing_keys_render_default() {
        let table = OverrideTable::new();

        let paragraph = Element::Paragraph(BasicProps {
            attrs: Vec::new(),
            children: vec![View::text("https://example.com")],
        });
        assert_eq!(render(&table, paragraph), "<p>https://example.com</p>");

        let unknown = Element::Component(ComponentProps {
            name: "Sidebar".into(),
            props: Default::default(),
            children: vec![View::text("inner")],
        });
        assert_eq!(render(&table, unknown), "inner");
    }

    #[test]
    fn debug_lists_keys() {
        let table = OverrideTable::new().with("pre", CodeBlock).with("a", Anchor);

        assert_eq!(format!("{table:?}"), r#"OverrideTable { keys: ["a", "pre"] }"#);
    }
}
