use crate::autolink;
use crate::component::{Component, RenderContext};
use crate::element::Element;
use crate::view::{View, ViewElement};

/// The `p` override: turns bare URLs in the paragraph's own text into links.
///
/// Only direct text children are scanned. Rendered elements such as links
/// or code pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoLinkParagraph;

impl Component for AutoLinkParagraph {
    fn render(&self, element: Element, cx: &RenderContext<'_>) -> View {
        let props = match element {
            Element::Paragraph(props) => props,
            other => return other.into_default_view(),
        };

        let children = props.children.into_iter().flat_map(|child| match child {
            View::Text(text) => autolink::render(&text, cx),
            other => vec![other],
        });
        ViewElement::new("p").attrs(props.attrs).children(children).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ClassNames;
    use crate::element::BasicProps;
    use crate::image::ResponsiveImageLoader;
    use pretty_assertions::assert_eq;

    fn render(children: Vec<View>) -> String {
        let classes = ClassNames::default();
        let images = ResponsiveImageLoader::default();
        let cx = RenderContext::new(&classes, &images).with_site_host(Some("example.com"));
        let element = Element::Paragraph(BasicProps {
            attrs: Vec::new(),
            children,
        });
        AutoLinkParagraph.render(element, &cx).to_html()
    }

    #[test]
    fn links_urls_in_text() {
        assert_eq!(
            render(vec![View::text("Hello https://rust-lang.org world")]),
            concat!(
                r#"<p>Hello <a href="https://rust-lang.org" target="_blank" "#,
                r#"rel="noopener noreferrer">https://rust-lang.org</a> world</p>"#,
            )
        );
    }

    #[test]
    fn own_site_links_stay_internal() {
        assert_eq!(
            render(vec![View::text("see https://example.com/about")]),
            r#"<p>see <a href="https://example.com/about">https://example.com/about</a></p>"#
        );
    }

    #[test]
    fn leaves_elements_alone() {
        let code: View = ViewElement::new("code")
            .child("https://not-a-link.example")
            .into();

        assert_eq!(
            render(vec![View::text("run "), code]),
            r#"<p>run <code>https://not-a-link.example</code></p>"#
        );
    }
}
