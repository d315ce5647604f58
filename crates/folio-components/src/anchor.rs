//! Links, classified as internal or external.

use folio_mdx::Attrs;
use url::Url;

use crate::component::{Component, RenderContext};
use crate::element::{AnchorProps, Element};
use crate::view::{View, ViewElement};

/// Where a link points relative to the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    Internal,
    External,
}

/// Classify `href` against the site's own host.
///
/// Relative paths, fragments and links to `site_host` are internal. Anything
/// with a scheme or host of its own is external. An href that cannot be
/// parsed is treated as internal.
pub fn classify(href: &str, site_host: Option<&str>) -> LinkTarget {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with('?') {
        return LinkTarget::Internal;
    }

    let parsed = match href.strip_prefix("//") {
        Some(rest) => Url::parse(&format!("https://{rest}")),
        None => Url::parse(href),
    };

    match parsed {
        Ok(url) => match url.host_str() {
            Some(host) if site_host.is_some_and(|site| same_host(host, site)) => {
                LinkTarget::Internal
            }
            _ => LinkTarget::External,
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => LinkTarget::Internal,
        Err(err) => {
            tracing::debug!(href, error = %err, "unparseable link treated as internal");
            LinkTarget::Internal
        }
    }
}

/// Compare hosts ignoring case and a leading `www.`. `site` may be given as
/// a bare host or as a full URL.
fn same_host(host: &str, site: &str) -> bool {
    let site = match Url::parse(site) {
        Ok(url) if url.has_host() => url.host_str().unwrap_or_default().to_string(),
        _ => site.trim_end_matches('/').to_string(),
    };
    let strip = |h: &str| h.strip_prefix("www.").unwrap_or(h).to_ascii_lowercase();
    strip(host) == strip(&site)
}

/// Render an `<a>`, adding new-tab attributes for external targets.
pub fn render_link(
    href: &str,
    title: Option<String>,
    attrs: Attrs,
    children: Vec<View>,
    cx: &RenderContext<'_>,
) -> View {
    let mut a = ViewElement::new("a").attr("href", href);
    if let Some(title) = title {
        a = a.attr("title", title);
    }
    a = a.attrs(attrs);

    if classify(href, cx.site_host) == LinkTarget::External {
        a = a
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer");
    }

    a.children(children).into()
}

/// The `a` override.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anchor;

impl Component for Anchor {
    fn render(&self, element: Element, cx: &RenderContext<'_>) -> View {
        match element {
            Element::Anchor(AnchorProps {
                href,
                title,
                attrs,
                children,
            }) => render_link(&href, title, attrs, children, cx),
            other => other.into_default_view(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ClassNames;
    use crate::image::ResponsiveImageLoader;
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_relative_links_as_internal() {
        assert_eq!(classify("/about", None), LinkTarget::Internal);
        assert_eq!(classify("#intro", None), LinkTarget::Internal);
        assert_eq!(classify("posts/hello", None), LinkTarget::Internal);
        assert_eq!(classify("../up", None), LinkTarget::Internal);
        assert_eq!(classify("", None), LinkTarget::Internal);
    }

    #[test]
    fn classifies_other_hosts_as_external() {
        assert_eq!(classify("https://other.example/about", None), LinkTarget::External);
        assert_eq!(classify("//cdn.example/x.js", None), LinkTarget::External);
        assert_eq!(classify("mailto:me@example.com", None), LinkTarget::External);
    }

    #[test]
    fn own_host_is_internal() {
        let site = Some("example.com");

        assert_eq!(classify("https://example.com/blog", site), LinkTarget::Internal);
        assert_eq!(classify("https://www.Example.com/", site), LinkTarget::Internal);
        assert_eq!(
            classify("https://example.com/", Some("https://www.example.com")),
            LinkTarget::Internal
        );
        assert_eq!(classify("https://blog.example.com", site), LinkTarget::External);
    }

    #[test]
    fn malformed_urls_are_internal() {
        assert_eq!(classify("http://[::1", None), LinkTarget::Internal);
    }

    #[test]
    fn renders_internal_and_external() {
        let classes = ClassNames::default();
        let images = ResponsiveImageLoader::default();
        let cx = RenderContext::new(&classes, &images);

        let internal = render_link("/about", None, Vec::new(), vec![View::text("About")], &cx);
        assert_eq!(internal.to_html(), r#"<a href="/about">About</a>"#);

        let external = render_link(
            "https://other.example/about",
            Some("Other".into()),
            Vec::new(),
            vec![View::text("Other")],
            &cx,
        );
        assert_eq!(
            external.to_html(),
            concat!(
                r#"<a href="https://other.example/about" title="Other" target="_blank" "#,
                r#"rel="noopener noreferrer">Other</a>"#,
            )
        );
    }
}
