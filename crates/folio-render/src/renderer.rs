//! Document renderer.
//!
//! Turns MDX source into a [`View`] tree: parse, highlight code blocks, then
//! walk the source tree and let the override table render each element.

use std::sync::Arc;

use folio_components::{
    AnchorProps, BasicProps, ComponentProps, Element, HeadingLevel, HeadingProps, Highlighted,
    ImageLoader, ImgProps, OverrideTable, PreProps, RenderContext, ResponsiveImageLoader,
    TagProps, View,
};
use folio_mdx::{parse_mdx, Attrs, ElementKind, Frontmatter, Node, ParseError, TocEntry};

use crate::config::RenderConfig;
use crate::highlight::{Highlighter, SyntectHighlighter};

/// Errors that abort a render. Everything else degrades to a fallback.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to parse document: {0}")]
    Parse(#[from] ParseError),
}

/// Output of a render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub frontmatter: Option<Frontmatter>,
    /// Every rendered heading with an id, in document order
    pub toc: Vec<TocEntry>,
    pub body: View,
}

impl RenderedDocument {
    /// Serialize the body to HTML.
    pub fn to_html(&self) -> String {
        self.body.to_html()
    }

    /// Title from frontmatter, falling back to the first heading.
    pub fn title(&self) -> Option<&str> {
        self.frontmatter
            .as_ref()
            .map(|f| f.title.as_str())
            .filter(|t| !t.is_empty())
            .or_else(|| self.toc.first().map(|e| e.title.as_str()))
    }
}

/// Renders MDX documents with a fixed default override table.
pub struct DocumentRenderer<H = SyntectHighlighter> {
    config: RenderConfig,
    highlighter: H,
    images: Arc<dyn ImageLoader>,
    defaults: OverrideTable,
}

impl DocumentRenderer<SyntectHighlighter> {
    /// Create a renderer with the syntect highlighter.
    pub fn new(config: RenderConfig) -> Self {
        Self::with_highlighter(config, SyntectHighlighter::new())
    }
}

impl<H: Highlighter> DocumentRenderer<H> {
    /// Create a renderer with a custom highlighting service.
    pub fn with_highlighter(config: RenderConfig, highlighter: H) -> Self {
        let images = Arc::new(ResponsiveImageLoader::new(config.images.clone()));
        Self {
            config,
            highlighter,
            images,
            defaults: OverrideTable::defaults(),
        }
    }

    /// Replace the image loading service.
    pub fn with_image_loader(mut self, images: impl ImageLoader + 'static) -> Self {
        self.images = Arc::new(images);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The table used when the caller passes no overrides.
    pub fn defaults(&self) -> &OverrideTable {
        &self.defaults
    }

    /// Render `source`, with `overrides` taking precedence over the defaults.
    pub async fn render(
        &self,
        source: &str,
        overrides: Option<&OverrideTable>,
    ) -> Result<RenderedDocument, RenderError> {
        let table = match overrides {
            Some(caller) => self.defaults.merged(caller),
            None => self.defaults.clone(),
        };

        let doc = parse_mdx(source)?;
        let highlights = self.highlight_blocks(&doc.nodes).await;

        let cx = RenderContext::new(&self.config.classes, &*self.images)
            .with_site_host(self.config.site_host.as_deref());
        let mut walker = Walker {
            table: &table,
            cx,
            highlights: highlights.into_iter(),
        };
        let body = View::Fragment(
            doc.nodes
                .into_iter()
                .map(|node| walker.convert(node))
                .collect(),
        );

        let toc = table_of_contents(&body);
        tracing::debug!(headings = toc.len(), "rendered document");

        Ok(RenderedDocument {
            frontmatter: doc.frontmatter,
            toc,
            body,
        })
    }

    /// Highlight every code block in document order. Blocks without a
    /// language, and blocks the service fails on, get `None`.
    async fn highlight_blocks(&self, nodes: &[Node]) -> Vec<Option<Highlighted>> {
        let mut blocks = Vec::new();
        for node in nodes {
            node.walk(&mut |element| {
                if let ElementKind::CodeBlock { language, code, .. } = &element.kind {
                    blocks.push((language.as_deref(), code.as_str()));
                }
            });
        }

        let mut highlights = Vec::with_capacity(blocks.len());
        for (language, code) in blocks {
            let Some(language) = language else {
                highlights.push(None);
                continue;
            };
            match self
                .highlighter
                .highlight(code, language, &self.config.themes)
                .await
            {
                Ok(highlighted) => highlights.push(Some(highlighted)),
                Err(err) => {
                    tracing::debug!(
                        language,
                        error = %err,
                        "rendering code block without highlighting"
                    );
                    highlights.push(None);
                }
            }
        }
        highlights
    }
}

/// Converts source nodes to views, children first. Code blocks take their
/// highlights in the order `highlight_blocks` produced them.
struct Walker<'a> {
    table: &'a OverrideTable,
    cx: RenderContext<'a>,
    highlights: std::vec::IntoIter<Option<Highlighted>>,
}

impl Walker<'_> {
    fn convert(&mut self, node: Node) -> View {
        match node {
            Node::Text(text) => View::Text(text),
            Node::Element(element) => {
                let element = self.element(element);
                self.table.render(element, &self.cx)
            }
        }
    }

    fn element(&mut self, element: folio_mdx::Element) -> Element {
        let folio_mdx::Element {
            kind,
            mut attrs,
            children,
        } = element;
        let children: Vec<View> = children.into_iter().map(|c| self.convert(c)).collect();

        match kind {
            ElementKind::Heading(level) => heading(level, attrs, children),
            ElementKind::Paragraph => Element::Paragraph(BasicProps { attrs, children }),
            ElementKind::InlineCode => Element::Code(BasicProps { attrs, children }),
            ElementKind::Link { href, title } => Element::Anchor(AnchorProps {
                href,
                title,
                attrs,
                children,
            }),
            ElementKind::Image { src, alt, title } => Element::Img(ImgProps {
                src,
                alt,
                title,
                attrs,
            }),
            ElementKind::Component { name, props } => Element::Component(ComponentProps {
                name,
                props,
                children,
            }),
            ElementKind::Tag(tag) => match tag.as_str() {
                "p" => Element::Paragraph(BasicProps { attrs, children }),
                "code" => Element::Code(BasicProps { attrs, children }),
                "table" => Element::Table(BasicProps { attrs, children }),
                "a" => Element::Anchor(AnchorProps {
                    href: take_attr(&mut attrs, "href").unwrap_or_default(),
                    title: take_attr(&mut attrs, "title"),
                    attrs,
                    children,
                }),
                "img" => Element::Img(ImgProps {
                    src: take_attr(&mut attrs, "src").unwrap_or_default(),
                    alt: take_attr(&mut attrs, "alt").unwrap_or_default(),
                    title: take_attr(&mut attrs, "title"),
                    attrs,
                }),
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    let level = tag.as_bytes()[1] - b'0';
                    heading(level, attrs, children)
                }
                _ => Element::Tag(TagProps {
                    tag,
                    attrs,
                    children,
                }),
            },
            ElementKind::CodeBlock {
                language,
                meta,
                code,
            } => Element::Pre(PreProps {
                language,
                meta,
                code,
                highlighted: self.highlights.next().flatten(),
                attrs,
            }),
        }
    }
}

fn heading(level: u8, attrs: Attrs, children: Vec<View>) -> Element {
    match HeadingLevel::new(level) {
        Ok(level) => Element::Heading(HeadingProps {
            level,
            attrs,
            children,
        }),
        Err(err) => {
            tracing::warn!(error = %err, "rendering heading as a plain tag");
            Element::Tag(TagProps {
                tag: format!("h{level}"),
                attrs,
                children,
            })
        }
    }
}

/// Table of contents read off the rendered headings, so every entry links to
/// an id that is actually on the page. Headings rendered without an id are skipped.
fn table_of_contents(body: &View) -> Vec<TocEntry> {
    body.find_where(|element| heading_level(&element.tag).is_some())
        .into_iter()
        .filter_map(|heading| {
            let level = heading_level(&heading.tag)?;
            let id = heading.get_attr("id").filter(|id| !id.is_empty())?;
            let title: String = heading.children.iter().map(View::text_content).collect();
            Some(TocEntry {
                title: title.trim().to_string(),
                id: id.to_string(),
                level: level.get(),
            })
        })
        .collect()
}

fn heading_level(tag: &str) -> Option<HeadingLevel> {
    let level = tag.strip_prefix('h')?.parse().ok()?;
    HeadingLevel::new(level).ok()
}

fn take_attr(attrs: &mut Attrs, name: &str) -> Option<String> {
    let index = attrs.iter().position(|(n, _)| n == name)?;
    Some(attrs.remove(index).1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::{ready, Future};

    use folio_components::{RenderContext, Token};
    use folio_mdx::ParseError;
    use pretty_assertions::assert_eq;

    use crate::highlight::{HighlightError, ThemePair};

    /// Colors every line with the language name; fails for "broken".
    struct FakeHighlighter;

    impl Highlighter for FakeHighlighter {
        fn highlight(
            &self,
            code: &str,
            language: &str,
            _themes: &ThemePair,
        ) -> impl Future<Output = Result<Highlighted, HighlightError>> + Send {
            let result = if language == "broken" {
                Err(HighlightError::UnknownLanguage(language.to_string()))
            } else {
                Ok(Highlighted {
                    lines: code
                        .lines()
                        .map(|line| {
                            vec![Token {
                                text: line.to_string(),
                                light: Some(format!("#{language}")),
                                dark: None,
                            }]
                        })
                        .collect(),
                })
            };
            ready(result)
        }
    }

    fn renderer() -> DocumentRenderer<FakeHighlighter> {
        let config = RenderConfig {
            site_host: Some("example.com".to_string()),
            ..Default::default()
        };
        DocumentRenderer::with_highlighter(config, FakeHighlighter)
    }

    #[tokio::test]
    async fn renders_heading_with_slug() {
        let doc = renderer().render("# Title", None).await.unwrap();

        let headings = doc.body.find_all("h1");
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].get_attr("id"), Some("title"));
        assert!(doc
            .to_html()
            .contains(r##"<h1 id="title"><a href="#title" class="anchor"></a>Title</h1>"##));
        assert_eq!(doc.toc[0].id, "title");
    }

    #[tokio::test]
    async fn toc_links_match_rendered_heading_ids() {
        let source = "# Intro\n\n## Solve <LeetCodeLink slug=\"two-sum\" />\n\n\
                      <h2 id=\"custom\">Raw heading</h2>\n";
        let doc = renderer().render(source, None).await.unwrap();

        let rendered: Vec<&str> = doc
            .body
            .find_where(|e| heading_level(&e.tag).is_some())
            .into_iter()
            .filter_map(|h| h.get_attr("id"))
            .collect();
        let toc: Vec<&str> = doc.toc.iter().map(|e| e.id.as_str()).collect();

        assert_eq!(toc, rendered);
        assert_eq!(toc, vec!["intro", "solve-two-sum", "custom"]);
        assert_eq!(doc.toc[1].title, "Solve two-sum");
        assert_eq!(doc.toc[2].title, "Raw heading");
        assert_eq!(doc.toc[2].level, 2);
    }

    #[tokio::test]
    async fn unclosed_component_is_a_parse_error() {
        let err = renderer()
            .render("# Hi\n\n<MarkdownAlert type=\"note\">\n\nNever closed\n", None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RenderError::Parse(ParseError::Unclosed { ref name, .. }) if name == "MarkdownAlert"
        ));
    }

    #[tokio::test]
    async fn rendering_is_deterministic() {
        let source = "# Notes\n\nSee https://example.org and [home](/).\n\n> quoted\n";
        let renderer = renderer();

        let first = renderer.render(source, None).await.unwrap();
        let second = renderer.render(source, None).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.to_html(), second.to_html());
    }

    #[tokio::test]
    async fn caller_overrides_win() {
        let caller = OverrideTable::new()
            .with_fn("h1", |element: Element, _: &RenderContext<'_>| {
                let text = element.into_default_view().text_content();
                View::text(format!("[{text}]"))
            });

        let renderer = renderer();
        let doc = renderer.render("# Title\n\n## Sub", Some(&caller)).await.unwrap();

        let html = doc.to_html();
        assert!(html.starts_with("[Title]"));
        assert!(html.contains(r#"<h2 id="sub">"#));
        assert!(renderer.defaults().get(&"h1".into()).is_some());
    }

    #[tokio::test]
    async fn classifies_links() {
        let source = "[About](/about), [Other](https://other.example/about) and \
                      [Home](https://example.com/)";
        let doc = renderer().render(source, None).await.unwrap();

        let links = doc.body.find_all("a");
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].get_attr("target"), None);
        assert_eq!(links[1].get_attr("target"), Some("_blank"));
        assert_eq!(links[1].get_attr("rel"), Some("noopener noreferrer"));
        assert_eq!(links[2].get_attr("target"), None);
    }

    #[tokio::test]
    async fn autolinks_paragraph_text() {
        let doc = renderer()
            .render("Hello https://rust-lang.org world", None)
            .await
            .unwrap();

        let links = doc.body.find_all("a");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].get_attr("href"), Some("https://rust-lang.org"));
        assert_eq!(doc.body.text_content().trim(), "Hello https://rust-lang.org world");
    }

    #[tokio::test]
    async fn highlights_code_blocks_in_order() {
        let source = "```rust\nfn a() {}\n```\n\n```\nplain\n```\n\n```go\nfunc b() {}\n```\n";
        let doc = renderer().render(source, None).await.unwrap();

        let pres = doc.body.find_all("pre");
        assert_eq!(pres.len(), 3);
        assert_eq!(pres[0].get_attr("data-language"), Some("rust"));
        assert_eq!(pres[0].get_attr("class"), Some("pre folio"));

        let html = doc.to_html();
        assert!(html.contains(r#"<span style="--folio-light:#rust">fn a() {}</span>"#));
        assert!(html.contains(r#"<span class="line">plain</span>"#));
        assert!(html.contains(r#"<span style="--folio-light:#go">func b() {}</span>"#));
    }

    #[tokio::test]
    async fn highlight_failure_falls_back_to_plain() {
        let doc = renderer()
            .render("```broken\nx < y\n```\n", None)
            .await
            .unwrap();

        let html = doc.to_html();
        assert!(html.contains(r#"data-language="broken""#));
        assert!(html.contains(r#"<span class="line">x &lt; y</span>"#));
        assert!(!html.contains("--folio-light"));
    }

    #[tokio::test]
    async fn renders_footnotes_section() {
        let source = "Rust is fast[^speed].\n\n[^speed]: Mostly.\n";
        let doc = renderer().render(source, None).await.unwrap();

        let html = doc.to_html();
        assert!(html.contains(r##"<a href="#fn-1""##));
        assert!(html.contains(r#"<section class="footnotes">"#));
        assert!(html.contains(r#"<li id="fn-1">"#));
        assert!(html.contains(r##"href="#fnref-1""##));
    }

    #[tokio::test]
    async fn renders_components() {
        let source = r#"<MarkdownAlert type="tip">

Use **cargo**.

</MarkdownAlert>

<Table data={{ headers: ['Lang'], rows: [['Rust']] }} />

A <Highlight color="yellow">key</Highlight> point, see <LeetCodeLink slug="two-sum" />.
"#;
        let doc = renderer().render(source, None).await.unwrap();

        let html = doc.to_html();
        assert!(html.contains(concat!(
            r#"<div class="markdown-alert markdown-alert-tip" role="note">"#,
            r#"<p class="markdown-alert-title">Tip</p>"#,
        )));
        assert!(html.contains("<strong>cargo</strong>"));
        assert!(html.contains("<th>Lang</th>"));
        assert!(html.contains("<td>Rust</td>"));
        assert!(html.contains(r#"<mark class="highlight highlight-yellow">key</mark>"#));
        assert!(html.contains(r#"href="https://leetcode.com/problems/two-sum/""#));
    }

    #[tokio::test]
    async fn renders_github_alert_blockquote() {
        let doc = renderer()
            .render("> [!WARNING]\n> Mind the gap.\n", None)
            .await
            .unwrap();

        assert!(doc.to_html().contains("markdown-alert-warning"));
    }

    #[tokio::test]
    async fn exposes_frontmatter() {
        let source = "---\ntitle: Hello\ntags: [rust]\n---\n\n# Body heading\n";
        let doc = renderer().render(source, None).await.unwrap();

        assert_eq!(doc.title(), Some("Hello"));
        assert_eq!(
            doc.frontmatter.as_ref().map(|f| f.tags.clone()),
            Some(vec!["rust".to_string()])
        );
    }

    #[tokio::test]
    async fn highlights_with_syntect() {
        let renderer = DocumentRenderer::new(RenderConfig::default());

        let doc = renderer
            .render("```rust\nlet x = 1;\n```\n", None)
            .await
            .unwrap();

        let html = doc.to_html();
        assert!(html.contains("--folio-light:#"));
        assert!(html.contains("--folio-dark:#"));
    }
}
