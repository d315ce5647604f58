//! Detect bare URLs in plain text.

use std::sync::LazyLock;

use regex::Regex;

use crate::anchor::render_link;
use crate::component::RenderContext;
use crate::view::View;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:https?://|www\.)[^\s<>]+").expect("Invalid URL regex"));

/// A run of plain text or a detected link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Link { url: String, text: String },
}

impl Segment {
    /// The visible text of the segment.
    pub fn text(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Link { text, .. } => text,
        }
    }
}

/// Split `text` into plain runs and links.
///
/// The visible text of the segments concatenates back to `text`. Trailing
/// sentence punctuation stays outside the link, closing brackets are kept
/// when they balance an opening one inside the URL.
///
/// ```
/// use folio_components::autolink::{split_links, Segment};
///
/// let segments = split_links("see www.rust-lang.org.");
/// assert_eq!(segments[1], Segment::Link {
///     url: "https://www.rust-lang.org".into(),
///     text: "www.rust-lang.org".into(),
/// });
/// ```
pub fn split_links(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while let Some(m) = URL_RE.find_at(text, pos) {
        let is_www = m.as_str()[..4].eq_ignore_ascii_case("www.");
        let prefix_len = if is_www { 4 } else { scheme_len(m.as_str()) };
        let candidate = trim_trailing(split_at_next_scheme(m.as_str()));

        let inside_word = is_www
            && text[..m.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '.' || c == '/' || c == '@');

        if candidate.len() <= prefix_len || inside_word {
            pos = m.start() + 1;
            while !text.is_char_boundary(pos) {
                pos += 1;
            }
            continue;
        }

        if plain_start < m.start() {
            segments.push(Segment::Text(text[plain_start..m.start()].to_string()));
        }
        let url = if is_www {
            format!("https://{candidate}")
        } else {
            candidate.to_string()
        };
        segments.push(Segment::Link {
            url,
            text: candidate.to_string(),
        });

        pos = m.start() + candidate.len();
        plain_start = pos;
    }

    if plain_start < text.len() {
        segments.push(Segment::Text(text[plain_start..].to_string()));
    }
    segments
}

fn scheme_len(url: &str) -> usize {
    url.find("://").map_or(0, |i| i + 3)
}

/// Cut a match where a second `http(s)://` starts, so glued URLs split.
fn split_at_next_scheme(url: &str) -> &str {
    let lower = url.to_ascii_lowercase();
    let start = scheme_len(&lower);
    ["http://", "https://"]
        .iter()
        .filter_map(|scheme| lower[start..].find(scheme).map(|i| start + i))
        .filter(|&i| i > 0)
        .min()
        .map_or(url, |i| &url[..i])
}

fn trim_trailing(url: &str) -> &str {
    let mut end = url.len();
    while let Some(c) = url[..end].chars().next_back() {
        let current = &url[..end];
        let keep = match c {
            ')' => current.matches('(').count() >= current.matches(')').count(),
            ']' => current.matches('[').count() >= current.matches(']').count(),
            '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '"' => false,
            _ => true,
        };
        if keep {
            break;
        }
        end -= c.len_utf8();
    }
    &url[..end]
}

/// Render `text` with its URLs turned into links.
pub fn render(text: &str, cx: &RenderContext<'_>) -> Vec<View> {
    split_links(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => View::Text(text),
            Segment::Link { url, text } => {
                render_link(&url, None, Vec::new(), vec![View::Text(text)], cx)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn link(url: &str, text: &str) -> Segment {
        Segment::Link {
            url: url.to_string(),
            text: text.to_string(),
        }
    }

    fn text(text: &str) -> Segment {
        Segment::Text(text.to_string())
    }

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(Segment::text).collect()
    }

    #[test]
    fn empty_input_has_no_segments() {
        assert_eq!(split_links(""), Vec::new());
    }

    #[test]
    fn plain_text_is_one_segment() {
        let input = "No links here, just prose.";
        assert_eq!(split_links(input), vec![text(input)]);
    }

    #[test]
    fn finds_url_in_the_middle() {
        assert_eq!(
            split_links("Hello https://example.com world"),
            vec![
                text("Hello "),
                link("https://example.com", "https://example.com"),
                text(" world"),
            ]
        );
    }

    #[test]
    fn excludes_trailing_punctuation() {
        let input = "Read https://example.com/post.";
        let segments = split_links(input);

        assert_eq!(segments[1], link("https://example.com/post", "https://example.com/post"));
        assert_eq!(segments[2], text("."));
        assert_eq!(joined(&segments), input);
    }

    #[test]
    fn keeps_balanced_parens() {
        let input = "(see https://en.wikipedia.org/wiki/Rust_(language))";
        let segments = split_links(input);

        assert_eq!(
            segments,
            vec![
                text("(see "),
                link(
                    "https://en.wikipedia.org/wiki/Rust_(language)",
                    "https://en.wikipedia.org/wiki/Rust_(language)"
                ),
                text(")"),
            ]
        );
    }

    #[test]
    fn adjacent_urls_are_separate() {
        let input = "https://a.example https://b.example";
        let segments = split_links(input);

        assert_eq!(
            segments,
            vec![
                link("https://a.example", "https://a.example"),
                text(" "),
                link("https://b.example", "https://b.example"),
            ]
        );

        let glued = split_links("https://a.example/https://b.example");
        assert_eq!(glued.len(), 2);
        assert_eq!(joined(&glued), "https://a.example/https://b.example");
    }

    #[test]
    fn www_links_get_a_scheme() {
        assert_eq!(
            split_links("www.example.com"),
            vec![link("https://www.example.com", "www.example.com")]
        );
        assert_eq!(split_links("awww.example.com").len(), 1);
    }

    #[test]
    fn bare_scheme_is_not_a_link() {
        assert_eq!(split_links("try https://."), vec![text("try https://.")]);
    }

    #[test]
    fn concatenation_is_lossless() {
        for input in [
            "Links: http://x.example, https://y.example; www.z.example!",
            "ünïcödé https://example.com/ä?q=1#frag, done",
            "<https://example.com>",
        ] {
            assert_eq!(joined(&split_links(input)), input);
        }
    }

    #[test]
    fn bare_www_prefix_is_not_a_link() {
        for input in ["Go to www.!", "(www.)", "Visit www.. now"] {
            assert_eq!(split_links(input), vec![text(input)], "{input}");
        }
    }

    #[test]
    fn trimmed_scheme_only_is_not_a_link() {
        let input = "See https://. for details";
        assert_eq!(split_links(input), vec![text(input)]);
    }
}
