//! `<LeetCodeLink slug="two-sum" difficulty="easy" />`

use serde::Deserialize;

use crate::alert::props_or_default;
use crate::anchor::render_link;
use crate::component::{Component, RenderContext};
use crate::element::Element;
use crate::view::{View, ViewElement};

const PROBLEMS_URL: &str = "https://leetcode.com/problems";

#[derive(Debug, Default, Deserialize)]
struct LeetCodeProps {
    slug: Option<String>,
    title: Option<String>,
    difficulty: Option<String>,
}

/// External link to a LeetCode problem with an optional difficulty badge.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeetCodeLink;

impl Component for LeetCodeLink {
    fn render(&self, element: Element, cx: &RenderContext<'_>) -> View {
        let props = match element {
            Element::Component(props) => props,
            other => return other.into_default_view(),
        };

        let LeetCodeProps {
            slug,
            title,
            difficulty,
        } = props_or_default(&props.name, &props.props);
        let Some(slug) = slug.map(|s| s.trim().trim_matches('/').to_string()) else {
            tracing::warn!("LeetCodeLink without a slug");
            return View::Fragment(props.children);
        };

        let mut children = match title {
            Some(title) => vec![View::Text(title)],
            None if !props.children.is_empty() => props.children,
            None => vec![View::text(slug.as_str())],
        };

        if let Some(difficulty) = difficulty.as_deref().and_then(Difficulty::from_name) {
            children.push(View::text(" "));
            children.push(
                ViewElement::new("span")
                    .attr(
                        "class",
                        format!("leetcode-difficulty leetcode-{}", difficulty.as_str()),
                    )
                    .child(difficulty.label())
                    .into(),
            );
        }

        render_link(
            &format!("{PROBLEMS_URL}/{slug}/"),
            None,
            vec![("class".to_string(), "leetcode-link".to_string())],
            children,
            cx,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}
