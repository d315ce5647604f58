//! Responsive images.
//!
//! The [`ImageLoader`] turns an image request into markup. The default
//! [`ResponsiveImageLoader`] points a `srcset` at an image optimization
//! endpoint; the `Image` component adds the rounded default style.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::alert::props_or_default;
use crate::component::{Component, RenderContext};
use crate::element::Element;
use crate::view::{View, ViewElement};

/// What the page asks the image loading service for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageRequest {
    pub src: String,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub class: Option<String>,
    /// Load eagerly (above the fold)
    pub priority: bool,
}

/// Produces optimized image markup.
pub trait ImageLoader: Send + Sync {
    fn load(&self, request: &ImageRequest) -> View;
}

/// `[images]` section of the site config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Optimization endpoint, called as `{endpoint}?url=..&w=..&q=..`
    pub endpoint: String,
    pub widths: Vec<u32>,
    pub quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            endpoint: "/_image".to_string(),
            widths: vec![640, 750, 828, 1080, 1200, 1920],
            quality: 75,
        }
    }
}

/// Emits `srcset` candidates through the configured endpoint.
#[derive(Debug, Clone, Default)]
pub struct ResponsiveImageLoader {
    config: ImageConfig,
}

impl ResponsiveImageLoader {
    pub fn new(mut config: ImageConfig) -> Self {
        config.widths.sort_unstable();
        config.widths.dedup();
        Self { config }
    }

    fn url_for(&self, src: &str, width: u32) -> String {
        let src: String = url::form_urlencoded::byte_serialize(src.as_bytes()).collect();
        format!(
            "{}?url={src}&w={width}&q={}",
            self.config.endpoint, self.config.quality
        )
    }

    /// Smallest configured width covering `target`, else the largest.
    fn covering(&self, target: u32) -> Option<u32> {
        let widths = &self.config.widths;
        widths
            .iter()
            .copied()
            .find(|&w| w >= target)
            .or_else(|| widths.last().copied())
    }

    /// Candidate widths with their `srcset` descriptors.
    fn candidates(&self, width: Option<u32>) -> Vec<(u32, String)> {
        match width {
            Some(width) => {
                let mut out: Vec<(u32, String)> = Vec::new();
                for (density, target) in [("1x", width), ("2x", width.saturating_mul(2))] {
                    if let Some(w) = self.covering(target) {
                        if out.iter().all(|(seen, _)| *seen != w) {
                            out.push((w, density.to_string()));
                        }
                    }
                }
                out
            }
            None => self
                .config
                .widths
                .iter()
                .map(|&w| (w, format!("{w}w")))
                .collect(),
        }
    }
}

/// Sources the optimizer cannot or need not resize.
fn passthrough(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    lower.starts_with("data:")
        || lower.ends_with(".svg")
        || lower.contains("://")
        || lower.starts_with("//")
}

impl ImageLoader for ResponsiveImageLoader {
    fn load(&self, request: &ImageRequest) -> View {
        let mut img = ViewElement::new("img").attr("alt", request.alt.as_str());

        let candidates = if passthrough(&request.src) {
            Vec::new()
        } else {
            self.candidates(request.width)
        };

        match candidates.last() {
            Some((largest, _)) => {
                let srcset = candidates
                    .iter()
                    .map(|(w, descriptor)| {
                        format!("{} {descriptor}", self.url_for(&request.src, *w))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                img = img
                    .attr("src", self.url_for(&request.src, *largest))
                    .attr("srcset", srcset);
                if request.width.is_none() {
                    img = img.attr("sizes", "100vw");
                }
            }
            None => img = img.attr("src", request.src.as_str()),
        }

        if let Some(width) = request.width {
            img = img.attr("width", width.to_string());
        }
        if let Some(height) = request.height {
            img = img.attr("height", height.to_string());
        }
        img = img
            .attr("loading", if request.priority { "eager" } else { "lazy" })
            .attr("decoding", "async");
        if let Some(class) = &request.class {
            img = img.class(class);
        }
        img.into()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageProps {
    #[serde(default)]
    src: String,
    #[serde(default)]
    alt: String,
    #[serde(default, deserialize_with = "dimension")]
    width: Option<u32>,
    #[serde(default, deserialize_with = "dimension")]
    height: Option<u32>,
    #[serde(alias = "className")]
    class: Option<String>,
    #[serde(default)]
    priority: bool,
}

/// Accept `width={640}` as well as `width="640"`.
fn dimension<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u32>, D::Error> {
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().trim_end_matches("px").parse().ok(),
        _ => None,
    })
}

/// The `Image` component: a responsive image with rounded corners unless
/// the page passes its own class.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundedImage;

impl Component for RoundedImage {
    fn render(&self, element: Element, cx: &RenderContext<'_>) -> View {
        let props = match element {
            Element::Component(props) => props,
            other => return other.into_default_view(),
        };

        let image: ImageProps = props_or_default(&props.name, &props.props);
        if image.src.is_empty() {
            tracing::warn!("Image without a src");
        }
        cx.images.load(&ImageRequest {
            src: image.src,
            alt: image.alt,
            width: image.width,
            height: image.height,
            class: Some(image.class.unwrap_or_else(|| cx.classes.image.clone())),
            priority: image.priority,
        })
    }
}
