//! Components for folio content pages.
//!
//! This crate provides the output [`View`] tree, the typed [`Element`]s the
//! document renderer hands to components, the default components (linkable
//! headings, auto-linking paragraphs, anchors, code blocks, alerts, data
//! tables, responsive images) and the [`OverrideTable`] that maps element
//! names to them.

pub mod alert;
pub mod anchor;
pub mod autolink;
pub mod code;
pub mod component;
pub mod element;
pub mod heading;
pub mod image;
pub mod leetcode;
pub mod overrides;
pub mod paragraph;
pub mod table;
pub mod view;

pub use alert::{AlertKind, Highlight, MarkdownAlert};
pub use anchor::{classify, render_link, Anchor, LinkTarget};
pub use autolink::{split_links, Segment};
pub use code::{CodeBlock, Highlighted, InlineCode, Token};
pub use component::{ClassNames, Component, RenderContext};
pub use element::{
    AnchorProps, BasicProps, ComponentProps, Element, ElementKey, HeadingProps, ImgProps,
    PreProps, TagProps,
};
pub use heading::{make_heading, HeadingComponent, HeadingLevel, InvalidHeadingLevel};
pub use image::{ImageConfig, ImageLoader, ImageRequest, ResponsiveImageLoader, RoundedImage};
pub use leetcode::LeetCodeLink;
pub use overrides::OverrideTable;
pub use paragraph::AutoLinkParagraph;
pub use table::{DataTable, TableData};
pub use view::{View, ViewElement};
