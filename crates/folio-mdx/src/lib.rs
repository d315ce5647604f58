//! MDX parser for folio content pages.
//!
//! This crate turns MDX source into a typed node tree: Markdown elements,
//! JSX components with their props, code blocks with fence info, and a
//! footnote section collected at the end of the document. Frontmatter and
//! a table of contents are extracted on the way.

pub mod codeblock;
pub mod frontmatter;
pub mod jsx;
pub mod parser;
pub mod slug;
pub mod tree;

pub use codeblock::FenceInfo;
pub use frontmatter::{Frontmatter, FrontmatterError};
pub use jsx::{JsxError, PropValue};
pub use parser::{parse_mdx, ParseError, ParsedDoc, TocEntry};
pub use slug::slugify;
pub use tree::{Attrs, Element, ElementKind, Node, Props};
