//! Typed source tree produced by the parser.

use serde_json::{Map, Value};

/// Ordered HTML attributes passed through to the rendered element.
pub type Attrs = Vec<(String, String)>;

/// JSX props of a component element.
pub type Props = Map<String, Value>;

/// A node of the parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Element(Element),
}

/// An element with its kind, pass-through attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub attrs: Attrs,
    pub children: Vec<Node>,
}

/// The closed set of element kinds the parser produces.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// `#` to `######`, level is always 1..=6
    Heading(u8),
    Paragraph,
    Link {
        href: String,
        title: Option<String>,
    },
    Image {
        src: String,
        alt: String,
        title: Option<String>,
    },
    /// Inline `code`; children hold the text
    InlineCode,
    /// Fenced or indented block; no children
    CodeBlock {
        language: Option<String>,
        meta: Option<String>,
        code: String,
    },
    /// Capitalised JSX element such as `MarkdownAlert`
    Component { name: String, props: Props },
    /// Any other element, named by its HTML tag
    Tag(String),
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Shorthand for a plain HTML tag.
    pub fn tag(name: &str) -> Self {
        Self::new(ElementKind::Tag(name.to_string()))
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// The name the element is written as in MDX (`h2`, `a`, `MarkdownAlert`, ...).
    pub fn name(&self) -> String {
        match &self.kind {
            ElementKind::Heading(level) => format!("h{level}"),
            ElementKind::Paragraph => "p".to_string(),
            ElementKind::Link { .. } => "a".to_string(),
            ElementKind::Image { .. } => "img".to_string(),
            ElementKind::InlineCode => "code".to_string(),
            ElementKind::CodeBlock { .. } => "pre".to_string(),
            ElementKind::Component { name, .. } => name.clone(),
            ElementKind::Tag(tag) => tag.clone(),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Concatenated text content of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => match &element.kind {
                ElementKind::CodeBlock { code, .. } => out.push_str(code),
                _ => {
                    for child in &element.children {
                        child.collect_text(out);
                    }
                }
            },
        }
    }

    /// Visit every element depth-first in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        if let Node::Element(element) = self {
            visit(element);
            for child in &element.children {
                child.walk(visit);
            }
        }
    }
}
