//! MDX document parser.
//!
//! Markdown structure comes from pulldown-cmark. Raw markup that pulldown-cmark
//! hands over as HTML (or, for tags carrying `{expressions}`, as plain text) is
//! run through the JSX scanner, so components open and close frames on the same
//! stack as Markdown elements. A component left open when its Markdown parent
//! ends, or at the end of the document, is a parse error.

use std::collections::HashMap;
use std::ops::Range;

use pulldown_cmark::{
    Alignment, BlockQuoteKind, CodeBlockKind, Event, Options, Parser, Tag, TagEnd,
};
use serde_json::Value;

use crate::codeblock::FenceInfo;
use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
use crate::jsx::{self, JsxError, JsxTag, JsxToken, PropValue};
use crate::slug::slugify;
use crate::tree::{Element, ElementKind, Node, Props};

/// A parsed MDX document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Top-level nodes, with the footnote section (if any) last
    pub nodes: Vec<Node>,

    /// Table of contents entries for Markdown headings, read from the source text
    pub toc: Vec<TocEntry>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing MDX.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("Parse error at line {line}: <{name}> is never closed")]
    Unclosed { name: String, line: usize },

    #[error("Parse error at line {line}: unexpected closing tag </{name}>")]
    UnexpectedClose { name: String, line: usize },

    #[error("Parse error at line {line}: expected </{expected}>, found </{found}>")]
    Mismatched {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("Parse error at line {line}: {source}")]
    Markup {
        line: usize,
        #[source]
        source: JsxError,
    },
}

impl ParseError {
    /// Line of the source the error points at, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Frontmatter(_) => None,
            ParseError::Unclosed { line, .. }
            | ParseError::UnexpectedClose { line, .. }
            | ParseError::Mismatched { line, .. }
            | ParseError::Markup { line, .. } => Some(*line),
        }
    }
}

const OPTIONS: Options = Options::ENABLE_TABLES
    .union(Options::ENABLE_FOOTNOTES)
    .union(Options::ENABLE_STRIKETHROUGH)
    .union(Options::ENABLE_TASKLISTS)
    .union(Options::ENABLE_GFM);

/// Stand-in for `<` that came from an escape or entity and must stay literal.
const LITERAL_LT: char = '\u{E000}';

/// Parse an MDX document.
///
/// Extracts frontmatter, builds the node tree, collects footnotes at the end
/// and generates a table of contents.
pub fn parse_mdx(source: &str) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    // Count lines in frontmatter to offset line numbers
    let frontmatter_len = source.len() - content.len();
    let line_base = 1 + source[..frontmatter_len].matches('\n').count();

    let mut shared = Shared::default();
    let mut nodes = build_nodes(content, line_base, &mut shared)?;

    shared.footnotes.finish(&mut nodes);

    Ok(ParsedDoc {
        frontmatter,
        nodes,
        toc: shared.toc,
    })
}

/// State shared between the document and the Markdown fragments nested in raw markup.
#[derive(Default)]
struct Shared {
    footnotes: Footnotes,
    toc: Vec<TocEntry>,
}

fn build_nodes(
    source: &str,
    line_base: usize,
    shared: &mut Shared,
) -> Result<Vec<Node>, ParseError> {
    let mut builder = TreeBuilder {
        source,
        line_base,
        shared,
        root: Vec::new(),
        stack: Vec::new(),
        pending: String::new(),
        pending_start: 0,
        code: None,
        html_block: None,
        table: None,
    };

    for (event, range) in Parser::new_ext(source, OPTIONS).into_offset_iter() {
        builder.event(event, range)?;
    }

    builder.finish()
}

#[derive(Debug)]
enum FrameKind {
    Markdown,
    TableBody,
    Jsx { name: String, line: usize },
    Footnote(String),
}

#[derive(Debug)]
struct Frame {
    element: Element,
    kind: FrameKind,
}

#[derive(Debug)]
struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell: usize,
}

struct TreeBuilder<'s, 'm> {
    source: &'s str,
    line_base: usize,
    shared: &'m mut Shared,
    root: Vec<Node>,
    stack: Vec<Frame>,
    /// Text not yet scanned for JSX tags
    pending: String,
    pending_start: usize,
    code: Option<(FenceInfo, String)>,
    html_block: Option<(String, usize)>,
    table: Option<TableState>,
}

impl TreeBuilder<'_, '_> {
    fn line(&self, offset: usize) -> usize {
        let offset = offset.min(self.source.len());
        self.line_base + self.source[..offset].matches('\n').count()
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) -> Result<(), ParseError> {
        match event {
            Event::Start(tag) => self.start(tag, range.start),
            Event::End(tag) => self.end(tag, range.start),
            Event::Text(text) => {
                if let Some((_, code)) = self.code.as_mut() {
                    code.push_str(&text);
                    return Ok(());
                }
                if self.pending.is_empty() {
                    self.pending_start = range.start;
                }
                let escaped = range.start > 0 && self.source.as_bytes()[range.start - 1] == b'\\';
                if self.source.get(range) != Some(&*text) {
                    // Decoded entity or escape: every `<` in it is literal.
                    self.pending.push_str(&text.replace('<', &LITERAL_LT.to_string()));
                } else if escaped && text.starts_with('<') {
                    self.pending.push(LITERAL_LT);
                    self.pending.push_str(&text[1..]);
                } else {
                    self.pending.push_str(&text);
                }
                Ok(())
            }
            Event::SoftBreak => {
                self.pending.push('\n');
                Ok(())
            }
            Event::Html(html) => match self.html_block.as_mut() {
                Some((buffer, _)) => {
                    buffer.push_str(&html);
                    Ok(())
                }
                None => {
                    self.flush_text()?;
                    self.markup(&html, range.start)
                }
            },
            Event::InlineHtml(html) => {
                self.flush_text()?;
                self.markup(&html, range.start)
            }
            Event::Code(code) => {
                self.flush_text()?;
                let element =
                    Element::new(ElementKind::InlineCode).with_children(vec![Node::text(&*code)]);
                self.append(element.into());
                Ok(())
            }
            Event::FootnoteReference(label) => {
                self.flush_text()?;
                let reference = self.shared.footnotes.reference(&label);
                self.append(reference);
                Ok(())
            }
            Event::HardBreak => {
                self.flush_text()?;
                self.append(Element::tag("br").into());
                Ok(())
            }
            Event::Rule => {
                self.flush_text()?;
                self.append(Element::tag("hr").into());
                Ok(())
            }
            Event::TaskListMarker(checked) => {
                self.flush_text()?;
                let mut input = Element::tag("input")
                    .with_attr("type", "checkbox")
                    .with_attr("disabled", "");
                if checked {
                    input = input.with_attr("checked", "");
                }
                self.append(input.into());
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn start(&mut self, tag: Tag<'_>, offset: usize) -> Result<(), ParseError> {
        self.flush_text()?;

        let element = match tag {
            Tag::HtmlBlock => {
                self.html_block = Some((String::new(), offset));
                return Ok(());
            }
            Tag::CodeBlock(kind) => {
                let info = match &kind {
                    CodeBlockKind::Fenced(info) => FenceInfo::parse(info),
                    CodeBlockKind::Indented => FenceInfo::default(),
                };
                self.code = Some((info, String::new()));
                return Ok(());
            }
            Tag::FootnoteDefinition(label) => {
                self.stack.push(Frame {
                    element: Element::tag("li"),
                    kind: FrameKind::Footnote(label.to_string()),
                });
                return Ok(());
            }
            Tag::Table(alignments) => {
                self.table = Some(TableState {
                    alignments,
                    in_head: false,
                    cell: 0,
                });
                Element::tag("table")
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                    table.cell = 0;
                }
                self.push(Element::tag("thead"));
                Element::tag("tr")
            }
            Tag::TableRow => {
                let needs_body = self
                    .stack
                    .last()
                    .is_some_and(|f| f.element.kind == ElementKind::Tag("table".to_string()));
                if needs_body {
                    self.stack.push(Frame {
                        element: Element::tag("tbody"),
                        kind: FrameKind::TableBody,
                    });
                }
                if let Some(table) = self.table.as_mut() {
                    table.cell = 0;
                }
                Element::tag("tr")
            }
            Tag::TableCell => self.table_cell(),
            Tag::Paragraph => Element::new(ElementKind::Paragraph),
            Tag::Heading { level, .. } => Element::new(ElementKind::Heading(level as u8)),
            Tag::BlockQuote(Some(kind)) => alert_element(kind),
            Tag::BlockQuote(None) => Element::tag("blockquote"),
            Tag::List(Some(1)) => Element::tag("ol"),
            Tag::List(Some(start)) => Element::tag("ol").with_attr("start", start.to_string()),
            Tag::List(None) => Element::tag("ul"),
            Tag::Item => Element::tag("li"),
            Tag::Emphasis => Element::tag("em"),
            Tag::Strong => Element::tag("strong"),
            Tag::Strikethrough => Element::tag("del"),
            Tag::Link {
                dest_url, title, ..
            } => Element::new(ElementKind::Link {
                href: dest_url.to_string(),
                title: non_empty(&title),
            }),
            Tag::Image {
                dest_url, title, ..
            } => Element::new(ElementKind::Image {
                src: dest_url.to_string(),
                alt: String::new(),
                title: non_empty(&title),
            }),
            _ => Element::tag("div"),
        };

        self.push(element);
        Ok(())
    }

    fn end(&mut self, tag: TagEnd, offset: usize) -> Result<(), ParseError> {
        self.flush_text()?;

        match tag {
            TagEnd::HtmlBlock => {
                if let Some((buffer, start)) = self.html_block.take() {
                    self.block_markup(&buffer, start)?;
                }
            }
            TagEnd::CodeBlock => {
                if let Some((info, code)) = self.code.take() {
                    let title = info.title();
                    let mut element = Element::new(ElementKind::CodeBlock {
                        language: info.language,
                        meta: info.meta,
                        code,
                    });
                    if let Some(title) = title {
                        element = element.with_attr("data-title", title);
                    }
                    self.append(element.into());
                }
            }
            TagEnd::TableHead => {
                self.close_markdown(offset)?; // tr
                self.close_markdown(offset)?; // thead
                if let Some(table) = self.table.as_mut() {
                    table.in_head = false;
                }
            }
            TagEnd::TableCell => {
                self.close_markdown(offset)?;
                if let Some(table) = self.table.as_mut() {
                    table.cell += 1;
                }
            }
            TagEnd::Table => {
                if matches!(self.stack.last(), Some(Frame { kind: FrameKind::TableBody, .. })) {
                    self.close_markdown(offset)?;
                }
                self.close_markdown(offset)?;
                self.table = None;
            }
            TagEnd::FootnoteDefinition => match self.stack.pop() {
                Some(Frame {
                    element,
                    kind: FrameKind::Footnote(label),
                }) => self.shared.footnotes.define(label, element.children),
                Some(Frame {
                    kind: FrameKind::Jsx { name, line },
                    ..
                }) => return Err(ParseError::Unclosed { name, line }),
                Some(frame) => self.stack.push(frame),
                None => {}
            },
            _ => self.close_markdown(offset)?,
        }

        Ok(())
    }

    fn table_cell(&self) -> Element {
        let Some(table) = self.table.as_ref() else {
            return Element::tag("td");
        };

        let mut cell = Element::tag(if table.in_head { "th" } else { "td" });
        let align = match table.alignments.get(table.cell) {
            Some(Alignment::Left) => Some("left"),
            Some(Alignment::Center) => Some("center"),
            Some(Alignment::Right) => Some("right"),
            _ => None,
        };
        if let Some(align) = align {
            cell = cell.with_attr("style", format!("text-align: {align}"));
        }
        cell
    }

    fn push(&mut self, element: Element) {
        self.stack.push(Frame {
            element,
            kind: FrameKind::Markdown,
        });
    }

    /// Pop the innermost Markdown frame and attach it to its parent.
    fn close_markdown(&mut self, offset: usize) -> Result<(), ParseError> {
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };

        match frame.kind {
            FrameKind::Jsx { name, line } => return Err(ParseError::Unclosed { name, line }),
            FrameKind::Footnote(_) => {
                // Footnote frames are closed by their own end tag.
                tracing::debug!(line = self.line(offset), "ignoring stray end inside footnote");
                self.stack.push(frame);
                return Ok(());
            }
            FrameKind::Markdown | FrameKind::TableBody => {}
        }

        let mut element = frame.element;
        match element.kind {
            ElementKind::Heading(level) => {
                let title: String = element.children.iter().map(Node::text_content).collect();
                let id = slugify(&title);
                self.shared.toc.push(TocEntry { title, id, level });
            }
            ElementKind::Image { ref mut alt, .. } => {
                *alt = element
                    .children
                    .drain(..)
                    .map(|child| child.text_content())
                    .collect();
            }
            ElementKind::Paragraph if is_component_only(&element.children) => {
                for child in element.children {
                    if let Node::Element(_) = child {
                        self.append(child);
                    }
                }
                return Ok(());
            }
            _ => {}
        }

        self.append(element.into());
        Ok(())
    }

    fn append(&mut self, node: Node) {
        let children = match self.stack.last_mut() {
            Some(frame) => &mut frame.element.children,
            None => &mut self.root,
        };

        if let Node::Text(text) = &node {
            if let Some(Node::Text(previous)) = children.last_mut() {
                previous.push_str(text);
                return;
            }
        }
        children.push(node);
    }

    fn append_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.append(Node::text(text.replace(LITERAL_LT, "<")));
        }
    }

    /// Scan buffered text for JSX tags and attach the result.
    fn flush_text(&mut self) -> Result<(), ParseError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let pending = std::mem::take(&mut self.pending);
        if pending.contains('<') {
            self.markup(&pending, self.pending_start)
        } else {
            self.append_text(&pending);
            Ok(())
        }
    }

    /// Attach raw markup found inside a paragraph: text between tags stays text.
    fn markup(&mut self, markup: &str, offset: usize) -> Result<(), ParseError> {
        let tokens = jsx::tokenize(markup).map_err(|source| ParseError::Markup {
            line: self.line(offset),
            source,
        })?;

        for token in tokens {
            match token {
                JsxToken::Text(text) => self.append_text(text),
                JsxToken::Open(tag) => {
                    let line = self.line(offset);
                    self.open_jsx(tag, line);
                }
                JsxToken::Close(name) => self.close_jsx(name, self.line(offset))?,
            }
        }

        Ok(())
    }

    /// Attach an HTML block.
    ///
    /// Block-level tags open and close frames on the stack. Everything between
    /// them, inline tags included, is collected into one run and parsed once:
    /// as phrasing content when it stays on the line of the preceding tag, as
    /// Markdown otherwise.
    fn block_markup(&mut self, markup: &str, offset: usize) -> Result<(), ParseError> {
        let tokens = jsx::tokenize_spans(markup).map_err(|source| ParseError::Markup {
            line: self.line(offset),
            source,
        })?;

        let mut run: Option<Range<usize>> = None;
        let mut open_inline: Vec<String> = Vec::new();

        for (span, token) in tokens {
            let inline = match &token {
                JsxToken::Text(_) => true,
                JsxToken::Open(tag) => {
                    is_phrasing_tag(&tag.name)
                        || (tag.is_component() && !starts_line(markup, span.start))
                }
                JsxToken::Close(name) => open_inline.last() == Some(name),
            };

            if inline {
                match &token {
                    JsxToken::Open(tag) if !tag.self_closing => open_inline.push(tag.name.clone()),
                    JsxToken::Close(_) => {
                        open_inline.pop();
                    }
                    _ => {}
                }
                run = Some(match run {
                    Some(run) => run.start..span.end,
                    None => span,
                });
                continue;
            }

            if let Some(run) = run.take() {
                self.flush_run(markup, offset, run, !open_inline.is_empty())?;
                open_inline.clear();
            }
            let line = self.line(offset + span.start);
            match token {
                JsxToken::Open(tag) => self.open_jsx(tag, line),
                JsxToken::Close(name) => self.close_jsx(name, line)?,
                JsxToken::Text(_) => {}
            }
        }

        if let Some(run) = run {
            self.flush_run(markup, offset, run, !open_inline.is_empty())?;
        }
        Ok(())
    }

    /// Parse one run of an HTML block collected by [`Self::block_markup`].
    fn flush_run(
        &mut self,
        markup: &str,
        offset: usize,
        run: Range<usize>,
        unbalanced: bool,
    ) -> Result<(), ParseError> {
        let text = &markup[run.clone()];
        let content = text.trim();
        if content.is_empty() {
            return Ok(());
        }

        let start = offset + run.start;
        let phrasing = !text.trim_end().contains('\n');
        // A run spanning the whole block would parse back into the same block.
        if phrasing || unbalanced || content == markup.trim() {
            return self.markup(text, start);
        }

        let skipped = text.len() - text.trim_start().len();
        let line = self.line(start + skipped);
        for node in build_nodes(content, line, self.shared)? {
            self.append(node);
        }
        Ok(())
    }

    fn open_jsx(&mut self, tag: JsxTag, line: usize) {
        let name = tag.name.clone();
        let self_closing = tag.self_closing;
        let element = jsx_element(tag);

        if self_closing {
            self.append(element.into());
        } else {
            self.stack.push(Frame {
                element,
                kind: FrameKind::Jsx { name, line },
            });
        }
    }

    fn close_jsx(&mut self, name: String, line: usize) -> Result<(), ParseError> {
        match self.stack.last() {
            Some(Frame {
                kind: FrameKind::Jsx { name: open, .. },
                ..
            }) if *open == name => {}
            Some(Frame {
                kind: FrameKind::Jsx { name: open, .. },
                ..
            }) => {
                return Err(ParseError::Mismatched {
                    expected: open.clone(),
                    found: name,
                    line,
                });
            }
            _ => return Err(ParseError::UnexpectedClose { name, line }),
        }

        if let Some(frame) = self.stack.pop() {
            self.append(frame.element.into());
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Node>, ParseError> {
        self.flush_text()?;

        while let Some(frame) = self.stack.pop() {
            if let FrameKind::Jsx { name, line } = frame.kind {
                return Err(ParseError::Unclosed { name, line });
            }
            self.append(frame.element.into());
        }

        Ok(self.root)
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

const PHRASING_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "del", "dfn", "em", "i",
    "img", "input", "ins", "kbd", "label", "mark", "q", "s", "samp", "small", "span",
    "strong", "sub", "sup", "time", "u", "var", "wbr",
];

fn is_phrasing_tag(name: &str) -> bool {
    PHRASING_TAGS.contains(&name)
}

/// Whether only whitespace precedes `pos` on its line.
fn starts_line(markup: &str, pos: usize) -> bool {
    markup[..pos]
        .rsplit('\n')
        .next()
        .is_some_and(|line| line.trim().is_empty())
}

/// A paragraph holding nothing but components (and whitespace) is flow-level JSX.
fn is_component_only(children: &[Node]) -> bool {
    let mut has_component = false;
    for child in children {
        match child {
            Node::Text(text) if text.trim().is_empty() => {}
            Node::Element(Element {
                kind: ElementKind::Component { .. },
                ..
            }) => has_component = true,
            _ => return false,
        }
    }
    has_component
}

fn alert_element(kind: BlockQuoteKind) -> Element {
    let kind = match kind {
        BlockQuoteKind::Note => "note",
        BlockQuoteKind::Tip => "tip",
        BlockQuoteKind::Important => "important",
        BlockQuoteKind::Warning => "warning",
        BlockQuoteKind::Caution => "caution",
    };

    let mut props = Props::new();
    props.insert("type".to_string(), Value::String(kind.to_string()));
    Element::new(ElementKind::Component {
        name: "MarkdownAlert".to_string(),
        props,
    })
}

/// Convert a scanned JSX tag into a tree element.
fn jsx_element(tag: JsxTag) -> Element {
    if tag.is_component() {
        let props: Props = tag
            .attrs
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        return Element::new(ElementKind::Component {
            name: tag.name,
            props,
        });
    }

    let mut element = Element::tag(&tag.name);
    for (name, value) in &tag.attrs {
        let name = match name.as_str() {
            "className" => "class",
            "htmlFor" => "for",
            other => other,
        };
        let value = match value {
            PropValue::String(s) => s.clone(),
            PropValue::Boolean(true) => String::new(),
            PropValue::Boolean(false) => continue,
            PropValue::Expression(_) => match value.to_json() {
                Value::String(s) => s,
                other => other.to_string(),
            },
        };
        element = element.with_attr(name, value);
    }
    element
}

/// Footnote references and definitions, numbered by first reference.
///
/// References are placeholders until [`Footnotes::finish`], since a definition
/// may come after its first reference. Only defined labels get a number.
#[derive(Debug, Default)]
struct Footnotes {
    order: Vec<String>,
    references: HashMap<String, usize>,
    definitions: HashMap<String, Vec<Node>>,
}

const LABEL_ATTR: &str = "data-footnote";
const OCCURRENCE_ATTR: &str = "data-occurrence";

impl Footnotes {
    /// Register a reference and return its placeholder.
    fn reference(&mut self, label: &str) -> Node {
        if !self.order.iter().any(|l| l == label) {
            self.order.push(label.to_string());
        }

        let count = self.references.entry(label.to_string()).or_insert(0);
        *count += 1;

        Element::tag("sup")
            .with_attr(LABEL_ATTR, label)
            .with_attr(OCCURRENCE_ATTR, count.to_string())
            .into()
    }

    fn define(&mut self, label: String, children: Vec<Node>) {
        self.definitions.insert(label, children);
    }

    /// Number the referenced definitions, append the footnote section to
    /// `nodes` and resolve every reference placeholder.
    fn finish(mut self, nodes: &mut Vec<Node>) {
        let numbered: Vec<String> = std::mem::take(&mut self.order)
            .into_iter()
            .filter(|label| {
                let defined = self.definitions.contains_key(label);
                if !defined {
                    tracing::debug!(label = %label, "footnote referenced but never defined");
                }
                defined
            })
            .collect();

        if let Some(section) = self.section(&numbered) {
            nodes.push(section);
        }

        let numbers: HashMap<&str, usize> = numbered
            .iter()
            .enumerate()
            .map(|(index, label)| (label.as_str(), index + 1))
            .collect();
        resolve_references(nodes, &numbers);
    }

    /// Build the footnote section, or `None` when nothing was referenced.
    fn section(&mut self, numbered: &[String]) -> Option<Node> {
        let mut items = Vec::new();

        for (index, label) in numbered.iter().enumerate() {
            let number = index + 1;
            let Some(mut children) = self.definitions.remove(label) else {
                continue;
            };

            let count = self.references.get(label).copied().unwrap_or(1);
            let backrefs = (1..=count).map(|occurrence| {
                Node::from(
                    Element::new(ElementKind::Link {
                        href: format!("#{}", reference_id(number, occurrence)),
                        title: None,
                    })
                    .with_attr("class", "footnote-backref")
                    .with_attr("aria-label", format!("Back to reference {number}"))
                    .with_children(vec![Node::text("\u{21a9}")]),
                )
            });

            // Back-links go inside the trailing paragraph when there is one.
            match children.last_mut() {
                Some(Node::Element(last)) if last.kind == ElementKind::Paragraph => {
                    for backref in backrefs {
                        last.children.push(Node::text(" "));
                        last.children.push(backref);
                    }
                }
                _ => children.extend(backrefs),
            }

            items.push(Node::from(
                Element::tag("li")
                    .with_attr("id", format!("fn-{number}"))
                    .with_children(children),
            ));
        }

        for label in self.definitions.keys() {
            tracing::debug!(label = %label, "dropping unreferenced footnote");
        }

        if items.is_empty() {
            return None;
        }

        Some(
            Element::tag("section")
                .with_attr("class", "footnotes")
                .with_children(vec![
                    Element::tag("hr").into(),
                    Element::tag("ol").with_children(items).into(),
                ])
                .into(),
        )
    }
}

/// Replace reference placeholders with numbered `sup` links, or with the
/// literal `[^label]` when the label has no number.
fn resolve_references(nodes: &mut [Node], numbers: &HashMap<&str, usize>) {
    for node in nodes.iter_mut() {
        let Node::Element(element) = node else {
            continue;
        };

        let Some((label, occurrence)) = placeholder(element) else {
            resolve_references(&mut element.children, numbers);
            continue;
        };

        *node = match numbers.get(label.as_str()) {
            Some(&number) => reference_marker(number, occurrence),
            None => Node::text(format!("[^{label}]")),
        };
    }
}

fn placeholder(element: &Element) -> Option<(String, usize)> {
    let attr = |name: &str| {
        element
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    };
    let label = attr(LABEL_ATTR)?.to_string();
    let occurrence = attr(OCCURRENCE_ATTR)
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    Some((label, occurrence))
}

fn reference_marker(number: usize, occurrence: usize) -> Node {
    let link = Element::new(ElementKind::Link {
        href: format!("#fn-{number}"),
        title: None,
    })
    .with_attr("class", "footnote-ref")
    .with_children(vec![Node::text(number.to_string())]);

    Element::tag("sup")
        .with_attr("id", reference_id(number, occurrence))
        .with_children(vec![link.into()])
        .into()
}

fn reference_id(number: usize, occurrence: usize) -> String {
    if occurrence == 1 {
        format!("fnref-{number}")
    } else {
        format!("fnref-{number}-{occurrence}")
    }
}
