//! JSX tag scanner for raw markup embedded in MDX.
//!
//! Markdown hands raw markup over as opaque strings (`<MarkdownAlert type="note">`,
//! `</Highlight>`, `<Image src="/a.png" width={640} />`). This module splits such a
//! string into opening tags, closing tags and the text between them, and turns
//! attribute values into JSON props.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// A prop value from JSX.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// String literal: type="note"
    String(String),
    /// Boolean (presence): open
    Boolean(bool),
    /// Expression: data={{ headers: [] }}
    Expression(String),
}

impl PropValue {
    /// Get as string if it's a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a JSON value.
    ///
    /// Expressions that look like JSON literals (numbers, arrays, objects, with
    /// bare keys or single quotes allowed) become structured values; any other
    /// expression is kept as its source text.
    pub fn to_json(&self) -> Value {
        match self {
            PropValue::String(s) => Value::String(s.clone()),
            PropValue::Boolean(b) => Value::Bool(*b),
            PropValue::Expression(expr) => expression_to_json(expr),
        }
    }
}

/// An opening (or self-closing) JSX tag.
#[derive(Debug, Clone, PartialEq)]
pub struct JsxTag {
    /// Tag name as written (e.g. "MarkdownAlert", "div")
    pub name: String,

    /// Attributes in source order
    pub attrs: Vec<(String, PropValue)>,

    /// Whether the tag closes itself (`/>` or an HTML void element)
    pub self_closing: bool,
}

impl JsxTag {
    /// Capitalised names are components; everything else is a plain tag.
    pub fn is_component(&self) -> bool {
        is_component_name(&self.name)
    }
}

/// A piece of a raw markup string.
#[derive(Debug, Clone, PartialEq)]
pub enum JsxToken<'a> {
    Open(JsxTag),
    Close(String),
    Text(&'a str),
}

/// Errors from scanning raw markup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsxError {
    #[error("unterminated tag starting at byte {0}")]
    UnterminatedTag(usize),

    #[error("unterminated attribute value in <{0}>")]
    UnterminatedValue(String),

    #[error("unexpected character {found:?} in <{tag}>")]
    Unexpected { tag: String, found: char },
}

/// Whether a tag name refers to a component rather than an HTML element.
pub fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Whether an HTML element never has children.
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Split raw markup into tags and text.
///
/// Comments (`<!-- -->`) are dropped. A `<` that does not start a tag is text.
pub fn tokenize(source: &str) -> Result<Vec<JsxToken<'_>>, JsxError> {
    Ok(tokenize_spans(source)?
        .into_iter()
        .map(|(_, token)| token)
        .collect())
}

/// Like [`tokenize`], with the byte range each token covers in `source`.
pub fn tokenize_spans(source: &str) -> Result<Vec<(Range<usize>, JsxToken<'_>)>, JsxError> {
    let mut tokens = Vec::new();
    let bytes = source.as_bytes();
    let mut text_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'<' {
            pos += 1;
            continue;
        }

        let rest = &source[pos..];
        let (tag_len, token) = if rest.starts_with("<!--") {
            let end = rest
                .find("-->")
                .ok_or(JsxError::UnterminatedTag(pos))?;
            (end + 3, None)
        } else if let Some(after) = rest.strip_prefix("</") {
            if !after.starts_with(|c: char| c.is_ascii_alphabetic()) {
                pos += 1;
                continue;
            }
            let end = after.find('>').ok_or(JsxError::UnterminatedTag(pos))?;
            (end + 3, Some(JsxToken::Close(after[..end].trim().to_string())))
        } else if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let (tag, len) = parse_open_tag(rest).map_err(|e| match e {
                ScanError::Eof => JsxError::UnterminatedTag(pos),
                ScanError::Jsx(e) => e,
            })?;
            (len, Some(JsxToken::Open(tag)))
        } else {
            pos += 1;
            continue;
        };

        push_text(&mut tokens, source, text_start..pos);
        if let Some(token) = token {
            tokens.push((pos..pos + tag_len, token));
        }
        pos += tag_len;
        text_start = pos;
    }

    push_text(&mut tokens, source, text_start..source.len());
    Ok(tokens)
}

fn push_text<'a>(
    tokens: &mut Vec<(Range<usize>, JsxToken<'a>)>,
    source: &'a str,
    range: Range<usize>,
) {
    if !range.is_empty() {
        tokens.push((range.clone(), JsxToken::Text(&source[range])));
    }
}

enum ScanError {
    Eof,
    Jsx(JsxError),
}

/// Parse `<Name attr="x" flag data={...}>` at the start of `source`.
///
/// Returns the tag and the number of bytes consumed.
fn parse_open_tag(source: &str) -> Result<(JsxTag, usize), ScanError> {
    let mut chars = source.char_indices().peekable();
    chars.next(); // '<'

    let mut name = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':') {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }

    let mut attrs = Vec::new();

    loop {
        while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
            chars.next();
        }

        let Some((idx, c)) = chars.next() else {
            return Err(ScanError::Eof);
        };

        match c {
            '>' => {
                let self_closing = is_void_element(&name);
                return Ok((JsxTag { name, attrs, self_closing }, idx + 1));
            }
            '/' => match chars.next() {
                Some((end, '>')) => {
                    return Ok((
                        JsxTag {
                            name,
                            attrs,
                            self_closing: true,
                        },
                        end + 1,
                    ));
                }
                Some((_, found)) => {
                    return Err(ScanError::Jsx(JsxError::Unexpected { tag: name, found }));
                }
                None => return Err(ScanError::Eof),
            },
            c if c.is_alphabetic() || c == '_' => {
                let mut attr = String::from(c);
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.') {
                        attr.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }

                while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
                    chars.next();
                }

                if chars.peek().is_some_and(|&(_, c)| c == '=') {
                    chars.next();
                    while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
                        chars.next();
                    }
                    let value = scan_value(&mut chars, &name)?;
                    attrs.push((attr, value));
                } else {
                    attrs.push((attr, PropValue::Boolean(true)));
                }
            }
            found => return Err(ScanError::Jsx(JsxError::Unexpected { tag: name, found })),
        }
    }
}

fn scan_value(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    tag: &str,
) -> Result<PropValue, ScanError> {
    let unterminated = || ScanError::Jsx(JsxError::UnterminatedValue(tag.to_string()));

    match chars.next() {
        Some((_, quote @ ('"' | '\''))) => {
            let mut value = String::new();
            for (_, c) in chars.by_ref() {
                if c == quote {
                    return Ok(PropValue::String(value));
                }
                value.push(c);
            }
            Err(unterminated())
        }
        Some((_, '{')) => {
            let mut value = String::new();
            let mut depth = 1;
            let mut in_string: Option<char> = None;
            let mut escaped = false;

            for (_, c) in chars.by_ref() {
                if let Some(quote) = in_string {
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == quote {
                        in_string = None;
                    }
                    value.push(c);
                    continue;
                }

                match c {
                    '"' | '\'' | '`' => in_string = Some(c),
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(PropValue::Expression(value.trim().to_string()));
                        }
                    }
                    _ => {}
                }
                value.push(c);
            }
            Err(unterminated())
        }
        Some((_, found)) => Err(ScanError::Jsx(JsxError::Unexpected {
            tag: tag.to_string(),
            found,
        })),
        None => Err(ScanError::Eof),
    }
}

static BARE_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([{,]\s*)([A-Za-z_$][A-Za-z0-9_$]*)\s*:").expect("Invalid bare key regex")
});

static SINGLE_QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([^'\\]*)'").expect("Invalid single quote regex"));

static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("Invalid trailing comma regex"));

fn expression_to_json(expr: &str) -> Value {
    if let Ok(value) = serde_json::from_str(expr) {
        return value;
    }

    let normalized = SINGLE_QUOTE_RE.replace_all(expr, "\"$1\"");
    let normalized = BARE_KEY_RE.replace_all(&normalized, "$1\"$2\":");
    let normalized = TRAILING_COMMA_RE.replace_all(&normalized, "$1");

    serde_json::from_str(&normalized).unwrap_or_else(|_| Value::String(expr.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn open(tokens: &[JsxToken<'_>], index: usize) -> JsxTag {
        match &tokens[index] {
            JsxToken::Open(tag) => tag.clone(),
            other => panic!("expected open tag, got {other:?}"),
        }
    }

    #[test]
    fn parses_self_closing() {
        let tokens = tokenize(r#"<Image src="/me.png" alt="Me" />"#).unwrap();

        assert_eq!(tokens.len(), 1);
        let tag = open(&tokens, 0);
        assert_eq!(tag.name, "Image");
        assert!(tag.self_closing);
        assert!(tag.is_component());
        assert_eq!(
            tag.attrs,
            vec![
                ("src".to_string(), PropValue::String("/me.png".to_string())),
                ("alt".to_string(), PropValue::String("Me".to_string())),
            ]
        );
    }

    #[test]
    fn parses_with_children() {
        let tokens = tokenize(r#"<Highlight color="yellow">key point</Highlight>"#).unwrap();

        assert_eq!(tokens.len(), 3);
        assert_eq!(open(&tokens, 0).name, "Highlight");
        assert_eq!(tokens[1], JsxToken::Text("key point"));
        assert_eq!(tokens[2], JsxToken::Close("Highlight".to_string()));
    }

    #[test]
    fn parses_boolean_props() {
        let tokens = tokenize("<details open>").unwrap();
        let tag = open(&tokens, 0);

        assert_eq!(tag.attrs, vec![("open".to_string(), PropValue::Boolean(true))]);
        assert!(!tag.self_closing);
    }

    #[test]
    fn parses_nested_expression_props() {
        let tokens =
            tokenize(r#"<Table data={{ headers: ["A", "B"], rows: [["1", "}"]] }} />"#).unwrap();
        let tag = open(&tokens, 0);
        let (name, value) = &tag.attrs[0];

        assert_eq!(name, "data");
        assert_eq!(
            value.to_json(),
            json!({ "headers": ["A", "B"], "rows": [["1", "}"]] })
        );
    }

    #[test]
    fn expression_falls_back_to_source_text() {
        let value = PropValue::Expression("props.items.length".to_string());
        assert_eq!(value.to_json(), json!("props.items.length"));

        let value = PropValue::Expression("{ a: 'x', b: 2, }".to_string());
        assert_eq!(value.to_json(), json!({ "a": "x", "b": 2 }));

        assert_eq!(PropValue::Expression("640".to_string()).to_json(), json!(640));
    }

    #[test]
    fn reports_token_spans() {
        let source = "Hi <b>there</b><!-- note -->!";
        let spans: Vec<_> = tokenize_spans(source)
            .unwrap()
            .into_iter()
            .map(|(range, _)| &source[range])
            .collect();

        assert_eq!(spans, vec!["Hi ", "<b>", "there", "</b>", "!"]);
    }

    #[test]
    fn void_elements_close_themselves() {
        let tokens = tokenize("<br>").unwrap();
        assert!(open(&tokens, 0).self_closing);
    }

    #[test]
    fn drops_comments_and_keeps_stray_angles() {
        let tokens = tokenize("a <!-- hidden --> 1 < 2").unwrap();

        assert_eq!(tokens, vec![JsxToken::Text("a "), JsxToken::Text(" 1 < 2")]);
    }

    #[test]
    fn errors_on_unterminated_tag() {
        assert_eq!(
            tokenize(r#"<MarkdownAlert type="note""#),
            Err(JsxError::UnterminatedTag(0))
        );
        assert!(matches!(
            tokenize(r#"<Table data={{ rows: [] }"#),
            Err(JsxError::UnterminatedValue(_))
        ));
    }
}
