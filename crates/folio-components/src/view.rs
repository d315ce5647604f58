//! The rendered output tree.
//!
//! Components produce [`View`]s; the page composition layer mounts them or
//! serializes them with [`View::to_html`].

use folio_mdx::jsx::is_void_element;
use folio_mdx::Attrs;

/// A node of rendered output.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Element(ViewElement),
    Text(String),
    /// Several sibling nodes with no wrapper element
    Fragment(Vec<View>),
}

/// A rendered element.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewElement {
    pub tag: String,
    pub attrs: Attrs,
    pub children: Vec<View>,
}

impl ViewElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an earlier value of the same name.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// Merge pass-through attributes. `class` values are appended, others replace.
    pub fn attrs(mut self, attrs: Attrs) -> Self {
        for (name, value) in attrs {
            if name == "class" {
                self = self.class(&value);
            } else {
                self.set_attr(&name, value);
            }
        }
        self
    }

    /// Append to the `class` attribute.
    pub fn class(mut self, class: &str) -> Self {
        if class.is_empty() {
            return self;
        }
        match self.attrs.iter_mut().find(|(n, _)| n == "class") {
            Some((_, existing)) if existing.is_empty() => *existing = class.to_string(),
            Some((_, existing)) => {
                existing.push(' ');
                existing.push_str(class);
            }
            None => self.attrs.push(("class".to_string(), class.to_string())),
        }
        self
    }

    pub fn child(mut self, child: impl Into<View>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = View>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<ViewElement> for View {
    fn from(element: ViewElement) -> Self {
        View::Element(element)
    }
}

impl From<&str> for View {
    fn from(text: &str) -> Self {
        View::Text(text.to_string())
    }
}

impl From<String> for View {
    fn from(text: String) -> Self {
        View::Text(text)
    }
}

impl View {
    pub fn text(text: impl Into<String>) -> Self {
        View::Text(text.into())
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            View::Text(text) => out.push_str(text),
            View::Element(element) => element.children.iter().for_each(|c| c.collect_text(out)),
            View::Fragment(children) => children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// All elements with the given tag, depth-first in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&ViewElement> {
        self.find_where(|element| element.tag == tag)
    }

    /// All elements matching `pred`, depth-first in document order.
    pub fn find_where(&self, pred: impl Fn(&ViewElement) -> bool) -> Vec<&ViewElement> {
        let mut found = Vec::new();
        self.find_into(&pred, &mut found);
        found
    }

    fn find_into<'a>(
        &'a self,
        pred: &dyn Fn(&ViewElement) -> bool,
        found: &mut Vec<&'a ViewElement>,
    ) {
        match self {
            View::Text(_) => {}
            View::Element(element) => {
                if pred(element) {
                    found.push(element);
                }
                element.children.iter().for_each(|c| c.find_into(pred, found));
            }
            View::Fragment(children) => children.iter().for_each(|c| c.find_into(pred, found)),
        }
    }

    /// Serialize to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            View::Text(text) => {
                html_escape::encode_text_to_string(text, out);
            }
            View::Fragment(children) => children.iter().for_each(|c| c.write_html(out)),
            View::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        html_escape::encode_double_quoted_attribute_to_string(value, out);
                        out.push('"');
                    }
                }
                out.push('>');

                if is_void_element(&element.tag) {
                    return;
                }

                for child in &element.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_nested_elements() {
        let view: View = ViewElement::new("p")
            .attr("id", "intro")
            .child("Fish & chips ")
            .child(ViewElement::new("em").child("<now>"))
            .into();

        assert_eq!(
            view.to_html(),
            r#"<p id="intro">Fish &amp; chips <em>&lt;now&gt;</em></p>"#
        );
    }

    #[test]
    fn escapes_attributes_and_skips_void_children() {
        let view: View = ViewElement::new("img")
            .attr("alt", "say \"hi\"")
            .attr("hidden", "")
            .into();

        assert_eq!(view.to_html(), r#"<img alt="say &quot;hi&quot;" hidden>"#);
    }

    #[test]
    fn merges_classes() {
        let element = ViewElement::new("pre")
            .class("pre")
            .attrs(vec![
                ("class".to_string(), "wide".to_string()),
                ("id".to_string(), "a".to_string()),
            ])
            .attr("id", "b");

        assert_eq!(element.get_attr("class"), Some("pre wide"));
        assert_eq!(element.get_attr("id"), Some("b"));
    }

    #[test]
    fn fragments_have_no_wrapper() {
        let view = View::Fragment(vec![View::text("a"), ViewElement::new("br").into()]);

        assert_eq!(view.to_html(), "a<br>");
        assert_eq!(view.text_content(), "a");
        assert_eq!(view.find_all("br").len(), 1);
    }
}
