//! The `Table` component, built from a `data` prop.

use serde::Deserialize;
use serde_json::Value;

use crate::alert::props_or_default;
use crate::component::{Component, RenderContext};
use crate::element::Element;
use crate::view::{View, ViewElement};

/// Headers and rows of a data table. Rows are rendered as given, even when
/// their lengths differ from the header row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TableData {
    #[serde(deserialize_with = "cells")]
    pub headers: Vec<String>,
    #[serde(deserialize_with = "rows")]
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct DataTableProps {
    data: Option<TableData>,
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn cells<'de, D: serde::Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    let values = Vec::<Value>::deserialize(de)?;
    Ok(values.into_iter().map(cell_text).collect())
}

fn rows<'de, D: serde::Deserializer<'de>>(de: D) -> Result<Vec<Vec<String>>, D::Error> {
    let rows = Vec::<Vec<Value>>::deserialize(de)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect())
}

impl TableData {
    pub fn to_view(&self) -> View {
        let headers = self
            .headers
            .iter()
            .map(|header| ViewElement::new("th").child(header.as_str()).into());
        let rows = self.rows.iter().map(|row| {
            ViewElement::new("tr")
                .children(
                    row.iter()
                        .map(|cell| ViewElement::new("td").child(cell.as_str()).into()),
                )
                .into()
        });

        ViewElement::new("table")
            .child(ViewElement::new("thead").child(ViewElement::new("tr").children(headers)))
            .child(ViewElement::new("tbody").children(rows))
            .into()
    }
}

/// `<Table data={{ headers: [...], rows: [[...]] }} />`
#[derive(Debug, Clone, Copy, Default)]
pub struct DataTable;

impl Component for DataTable {
    fn render(&self, element: Element, _cx: &RenderContext<'_>) -> View {
        let props = match element {
            Element::Component(props) => props,
            other => return other.into_default_view(),
        };

        let DataTableProps { data } = props_or_default(&props.name, &props.props);
        let data = data.unwrap_or_else(|| {
            tracing::warn!("Table without a data prop");
            TableData::default()
        });
        data.to_view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ClassNames;
    use crate::element::ComponentProps;
    use crate::image::ResponsiveImageLoader;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(props: Value) -> String {
        let Value::Object(props) = props else {
            panic!("props must be an object");
        };
        let classes = ClassNames::default();
        let images = ResponsiveImageLoader::default();
        let cx = RenderContext::new(&classes, &images);
        let element = Element::Component(ComponentProps {
            name: "Table".into(),
            props,
            children: Vec::new(),
        });
        DataTable.render(element, &cx).to_html()
    }

    #[test]
    fn renders_headers_and_rows() {
        let html = render(json!({
            "data": { "headers": ["Lang", "Year"], "rows": [["Rust", 2015], ["Go", null]] }
        }));

        assert_eq!(
            html,
            concat!(
                "<table><thead><tr><th>Lang</th><th>Year</th></tr></thead>",
                "<tbody><tr><td>Rust</td><td>2015</td></tr>",
                "<tr><td>Go</td><td></td></tr></tbody></table>"
            )
        );
    }

    #[test]
    fn ragged_rows_render_as_given() {
        let html = render(json!({
            "data": { "headers": ["a", "b"], "rows": [["1"], ["1", "2", "3"]] }
        }));

        assert!(html.contains("<tr><td>1</td></tr>"));
        assert!(html.contains("<tr><td>1</td><td>2</td><td>3</td></tr>"));
    }

    #[test]
    fn missing_data_renders_empty_table() {
        assert_eq!(
            render(json!({})),
            "<table><thead><tr></tr></thead><tbody></tbody></table>"
        );
    }
}
