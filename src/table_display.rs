use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use crate::data::data_view::{PageBody, RenderedPage};

/// Render a page as a text table, with sort indicators in the header and
/// the pagination summary underneath when there is more than one page
pub fn render_text_table(page: &RenderedPage) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let headers: Vec<Cell> = page
        .headers
        .iter()
        .map(|header| {
            let text = match header.indicator {
                Some(indicator) => format!("{} {}", header.label, indicator.glyph()),
                None => header.label.clone(),
            };
            Cell::new(text).add_attribute(Attribute::Bold)
        })
        .collect();
    table.set_header(headers);

    match &page.body {
        PageBody::Rows(rows) => {
            for row in rows {
                table.add_row(row.iter().map(Cell::new));
            }
        }
        PageBody::Placeholder { text, .. } => {
            // comfy-table has no colspan; the placeholder goes in the first cell
            let mut row = vec![Cell::new(text).set_alignment(CellAlignment::Center)];
            row.extend((1..page.headers.len()).map(|_| Cell::new("")));
            table.add_row(row);
        }
    }

    let mut output = table.to_string();
    if let Some(pagination) = &page.pagination {
        output.push('\n');
        output.push_str(&format!(
            "{}  (page {} of {})",
            pagination.summary, pagination.current_page, pagination.total_pages
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::column::ColumnDescriptor;
    use crate::data::data_view::TableView;
    use crate::data::record::Record;
    use std::sync::Arc;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("id", "ID"),
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("phone", "Phone").with_sortable(false),
        ]
    }

    #[test]
    fn test_empty_page_shows_placeholder() {
        let view = TableView::new(Arc::new(Vec::new()), columns());
        let text = render_text_table(&view.render_page());
        assert!(text.contains("No data available"));
        assert!(text.contains("Phone"));
        assert!(!text.contains("Showing"));
    }

    #[test]
    fn test_paginated_page_prints_summary() {
        let records: Vec<Record> = (1..=12)
            .map(|i| Record::new().with("id", i).with("name", format!("user{}", i)))
            .collect();
        let mut view = TableView::new(Arc::new(records), columns());
        view.set_page(2);
        let text = render_text_table(&view.render_page());
        assert!(text.contains("user11"));
        assert!(!text.contains("user10 "));
        assert!(text.contains("Showing 11 to 12 of 12 results  (page 2 of 2)"));
    }
}
