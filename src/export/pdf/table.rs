//! Table layout: column sizing, word wrapping, striping and page breaks

use super::{PdfDocument, PdfStyle, StandardFont, PT_PER_MM};

/// Header labels and body rows of a table, as display strings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSpec {
    pub head: Vec<String>,
    pub body: Vec<Vec<String>>,
}

impl TableSpec {
    pub fn new(head: Vec<String>, body: Vec<Vec<String>>) -> Self {
        Self { head, body }
    }

    pub fn column_count(&self) -> usize {
        self.body
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.head.len()))
            .max()
            .unwrap_or(0)
    }
}

/// Resolved column widths in millimetres
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub column_widths: Vec<f64>,
}

impl TableLayout {
    /// Size columns to their content, then scale them to fit the printable width
    pub fn compute(spec: &TableSpec, style: &PdfStyle) -> Self {
        let columns = spec.column_count();
        let padding = 2.0 * style.cell_padding_mm;
        let mut natural = vec![padding; columns];

        for (i, label) in spec.head.iter().enumerate() {
            let width = text_width_mm(StandardFont::HelveticaBold, label, style.font_size);
            natural[i] = natural[i].max(width + padding);
        }
        for row in &spec.body {
            for (i, cell) in row.iter().enumerate() {
                let width = text_width_mm(StandardFont::Helvetica, cell, style.font_size);
                natural[i] = natural[i].max(width + padding);
            }
        }

        let available = style.page.width_mm - 2.0 * style.margin_mm;
        let total: f64 = natural.iter().sum();
        if total > 0.0 && available > 0.0 {
            let scale = available / total;
            for width in &mut natural {
                *width *= scale;
            }
        }

        Self {
            column_widths: natural,
        }
    }

    pub fn total_width(&self) -> f64 {
        self.column_widths.iter().sum()
    }
}

fn text_width_mm(font: StandardFont, text: &str, size_pt: f64) -> f64 {
    font.text_width(text, size_pt) / PT_PER_MM
}

/// Break `text` into lines no wider than `max_width_mm`. Words longer than
/// a line are split between characters.
pub(crate) fn wrap_text(text: &str, font: StandardFont, size_pt: f64, max_width_mm: f64) -> Vec<String> {
    let fits = |s: &str| text_width_mm(font, s, size_pt) <= max_width_mm;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current = word.to_string();
            continue;
        }
        for ch in word.chars() {
            let mut next = current.clone();
            next.push(ch);
            if !current.is_empty() && !fits(&next) {
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            } else {
                current = next;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

struct RowPaint {
    font: StandardFont,
    text: super::Rgb,
    fill: Option<super::Rgb>,
}

impl PdfDocument {
    /// Draw a table starting at `start_y_mm` on the current page. Rows that
    /// would cross the bottom margin move to a new page, where the header
    /// row is drawn again. Returns the y position below the last row.
    pub fn table(&mut self, start_y_mm: f64, spec: &TableSpec) -> f64 {
        let style = self.style().clone();
        let layout = TableLayout::compute(spec, &style);
        let bottom = style.page.height_mm - style.margin_mm;

        let header = RowPaint {
            font: StandardFont::HelveticaBold,
            text: style.header_text,
            fill: Some(style.header_fill),
        };

        let mut y = start_y_mm;
        if !spec.head.is_empty() {
            y = self.table_row(y, &spec.head, &layout, &header);
        }

        for (index, row) in spec.body.iter().enumerate() {
            let paint = RowPaint {
                font: StandardFont::Helvetica,
                text: style.body_text,
                fill: (index % 2 == 0).then_some(style.alternate_row_fill),
            };
            let height = self.row_height(row, &layout, paint.font);
            if y + height > bottom && y > style.margin_mm {
                self.add_page();
                y = style.margin_mm;
                if !spec.head.is_empty() {
                    y = self.table_row(y, &spec.head, &layout, &header);
                }
            }
            y = self.table_row(y, row, &layout, &paint);
        }

        y
    }

    fn row_lines(&self, cells: &[String], layout: &TableLayout, font: StandardFont) -> Vec<Vec<String>> {
        let style = self.style();
        layout
            .column_widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let inner = (width - 2.0 * style.cell_padding_mm).max(0.0);
                wrap_text(cell, font, style.font_size, inner)
            })
            .collect()
    }

    fn line_height_mm(&self) -> f64 {
        let style = self.style();
        style.font_size * style.line_height / PT_PER_MM
    }

    fn row_height(&self, cells: &[String], layout: &TableLayout, font: StandardFont) -> f64 {
        let lines = self
            .row_lines(cells, layout, font)
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(1)
            .max(1);
        lines as f64 * self.line_height_mm() + 2.0 * self.style().cell_padding_mm
    }

    fn table_row(&mut self, y: f64, cells: &[String], layout: &TableLayout, paint: &RowPaint) -> f64 {
        let margin = self.style().margin_mm;
        let padding = self.style().cell_padding_mm;
        let font_size = self.style().font_size;
        let line_height = self.line_height_mm();
        let height = self.row_height(cells, layout, paint.font);

        if let Some(fill) = paint.fill {
            self.fill_rect(margin, y, layout.total_width(), height, fill);
        }

        // Baseline sits roughly at the cap height below the top of the line box
        let ascent = font_size * 0.8 / PT_PER_MM;
        let lines = self.row_lines(cells, layout, paint.font);
        let mut x = margin;
        for (column, width) in lines.iter().zip(layout.column_widths.iter()) {
            for (n, line) in column.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let baseline = y + padding + ascent + n as f64 * line_height;
                self.text(x + padding, baseline, font_size, paint.text, paint.font, line);
            }
            x += width;
        }

        y + height
    }
}
