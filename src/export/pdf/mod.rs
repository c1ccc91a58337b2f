//! PDF document generation
//!
//! A small, dependency-free PDF 1.4 writer sized for tabular reports.
//!
//! # Architecture
//!
//! - `objects`: PDF object model (Dictionary, Array, Stream, Reference)
//! - `content`: content stream operators (fills, text)
//! - `fonts`: base-14 Helvetica metrics and WinAnsi encoding
//! - `table`: table layout with wrapping, striping and page breaks
//! - `writer`: object numbering, cross-reference table and trailer
//!
//! Callers position content in millimetres from the top-left corner of an
//! A4 page; conversion to PDF user space happens here.

mod content;
mod fonts;
mod objects;
mod table;
mod writer;

pub use fonts::StandardFont;
pub use table::{TableLayout, TableSpec};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use content::ContentStream;
use objects::{Dictionary, PdfObject};
use writer::PdfWriter;

/// Points per millimetre
pub const PT_PER_MM: f64 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub fn gray(level: u8) -> Self {
        Rgb(level, level, level)
    }

    /// Components scaled to 0.0..=1.0
    pub fn unit(self) -> (f64, f64, f64) {
        (
            f64::from(self.0) / 255.0,
            f64::from(self.1) / 255.0,
            f64::from(self.2) / 255.0,
        )
    }
}

/// Page dimensions in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width_mm: 210.0,
        height_mm: 297.0,
    };
}

/// Visual settings for generated reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfStyle {
    pub page: PageSize,
    /// Left, right and bottom margin; also the top of continuation pages
    pub margin_mm: f64,
    pub font_size: f64,
    pub cell_padding_mm: f64,
    pub line_height: f64,
    pub header_fill: Rgb,
    pub header_text: Rgb,
    pub body_text: Rgb,
    pub alternate_row_fill: Rgb,
}

impl Default for PdfStyle {
    fn default() -> Self {
        Self {
            page: PageSize::A4,
            margin_mm: 14.0,
            font_size: 9.0,
            cell_padding_mm: 1.8,
            line_height: 1.15,
            header_fill: Rgb(79, 70, 229),
            header_text: Rgb::WHITE,
            body_text: Rgb::gray(20),
            alternate_row_fill: Rgb(245, 247, 250),
        }
    }
}

/// A document being assembled page by page
#[derive(Debug, Clone)]
pub struct PdfDocument {
    style: PdfStyle,
    pages: Vec<ContentStream>,
    title: Option<String>,
}

impl PdfDocument {
    pub fn new(style: PdfStyle) -> Self {
        Self {
            style,
            pages: vec![ContentStream::new()],
            title: None,
        }
    }

    /// Document title stored in the info dictionary
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn style(&self) -> &PdfStyle {
        &self.style
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn add_page(&mut self) {
        self.pages.push(ContentStream::new());
    }

    fn current(&mut self) -> &mut ContentStream {
        if self.pages.is_empty() {
            self.pages.push(ContentStream::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn to_pdf_y(&self, y_mm: f64) -> f64 {
        (self.style.page.height_mm - y_mm) * PT_PER_MM
    }

    /// Draw one line of text with its baseline at (x, y), millimetres from top-left
    pub fn text(&mut self, x_mm: f64, y_mm: f64, size: f64, color: Rgb, font: StandardFont, text: &str) {
        let x = x_mm * PT_PER_MM;
        let y = self.to_pdf_y(y_mm);
        let content = self.current();
        content.save_state();
        content.set_fill_color(color);
        content.text(font, size, x, y, text);
        content.restore_state();
    }

    /// Fill a rectangle whose top-left corner is (x, y), millimetres from top-left
    pub fn fill_rect(&mut self, x_mm: f64, y_mm: f64, width_mm: f64, height_mm: f64, color: Rgb) {
        let x = x_mm * PT_PER_MM;
        let bottom = self.to_pdf_y(y_mm + height_mm);
        let content = self.current();
        content.save_state();
        content.set_fill_color(color);
        content.fill_rect(x, bottom, width_mm * PT_PER_MM, height_mm * PT_PER_MM);
        content.restore_state();
    }

    /// Serialize the document
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = PdfWriter::new();
        let pages_id = writer.reserve();

        let mut font_resources = Dictionary::new();
        for font in StandardFont::ALL {
            let font_id = writer.add(
                Dictionary::typed("Font")
                    .with("Subtype", PdfObject::name("Type1"))
                    .with("BaseFont", PdfObject::name(font.base_font()))
                    .with("Encoding", PdfObject::name("WinAnsiEncoding"))
                    .into(),
            );
            font_resources.set(font.resource_name(), font_id);
        }
        let resources = Dictionary::new().with("Font", font_resources);

        let media_box: Vec<PdfObject> = vec![
            PdfObject::Integer(0),
            PdfObject::Integer(0),
            PdfObject::Real(self.style.page.width_mm * PT_PER_MM),
            PdfObject::Real(self.style.page.height_mm * PT_PER_MM),
        ];

        let mut kids = Vec::with_capacity(self.pages.len());
        for content in &self.pages {
            let content_id = writer.add(PdfObject::Stream(
                Dictionary::new(),
                content.as_bytes().to_vec(),
            ));
            let page_id = writer.add(
                Dictionary::typed("Page")
                    .with("Parent", pages_id)
                    .with("MediaBox", media_box.clone())
                    .with("Resources", resources.clone())
                    .with("Contents", content_id)
                    .into(),
            );
            kids.push(PdfObject::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        writer.set(
            pages_id,
            Dictionary::typed("Pages")
                .with("Kids", kids)
                .with("Count", page_count)
                .into(),
        );

        let catalog = writer.add(Dictionary::typed("Catalog").with("Pages", pages_id).into());

        let mut info = Dictionary::new().with("Producer", PdfObject::text("admin-tables"));
        if let Some(title) = &self.title {
            info.set("Title", PdfObject::text(title));
        }
        let info_id = writer.add(info.into());

        let bytes = writer.finish(catalog, Some(info_id))?;
        debug!(
            "Rendered PDF with {} pages ({} bytes)",
            self.pages.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}
