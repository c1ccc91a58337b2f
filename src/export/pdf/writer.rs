//! Serializes numbered objects into a PDF file with a cross-reference table

use anyhow::{anyhow, Result};
use std::io::Write;

use super::objects::{Dictionary, ObjectId, PdfObject};

#[derive(Debug, Default)]
pub struct PdfWriter {
    objects: Vec<Option<PdfObject>>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an object number to be filled in later (for forward references)
    pub fn reserve(&mut self) -> ObjectId {
        self.objects.push(None);
        ObjectId(self.objects.len() as u32)
    }

    pub fn set(&mut self, id: ObjectId, object: PdfObject) {
        if let Some(slot) = self.objects.get_mut(id.0 as usize - 1) {
            *slot = Some(object);
        }
    }

    pub fn add(&mut self, object: PdfObject) -> ObjectId {
        let id = self.reserve();
        self.set(id, object);
        id
    }

    /// Write the file. Every reserved object must have been set.
    pub fn finish(self, root: ObjectId, info: Option<ObjectId>) -> Result<Vec<u8>> {
        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");

        let mut offsets = Vec::with_capacity(self.objects.len());
        for (index, object) in self.objects.iter().enumerate() {
            let number = index + 1;
            let object = object
                .as_ref()
                .ok_or_else(|| anyhow!("PDF object {} was reserved but never written", number))?;
            offsets.push(out.len());
            write!(out, "{} 0 obj\n", number)?;
            object.write_to(&mut out);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        write!(out, "xref\n0 {}\n", self.objects.len() + 1)?;
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            write!(out, "{:010} 00000 n \n", offset)?;
        }

        let mut trailer = Dictionary::new()
            .with("Size", (self.objects.len() + 1) as i64)
            .with("Root", root);
        if let Some(info) = info {
            trailer.set("Info", info);
        }
        out.extend_from_slice(b"trailer\n");
        PdfObject::Dictionary(trailer).write_to(&mut out);
        write!(out, "\nstartxref\n{}\n%%EOF\n", xref_offset)?;

        Ok(out)
    }
}
