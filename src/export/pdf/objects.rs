//! PDF object model and its byte serialization

use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u32);

/// Ordered dictionary; key order is kept so output is deterministic
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: Vec<(String, PdfObject)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary with a `/Type` entry
    pub fn typed(type_name: &str) -> Self {
        Self::new().with("Type", PdfObject::name(type_name))
    }

    pub fn with(mut self, key: &str, value: impl Into<PdfObject>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<PdfObject>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"<<");
        for (key, value) in &self.entries {
            out.push(b'/');
            out.extend_from_slice(key.as_bytes());
            out.push(b' ');
            value.write_to(out);
            out.push(b' ');
        }
        out.extend_from_slice(b">>");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    Name(String),
    /// Literal string, already encoded
    String(Vec<u8>),
    Array(Vec<PdfObject>),
    Dictionary(Dictionary),
    Stream(Dictionary, Vec<u8>),
    Reference(ObjectId),
}

impl PdfObject {
    pub fn name(name: &str) -> Self {
        PdfObject::Name(name.to_string())
    }

    pub fn text(text: &str) -> Self {
        PdfObject::String(super::fonts::encode_win_ansi(text))
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            PdfObject::Integer(i) => out.extend_from_slice(i.to_string().as_bytes()),
            PdfObject::Real(r) => out.extend_from_slice(format_real(*r).as_bytes()),
            PdfObject::Name(n) => {
                out.push(b'/');
                out.extend_from_slice(n.as_bytes());
            }
            PdfObject::String(bytes) => write_literal_string(out, bytes),
            PdfObject::Array(items) => {
                out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(b' ');
                    }
                    item.write_to(out);
                }
                out.push(b']');
            }
            PdfObject::Dictionary(dict) => dict.write_to(out),
            PdfObject::Stream(dict, data) => {
                let dict = dict.clone().with("Length", data.len() as i64);
                dict.write_to(out);
                out.extend_from_slice(b"\nstream\n");
                out.extend_from_slice(data);
                out.extend_from_slice(b"\nendstream");
            }
            PdfObject::Reference(id) => {
                // Writing to a Vec cannot fail
                let _ = write!(out, "{} 0 R", id.0);
            }
        }
    }
}

/// Fixed-point number with trailing zeros removed, e.g. `12.5`, `0.314`, `7`
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

fn write_literal_string(out: &mut Vec<u8>, bytes: &[u8]) {
    out.push(b'(');
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            0x20..=0x7e | 0x80..=0xff => out.push(b),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out.push(b')');
}

impl From<i64> for PdfObject {
    fn from(i: i64) -> Self {
        PdfObject::Integer(i)
    }
}

impl From<f64> for PdfObject {
    fn from(r: f64) -> Self {
        PdfObject::Real(r)
    }
}

impl From<ObjectId> for PdfObject {
    fn from(id: ObjectId) -> Self {
        PdfObject::Reference(id)
    }
}

impl From<Dictionary> for PdfObject {
    fn from(dict: Dictionary) -> Self {
        PdfObject::Dictionary(dict)
    }
}

impl From<Vec<PdfObject>> for PdfObject {
    fn from(items: Vec<PdfObject>) -> Self {
        PdfObject::Array(items)
    }
}
