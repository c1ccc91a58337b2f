//! Page content stream builder

use std::io::Write;

use super::fonts::{encode_win_ansi, StandardFont};
use super::objects::format_real;
use super::Rgb;

/// Graphics operators for one page, in PDF user space (points, origin bottom-left)
#[derive(Debug, Clone, Default)]
pub struct ContentStream {
    ops: Vec<u8>,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    fn op(&mut self, operands: &[f64], operator: &str) {
        for value in operands {
            self.ops.extend_from_slice(format_real(*value).as_bytes());
            self.ops.push(b' ');
        }
        self.ops.extend_from_slice(operator.as_bytes());
        self.ops.push(b'\n');
    }

    pub fn save_state(&mut self) {
        self.op(&[], "q");
    }

    pub fn restore_state(&mut self) {
        self.op(&[], "Q");
    }

    pub fn set_fill_color(&mut self, color: Rgb) {
        let (r, g, b) = color.unit();
        self.op(&[r, g, b], "rg");
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.op(&[x, y, width, height], "re");
        self.op(&[], "f");
    }

    /// Show one line of text with its baseline starting at (x, y)
    pub fn text(&mut self, font: StandardFont, size: f64, x: f64, y: f64, text: &str) {
        self.op(&[], "BT");
        let _ = writeln!(
            self.ops,
            "/{} {} Tf",
            font.resource_name(),
            format_real(size)
        );
        self.op(&[x, y], "Td");

        self.ops.push(b'(');
        for b in encode_win_ansi(text) {
            if matches!(b, b'(' | b')' | b'\\') {
                self.ops.push(b'\\');
            }
            self.ops.push(b);
        }
        self.ops.extend_from_slice(b") Tj\n");
        self.op(&[], "ET");
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_operators() {
        let mut content = ContentStream::new();
        content.text(StandardFont::HelveticaBold, 9.0, 10.0, 20.5, "a (b)");
        let text = String::from_utf8(content.as_bytes().to_vec()).unwrap();
        assert_eq!(text, "BT\n/F2 9 Tf\n10 20.5 Td\n(a \\(b\\)) Tj\nET\n");
    }

    #[test]
    fn test_fill_rect() {
        let mut content = ContentStream::new();
        content.set_fill_color(Rgb(255, 0, 0));
        content.fill_rect(1.0, 2.0, 3.0, 4.0);
        let text = String::from_utf8(content.as_bytes().to_vec()).unwrap();
        assert_eq!(text, "1 0 0 rg\n1 2 3 4 re\nf\n");
    }
}
