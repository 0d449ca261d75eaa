//! # PDF Canvas
//!
//! A [`Canvas`] that buffers drawing operations as a PDF content stream and
//! serializes a complete single-page PDF 1.7 file on [`Canvas::finalize`].
//!
//! We write the raw bytes ourselves, the same way for every document:
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj Catalog
//! 2 0 obj Pages
//! 3.. 0 obj Fonts, content stream, page, info
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Only the standard Type1 fonts are used, so nothing is embedded. Text is
//! encoded as WinAnsi. Every draw call writes its own color and font
//! operators inside `q`/`Q` or `BT`/`ET`, so no graphics state carries over.
//!
//! The file is produced in memory and written with a single `fs::write`;
//! nothing touches the disk before `finalize`.

use std::collections::BTreeSet;
use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>
use std::path::{Path, PathBuf};

use miniz_oxide::deflate::compress_to_vec_zlib;
use tracing::info;

use crate::canvas::{Canvas, TextMeasure};
use crate::error::InvoiceError;
use crate::font::StandardFont;
use crate::layout::{PageGeometry, Point, Rect};
use crate::style::{Color, TextAlign, TextStyle};
use crate::text::TextLayout;

const PRODUCER: &str = concat!("invoice-forme ", env!("CARGO_PKG_VERSION"));

/// Where the finished document goes.
#[derive(Debug, Clone)]
enum Target {
    Memory,
    File(PathBuf),
}

pub struct PdfCanvas {
    page_width: f64,
    page_height: f64,
    title: Option<String>,
    content: String,
    fonts_used: BTreeSet<StandardFont>,
    text: TextLayout,
    target: Target,
    output: Option<Vec<u8>>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfCanvas {
    /// A canvas whose finalized bytes stay in memory (see [`PdfCanvas::bytes`]).
    pub fn new(geometry: &PageGeometry) -> Self {
        Self {
            page_width: geometry.width,
            page_height: geometry.height,
            title: None,
            content: String::new(),
            fonts_used: BTreeSet::new(),
            text: TextLayout::new(),
            target: Target::Memory,
            output: None,
        }
    }

    /// A canvas that writes the finalized document to `path`.
    pub fn to_file(geometry: &PageGeometry, path: impl AsRef<Path>) -> Self {
        Self {
            target: Target::File(path.as_ref().to_path_buf()),
            ..Self::new(geometry)
        }
    }

    /// The serialized document, once finalized.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.output.as_deref()
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        self.output
    }

    /// Convert a top-down y coordinate to PDF user space.
    fn pdf_y(&self, y: f64) -> f64 {
        self.page_height - y
    }

    fn font_resource(font: StandardFont) -> &'static str {
        match font {
            StandardFont::Helvetica => "F1",
            StandardFont::HelveticaBold => "F2",
        }
    }

    fn write_text_run(&mut self, text: &str, x: f64, baseline: f64, style: &TextStyle) {
        self.fonts_used.insert(style.font);
        let y = self.pdf_y(baseline);
        let _ = write!(
            self.content,
            "BT\n/{} {:.1} Tf\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            Self::font_resource(style.font),
            style.size,
            style.color.r,
            style.color.g,
            style.color.b,
            x,
            y,
            Self::encode_text(text)
        );
    }

    /// Build the complete PDF file from the buffered content stream.
    fn build(&self) -> Vec<u8> {
        let mut objects: Vec<PdfObject> = Vec::new();

        // 0 = placeholder (PDF objects are 1-indexed), 1 = Catalog, 2 = Pages
        objects.push(PdfObject { data: vec![] });
        objects.push(PdfObject {
            data: b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        });
        objects.push(PdfObject { data: vec![] });

        // Always have at least Helvetica
        let mut fonts = self.fonts_used.clone();
        if fonts.is_empty() {
            fonts.insert(StandardFont::Helvetica);
        }
        let mut font_resources = String::new();
        for font in &fonts {
            let obj_id = objects.len();
            let font_dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            objects.push(PdfObject {
                data: font_dict.into_bytes(),
            });
            let _ = write!(font_resources, "/{} {} 0 R ", Self::font_resource(*font), obj_id);
        }

        let compressed = compress_to_vec_zlib(self.content.as_bytes(), 6);
        let content_obj_id = objects.len();
        let mut content_data: Vec<u8> = Vec::new();
        let _ = write!(
            content_data,
            "<< /Length {} /Filter /FlateDecode >>\nstream\n",
            compressed.len()
        );
        content_data.extend_from_slice(&compressed);
        content_data.extend_from_slice(b"\nendstream");
        objects.push(PdfObject { data: content_data });

        let page_obj_id = objects.len();
        let page_dict = format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
             /Contents {} 0 R /Resources << /Font << {}>> >> >>",
            self.page_width, self.page_height, content_obj_id, font_resources
        );
        objects.push(PdfObject {
            data: page_dict.into_bytes(),
        });

        objects[2].data =
            format!("<< /Type /Pages /Kids [{} 0 R] /Count 1 >>", page_obj_id).into_bytes();

        let info_obj_id = objects.len();
        let mut info = String::from("<< ");
        if let Some(ref title) = self.title {
            let _ = write!(info, "/Title {} ", Self::pdf_text_string(title));
        }
        let _ = write!(info, "/Producer ({}) /Creator ({}) >>", PRODUCER, PRODUCER);
        objects.push(PdfObject {
            data: info.into_bytes(),
        });

        Self::serialize(&objects, info_obj_id)
    }

    fn serialize(objects: &[PdfObject], info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }

    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// A metadata string: literal when ASCII, UTF-16BE hex otherwise.
    fn pdf_text_string(s: &str) -> String {
        if s.is_ascii() {
            return format!("({})", Self::escape_pdf_string(s));
        }
        let mut hex = String::from("<FEFF");
        for unit in s.encode_utf16() {
            let _ = write!(hex, "{:04X}", unit);
        }
        hex.push('>');
        hex
    }

    /// Encode a text run for a WinAnsi Type1 font as a literal string body.
    fn encode_text(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            let b = Self::unicode_to_winansi(ch).unwrap_or(b'?');
            match b {
                b'\\' => out.push_str("\\\\"),
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                0x20..=0x7E => out.push(b as char),
                _ => {
                    // Octal escape for bytes outside ASCII printable range
                    let _ = write!(out, "\\{:03o}", b);
                }
            }
        }
        out
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is based on Windows-1252. Most codepoints in
    /// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
    /// holds the special mappings for the Euro sign, smart quotes, dashes.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2018 => Some(0x91), // Left single quotation mark
            0x2019 => Some(0x92), // Right single quotation mark
            0x201C => Some(0x93), // Left double quotation mark
            0x201D => Some(0x94), // Right double quotation mark
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x2122 => Some(0x99), // Trade mark sign
            0x09 => Some(b' '),
            _ => None,
        }
    }
}

impl TextMeasure for PdfCanvas {
    fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        self.text.measure_width(text, style.font, style.size)
    }

    fn paragraph_height(&self, text: &str, style: &TextStyle, leading: f64, max_width: f64) -> f64 {
        let lines = self
            .text
            .break_into_lines(text, max_width, style.font, style.size);
        lines.len() as f64 * leading
    }
}

impl Canvas for PdfCanvas {
    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        let x = match style.align {
            TextAlign::Left => at.x,
            TextAlign::Right => at.x - self.text_width(text, style),
        };
        self.write_text_run(text, x, at.y, style);
    }

    fn draw_paragraph(
        &mut self,
        text: &str,
        first_baseline: Point,
        max_width: f64,
        leading: f64,
        style: &TextStyle,
    ) {
        let lines = self
            .text
            .break_into_lines(text, max_width, style.font, style.size);
        for (i, line) in lines.iter().enumerate() {
            let baseline = first_baseline.y + i as f64 * leading;
            let x = match style.align {
                TextAlign::Left => first_baseline.x,
                TextAlign::Right => first_baseline.x + max_width - line.width,
            };
            self.write_text_run(&line.text, x, baseline, style);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let y = self.pdf_y(rect.y + rect.height);
        let _ = write!(
            self.content,
            "q\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
            color.r, color.g, color.b, rect.x, y, rect.width, rect.height
        );
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        let (y1, y2) = (self.pdf_y(from.y), self.pdf_y(to.y));
        let _ = write!(
            self.content,
            "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
            color.r, color.g, color.b, width, from.x, y1, to.x, y2
        );
    }

    fn finalize(&mut self) -> Result<(), InvoiceError> {
        if self.output.is_some() {
            return Err(InvoiceError::Render(
                "document has already been finalized".to_string(),
            ));
        }

        let bytes = self.build();
        if let Target::File(ref path) = self.target {
            std::fs::write(path, &bytes).map_err(|e| {
                InvoiceError::Render(format!("could not write '{}': {}", path.display(), e))
            })?;
            info!(path = %path.display(), bytes = bytes.len(), "wrote PDF");
        }
        self.output = Some(bytes);
        Ok(())
    }
}
