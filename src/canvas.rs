//! # Canvas
//!
//! The drawing primitives the document renderer issues against. A canvas
//! places text runs, fills rectangles, strokes lines and measures wrapped
//! paragraphs; it knows nothing about invoices. [`crate::pdf::PdfCanvas`] is
//! the implementation that produces PDF bytes.
//!
//! Every call carries its own style. Implementations must not let one call's
//! font or color leak into the next.

use crate::error::InvoiceError;
use crate::layout::{Point, Rect};
use crate::style::{Color, TextAlign, TextStyle};
use crate::table::{CellFlow, TableRow, TableSpec, TableStyle};

/// Helvetica cap height as a fraction of the font size.
const CAP_HEIGHT: f64 = 0.718;

/// Text measurement, used by the table composer to size wrapped cells.
pub trait TextMeasure {
    /// Width of a single unwrapped run.
    fn text_width(&self, text: &str, style: &TextStyle) -> f64;

    /// Height of `text` wrapped to `max_width` with the given line leading.
    fn paragraph_height(&self, text: &str, style: &TextStyle, leading: f64, max_width: f64) -> f64;
}

pub trait Canvas: TextMeasure {
    /// Set the document title stored in the output's metadata.
    fn set_title(&mut self, title: &str);

    /// Draw one line of text with its baseline at `at.y`. For right-aligned
    /// styles `at.x` is the right edge of the run.
    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle);

    /// Draw `text` wrapped to `max_width`; the first baseline is at
    /// `first_baseline.y` and each following line is `leading` lower.
    fn draw_paragraph(
        &mut self,
        text: &str,
        first_baseline: Point,
        max_width: f64,
        leading: f64,
        style: &TextStyle,
    );

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color);

    /// Draw a composed table with its top-left corner at `origin`.
    ///
    /// Row bands first, then cell text vertically centered within the
    /// padding box, then the grid on top.
    fn draw_table(&mut self, origin: Point, table: &TableSpec, style: &TableStyle) {
        let offsets = table.column_offsets();
        let mut y = origin.y;

        let rows = std::iter::once((&table.header, true)).chain(table.rows.iter().map(|r| (r, false)));
        for (row, is_header) in rows {
            let (background, text_style, padding_bottom) = if is_header {
                (style.header_background, style.header_text, style.header_padding_bottom)
            } else {
                (style.body_background, style.body_text, style.padding_bottom)
            };

            self.fill_rect(
                Rect {
                    x: origin.x,
                    y,
                    width: table.width,
                    height: row.height,
                },
                background,
            );
            draw_row_text(&mut *self, row, origin.x, y, &offsets, &table.column_widths, style, &text_style, padding_bottom);

            y += row.height;
        }

        // Horizontal rules at every row boundary.
        let mut rule_y = origin.y;
        self.stroke_line(
            Point::new(origin.x, rule_y),
            Point::new(origin.x + table.width, rule_y),
            style.grid_width,
            style.grid_color,
        );
        for row in std::iter::once(&table.header).chain(table.rows.iter()) {
            rule_y += row.height;
            self.stroke_line(
                Point::new(origin.x, rule_y),
                Point::new(origin.x + table.width, rule_y),
                style.grid_width,
                style.grid_color,
            );
        }

        // Vertical rules at every column boundary.
        let bottom = origin.y + table.height;
        for x in offsets.iter().copied().chain(std::iter::once(table.width)) {
            self.stroke_line(
                Point::new(origin.x + x, origin.y),
                Point::new(origin.x + x, bottom),
                style.grid_width,
                style.grid_color,
            );
        }
    }

    /// Persist the document. Called exactly once, after all drawing.
    fn finalize(&mut self) -> Result<(), InvoiceError>;
}

/// Baseline of a line whose line box starts at `line_top`, centering the
/// cap height inside the leading.
pub fn baseline_in_line(line_top: f64, leading: f64, style: &TextStyle) -> f64 {
    line_top + (leading + style.size * CAP_HEIGHT) / 2.0
}

#[allow(clippy::too_many_arguments)]
fn draw_row_text<C: Canvas + ?Sized>(
    canvas: &mut C,
    row: &TableRow,
    table_x: f64,
    row_y: f64,
    offsets: &[f64],
    widths: &[f64],
    style: &TableStyle,
    text_style: &TextStyle,
    padding_bottom: f64,
) {
    let available = row.height - style.padding_top - padding_bottom;

    for (i, cell) in row.cells.iter().enumerate() {
        let (Some(&offset), Some(&width)) = (offsets.get(i), widths.get(i)) else {
            continue;
        };
        let inner_left = table_x + offset + style.padding_left;
        let inner_width = style.inner_width(width);
        let content_top = row_y + style.padding_top + (available - cell.content_height) / 2.0;
        let baseline = baseline_in_line(content_top, style.leading, text_style);

        match (cell.flow, cell.align) {
            (CellFlow::Paragraph, _) => canvas.draw_paragraph(
                &cell.text,
                Point::new(inner_left, baseline),
                inner_width,
                style.leading,
                text_style,
            ),
            (CellFlow::Line, TextAlign::Left) => {
                canvas.draw_text(&cell.text, Point::new(inner_left, baseline), text_style)
            }
            (CellFlow::Line, TextAlign::Right) => canvas.draw_text(
                &cell.text,
                Point::new(inner_left + inner_width, baseline),
                &text_style.right(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Op {
        Text(String, Point, TextAlign),
        Paragraph(String, Point),
        Fill(Rect, Color),
        Line(Point, Point),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl TextMeasure for Recorder {
        fn text_width(&self, text: &str, _style: &TextStyle) -> f64 {
            text.len() as f64 * 5.0
        }

        fn paragraph_height(&self, _text: &str, _style: &TextStyle, leading: f64, _max_width: f64) -> f64 {
            leading
        }
    }

    impl Canvas for Recorder {
        fn set_title(&mut self, _title: &str) {}

        fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle) {
            self.ops.push(Op::Text(text.to_string(), at, style.align));
        }

        fn draw_paragraph(&mut self, text: &str, first_baseline: Point, _w: f64, _l: f64, _s: &TextStyle) {
            self.ops.push(Op::Paragraph(text.to_string(), first_baseline));
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.ops.push(Op::Fill(rect, color));
        }

        fn stroke_line(&mut self, from: Point, to: Point, _width: f64, _color: Color) {
            self.ops.push(Op::Line(from, to));
        }

        fn finalize(&mut self) -> Result<(), InvoiceError> {
            Ok(())
        }
    }

    fn one_row_table() -> TableSpec {
        let style = TableStyle::default();
        let cell = |text: &str, flow, align| crate::table::TableCell {
            text: text.to_string(),
            flow,
            align,
            content_height: style.leading,
        };
        TableSpec {
            width: 400.0,
            column_widths: vec![220.0, 60.0, 60.0, 60.0],
            header: TableRow {
                cells: vec![
                    cell("Item", CellFlow::Line, TextAlign::Left),
                    cell("Quantity", CellFlow::Line, TextAlign::Left),
                    cell("Rate", CellFlow::Line, TextAlign::Left),
                    cell("Amount", CellFlow::Line, TextAlign::Left),
                ],
                height: 27.0,
            },
            rows: vec![TableRow {
                cells: vec![
                    cell("Widget", CellFlow::Paragraph, TextAlign::Left),
                    cell("2", CellFlow::Line, TextAlign::Right),
                    cell("$9.99", CellFlow::Line, TextAlign::Right),
                    cell("$19.98", CellFlow::Line, TextAlign::Right),
                ],
                height: 18.0,
            }],
            height: 45.0,
        }
    }

    #[test]
    fn test_draw_table_bands_and_grid() {
        let mut canvas = Recorder::default();
        let table = one_row_table();
        let style = TableStyle::default();
        canvas.draw_table(Point::new(50.0, 100.0), &table, &style);

        let fills: Vec<_> = canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Fill(r, c) => Some((*r, *c)),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].1, Color::DARK_SLATE);
        assert_eq!(fills[0].0.height, 27.0);
        assert_eq!(fills[1].1, Color::WHITE_SMOKE);
        assert_eq!(fills[1].0.y, 127.0);

        let lines = canvas.ops.iter().filter(|op| matches!(op, Op::Line(..))).count();
        // 3 horizontal rules (top, below header, bottom) + 5 vertical.
        assert_eq!(lines, 8);
    }

    #[test]
    fn test_draw_table_aligns_numeric_cells_right() {
        let mut canvas = Recorder::default();
        canvas.draw_table(Point::new(0.0, 0.0), &one_row_table(), &TableStyle::default());

        let amount = canvas
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Text(t, at, align) if t == "$19.98" => Some((*at, *align)),
                _ => None,
            })
            .unwrap();
        assert_eq!(amount.1, TextAlign::Right);
        // Right edge of the last column minus its right padding.
        assert!((amount.0.x - 390.0).abs() < 1e-9);

        assert!(canvas
            .ops
            .iter()
            .any(|op| matches!(op, Op::Paragraph(t, p) if t == "Widget" && (p.x - 10.0).abs() < 1e-9)));
    }

    #[test]
    fn test_body_text_is_vertically_centered() {
        let mut canvas = Recorder::default();
        canvas.draw_table(Point::new(0.0, 0.0), &one_row_table(), &TableStyle::default());
        let style = TableStyle::default();

        let qty_baseline = canvas
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Text(t, at, _) if t == "2" => Some(at.y),
                _ => None,
            })
            .unwrap();
        // Body row starts at 27, padding 3 top and bottom, one 12pt line.
        let expected = baseline_in_line(30.0, 12.0, &style.body_text);
        assert!((qty_baseline - expected).abs() < 1e-9);
    }
}
