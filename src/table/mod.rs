//! # Table Composer
//!
//! Turns the line items into a [`TableSpec`]: a fixed header row, one body
//! row per item in input order, column widths from fixed ratios, and the
//! height of every row.
//!
//! Description cells wrap. The composer does not know about glyph metrics;
//! it asks a [`TextMeasure`] for the wrapped height of each description at
//! its column's inner width and sizes the row to the tallest cell.

use serde::Serialize;
use tracing::debug;

use crate::canvas::TextMeasure;
use crate::error::InvoiceError;
use crate::model::LineItem;
use crate::money::{format_currency, ItemAmount};
use crate::style::{Color, TextAlign, TextStyle};

pub const HEADER_LABELS: [&str; 4] = ["Item", "Quantity", "Rate", "Amount"];

/// Share of the content width taken by each column.
pub const COLUMN_RATIOS: [f64; 4] = [0.55, 0.15, 0.15, 0.15];

/// Fixed visual style of the item table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableStyle {
    pub header_background: Color,
    pub header_text: TextStyle,
    pub body_background: Color,
    pub body_text: TextStyle,
    pub grid_color: Color,
    pub grid_width: f64,
    /// Line height of cell text.
    pub leading: f64,
    pub padding_left: f64,
    pub padding_right: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub header_padding_bottom: f64,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            header_background: Color::DARK_SLATE,
            header_text: TextStyle::bold(10.0).colored(Color::WHITE_SMOKE),
            body_background: Color::WHITE_SMOKE,
            body_text: TextStyle::regular(10.0),
            grid_color: Color::BLACK,
            grid_width: 1.0,
            leading: 12.0,
            padding_left: 10.0,
            padding_right: 10.0,
            padding_top: 3.0,
            padding_bottom: 3.0,
            header_padding_bottom: 12.0,
        }
    }
}

impl TableStyle {
    /// Horizontal space available to content in a column.
    pub fn inner_width(&self, column_width: f64) -> f64 {
        (column_width - self.padding_left - self.padding_right).max(0.0)
    }
}

/// How a cell's text is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum CellFlow {
    /// One unwrapped line.
    #[default]
    Line,
    /// Wrapped to the column's inner width.
    Paragraph,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableCell {
    pub text: String,
    pub flow: CellFlow,
    pub align: TextAlign,
    /// Height of the cell's text, excluding padding.
    pub content_height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    /// Full row height, padding included.
    pub height: f64,
}

/// A fully measured table ready to be placed and drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSpec {
    pub width: f64,
    pub column_widths: Vec<f64>,
    pub header: TableRow,
    pub rows: Vec<TableRow>,
    /// Header height plus every body row height.
    pub height: f64,
}

impl TableSpec {
    /// Left edge of each column, relative to the table's left edge.
    pub fn column_offsets(&self) -> Vec<f64> {
        self.column_widths
            .iter()
            .scan(0.0, |x, w| {
                let start = *x;
                *x += w;
                Some(start)
            })
            .collect()
    }
}

/// Build the item table for `width` points of content.
///
/// `amounts` are the calculator's results for `items`, in the same order.
pub fn compose<M>(
    items: &[LineItem],
    amounts: &[ItemAmount],
    currency_symbol: &str,
    width: f64,
    style: &TableStyle,
    measure: &M,
) -> Result<TableSpec, InvoiceError>
where
    M: TextMeasure + ?Sized,
{
    if items.len() != amounts.len() {
        return Err(InvoiceError::Render(format!(
            "table has {} items but {} computed amounts",
            items.len(),
            amounts.len()
        )));
    }

    let column_widths: Vec<f64> = COLUMN_RATIOS.iter().map(|r| width * r).collect();

    let header_cells: Vec<TableCell> = HEADER_LABELS
        .iter()
        .map(|label| line_cell(label.to_string(), TextAlign::Left, style))
        .collect();
    let header = TableRow {
        height: row_height(&header_cells, style.padding_top, style.header_padding_bottom),
        cells: header_cells,
    };

    let description_width = style.inner_width(column_widths[0]);
    let rows: Vec<TableRow> = items
        .iter()
        .zip(amounts)
        .map(|(item, amount)| {
            let cells = vec![
                TableCell {
                    text: item.description.clone(),
                    flow: CellFlow::Paragraph,
                    align: TextAlign::Left,
                    content_height: measure.paragraph_height(
                        &item.description,
                        &style.body_text,
                        style.leading,
                        description_width,
                    ),
                },
                line_cell(amount.quantity.to_string(), TextAlign::Right, style),
                line_cell(format_currency(amount.rate, currency_symbol), TextAlign::Right, style),
                line_cell(
                    format_currency(amount.display_amount, currency_symbol),
                    TextAlign::Right,
                    style,
                ),
            ];
            TableRow {
                height: row_height(&cells, style.padding_top, style.padding_bottom),
                cells,
            }
        })
        .collect();

    let height = header.height + rows.iter().map(|r| r.height).sum::<f64>();
    debug!(rows = rows.len(), height, "composed item table");

    Ok(TableSpec {
        width,
        column_widths,
        header,
        rows,
        height,
    })
}

fn line_cell(text: String, align: TextAlign, style: &TableStyle) -> TableCell {
    TableCell {
        text,
        flow: CellFlow::Line,
        align,
        content_height: style.leading,
    }
}

/// A row is as tall as its tallest cell plus padding.
fn row_height(cells: &[TableCell], padding_top: f64, padding_bottom: f64) -> f64 {
    let tallest = cells
        .iter()
        .map(|c| c.content_height)
        .fold(0.0_f64, f64::max);
    tallest + padding_top + padding_bottom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawNumber;
    use crate::money::compute_totals;

    /// Every 40 characters of text take one 12pt line.
    struct FixedMeasure;

    impl TextMeasure for FixedMeasure {
        fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
            text.chars().count() as f64 * style.size * 0.5
        }

        fn paragraph_height(&self, text: &str, _style: &TextStyle, leading: f64, _max_width: f64) -> f64 {
            let lines = text.chars().count().div_ceil(40).max(1);
            lines as f64 * leading
        }
    }

    fn build(items: &[LineItem]) -> TableSpec {
        let totals = compute_totals(items, &RawNumber::Integer(0)).unwrap();
        compose(items, &totals.items, "$", 468.0, &TableStyle::default(), &FixedMeasure).unwrap()
    }

    #[test]
    fn test_column_widths_follow_ratios() {
        let table = build(&[LineItem::new("Widget", 1, 1)]);
        let expected = [257.4, 70.2, 70.2, 70.2];
        for (w, e) in table.column_widths.iter().zip(expected) {
            assert!((w - e).abs() < 1e-9);
        }
        assert!((table.column_widths.iter().sum::<f64>() - 468.0).abs() < 1e-9);
        let offsets = table.column_offsets();
        assert_eq!(offsets[0], 0.0);
        assert!((offsets[3] - 397.8).abs() < 1e-9);
    }

    #[test]
    fn test_header_row_is_fixed() {
        let table = build(&[]);
        let labels: Vec<_> = table.header.cells.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(labels, HEADER_LABELS);
        assert_eq!(table.header.height, 27.0);
    }

    #[test]
    fn test_empty_items_yield_header_only_table() {
        let table = build(&[]);
        assert!(table.rows.is_empty());
        assert_eq!(table.height, table.header.height);
    }

    #[test]
    fn test_row_cells_are_formatted() {
        let table = build(&[LineItem::new("Widget", 2, 1234.5)]);
        let row = &table.rows[0];
        let texts: Vec<_> = row.cells.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Widget", "2", "$1,234.50", "$2,469.00"]);
        assert_eq!(row.cells[0].flow, CellFlow::Paragraph);
        assert_eq!(row.cells[0].align, TextAlign::Left);
        assert!(row.cells[1..].iter().all(|c| c.align == TextAlign::Right));
        assert_eq!(row.height, 18.0);
    }

    #[test]
    fn test_long_description_grows_row() {
        let long = "x".repeat(100);
        let table = build(&[LineItem::new("short", 1, 1), LineItem::new(long.as_str(), 1, 1)]);
        assert_eq!(table.rows[0].height, 18.0);
        assert_eq!(table.rows[1].height, 3.0 * 12.0 + 6.0);
        assert_eq!(table.height, 27.0 + 18.0 + 42.0);
    }

    #[test]
    fn test_rows_keep_input_order() {
        let items = vec![
            LineItem::new("c", 1, 1),
            LineItem::new("a", 1, 1),
            LineItem::new("b", 1, 1),
        ];
        let table = build(&items);
        let order: Vec<_> = table.rows.iter().map(|r| r.cells[0].text.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_row_amount_is_rounded_but_unreconciled() {
        let items: Vec<_> = (0..3).map(|_| LineItem::new("x", "0.005", 1)).collect();
        let table = build(&items);
        // Each row rounds 0.005 up to 0.01.
        assert!(table.rows.iter().all(|r| r.cells[3].text == "$0.01"));
    }

    #[test]
    fn test_mismatched_amounts_rejected() {
        let items = vec![LineItem::new("x", 1, 1)];
        let err = compose(&items, &[], "$", 468.0, &TableStyle::default(), &FixedMeasure);
        assert!(matches!(err, Err(InvoiceError::Render(_))));
    }
}
