//! # Document Renderer
//!
//! Runs the pipeline for one invoice: totals, table, layout, then the draw
//! calls against a [`Canvas`] and a single finalize.
//!
//! Every draw call passes its own [`TextStyle`] or [`Color`]. Blocks can be
//! reordered without one inheriting another's font.

use serde::Serialize;
use tracing::{debug, info};

use crate::canvas::Canvas;
use crate::error::InvoiceError;
use crate::layout::{LayoutEngine, LayoutPlan, PageGeometry, Point};
use crate::model::InvoiceRecord;
use crate::money::{compute_totals, format_currency, ComputedTotals};
use crate::style::{Color, TextStyle};
use crate::table::{compose, TableSpec, TableStyle};

const SENDER_NAME: TextStyle = TextStyle::bold(16.0);
const SENDER_ADDRESS: TextStyle = TextStyle::regular(9.0);
const TITLE: TextStyle = TextStyle::bold(24.0).right();
const BODY: TextStyle = TextStyle::regular(10.0);
const BODY_BOLD: TextStyle = TextStyle::bold(10.0);

/// Everything computed while rendering, for callers that want to inspect
/// the result without parsing the PDF.
#[derive(Debug, Clone, Serialize)]
pub struct RenderOutcome {
    pub title: String,
    pub totals: ComputedTotals,
    pub table: TableSpec,
    pub layout: LayoutPlan,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    geometry: PageGeometry,
    table_style: TableStyle,
}

impl DocumentRenderer {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            table_style: TableStyle::default(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Render `record` onto `canvas` and finalize it.
    ///
    /// Nothing is drawn if the totals or the table cannot be computed, so a
    /// numeric error never leaves a half-written document behind.
    pub fn render<C>(
        &self,
        record: &InvoiceRecord,
        canvas: &mut C,
    ) -> Result<RenderOutcome, InvoiceError>
    where
        C: Canvas + ?Sized,
    {
        let totals = compute_totals(&record.items, &record.financials.tax_rate)?;
        let table = compose(
            &record.items,
            &totals.items,
            &record.invoice.currency_symbol,
            self.geometry.content_width(),
            &self.table_style,
            &*canvas,
        )?;
        let layout = LayoutEngine::new(self.geometry).plan(&table);
        let title = record.title();

        canvas.set_title(&title);
        self.draw_header(canvas, record, &layout);
        self.draw_bill_to(canvas, record, &layout);
        self.draw_dates(canvas, record, &totals, &layout);
        canvas.draw_table(layout.table.origin, &table, &self.table_style);
        self.draw_totals(canvas, record, &totals, &layout);
        self.draw_terms(canvas, record, &layout);
        debug!("issued all draw calls");

        canvas.finalize()?;
        info!(
            %title,
            items = record.items.len(),
            total = %totals.display_total(),
            "rendered invoice"
        );

        Ok(RenderOutcome {
            title,
            totals,
            table,
            layout,
        })
    }

    fn draw_header<C: Canvas + ?Sized>(&self, canvas: &mut C, record: &InvoiceRecord, layout: &LayoutPlan) {
        let header = &layout.header;
        canvas.draw_text(
            &record.sender.display_name().to_uppercase(),
            header.sender_name,
            &SENDER_NAME,
        );
        for (i, line) in record.sender.address.iter().enumerate() {
            let at = Point::new(
                header.sender_address.x,
                header.sender_address.y + i as f64 * header.sender_address_leading,
            );
            canvas.draw_text(line, at, &SENDER_ADDRESS);
        }

        canvas.draw_text("INVOICE", header.title, &TITLE);
        canvas.draw_text(
            &format!("# {}", record.invoice.number),
            header.number,
            &BODY.right(),
        );
    }

    fn draw_bill_to<C: Canvas + ?Sized>(&self, canvas: &mut C, record: &InvoiceRecord, layout: &LayoutPlan) {
        let block = &layout.bill_to;
        canvas.draw_text("Bill To:", block.label, &BODY_BOLD);
        canvas.draw_text(&record.client.name, block.client_name, &BODY);
        for (i, line) in record.client.address.iter().enumerate() {
            let at = Point::new(block.address.x, block.address.y + i as f64 * block.address_leading);
            canvas.draw_text(line, at, &BODY);
        }
    }

    fn draw_dates<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        record: &InvoiceRecord,
        totals: &ComputedTotals,
        layout: &LayoutPlan,
    ) {
        let dates = &layout.dates;
        canvas.draw_text("Date:", Point::new(dates.label_x, dates.issue_y), &BODY);
        canvas.draw_text("Due Date:", Point::new(dates.label_x, dates.due_y), &BODY);

        canvas.fill_rect(dates.balance_band, Color::WHITE);
        canvas.draw_text("Balance Due:", Point::new(dates.label_x, dates.balance_y), &BODY_BOLD);

        canvas.draw_text(
            &record.invoice.issue_date,
            Point::new(dates.value_x, dates.issue_y),
            &BODY.right(),
        );
        canvas.draw_text(
            &record.invoice.due_date,
            Point::new(dates.value_x, dates.due_y),
            &BODY.right(),
        );
        canvas.draw_text(
            &format_currency(totals.display_total(), &record.invoice.currency_symbol),
            Point::new(dates.value_x, dates.balance_y),
            &BODY_BOLD.right(),
        );
    }

    fn draw_totals<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        record: &InvoiceRecord,
        totals: &ComputedTotals,
        layout: &LayoutPlan,
    ) {
        let block = &layout.totals;
        let symbol = &record.invoice.currency_symbol;
        let rows = [
            ("Subtotal:".to_string(), totals.display_subtotal(), block.subtotal_y, BODY),
            (format!("Tax ({}%):", totals.tax_rate), totals.tax, block.tax_y, BODY),
            ("Total:".to_string(), totals.display_total(), block.total_y, BODY_BOLD),
        ];
        for (label, value, y, style) in rows {
            canvas.draw_text(&label, Point::new(block.label_x, y), &style.right());
            canvas.draw_text(
                &format_currency(value, symbol),
                Point::new(block.value_x, y),
                &style.right(),
            );
        }
    }

    fn draw_terms<C: Canvas + ?Sized>(&self, canvas: &mut C, record: &InvoiceRecord, layout: &LayoutPlan) {
        let terms = &layout.terms;
        canvas.draw_text("Terms:", terms.label, &BODY_BOLD);
        if !record.terms.notes.is_empty() {
            canvas.draw_paragraph(
                &record.terms.notes,
                terms.notes,
                terms.notes_width,
                terms.notes_leading,
                &BODY,
            );
        }
    }
}
