//! # Invoice Forme
//!
//! Renders one invoice record into a fixed-layout, single-page PDF.
//!
//! The page is laid out from a fixed template. Only one thing is dynamic:
//! the item table's height, which depends on how long each description wraps.
//! The table is composed and measured first, and the totals block is placed
//! below wherever the table ends.
//!
//! ## Architecture
//!
//! ```text
//! Input (TOML)
//!       ↓
//!   [model]     Typed invoice record, defaults, presence validation
//!       ↓
//!   [money]     Exact decimal totals, round-half-up
//!       ↓
//!   [table]     Column widths, wrapped description rows, table height
//!       ↓
//!   [layout]    Top-down anchors for every block on the page
//!       ↓
//!   [render]    Draw calls against a Canvas, then finalize once
//!       ↓
//!   [pdf]       Serialize to PDF bytes
//! ```

pub mod canvas;
pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod money;
pub mod pdf;
pub mod render;
pub mod style;
pub mod table;
pub mod text;

use std::path::Path;

use toml::Table;

pub use error::InvoiceError;
pub use model::InvoiceRecord;
pub use pdf::PdfCanvas;
pub use render::{DocumentRenderer, RenderOutcome};

use layout::PageGeometry;

/// Render a parsed input document to PDF bytes.
///
/// This is the primary entry point. Validation, numeric and layout errors
/// are reported before any bytes are produced.
pub fn render_to_bytes(input: &Table) -> Result<(Vec<u8>, RenderOutcome), InvoiceError> {
    let record = InvoiceRecord::from_table(input)?;
    let geometry = PageGeometry::letter();
    let mut canvas = PdfCanvas::new(&geometry);
    let outcome = DocumentRenderer::new(geometry).render(&record, &mut canvas)?;
    let bytes = canvas
        .into_bytes()
        .ok_or_else(|| InvoiceError::Render("document was not finalized".to_string()))?;
    Ok((bytes, outcome))
}

/// Render a parsed input document and write the PDF to `path`.
///
/// The file is only created once the whole document has been built.
pub fn render_to_path(input: &Table, path: &Path) -> Result<RenderOutcome, InvoiceError> {
    let record = InvoiceRecord::from_table(input)?;
    let geometry = PageGeometry::letter();
    let mut canvas = PdfCanvas::to_file(&geometry, path);
    DocumentRenderer::new(geometry).render(&record, &mut canvas)
}

/// A complete sample input document, printed by `--example`.
pub const EXAMPLE_INVOICE: &str = r#"[sender]
name = "Acme Design Studio"
address = """
123 Business St, Suite 100
San Francisco, CA 94102"""

[client]
name = "Widget Industries"
address = """
456 Client Ave
New York, NY 10001"""

[invoice]
number = "INV-2026-001"
issue_date = "2026-02-14"
due_date = "2026-03-01"
currency_symbol = "$"

[[items]]
description = "Web development services, including responsive layouts for the marketing site and the customer dashboard"
quantity = 40
rate = 150.00

[[items]]
description = "UI/UX design"
quantity = 20
rate = 175.00

[[items]]
description = "Server infrastructure setup"
quantity = 1
rate = 2500.00

[financials]
tax_rate = 8.0

[terms]
notes = "Payment is due within 15 days of the invoice date. Thank you for your business."
"#;
