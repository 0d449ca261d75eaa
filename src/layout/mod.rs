//! # Layout Engine
//!
//! Assigns absolute page coordinates to every block of the invoice template.
//!
//! Layout is two-phase. The table composer first produces a [`TableSpec`]
//! whose height is known; only then does [`LayoutEngine::plan`] run a
//! top-down vertical cursor over the page:
//!
//! ```text
//!   top margin ─ header (sender name | INVOICE, # number)
//!        +108  ─ bill-to block      | date / due date / balance due
//!        +108  ─ item table (top fixed, bottom = top + table height)
//!         +36  ─ totals block  <- the only anchor that follows the table
//!
//!   bottom margin + 72 ─ terms block (independent of the table)
//! ```
//!
//! Coordinates are points with the origin at the top-left corner of the
//! page; text anchors are baselines. A table tall enough to run into the
//! terms block is not detected: the template is single-page only.

use serde::Serialize;
use tracing::debug;

use crate::table::TableSpec;

/// A position on the page, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle; `y` is its top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Edge values (top, right, bottom, left) in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }
}

pub const INCH: f64 = 72.0;

/// Page size and margins. Passed explicitly so tests can lay out on other
/// geometries without touching global state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: Edges,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

impl PageGeometry {
    /// US Letter with 1-inch margins, the invoice template's page.
    pub const fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin: Edges::uniform(INCH),
        }
    }

    pub fn left(&self) -> f64 {
        self.margin.left
    }

    pub fn right(&self) -> f64 {
        self.width - self.margin.right
    }

    pub fn top(&self) -> f64 {
        self.margin.top
    }

    pub fn bottom(&self) -> f64 {
        self.height - self.margin.bottom
    }

    /// Page width minus both horizontal margins.
    pub fn content_width(&self) -> f64 {
        self.width - self.margin.horizontal()
    }
}

// Vertical spacing of the template, in points.
const NUMBER_BELOW_TITLE: f64 = 0.25 * INCH;
const SENDER_ADDRESS_BELOW_NAME: f64 = 16.0;
const SENDER_ADDRESS_LEADING: f64 = 11.0;
const INFO_ROW_BELOW_HEADER: f64 = 1.5 * INCH;
const CLIENT_NAME_BELOW_LABEL: f64 = 0.2 * INCH;
const CLIENT_ADDRESS_BELOW_LABEL: f64 = 0.4 * INCH;
const CLIENT_ADDRESS_LEADING: f64 = 14.0;
const DATE_LINE_SPACING: f64 = 0.25 * INCH;
const TABLE_BELOW_INFO_ROW: f64 = 1.5 * INCH;
const TOTALS_BELOW_TABLE: f64 = 0.5 * INCH;
const TOTALS_LINE_SPACING: f64 = 0.25 * INCH;
const TERMS_ABOVE_BOTTOM_MARGIN: f64 = INCH;
const TERMS_NOTES_BELOW_LABEL: f64 = 0.2 * INCH;
const TERMS_NOTES_LEADING: f64 = 14.0;

// Horizontal insets from the right margin.
const DATE_COLUMN_INSET: f64 = 1.5 * INCH;
const TOTALS_LABEL_INSET: f64 = INCH;

// Band behind the balance-due line, relative to the date column.
const BALANCE_BAND_LEFT_PAD: f64 = 0.1 * INCH;
const BALANCE_BAND_WIDTH: f64 = 2.6 * INCH;
const BALANCE_BAND_HEIGHT: f64 = 0.3 * INCH;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderBlock {
    pub sender_name: Point,
    /// Baseline of the first sender address line.
    pub sender_address: Point,
    pub sender_address_leading: f64,
    /// Right-anchored "INVOICE" label.
    pub title: Point,
    /// Right-anchored invoice number.
    pub number: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillToBlock {
    pub label: Point,
    pub client_name: Point,
    /// Baseline of the first address line.
    pub address: Point,
    pub address_leading: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateBlock {
    pub label_x: f64,
    /// Values are right-aligned here.
    pub value_x: f64,
    pub issue_y: f64,
    pub due_y: f64,
    pub balance_y: f64,
    pub balance_band: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableBlock {
    /// Top-left corner of the table.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsBlock {
    /// Labels are right-aligned here.
    pub label_x: f64,
    /// Values are right-aligned here.
    pub value_x: f64,
    pub subtotal_y: f64,
    pub tax_y: f64,
    pub total_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermsBlock {
    pub label: Point,
    pub notes: Point,
    pub notes_leading: f64,
    pub notes_width: f64,
}

/// Anchor coordinates for every block on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub page: PageGeometry,
    pub header: HeaderBlock,
    pub bill_to: BillToBlock,
    pub dates: DateBlock,
    pub table: TableBlock,
    pub totals: TotalsBlock,
    pub terms: TermsBlock,
}

pub struct LayoutEngine {
    geometry: PageGeometry,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(PageGeometry::letter())
    }
}

impl LayoutEngine {
    pub fn new(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Place every block, given the already-composed table.
    pub fn plan(&self, table: &TableSpec) -> LayoutPlan {
        let page = self.geometry;
        let left = page.left();
        let right = page.right();

        let mut cursor = page.top();

        let header = HeaderBlock {
            sender_name: Point::new(left, cursor),
            sender_address: Point::new(left, cursor + SENDER_ADDRESS_BELOW_NAME),
            sender_address_leading: SENDER_ADDRESS_LEADING,
            title: Point::new(right, cursor),
            number: Point::new(right, cursor + NUMBER_BELOW_TITLE),
        };

        cursor += INFO_ROW_BELOW_HEADER;

        let bill_to = BillToBlock {
            label: Point::new(left, cursor),
            client_name: Point::new(left, cursor + CLIENT_NAME_BELOW_LABEL),
            address: Point::new(left, cursor + CLIENT_ADDRESS_BELOW_LABEL),
            address_leading: CLIENT_ADDRESS_LEADING,
        };

        let label_x = right - DATE_COLUMN_INSET;
        let dates = DateBlock {
            label_x,
            value_x: right,
            issue_y: cursor,
            due_y: cursor + DATE_LINE_SPACING,
            balance_y: cursor + 2.0 * DATE_LINE_SPACING,
            balance_band: Rect {
                x: label_x - BALANCE_BAND_LEFT_PAD,
                y: cursor + DATE_LINE_SPACING,
                width: BALANCE_BAND_WIDTH,
                height: BALANCE_BAND_HEIGHT,
            },
        };

        cursor += TABLE_BELOW_INFO_ROW;

        let table_block = TableBlock {
            origin: Point::new(left, cursor),
            width: table.width,
            height: table.height,
            bottom: cursor + table.height,
        };

        cursor = table_block.bottom + TOTALS_BELOW_TABLE;

        let totals = TotalsBlock {
            label_x: right - TOTALS_LABEL_INSET,
            value_x: right,
            subtotal_y: cursor,
            tax_y: cursor + TOTALS_LINE_SPACING,
            total_y: cursor + 2.0 * TOTALS_LINE_SPACING,
        };

        // Anchored to the bottom margin, never to the cursor.
        let terms_y = page.bottom() - TERMS_ABOVE_BOTTOM_MARGIN;
        let terms = TermsBlock {
            label: Point::new(left, terms_y),
            notes: Point::new(left, terms_y + TERMS_NOTES_BELOW_LABEL),
            notes_leading: TERMS_NOTES_LEADING,
            notes_width: page.content_width(),
        };

        debug!(
            table_top = table_block.origin.y,
            table_bottom = table_block.bottom,
            totals_y = totals.subtotal_y,
            terms_y,
            "computed layout plan"
        );

        LayoutPlan {
            page,
            header,
            bill_to,
            dates,
            table: table_block,
            totals,
            terms,
        }
    }
}
