//! # Financial Calculator
//!
//! Per-item amounts, subtotal, tax and grand total in exact decimal
//! arithmetic. Every currency-facing value is rounded half-up (midpoint away
//! from zero) at two decimal places.
//!
//! Rounding order matters: the subtotal is the sum of the *unrounded*
//! `quantity × rate` products, while each row shows its own independently
//! rounded amount. With many sub-cent products the visible rows can differ
//! from the visible subtotal by a cent or more. That is the intended
//! behavior.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::debug;

use crate::error::InvoiceError;
use crate::model::{LineItem, RawNumber};

/// Round to cents, half-up.
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a value as currency: symbol, thousands separators, two decimals.
///
/// `format_currency(dec!(1234.5), "$") == "$1,234.50"`. A negative value keeps
/// its sign after the symbol (`$-5.00`).
pub fn format_currency(value: Decimal, symbol: &str) -> String {
    let mut rounded = round_half_up(value);
    rounded.rescale(2);

    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}.{}", symbol, sign, grouped, frac_part)
}

/// One line item after numeric conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemAmount {
    pub quantity: Decimal,
    pub rate: Decimal,
    /// `quantity × rate` at full precision.
    pub amount: Decimal,
    /// `amount` rounded for the table cell.
    pub display_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedTotals {
    pub items: Vec<ItemAmount>,
    /// Sum of unrounded item amounts.
    pub subtotal: Decimal,
    /// Percentage as given in the input.
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl ComputedTotals {
    pub fn display_subtotal(&self) -> Decimal {
        round_half_up(self.subtotal)
    }

    pub fn display_total(&self) -> Decimal {
        round_half_up(self.total)
    }
}

fn overflow(what: &str) -> InvoiceError {
    InvoiceError::Render(format!("arithmetic overflow while computing {}", what))
}

/// Compute all monetary values for an invoice.
pub fn compute_totals(
    items: &[LineItem],
    tax_rate: &RawNumber,
) -> Result<ComputedTotals, InvoiceError> {
    let tax_rate = tax_rate.to_decimal("financials.tax_rate")?;

    let mut amounts = Vec::with_capacity(items.len());
    let mut subtotal = Decimal::ZERO;
    for (i, item) in items.iter().enumerate() {
        let quantity = item.quantity.to_decimal(&format!("items[{}].quantity", i))?;
        let rate = item.rate.to_decimal(&format!("items[{}].rate", i))?;
        let amount = quantity
            .checked_mul(rate)
            .ok_or_else(|| overflow("a line item amount"))?;
        subtotal = subtotal
            .checked_add(amount)
            .ok_or_else(|| overflow("the subtotal"))?;
        amounts.push(ItemAmount {
            quantity,
            rate,
            amount,
            display_amount: round_half_up(amount),
        });
    }

    let tax = subtotal
        .checked_mul(tax_rate)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .map(round_half_up)
        .ok_or_else(|| overflow("the tax amount"))?;
    let total = subtotal
        .checked_add(tax)
        .ok_or_else(|| overflow("the total"))?;

    debug!(%subtotal, %tax, %total, items = amounts.len(), "computed invoice totals");

    Ok(ComputedTotals {
        items: amounts,
        subtotal,
        tax_rate,
        tax,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(1234.5), "$"), "$1,234.50");
        assert_eq!(format_currency(dec!(1234567.891), "$"), "$1,234,567.89");
        assert_eq!(format_currency(dec!(999.999), "$"), "$1,000.00");
        assert_eq!(format_currency(dec!(100), "£"), "£100.00");
    }

    #[test]
    fn test_format_currency_zero() {
        assert_eq!(format_currency(Decimal::ZERO, "€"), "€0.00");
        assert_eq!(format_currency(dec!(-0.001), "$"), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-1500), "$"), "$-1,500.00");
    }

    #[test]
    fn test_format_currency_is_stable() {
        let once = format_currency(dec!(0.125), "$");
        assert_eq!(once, "$0.13");
        assert_eq!(format_currency(dec!(0.13), "$"), once);
    }

    #[test]
    fn test_round_half_up_not_bankers() {
        assert_eq!(round_half_up(dec!(0.125)), dec!(0.13));
        assert_eq!(round_half_up(dec!(2.675)), dec!(2.68));
        assert_eq!(round_half_up(dec!(1.005)), dec!(1.01));
        assert_eq!(round_half_up(dec!(1.004)), dec!(1.00));
        assert_eq!(round_half_up(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn test_widget_scenario() {
        let items = vec![LineItem::new("Widget", 2, 9.99)];
        let totals = compute_totals(&items, &RawNumber::Integer(10)).unwrap();
        assert_eq!(totals.subtotal, dec!(19.98));
        assert_eq!(totals.tax, dec!(2.00));
        assert_eq!(totals.total, dec!(21.98));
    }

    #[test]
    fn test_small_amounts_scenario() {
        let items = vec![LineItem::new("a", 3, 0.10), LineItem::new("b", 1, 0.05)];
        let totals = compute_totals(&items, &RawNumber::Integer(0)).unwrap();
        assert_eq!(totals.subtotal, dec!(0.35));
        assert_eq!(totals.tax, dec!(0.00));
        assert_eq!(totals.total, dec!(0.35));
    }

    #[test]
    fn test_no_items_yields_zero() {
        let totals = compute_totals(&[], &RawNumber::Float(8.5)).unwrap();
        assert_eq!(format_currency(totals.subtotal, "$"), "$0.00");
        assert_eq!(format_currency(totals.tax, "$"), "$0.00");
        assert_eq!(format_currency(totals.total, "$"), "$0.00");
    }

    #[test]
    fn test_subtotal_uses_unrounded_products() {
        // Each row shows 0.00 (0.004 rounds down) but three of them add up.
        let items: Vec<_> = (0..3).map(|_| LineItem::new("x", "0.004", 1)).collect();
        let totals = compute_totals(&items, &RawNumber::Integer(0)).unwrap();
        assert!(totals.items.iter().all(|i| i.display_amount == dec!(0.00)));
        assert_eq!(totals.subtotal, dec!(0.012));
        assert_eq!(totals.display_subtotal(), dec!(0.01));
    }

    #[test]
    fn test_total_keeps_subtotal_precision() {
        let items = vec![LineItem::new("x", "1", "10.005")];
        let totals = compute_totals(&items, &RawNumber::Integer(0)).unwrap();
        assert_eq!(totals.total, dec!(10.005));
        assert_eq!(totals.display_total(), dec!(10.01));
    }

    #[test]
    fn test_bad_quantity_is_numeric_error() {
        let items = vec![LineItem::new("x", 1, 1), LineItem::new("y", "two", 1)];
        let err = compute_totals(&items, &RawNumber::Integer(0)).unwrap_err();
        match err {
            InvoiceError::NumericParse { field, .. } => assert_eq!(field, "items[1].quantity"),
            other => panic!("expected numeric error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_tax_rate_is_numeric_error() {
        let err = compute_totals(&[], &RawNumber::from("ten")).unwrap_err();
        assert!(matches!(err, InvoiceError::NumericParse { ref field, .. } if field == "financials.tax_rate"));
    }

    proptest! {
        #[test]
        fn prop_row_amount_is_rounded_product(q in 0i64..1_000_000, r in 0i64..10_000_000) {
            let quantity = Decimal::new(q, 3);
            let rate = Decimal::new(r, 4);
            let items = vec![LineItem::new("p", quantity.to_string().as_str(), rate.to_string().as_str())];
            let totals = compute_totals(&items, &RawNumber::Integer(0)).unwrap();
            prop_assert_eq!(totals.items[0].display_amount, round_half_up(quantity * rate));
        }

        #[test]
        fn prop_subtotal_ignores_row_rounding(
            rows in proptest::collection::vec((0i64..10_000, 0i64..100_000), 0..20),
            tax in 0i64..3000,
        ) {
            let items: Vec<_> = rows
                .iter()
                .map(|(q, r)| LineItem::new("p", Decimal::new(*q, 2).to_string().as_str(), Decimal::new(*r, 3).to_string().as_str()))
                .collect();
            let tax_rate = Decimal::new(tax, 2);
            let totals = compute_totals(&items, &RawNumber::Text(tax_rate.to_string())).unwrap();

            let expected: Decimal = rows
                .iter()
                .map(|(q, r)| Decimal::new(*q, 2) * Decimal::new(*r, 3))
                .sum();
            prop_assert_eq!(totals.subtotal, expected);
            prop_assert_eq!(totals.tax, round_half_up(expected * tax_rate / Decimal::ONE_HUNDRED));
            prop_assert_eq!(totals.total, totals.subtotal + totals.tax);
            prop_assert_eq!(totals.display_total(), round_half_up(totals.total));
        }
    }
}
