//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done in `Decimal`, then rounded to 2 decimal places
//! (half away from zero) and converted back to `f64` for storage and JSON.
//! The server and the client cart both derive order totals from here.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use super::types::{LineItem, SelectedCustomization};
use crate::error::{AppError, AppResult, ErrorCode};

const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed unit price or fee
pub const MAX_PRICE: f64 = 100_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: u32 = 99;

/// A priced line: unit price × quantity plus flat customization deltas
pub trait PricedLine {
    fn unit_price(&self) -> f64;
    fn quantity(&self) -> u32;
    fn customizations(&self) -> &[SelectedCustomization];
}

impl PricedLine for LineItem {
    fn unit_price(&self) -> f64 {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn customizations(&self) -> &[SelectedCustomization] {
        &self.customizations
    }
}

/// Derived money fields of an order
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub tip: f64,
    pub total: f64,
}

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Validate a monetary input: finite, non-negative, bounded
pub fn require_amount(value: f64, field_name: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{} must be a finite number, got {}", field_name, value),
        ));
    }
    if value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{} must be non-negative, got {}", field_name, value),
        ));
    }
    if value > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!(
                "{} exceeds maximum allowed ({}), got {}",
                field_name, MAX_PRICE, value
            ),
        ));
    }
    Ok(())
}

/// Whether two amounts are equal within [`MONEY_TOLERANCE`]
pub fn amounts_match(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() <= MONEY_TOLERANCE
}

/// price × quantity + Σ customization deltas
pub fn line_total<L: PricedLine>(line: &L) -> Decimal {
    let base = to_decimal(line.unit_price()) * Decimal::from(line.quantity());
    let extras: Decimal = line
        .customizations()
        .iter()
        .map(|c| to_decimal(c.price))
        .sum();
    base + extras
}

pub fn subtotal<L: PricedLine>(lines: &[L]) -> Decimal {
    lines.iter().map(line_total).sum()
}

/// Compute subtotal and total from lines and the order-level charges
///
/// Every amount is validated first; a client-supplied total is never an input.
pub fn compute_totals<L: PricedLine>(
    lines: &[L],
    delivery_fee: f64,
    tax: f64,
    tip: f64,
) -> AppResult<OrderTotals> {
    for line in lines {
        require_amount(line.unit_price(), "price")?;
        if line.quantity() == 0 || line.quantity() > MAX_QUANTITY {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!(
                    "quantity must be between 1 and {}, got {}",
                    MAX_QUANTITY,
                    line.quantity()
                ),
            ));
        }
        for c in line.customizations() {
            require_amount(c.price, "customization price")?;
        }
    }
    require_amount(delivery_fee, "delivery_fee")?;
    require_amount(tax, "tax")?;
    require_amount(tip, "tip")?;

    let subtotal = subtotal(lines);
    let total = subtotal + to_decimal(delivery_fee) + to_decimal(tax) + to_decimal(tip);

    Ok(OrderTotals {
        subtotal: to_f64(subtotal),
        delivery_fee: to_f64(to_decimal(delivery_fee)),
        tax: to_f64(to_decimal(tax)),
        tip: to_f64(to_decimal(tip)),
        total: to_f64(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: f64, quantity: u32, extras: &[f64]) -> LineItem {
        LineItem {
            menu_item: "menu_item:x".into(),
            name: "Item".into(),
            quantity,
            price,
            customizations: extras
                .iter()
                .enumerate()
                .map(|(i, p)| SelectedCustomization {
                    name: format!("group{}", i),
                    option: "opt".into(),
                    price: *p,
                })
                .collect(),
            special_instructions: None,
        }
    }

    #[test]
    fn test_to_decimal_precision() {
        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_order_scenario_totals() {
        let lines = vec![line(10.00, 2, &[]), line(5.50, 1, &[])];
        let totals = compute_totals(&lines, 3.00, 1.50, 0.0).unwrap();
        assert_eq!(totals.subtotal, 25.50);
        assert_eq!(totals.total, 30.00);
        assert_eq!(totals.tip, 0.0);
    }

    #[test]
    fn test_customizations_are_added_once_per_line() {
        // 2 × 8.00 + (2.00 + 0.50)
        let lines = vec![line(8.00, 2, &[2.00, 0.50])];
        let totals = compute_totals(&lines, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(totals.subtotal, 18.50);
        assert_eq!(totals.total, 18.50);
    }

    #[test]
    fn test_total_with_tax_and_tip() {
        let lines = vec![line(12.99, 3, &[1.25])];
        let totals = compute_totals(&lines, 2.49, 3.21, 5.00).unwrap();
        assert_eq!(totals.subtotal, 40.22);
        assert_eq!(totals.total, 50.92);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(to_f64(Decimal::new(1005, 3)), 1.01);
        assert_eq!(to_f64(Decimal::new(1004, 3)), 1.0);
    }

    #[test]
    fn test_negative_or_nan_rejected() {
        let lines = vec![line(10.0, 1, &[])];
        assert!(compute_totals(&lines, -1.0, 0.0, 0.0).is_err());
        assert!(compute_totals(&lines, 0.0, f64::NAN, 0.0).is_err());
        assert!(compute_totals(&[line(-2.0, 1, &[])], 0.0, 0.0, 0.0).is_err());
        assert!(compute_totals(&[line(2.0, 0, &[])], 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_empty_lines_sum_to_charges() {
        let lines: Vec<LineItem> = vec![];
        let totals = compute_totals(&lines, 3.0, 0.0, 1.0).unwrap();
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.total, 4.0);
    }

    #[test]
    fn test_amounts_match_tolerance() {
        assert!(amounts_match(10.0, 10.01));
        assert!(amounts_match(10.0, 9.995));
        assert!(!amounts_match(10.0, 10.02));
    }
}
