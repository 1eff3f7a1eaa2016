//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization. Charge rates come in as an explicit
//! [`ChargesConfig`] so totals stay deterministic under test.

#[cfg(test)]
mod tests;

use rust_decimal::prelude::*;

use crate::db::repository::RepoError;
use shared::models::ChargesConfig;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per unit (€1,000,000)
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i64 = 9999;
/// Maximum allowed variation modifiers per line
const MAX_MODIFIERS: usize = 20;

/// Convert an f64 into Decimal for lossless arithmetic
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Round to 2dp (half-up) and convert back to f64 for storage
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// A resolved order line: product references have already been looked up,
/// custom items carry their own name and price.
#[derive(Debug, Clone)]
pub struct LineInput {
    pub product_id: Option<i64>,
    pub name: String,
    pub quantity: i64,
    pub unit_price: f64,
    /// Variation price modifiers per unit (extra shot, large cup...)
    pub modifiers: Vec<f64>,
    pub note: Option<String>,
}

/// A priced order line, ready for persistence
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product_id: Option<i64>,
    pub name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub modifiers_total: f64,
    /// quantity × (unit_price + modifiers_total), rounded per line
    pub total_price: f64,
    pub note: Option<String>,
}

/// Monetary rollup of an order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub service_charge: f64,
    pub discount_amount: f64,
    /// subtotal + tax + service − discount, clamped at 0
    pub total_amount: f64,
}

#[inline]
fn require_finite(value: f64, field: &str) -> Result<(), RepoError> {
    if !value.is_finite() {
        return Err(RepoError::Validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Validate a single line before pricing
pub fn validate_line(line: &LineInput) -> Result<(), RepoError> {
    require_finite(line.unit_price, "unit_price")?;
    if line.unit_price < 0.0 {
        return Err(RepoError::Validation(format!(
            "unit_price must be non-negative, got {}",
            line.unit_price
        )));
    }
    if line.unit_price > MAX_PRICE {
        return Err(RepoError::Validation(format!(
            "unit_price exceeds maximum allowed ({MAX_PRICE}), got {}",
            line.unit_price
        )));
    }

    if line.quantity <= 0 {
        return Err(RepoError::Validation(format!(
            "quantity must be positive, got {}",
            line.quantity
        )));
    }
    if line.quantity > MAX_QUANTITY {
        return Err(RepoError::Validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {}",
            line.quantity
        )));
    }

    if line.modifiers.len() > MAX_MODIFIERS {
        return Err(RepoError::Validation(format!(
            "too many variation modifiers ({}, max {MAX_MODIFIERS})",
            line.modifiers.len()
        )));
    }
    for m in &line.modifiers {
        require_finite(*m, "variation modifier")?;
        if m.abs() > MAX_PRICE {
            return Err(RepoError::Validation(format!(
                "variation modifier exceeds maximum allowed, got {m}"
            )));
        }
    }

    if line.name.trim().is_empty() {
        return Err(RepoError::Validation("item name must not be empty".into()));
    }
    Ok(())
}

/// Price one line: `quantity × (unit_price + Σ modifiers)`
fn price_line(line: &LineInput) -> PricedLine {
    let modifiers_total: Decimal = line.modifiers.iter().map(|m| to_decimal(*m)).sum();
    let effective_unit = to_decimal(line.unit_price) + modifiers_total;
    let total = effective_unit * Decimal::from(line.quantity);

    PricedLine {
        product_id: line.product_id,
        name: line.name.clone(),
        quantity: line.quantity,
        unit_price: line.unit_price,
        modifiers_total: to_f64(modifiers_total),
        total_price: to_f64(total),
        note: line.note.clone(),
    }
}

/// Validate and price a whole order.
///
/// Rejected before any mutation: empty orders, non-positive quantities,
/// negative prices, non-finite discounts. The rollup identity
/// `total = max(subtotal + tax + service − discount, 0)` always holds on
/// the returned totals.
pub fn price_order(
    items: &[LineInput],
    charges: &ChargesConfig,
    discount_amount: f64,
) -> Result<(Vec<PricedLine>, OrderTotals), RepoError> {
    if items.is_empty() {
        return Err(RepoError::Validation(
            "order must contain at least one item".into(),
        ));
    }
    require_finite(discount_amount, "discount_amount")?;
    if discount_amount < 0.0 {
        return Err(RepoError::Validation(format!(
            "discount_amount must be non-negative, got {discount_amount}"
        )));
    }

    let mut lines = Vec::with_capacity(items.len());
    let mut subtotal = Decimal::ZERO;
    for item in items {
        validate_line(item)?;
        let priced = price_line(item);
        subtotal += to_decimal(priced.total_price);
        lines.push(priced);
    }

    let tax = (subtotal * to_decimal(charges.tax_rate))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let service = (subtotal * to_decimal(charges.service_charge_rate))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let discount = to_decimal(discount_amount);

    let total = (subtotal + tax + service - discount).max(Decimal::ZERO);

    let totals = OrderTotals {
        subtotal: to_f64(subtotal),
        tax_amount: to_f64(tax),
        service_charge: to_f64(service),
        discount_amount: to_f64(discount),
        total_amount: to_f64(total),
    };
    Ok((lines, totals))
}
