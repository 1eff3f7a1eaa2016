use super::*;
use shared::models::ChargesConfig;

fn line(name: &str, qty: i64, price: f64) -> LineInput {
    LineInput {
        product_id: None,
        name: name.to_string(),
        quantity: qty,
        unit_price: price,
        modifiers: vec![],
        note: None,
    }
}

fn charges(tax: f64, service: f64) -> ChargesConfig {
    ChargesConfig {
        tax_rate: tax,
        service_charge_rate: service,
    }
}

#[test]
fn test_to_decimal_precision() {
    // Classic floating point problem: 0.1 + 0.2 != 0.3
    let a = 0.1_f64;
    let b = 0.2_f64;
    let sum_f64 = a + b;

    // f64 fails
    assert_ne!(sum_f64, 0.3);

    // Decimal succeeds
    let sum_dec = to_decimal(a) + to_decimal(b);
    assert_eq!(to_f64(sum_dec), 0.3);
}

#[test]
fn test_worked_example_16_tax_10_service() {
    // qty 2 @ 100 and qty 1 @ 50, tax 16%, service 10%, discount 0
    let items = vec![line("Paella", 2, 100.0), line("Sangria", 1, 50.0)];
    let (lines, totals) = price_order(&items, &charges(0.16, 0.10), 0.0).unwrap();

    assert_eq!(lines[0].total_price, 200.0);
    assert_eq!(lines[1].total_price, 50.0);
    assert_eq!(totals.subtotal, 250.0);
    assert_eq!(totals.tax_amount, 40.0);
    assert_eq!(totals.service_charge, 25.0);
    assert_eq!(totals.total_amount, 315.0);
}

#[test]
fn test_totals_identity_holds() {
    let items = vec![line("Espresso", 3, 1.1), line("Tostada", 2, 2.35)];
    let (_, t) = price_order(&items, &charges(0.21, 0.05), 1.5).unwrap();
    let expected = to_f64(
        to_decimal(t.subtotal) + to_decimal(t.tax_amount) + to_decimal(t.service_charge)
            - to_decimal(t.discount_amount),
    );
    assert_eq!(t.total_amount, expected);
}

#[test]
fn test_variation_modifiers_per_unit() {
    // 2 × (3.00 + 0.50 + 0.25) = 7.50
    let mut l = line("Latte", 2, 3.0);
    l.modifiers = vec![0.50, 0.25];
    let (lines, totals) = price_order(&[l], &charges(0.0, 0.0), 0.0).unwrap();
    assert_eq!(lines[0].modifiers_total, 0.75);
    assert_eq!(lines[0].total_price, 7.5);
    assert_eq!(totals.subtotal, 7.5);
}

#[test]
fn test_discount_clamps_total_at_zero() {
    let items = vec![line("Cortado", 1, 2.0)];
    let (_, totals) = price_order(&items, &charges(0.0, 0.0), 50.0).unwrap();
    assert_eq!(totals.total_amount, 0.0);
    // discount is recorded as given, only the total is clamped
    assert_eq!(totals.discount_amount, 50.0);
}

#[test]
fn test_rejects_empty_order() {
    let err = price_order(&[], &charges(0.16, 0.10), 0.0).unwrap_err();
    assert!(matches!(err, crate::db::repository::RepoError::Validation(_)));
}

#[test]
fn test_rejects_bad_lines() {
    let zero_qty = line("x", 0, 1.0);
    assert!(validate_line(&zero_qty).is_err());

    let negative_qty = line("x", -3, 1.0);
    assert!(validate_line(&negative_qty).is_err());

    let negative_price = line("x", 1, -0.01);
    assert!(validate_line(&negative_price).is_err());

    let nan_price = line("x", 1, f64::NAN);
    assert!(validate_line(&nan_price).is_err());

    let blank_name = line("  ", 1, 1.0);
    assert!(validate_line(&blank_name).is_err());
}

#[test]
fn test_rejects_negative_discount() {
    let items = vec![line("Cafe", 1, 2.0)];
    assert!(price_order(&items, &charges(0.16, 0.10), -1.0).is_err());
}

#[test]
fn test_accumulation_precision() {
    // Sum 0.01 one thousand times
    let mut total = Decimal::ZERO;
    for _ in 0..1000 {
        total += to_decimal(0.01);
    }
    assert_eq!(to_f64(total), 10.0);
}

#[test]
fn test_tricky_rate_rounding() {
    // 33.33 subtotal at 16% = 5.3328 → rounds half-up to 5.33
    let items = vec![line("Menu del dia", 1, 33.33)];
    let (_, t) = price_order(&items, &charges(0.16, 0.0), 0.0).unwrap();
    assert_eq!(t.tax_amount, 5.33);
}
