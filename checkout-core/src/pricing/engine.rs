//! Discount selection and cart totals
//!
//! `compute_totals` is a pure function of the cart, the rule set and
//! the caller-supplied clock. Selection policy: the applicable rule
//! yielding the strictly greatest discount wins; ties resolve to the
//! first rule in input order; a rule yielding zero is never selected.

use rust_decimal::Decimal;
use shared::models::{DiscountKind, DiscountRule};
use shared::Cart;

use super::money::{to_decimal, to_f64};

/// Result of pricing a cart
#[derive(Debug, Clone)]
pub struct Totals {
    pub subtotal: f64,
    /// Automatically selected rule; `None` when no rule applies or a
    /// manual discount override is in force
    pub applied_rule: Option<DiscountRule>,
    pub discount_amount: f64,
    /// `max(0, subtotal - discount)` - never negative, even when an
    /// operator-entered discount exceeds the subtotal
    pub total: f64,
}

/// Candidate discount value for one rule against a subtotal.
///
/// Malformed rule data (NaN, negative value) contributes zero rather
/// than erroring.
fn candidate_discount(rule: &DiscountRule, subtotal: Decimal) -> Decimal {
    let value = to_decimal(rule.value);
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match rule.kind {
        DiscountKind::Percentage => {
            let raw = subtotal * value / Decimal::ONE_HUNDRED;
            // A cap always binds when present. NaN converts to zero, so
            // zero/negative/NaN caps push the candidate to <= 0 and the
            // rule is never selected.
            match rule.maximum_discount_amount.map(to_decimal) {
                Some(cap) => raw.min(cap),
                None => raw,
            }
        }
        DiscountKind::Fixed => value,
    }
}

/// Price a cart against the active rule set.
///
/// When the cart carries a manual discount override, automatic rule
/// selection is suppressed and the manual amount is used instead; the
/// override lives only until the cart contents next change (see
/// [`shared::Cart`]).
pub fn compute_totals(cart: &Cart, rules: &[DiscountRule], now_ms: i64) -> Totals {
    let subtotal: Decimal = cart
        .lines()
        .iter()
        .map(|line| to_decimal(line.product.unit_price()) * Decimal::from(line.quantity))
        .sum();

    let (applied_rule, discount) = match cart.manual_discount() {
        Some(manual) => (None, to_decimal(manual).max(Decimal::ZERO)),
        None => {
            let subtotal_f = to_f64(subtotal);
            let mut best: Option<(&DiscountRule, Decimal)> = None;
            for rule in rules {
                if !rule.applies(subtotal_f, now_ms) {
                    continue;
                }
                let candidate = candidate_discount(rule, subtotal);
                if candidate <= Decimal::ZERO {
                    continue;
                }
                // Strictly greater: ties keep the earlier rule
                if best.map_or(true, |(_, current)| candidate > current) {
                    best = Some((rule, candidate));
                }
            }
            match best {
                Some((rule, amount)) => (Some(rule.clone()), amount),
                None => (None, Decimal::ZERO),
            }
        }
    };

    let total = (subtotal - discount).max(Decimal::ZERO);

    Totals {
        subtotal: to_f64(subtotal),
        applied_rule,
        discount_amount: to_f64(discount),
        total: to_f64(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ProductSnapshot;
    use shared::CartProduct;

    const NOW: i64 = 1_700_000_000_000;

    fn cart_totaling(amount: f64) -> Cart {
        let mut cart = Cart::new();
        cart.add_line(
            CartProduct::Catalog(ProductSnapshot {
                product_id: "p1".to_string(),
                name: "Widget".to_string(),
                price: amount,
                stock: 10,
            }),
            1,
        );
        cart
    }

    fn percentage(id: &str, percent: f64, min: f64, cap: Option<f64>) -> DiscountRule {
        DiscountRule {
            id: Some(id.to_string()),
            name: format!("{percent}% off"),
            kind: DiscountKind::Percentage,
            value: percent,
            minimum_purchase: min,
            maximum_discount_amount: cap,
            is_active: true,
            valid_from: None,
            valid_until: None,
            usage_count: 0,
        }
    }

    fn fixed(id: &str, amount: f64, min: f64) -> DiscountRule {
        DiscountRule {
            id: Some(id.to_string()),
            name: format!("{amount} off"),
            kind: DiscountKind::Fixed,
            value: amount,
            minimum_purchase: min,
            maximum_discount_amount: None,
            is_active: true,
            valid_from: None,
            valid_until: None,
            usage_count: 0,
        }
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let mut cart = Cart::new();
        cart.add_line(
            CartProduct::Catalog(ProductSnapshot {
                product_id: "p1".to_string(),
                name: "A".to_string(),
                price: 2.50,
                stock: 5,
            }),
            3,
        );
        cart.add_line(
            CartProduct::AdHoc {
                name: "Gift wrap".to_string(),
                price: 1.25,
            },
            2,
        );
        let totals = compute_totals(&cart, &[], NOW);
        assert_eq!(totals.subtotal, 10.0);
        assert_eq!(totals.total, 10.0);
        assert_eq!(totals.discount_amount, 0.0);
        assert!(totals.applied_rule.is_none());
    }

    #[test]
    fn test_best_discount_selection_concrete() {
        // $40 subtotal: 10% -> $4, fixed $5 -> fixed wins
        let rules = vec![percentage("r1", 10.0, 0.0, None), fixed("r2", 5.0, 0.0)];
        let totals = compute_totals(&cart_totaling(40.0), &rules, NOW);
        assert_eq!(totals.applied_rule.as_ref().unwrap().id.as_deref(), Some("r2"));
        assert_eq!(totals.discount_amount, 5.0);
        assert_eq!(totals.total, 35.0);

        // $100 subtotal: 10% -> $10, fixed $5 -> percentage wins
        let totals = compute_totals(&cart_totaling(100.0), &rules, NOW);
        assert_eq!(totals.applied_rule.as_ref().unwrap().id.as_deref(), Some("r1"));
        assert_eq!(totals.discount_amount, 10.0);
        assert_eq!(totals.total, 90.0);
    }

    #[test]
    fn test_tie_resolves_to_first_rule() {
        let rules = vec![fixed("first", 5.0, 0.0), fixed("second", 5.0, 0.0)];
        let totals = compute_totals(&cart_totaling(50.0), &rules, NOW);
        assert_eq!(
            totals.applied_rule.as_ref().unwrap().id.as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_minimum_purchase_gating_boundary() {
        let rules = vec![percentage("r1", 10.0, 50.0, None)];

        let below = compute_totals(&cart_totaling(49.99), &rules, NOW);
        assert!(below.applied_rule.is_none());
        assert_eq!(below.total, 49.99);

        let at = compute_totals(&cart_totaling(50.0), &rules, NOW);
        assert_eq!(at.discount_amount, 5.0);
    }

    #[test]
    fn test_validity_window_gating() {
        let mut rule = percentage("r1", 10.0, 0.0, None);
        rule.valid_from = Some(NOW + 1);
        assert!(compute_totals(&cart_totaling(100.0), &[rule.clone()], NOW)
            .applied_rule
            .is_none());

        rule.valid_from = Some(NOW - 10);
        rule.valid_until = Some(NOW - 1);
        assert!(compute_totals(&cart_totaling(100.0), &[rule.clone()], NOW)
            .applied_rule
            .is_none());

        rule.valid_until = Some(NOW + 10);
        assert!(compute_totals(&cart_totaling(100.0), &[rule], NOW)
            .applied_rule
            .is_some());
    }

    #[test]
    fn test_inactive_rule_never_applies() {
        let mut rule = fixed("r1", 5.0, 0.0);
        rule.is_active = false;
        let totals = compute_totals(&cart_totaling(100.0), &[rule], NOW);
        assert!(totals.applied_rule.is_none());
    }

    #[test]
    fn test_percentage_cap_limits_discount() {
        let rules = vec![percentage("r1", 50.0, 0.0, Some(10.0))];
        let totals = compute_totals(&cart_totaling(100.0), &rules, NOW);
        assert_eq!(totals.discount_amount, 10.0);
        assert_eq!(totals.total, 90.0);
    }

    #[test]
    fn test_degenerate_cap_excludes_rule() {
        // Zero, negative and NaN caps all force the candidate to zero,
        // so the rule never applies at all
        for cap in [0.0, -5.0, f64::NAN] {
            let rules = vec![percentage("r1", 50.0, 0.0, Some(cap))];
            let totals = compute_totals(&cart_totaling(100.0), &rules, NOW);
            assert!(totals.applied_rule.is_none(), "cap {cap} selected a rule");
            assert_eq!(totals.discount_amount, 0.0);
            assert_eq!(totals.total, 100.0);
        }

        // A degenerate cap on one rule still lets others win
        let rules = vec![
            percentage("broken", 50.0, 0.0, Some(0.0)),
            fixed("ok", 5.0, 0.0),
        ];
        let totals = compute_totals(&cart_totaling(100.0), &rules, NOW);
        assert_eq!(totals.applied_rule.as_ref().unwrap().id.as_deref(), Some("ok"));
        assert_eq!(totals.discount_amount, 5.0);
    }

    #[test]
    fn test_capped_percentage_can_lose_to_fixed() {
        let rules = vec![
            percentage("r1", 50.0, 0.0, Some(10.0)), // capped at $10
            fixed("r2", 12.0, 0.0),
        ];
        let totals = compute_totals(&cart_totaling(100.0), &rules, NOW);
        assert_eq!(totals.applied_rule.as_ref().unwrap().id.as_deref(), Some("r2"));
    }

    #[test]
    fn test_zero_discount_rule_never_selected() {
        let rules = vec![percentage("r1", 0.0, 0.0, None)];
        let totals = compute_totals(&cart_totaling(100.0), &rules, NOW);
        assert!(totals.applied_rule.is_none());
        assert_eq!(totals.discount_amount, 0.0);
    }

    #[test]
    fn test_malformed_rule_value_contributes_zero() {
        let rules = vec![
            fixed("nan", f64::NAN, 0.0),
            fixed("negative", -5.0, 0.0),
            fixed("ok", 2.0, 0.0),
        ];
        let totals = compute_totals(&cart_totaling(100.0), &rules, NOW);
        assert_eq!(totals.applied_rule.as_ref().unwrap().id.as_deref(), Some("ok"));
        assert_eq!(totals.discount_amount, 2.0);
    }

    #[test]
    fn test_total_never_negative() {
        // Fixed discount larger than subtotal
        let rules = vec![fixed("r1", 500.0, 0.0)];
        let totals = compute_totals(&cart_totaling(40.0), &rules, NOW);
        assert_eq!(totals.total, 0.0);

        // Manual discount larger than subtotal
        let mut cart = cart_totaling(40.0);
        cart.set_manual_discount(100.0);
        let totals = compute_totals(&cart, &[], NOW);
        assert_eq!(totals.total, 0.0);
        assert_eq!(totals.discount_amount, 100.0);
    }

    #[test]
    fn test_manual_override_suppresses_rules() {
        let rules = vec![percentage("r1", 10.0, 0.0, None)];
        let mut cart = cart_totaling(100.0);
        cart.set_manual_discount(3.0);

        let totals = compute_totals(&cart, &rules, NOW);
        assert!(totals.applied_rule.is_none());
        assert_eq!(totals.discount_amount, 3.0);
        assert_eq!(totals.total, 97.0);

        // Cart mutation clears the override and re-enables rules
        cart.add_line(
            CartProduct::AdHoc {
                name: "Bag".to_string(),
                price: 0.50,
            },
            1,
        );
        let totals = compute_totals(&cart, &rules, NOW);
        assert_eq!(totals.applied_rule.as_ref().unwrap().id.as_deref(), Some("r1"));
        assert_eq!(totals.discount_amount, 10.05);
    }

    #[test]
    fn test_negative_manual_discount_treated_as_zero() {
        let mut cart = cart_totaling(40.0);
        cart.set_manual_discount(-5.0);
        let totals = compute_totals(&cart, &[], NOW);
        assert_eq!(totals.discount_amount, 0.0);
        assert_eq!(totals.total, 40.0);
    }

    #[test]
    fn test_empty_cart_prices_to_zero() {
        let cart = Cart::new();
        let rules = vec![fixed("r1", 5.0, 0.0)];
        let totals = compute_totals(&cart, &rules, NOW);
        assert_eq!(totals.subtotal, 0.0);
        // min purchase 0 still lets the fixed rule apply; clamping
        // keeps the total at zero
        assert_eq!(totals.discount_amount, 5.0);
        assert_eq!(totals.total, 0.0);
    }
}
