//! Pricing Engine
//!
//! Derives subtotal, discount and final price from the current selections.
//!
//! # Design
//!
//! - **Exact arithmetic**: amounts are `Decimal`, so summation order never
//!   changes the result
//! - **Unrounded core**: `compute_*` functions return exact values
//! - **Rounded presentation**: [`Quote`] rounds the discount once with the
//!   configured policy and derives the final price from the rounded discount
//!
//! # Negative totals
//!
//! A fixed discount is never clamped to the subtotal, so the final price can
//! go below zero. [`Quote`] reports that outcome as-is unless
//! [`PricingConfig::clamp_negative_total`] is set, in which case the final
//! price is floored at zero and [`Quote::clamped`] is true.

use crate::config::PricingConfig;
use crate::model::{Bundle, DiscountRule, Tier};
use crate::selection::SelectionState;
use rust_decimal::Decimal;

/// Sum of the price of every selected product.
pub fn compute_subtotal(state: &SelectionState) -> Decimal {
    state.products().map(|p| p.price).sum()
}

/// Tier with the largest `min_items` not exceeding `item_count`.
pub fn applicable_tier(tiers: &[Tier], item_count: usize) -> Option<&Tier> {
    tiers
        .iter()
        .filter(|t| t.min_items as usize <= item_count)
        .max_by_key(|t| t.min_items)
}

/// Discount for a subtotal, unrounded.
///
/// | Rule         | Discount |
/// |--------------|----------|
/// | Percentage   | `subtotal * rate / 100` |
/// | FixedAmount  | `amount` (may exceed the subtotal) |
/// | Tiered       | best qualifying tier's rate as a percentage, else 0 |
pub fn compute_discount(subtotal: Decimal, item_count: usize, rule: &DiscountRule) -> Decimal {
    match rule {
        DiscountRule::Percentage { rate } => percent_of(subtotal, *rate),
        DiscountRule::FixedAmount { amount } => *amount,
        DiscountRule::Tiered { tiers } => applicable_tier(tiers, item_count)
            .map(|tier| percent_of(subtotal, tier.rate))
            .unwrap_or(Decimal::ZERO),
    }
}

/// Subtotal minus discount, unrounded and unclamped.
pub fn compute_final_price(state: &SelectionState, rule: &DiscountRule) -> Decimal {
    let subtotal = compute_subtotal(state);
    subtotal - compute_discount(subtotal, state.total_selected_items(), rule)
}

/// Rate the rule applies at this item count, if it is percentage based
pub fn applied_rate(rule: &DiscountRule, item_count: usize) -> Option<Decimal> {
    match rule {
        DiscountRule::Percentage { rate } => Some(*rate),
        DiscountRule::FixedAmount { .. } => None,
        DiscountRule::Tiered { tiers } => applicable_tier(tiers, item_count).map(|t| t.rate),
    }
}

fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    amount * rate / Decimal::ONE_HUNDRED
}

/// Price figures for display, rounded with the configured policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Sum of selected product prices
    pub subtotal: Decimal,
    /// Amount the discount applies to: the bundle base price, or the subtotal
    pub discount_base: Decimal,
    pub discount: Decimal,
    pub final_price: Decimal,
    pub item_count: usize,
    /// Percentage in effect, if the rule is percentage based
    pub applied_rate: Option<Decimal>,
    /// True when a negative final price was floored at zero
    pub clamped: bool,
}

impl Quote {
    /// Price the current selections of a bundle.
    pub fn compute(bundle: &Bundle, state: &SelectionState, config: &PricingConfig) -> Self {
        let rounding = config.rounding;
        let item_count = state.total_selected_items();
        let subtotal = rounding.apply(compute_subtotal(state));
        let discount_base = bundle.base_price.map(|p| rounding.apply(p)).unwrap_or(subtotal);

        let discount = rounding.apply(compute_discount(discount_base, item_count, &bundle.discount));
        let mut final_price = discount_base - discount;
        let mut clamped = false;
        if config.clamp_negative_total && final_price < Decimal::ZERO {
            tracing::debug!(%final_price, "clamping negative bundle total to zero");
            final_price = Decimal::ZERO;
            clamped = true;
        }

        Self {
            subtotal,
            discount_base,
            discount,
            final_price,
            item_count,
            applied_rate: applied_rate(&bundle.discount, item_count),
            clamped,
        }
    }

    /// Amount the shopper saves against the undiscounted price
    pub fn savings(&self) -> Decimal {
        self.discount_base - self.final_price
    }

    /// True when the discount exceeds the discounted amount and the total was
    /// left negative
    pub fn is_negative(&self) -> bool {
        self.final_price < Decimal::ZERO
    }
}
