//! Tests for Bundle Authoring
//!
//! These tests verify:
//! - Building a bundle from an empty draft
//! - Step reordering and removal
//! - Authored bundles are immediately shoppable
//! - Failed edits leave the draft untouched

use rust_decimal::Decimal;
use std::sync::Arc;

use bundle_builder::{
    add_step, move_step, remove_step, set_base_price, set_details, set_discount_rule,
    toggle_product_in_step, update_step, Bundle, Catalog, DiscountRule, InvalidArgument,
    MoveDirection, PricingConfig, ProductId, ShoppingSession, StepId, StepKind, StepUpdate,
};

fn order(bundle: &Bundle) -> Vec<u32> {
    bundle.steps.iter().map(|s| s.id.get()).collect()
}

/// Three-step draft built only through authoring operations
fn authored(catalog: &Catalog) -> Bundle {
    let mut bundle = Bundle::new(2, "Winter Collection Bundle");
    for _ in 0..3 {
        bundle = add_step(&bundle).expect("add");
    }
    bundle = update_step(
        &bundle,
        StepId(1),
        StepUpdate {
            title: Some("Pick a jacket".to_string()),
            kind: Some(StepKind::Required),
            ..StepUpdate::default()
        },
    )
    .expect("update");
    for (step, product) in [(1, 101), (1, 102), (2, 201), (3, 401), (3, 402)] {
        bundle = toggle_product_in_step(&bundle, StepId(step), ProductId(product), catalog)
            .expect("toggle");
    }
    bundle
}

// =============================================================================
// Draft Construction Tests
// =============================================================================

#[test]
fn test_add_steps_numbering() {
    let bundle = authored(&Catalog::demo());
    assert_eq!(order(&bundle), vec![1, 2, 3]);
    let titles: Vec<&str> = bundle.steps.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Pick a jacket", "Step 2", "Step 3"]);
    assert_eq!(bundle.product_count(), 5);
    assert!(bundle.validate().is_ok());
}

#[test]
fn test_authored_bundle_is_shoppable() {
    let bundle = authored(&Catalog::demo());
    let bundle = set_discount_rule(
        &bundle,
        DiscountRule::FixedAmount {
            amount: Decimal::from(10),
        },
    )
    .expect("discount");

    let mut session = ShoppingSession::start(Arc::new(bundle)).expect("session");
    assert!(!session.next());
    session.toggle(ProductId(102)).expect("pick");
    assert!(session.next());
    assert!(session.next());
    session.toggle(ProductId(402)).expect("upsell");

    // 24.99 + 79.99 - 10
    let quote = session.quote(&PricingConfig::default());
    assert_eq!(quote.final_price, Decimal::new(9498, 2));
}

#[test]
fn test_base_price_replaces_subtotal() {
    let bundle = set_base_price(&authored(&Catalog::demo()), Some(Decimal::from(80)))
        .expect("base price");
    let bundle = set_discount_rule(
        &bundle,
        DiscountRule::Percentage {
            rate: Decimal::from(25),
        },
    )
    .expect("discount");

    let mut session = ShoppingSession::start(Arc::new(bundle)).expect("session");
    session.toggle(ProductId(101)).expect("pick");
    let quote = session.quote(&PricingConfig::default());
    assert_eq!(quote.subtotal, Decimal::new(1999, 2));
    assert_eq!(quote.discount_base, Decimal::from(80));
    assert_eq!(quote.final_price, Decimal::from(60));
}

// =============================================================================
// Reordering Tests
// =============================================================================

#[test]
fn test_move_last_step_to_front() {
    let mut bundle = authored(&Catalog::demo());
    bundle = move_step(&bundle, StepId(3), MoveDirection::Up).expect("move");
    bundle = move_step(&bundle, StepId(3), MoveDirection::Up).expect("move");
    assert_eq!(order(&bundle), vec![3, 1, 2]);

    // Already first
    let same = move_step(&bundle, StepId(3), MoveDirection::Up).expect("move");
    assert_eq!(same, bundle);
}

#[test]
fn test_add_after_remove_uses_max_id_plus_one() {
    let bundle = authored(&Catalog::demo());
    let bundle = remove_step(&bundle, StepId(3)).expect("remove");
    let bundle = add_step(&bundle).expect("add");
    assert_eq!(order(&bundle), vec![1, 2, 3]);

    let bundle = remove_step(&bundle, StepId(1)).expect("remove");
    let bundle = add_step(&bundle).expect("add");
    assert_eq!(order(&bundle), vec![2, 3, 4]);
}

// =============================================================================
// Rejected Edit Tests
// =============================================================================

#[test]
fn test_rejected_edits_leave_draft_untouched() {
    let catalog = Catalog::demo();
    let bundle = authored(&catalog);
    let snapshot = bundle.clone();

    assert_eq!(
        move_step(&bundle, StepId(9), MoveDirection::Down),
        Err(InvalidArgument::UnknownStep { step: StepId(9) })
    );
    assert!(toggle_product_in_step(&bundle, StepId(1), ProductId(555), &catalog).is_err());
    assert!(set_discount_rule(
        &bundle,
        DiscountRule::Percentage {
            rate: Decimal::from(120)
        }
    )
    .is_err());
    assert!(set_base_price(&bundle, Some(Decimal::from(-5))).is_err());

    assert_eq!(bundle, snapshot);
}

#[test]
fn test_set_details_keeps_steps() {
    let bundle = authored(&Catalog::demo());
    let renamed = set_details(
        &bundle,
        Some("Winter Bundle".to_string()),
        Some("Stay warm".to_string()),
    );
    assert_eq!(renamed.name, "Winter Bundle");
    assert_eq!(renamed.description, "Stay warm");
    assert_eq!(renamed.steps, bundle.steps);
}
