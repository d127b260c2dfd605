//! Tests for Shopping Sessions
//!
//! These tests verify:
//! - A full shopper pass through the demo bundle
//! - Required-step gating and ungated retreat
//! - FIFO eviction on capped steps
//! - Quote figures for percentage, fixed and tiered rules
//! - Independent sessions over one shared bundle

use rust_decimal::Decimal;
use std::sync::Arc;

use bundle_builder::{
    compute_subtotal, toggle_selection, Bundle, BundleId, Catalog, CatalogProvider, DiscountRule,
    InvalidArgument, PricingConfig, Product, ProductId, SelectionState, ShoppingSession, Step,
    StepId, StepKind, Tier,
};

fn demo_bundle() -> Arc<Bundle> {
    Arc::new(Catalog::demo().bundle(BundleId(1)).expect("demo bundle"))
}

fn ids(picks: &[Product]) -> Vec<u32> {
    picks.iter().map(|p| p.id.get()).collect()
}

// =============================================================================
// Full Flow
// =============================================================================

#[test]
fn test_complete_shopping_pass() {
    let mut session = ShoppingSession::start(demo_bundle()).expect("session");
    assert_eq!(session.progress_percent(), 25);

    session.toggle(ProductId(102)).expect("tee");
    assert!(session.next());
    session.toggle(ProductId(202)).expect("bottoms");
    assert!(session.next());
    assert_eq!(session.progress_percent(), 75);

    // Accessories allow two picks
    session.toggle(ProductId(301)).expect("cap");
    session.toggle(ProductId(302)).expect("sunglasses");
    assert!(session.next());
    assert!(session.is_last_step());
    assert_eq!(session.progress_percent(), 100);

    // Upsell skipped
    assert!(!session.next());
    assert!(session.is_ready_for_checkout());

    let summary = session.summary();
    let titles: Vec<&str> = summary.iter().map(|(s, _)| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Select a T-Shirt", "Add Bottoms", "Add Accessories"]);

    // 24.99 + 34.99 + 14.99 + 24.99 = 99.96, 15% = 14.994
    let quote = session.quote(&PricingConfig::default());
    assert_eq!(quote.item_count, 4);
    assert_eq!(quote.subtotal, Decimal::new(9996, 2));
    assert_eq!(quote.discount, Decimal::new(1499, 2));
    assert_eq!(quote.final_price, Decimal::new(8497, 2));
    assert_eq!(quote.applied_rate, Some(Decimal::from(15)));
}

// =============================================================================
// Gating Tests
// =============================================================================

#[test]
fn test_required_step_blocks_until_selected() {
    let mut session = ShoppingSession::start(demo_bundle()).expect("session");
    assert!(!session.can_advance());
    assert!(!session.next());
    assert_eq!(session.cursor().index(), 0);

    session.toggle(ProductId(101)).expect("pick");
    assert!(session.can_advance());

    // Deselecting closes the gate again
    session.toggle(ProductId(101)).expect("unpick");
    assert!(!session.can_advance());
}

#[test]
fn test_retreat_is_never_gated() {
    let mut session = ShoppingSession::start(demo_bundle()).expect("session");
    assert!(!session.back());

    session.toggle(ProductId(101)).expect("pick");
    assert!(session.next());
    // Step 2 is required and empty, going back is still allowed
    assert!(session.can_retreat());
    assert!(session.back());
    assert_eq!(session.cursor().index(), 0);
    assert!(session.is_selected(ProductId(101)));
}

#[test]
fn test_missing_required_steps_in_order() {
    let session = ShoppingSession::start(demo_bundle()).expect("session");
    let missing: Vec<StepId> = session.missing_required_steps().iter().map(|s| s.id).collect();
    assert_eq!(missing, vec![StepId(1), StepId(2)]);
    assert!(!session.is_ready_for_checkout());
}

#[test]
fn test_toggle_product_from_other_step_fails() {
    let mut session = ShoppingSession::start(demo_bundle()).expect("session");
    assert_eq!(
        session.toggle(ProductId(201)),
        Err(InvalidArgument::ProductNotInStep {
            product: ProductId(201),
            step: StepId(1)
        })
    );
    assert_eq!(session.total_selected_items(), 0);
}

#[test]
fn test_selection_keeps_catalog_prices() {
    let bundle = demo_bundle();
    let tees = &bundle.steps[0];
    let state = SelectionState::for_bundle(&bundle);

    let repriced = Product::new(101, "Classic White Tee", Decimal::new(1, 2));
    assert_eq!(
        toggle_selection(&state, tees, &repriced),
        Err(InvalidArgument::ProductNotInStep {
            product: ProductId(101),
            step: StepId(1)
        })
    );

    let listed = tees.product(ProductId(101)).expect("tee");
    let state = toggle_selection(&state, tees, listed).expect("tee");
    assert_eq!(compute_subtotal(&state), Decimal::new(1999, 2));
}

#[test]
fn test_step_of_another_bundle_is_rejected() {
    let bundle = demo_bundle();
    let state = SelectionState::for_bundle(&bundle);

    // Same step id as the T-shirt step, different offer
    let other = Step::new(1, "Add an Upsell", StepKind::Upsell)
        .with_products(vec![Product::new(402, "Leather Wallet", Decimal::new(4999, 2))]);
    assert_eq!(
        toggle_selection(&state, &other, &other.products[0]),
        Err(InvalidArgument::UnknownStep { step: StepId(1) })
    );
    assert!(state.selected(StepId(1)).is_empty());
}

// =============================================================================
// Eviction Tests
// =============================================================================

#[test]
fn test_single_choice_step_replaces_pick() {
    let mut session = ShoppingSession::start(demo_bundle()).expect("session");
    session.toggle(ProductId(101)).expect("first");
    session.toggle(ProductId(103)).expect("second");
    assert_eq!(ids(session.selection().selected(StepId(1))), vec![103]);
}

#[test]
fn test_accessories_fifo_eviction() {
    let mut session = ShoppingSession::start(demo_bundle()).expect("session");
    session.toggle(ProductId(101)).expect("tee");
    session.next();
    session.toggle(ProductId(201)).expect("bottoms");
    session.next();

    for id in [301, 302, 303] {
        session.toggle(ProductId(id)).expect("accessory");
    }
    assert_eq!(ids(session.selection().selected(StepId(3))), vec![302, 303]);
    assert_eq!(session.total_selected_items(), 4);
}

// =============================================================================
// Pricing Tests
// =============================================================================

fn priced_bundle(rule: DiscountRule) -> Arc<Bundle> {
    let step = Step::new(1, "Anything", StepKind::Optional)
        .with_products(vec![
            Product::new(1, "One", Decimal::from(10)),
            Product::new(2, "Two", Decimal::from(10)),
            Product::new(3, "Three", Decimal::from(10)),
            Product::new(4, "Four", Decimal::from(10)),
            Product::new(5, "Five", Decimal::from(10)),
        ])
        .with_max_selections(5);
    Arc::new(Bundle::new(9, "Priced").with_step(step).with_discount(rule))
}

#[test]
fn test_tiered_quote_follows_item_count() {
    let rule = DiscountRule::Tiered {
        tiers: vec![
            Tier::new(3, Decimal::from(10)),
            Tier::new(5, Decimal::from(15)),
        ],
    };
    let mut session = ShoppingSession::start(priced_bundle(rule)).expect("session");
    let config = PricingConfig::default();

    session.toggle(ProductId(1)).expect("pick");
    session.toggle(ProductId(2)).expect("pick");
    assert_eq!(session.quote(&config).discount, Decimal::ZERO);

    session.toggle(ProductId(3)).expect("pick");
    session.toggle(ProductId(4)).expect("pick");
    let quote = session.quote(&config);
    assert_eq!(quote.applied_rate, Some(Decimal::from(10)));
    assert_eq!(quote.final_price, Decimal::from(36));

    session.toggle(ProductId(5)).expect("pick");
    let quote = session.quote(&config);
    assert_eq!(quote.applied_rate, Some(Decimal::from(15)));
    assert_eq!(quote.final_price, Decimal::new(4250, 2));
}

#[test]
fn test_fixed_discount_can_go_negative_unless_clamped() {
    let rule = DiscountRule::FixedAmount {
        amount: Decimal::from(25),
    };
    let mut session = ShoppingSession::start(priced_bundle(rule)).expect("session");
    session.toggle(ProductId(1)).expect("pick");

    let quote = session.quote(&PricingConfig::default());
    assert_eq!(quote.final_price, Decimal::from(-15));
    assert!(quote.is_negative());

    let clamped = PricingConfig {
        clamp_negative_total: true,
        ..PricingConfig::default()
    };
    let quote = session.quote(&clamped);
    assert_eq!(quote.final_price, Decimal::ZERO);
    assert!(quote.clamped);
}

// =============================================================================
// Session Isolation Tests
// =============================================================================

#[test]
fn test_sessions_share_bundle_not_state() {
    let bundle = demo_bundle();
    let mut alice = ShoppingSession::start(Arc::clone(&bundle)).expect("session");
    let bob = ShoppingSession::start(Arc::clone(&bundle)).expect("session");

    alice.toggle(ProductId(101)).expect("pick");
    alice.next();

    assert_eq!(bob.total_selected_items(), 0);
    assert_eq!(bob.cursor().index(), 0);
    assert_eq!(Arc::strong_count(&bundle), 3);
}

#[test]
fn test_sessions_are_send_across_threads() {
    let bundle = demo_bundle();
    let handles: Vec<_> = [101u32, 102, 103]
        .into_iter()
        .map(|tee| {
            let bundle = Arc::clone(&bundle);
            std::thread::spawn(move || {
                let mut session = ShoppingSession::start(bundle).expect("session");
                session.toggle(ProductId(tee)).expect("pick");
                session.quote(&PricingConfig::default()).subtotal
            })
        })
        .collect();

    let totals: Vec<Decimal> = handles
        .into_iter()
        .map(|h| h.join().expect("thread"))
        .collect();
    assert_eq!(
        totals,
        vec![Decimal::new(1999, 2), Decimal::new(2499, 2), Decimal::new(2299, 2)]
    );
}

#[test]
fn test_empty_bundle_cannot_be_shopped() {
    let result = ShoppingSession::start(Arc::new(Bundle::new(5, "Empty")));
    assert_eq!(
        result.err(),
        Some(InvalidArgument::EmptyBundle {
            bundle: BundleId(5)
        })
    );
}
