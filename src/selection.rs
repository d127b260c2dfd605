//! Per-step product selections
//!
//! A [`SelectionState`] maps every step of a bundle to the products the
//! shopper picked there, in pick order. It is only changed through
//! [`toggle_selection`], which keeps each step within its capacity by
//! evicting the oldest pick (FIFO) instead of rejecting the new one.

use crate::error::{EngineResult, InvalidArgument};
use crate::model::{Bundle, Product, Step};
use crate::types::{ProductId, StepId};
use std::collections::BTreeMap;

/// Selected products per step, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selections: BTreeMap<StepId, Vec<Product>>,
    /// The bundle's steps as they were when the state was created
    steps: BTreeMap<StepId, Step>,
}

impl SelectionState {
    /// Fresh state with one empty selection per step of the bundle
    pub fn for_bundle(bundle: &Bundle) -> Self {
        Self {
            selections: bundle.steps.iter().map(|s| (s.id, Vec::new())).collect(),
            steps: bundle.steps.iter().map(|s| (s.id, s.clone())).collect(),
        }
    }

    /// Products selected in a step, oldest first. Empty for unknown steps.
    pub fn selected(&self, step: StepId) -> &[Product] {
        self.selections.get(&step).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if the product is currently picked in the step
    pub fn is_selected(&self, step: StepId, product: ProductId) -> bool {
        self.selected(step).iter().any(|p| p.id == product)
    }

    /// Returns true if the state tracks the step
    pub fn has_step(&self, step: StepId) -> bool {
        self.selections.contains_key(&step)
    }

    /// Number of selected products across all steps
    pub fn total_selected_items(&self) -> usize {
        self.selections.values().map(Vec::len).sum()
    }

    /// Returns true if nothing is selected anywhere
    pub fn is_empty(&self) -> bool {
        self.total_selected_items() == 0
    }

    /// Every selected product, step by step
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.selections.values().flatten()
    }

    /// `(step, selection)` pairs in step-id order
    pub fn iter(&self) -> impl Iterator<Item = (StepId, &[Product])> {
        self.selections.iter().map(|(id, picks)| (*id, picks.as_slice()))
    }

    /// Return a copy of this state with `product` toggled in `step`.
    ///
    /// See [`toggle_selection`].
    pub fn toggled(&self, step: &Step, product: &Product) -> EngineResult<Self> {
        let capacity = step.capacity()?;

        // A step with the same id but a different offer belongs to another bundle
        let (Some(current), Some(known)) =
            (self.selections.get(&step.id), self.steps.get(&step.id))
        else {
            return Err(InvalidArgument::UnknownStep { step: step.id });
        };
        if known != step {
            return Err(InvalidArgument::UnknownStep { step: step.id });
        }

        let Some(offered) = known.product(product.id).filter(|p| *p == product) else {
            return Err(InvalidArgument::ProductNotInStep {
                product: product.id,
                step: step.id,
            });
        };

        let mut picks = current.clone();
        if let Some(pos) = picks.iter().position(|p| p.id == offered.id) {
            picks.remove(pos);
        } else {
            // At capacity the oldest pick makes room for the new one
            while picks.len() >= capacity {
                picks.remove(0);
            }
            picks.push(offered.clone());
        }

        let mut next = self.clone();
        next.selections.insert(step.id, picks);
        Ok(next)
    }
}

/// Select or deselect `product` in `step`.
///
/// 1. A product already picked in the step is removed.
/// 2. Otherwise, below capacity, it is appended.
/// 3. At capacity the oldest pick is evicted and the product appended.
///
/// Other steps are left untouched.
///
/// # Errors
///
/// - `UnknownStep` if the state was not created for the step's bundle, or the
///   step differs from the one the state was created with
/// - `ProductNotInStep` if the step does not offer the product, or offers it
///   with a different name or price
/// - `InvalidMaxSelections` if the step's capacity is zero
pub fn toggle_selection(
    state: &SelectionState,
    step: &Step,
    product: &Product,
) -> EngineResult<SelectionState> {
    state.toggled(step, product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StepKind;
    use rust_decimal::Decimal;

    fn product(id: u32) -> Product {
        Product::new(id, format!("Product {id}"), Decimal::new(1000 + id as i64, 2))
    }

    fn accessories() -> (Bundle, Step) {
        let step = Step::new(3, "Add Accessories", StepKind::Optional)
            .with_products(vec![product(301), product(302), product(303)])
            .with_max_selections(2);
        let bundle = Bundle::new(1, "Test")
            .with_step(Step::new(1, "Tees", StepKind::Required).with_products(vec![product(101)]))
            .with_step(step.clone());
        (bundle, step)
    }

    fn ids(state: &SelectionState, step: StepId) -> Vec<u32> {
        state.selected(step).iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn test_fresh_state_tracks_every_step() {
        let (bundle, _) = accessories();
        let state = SelectionState::for_bundle(&bundle);
        assert!(state.has_step(StepId(1)));
        assert!(state.has_step(StepId(3)));
        assert!(state.is_empty());
    }

    #[test]
    fn test_select_appends_in_order() {
        let (bundle, step) = accessories();
        let state = SelectionState::for_bundle(&bundle);
        let state = toggle_selection(&state, &step, &product(302)).expect("select");
        let state = toggle_selection(&state, &step, &product(301)).expect("select");
        assert_eq!(ids(&state, step.id), vec![302, 301]);
    }

    #[test]
    fn test_fifo_eviction_at_capacity() {
        let (bundle, step) = accessories();
        let mut state = SelectionState::for_bundle(&bundle);
        for id in [301, 302, 303] {
            state = toggle_selection(&state, &step, &product(id)).expect("toggle");
        }
        assert_eq!(ids(&state, step.id), vec![302, 303]);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let (bundle, step) = accessories();
        let state = SelectionState::for_bundle(&bundle);
        let state = toggle_selection(&state, &step, &product(301)).expect("select");
        let once = toggle_selection(&state, &step, &product(302)).expect("select");
        let twice = toggle_selection(&once, &step, &product(302)).expect("deselect");
        assert_eq!(twice, state);
    }

    #[test]
    fn test_other_steps_untouched() {
        let (bundle, step) = accessories();
        let tees = bundle.steps[0].clone();
        let state = SelectionState::for_bundle(&bundle);
        let state = toggle_selection(&state, &tees, &product(101)).expect("select");
        let state = toggle_selection(&state, &step, &product(301)).expect("select");
        assert_eq!(ids(&state, tees.id), vec![101]);
        assert_eq!(state.total_selected_items(), 2);
    }

    #[test]
    fn test_product_outside_step_is_rejected() {
        let (bundle, step) = accessories();
        let state = SelectionState::for_bundle(&bundle);
        let err = toggle_selection(&state, &step, &product(101)).unwrap_err();
        assert_eq!(
            err,
            InvalidArgument::ProductNotInStep {
                product: ProductId(101),
                step: StepId(3)
            }
        );
    }

    #[test]
    fn test_step_from_other_bundle_is_rejected() {
        let (bundle, _) = accessories();
        let state = SelectionState::for_bundle(&bundle);
        let stranger = Step::new(9, "Elsewhere", StepKind::Optional).with_products(vec![product(901)]);
        let err = toggle_selection(&state, &stranger, &product(901)).unwrap_err();
        assert_eq!(err, InvalidArgument::UnknownStep { step: StepId(9) });
    }

    #[test]
    fn test_same_id_step_from_other_bundle_is_rejected() {
        let (bundle, _) = accessories();
        let state = SelectionState::for_bundle(&bundle);
        let lookalike = Step::new(1, "Tees", StepKind::Required).with_products(vec![product(402)]);
        let err = toggle_selection(&state, &lookalike, &product(402)).unwrap_err();
        assert_eq!(err, InvalidArgument::UnknownStep { step: StepId(1) });
        assert!(state.is_empty());
    }

    #[test]
    fn test_repriced_product_is_rejected() {
        let (bundle, step) = accessories();
        let state = SelectionState::for_bundle(&bundle);
        let cheap = Product::new(301, "Product 301", Decimal::new(1, 2));
        let err = toggle_selection(&state, &step, &cheap).unwrap_err();
        assert_eq!(
            err,
            InvalidArgument::ProductNotInStep {
                product: ProductId(301),
                step: StepId(3)
            }
        );
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let (bundle, mut step) = accessories();
        step.max_selections = 0;
        let state = SelectionState::for_bundle(&bundle);
        assert!(matches!(
            toggle_selection(&state, &step, &product(301)),
            Err(InvalidArgument::InvalidMaxSelections { .. })
        ));
    }
}
