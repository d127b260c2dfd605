//! Bundle authoring operations
//!
//! Each operation takes the current draft and returns the updated draft. The
//! input is never mutated, so the admin surface can keep the previous draft
//! for undo or discard.
//!
//! Authoring has no selection cap: adding products to a step is independent of
//! the shopper-facing capacity rule in [`crate::selection`].

use rust_decimal::Decimal;

use crate::catalog::CatalogProvider;
use crate::error::{EngineResult, InvalidArgument};
use crate::model::{Bundle, DiscountRule, Step};
use crate::types::{MoveDirection, ProductId, StepId, StepKind};

/// Field edits for a single step. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<StepKind>,
    pub max_selections: Option<u32>,
}

/// Append a new optional step with a fresh id (`max existing id + 1`).
///
/// # Errors
///
/// - `StepIdsExhausted` if a step already uses `u32::MAX`
pub fn add_step(bundle: &Bundle) -> EngineResult<Bundle> {
    let last = bundle.steps.iter().map(|s| s.id.get()).max().unwrap_or(0);
    let id = last.checked_add(1).ok_or(InvalidArgument::StepIdsExhausted {
        bundle: bundle.id,
        last: StepId(last),
    })?;
    let title = format!("Step {}", bundle.steps.len() + 1);

    let mut next = bundle.clone();
    next.steps.push(Step::new(id, title, StepKind::Optional));
    tracing::debug!(bundle = %bundle.id, step = id, "step added");
    Ok(next)
}

/// Delete a step. Remaining ids are not renumbered.
pub fn remove_step(bundle: &Bundle, step: StepId) -> EngineResult<Bundle> {
    let index = step_index(bundle, step)?;
    let mut next = bundle.clone();
    next.steps.remove(index);
    tracing::debug!(bundle = %bundle.id, %step, "step removed");
    Ok(next)
}

/// Swap a step with its neighbour. No-op at either boundary.
pub fn move_step(bundle: &Bundle, step: StepId, direction: MoveDirection) -> EngineResult<Bundle> {
    let index = step_index(bundle, step)?;
    let target = match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => Some(index + 1).filter(|&i| i < bundle.steps.len()),
    };

    let mut next = bundle.clone();
    if let Some(target) = target {
        next.steps.swap(index, target);
        tracing::debug!(bundle = %bundle.id, %step, %direction, "step moved");
    }
    Ok(next)
}

/// Add the product to the step's offer, or remove it if already offered.
///
/// # Errors
///
/// - `UnknownStep` if the step is not in the bundle
/// - `UnknownProduct` if adding a product the catalog does not know
pub fn toggle_product_in_step(
    bundle: &Bundle,
    step: StepId,
    product: ProductId,
    catalog: &impl CatalogProvider,
) -> EngineResult<Bundle> {
    let index = step_index(bundle, step)?;
    let mut next = bundle.clone();
    let products = &mut next.steps[index].products;

    if let Some(pos) = products.iter().position(|p| p.id == product) {
        products.remove(pos);
        tracing::debug!(%step, %product, "product removed from step");
    } else {
        let found = catalog
            .product(product)
            .ok_or(InvalidArgument::UnknownProduct { product })?;
        products.push(found);
        tracing::debug!(%step, %product, "product added to step");
    }
    Ok(next)
}

/// Edit title, description, kind or capacity of a step.
///
/// # Errors
///
/// - `UnknownStep` if the step is not in the bundle
/// - `InvalidMaxSelections` if the new capacity is zero
pub fn update_step(bundle: &Bundle, step: StepId, update: StepUpdate) -> EngineResult<Bundle> {
    let index = step_index(bundle, step)?;
    if update.max_selections == Some(0) {
        return Err(InvalidArgument::InvalidMaxSelections { step, value: 0 });
    }

    let mut next = bundle.clone();
    let target = &mut next.steps[index];
    if let Some(title) = update.title {
        target.title = title;
    }
    if let Some(description) = update.description {
        target.description = description;
    }
    if let Some(kind) = update.kind {
        target.kind = kind;
    }
    if let Some(max) = update.max_selections {
        target.max_selections = max;
    }
    Ok(next)
}

/// Rename or re-describe the bundle
pub fn set_details(bundle: &Bundle, name: Option<String>, description: Option<String>) -> Bundle {
    let mut next = bundle.clone();
    if let Some(name) = name {
        next.name = name;
    }
    if let Some(description) = description {
        next.description = description;
    }
    next
}

/// Replace the discount rule after validating it
pub fn set_discount_rule(bundle: &Bundle, rule: DiscountRule) -> EngineResult<Bundle> {
    rule.validate()?;
    let mut next = bundle.clone();
    next.discount = rule;
    Ok(next)
}

/// Set or clear the bundle base price
pub fn set_base_price(bundle: &Bundle, base_price: Option<Decimal>) -> EngineResult<Bundle> {
    if let Some(value) = base_price.filter(|p| *p < Decimal::ZERO) {
        return Err(InvalidArgument::NegativeAmount {
            what: "base price",
            value,
        });
    }
    let mut next = bundle.clone();
    next.base_price = base_price;
    Ok(next)
}

fn step_index(bundle: &Bundle, step: StepId) -> EngineResult<usize> {
    bundle
        .step_index(step)
        .ok_or(InvalidArgument::UnknownStep { step })
}
