//! Wizard navigation and shopping sessions
//!
//! The wizard walks a shopper through the steps of a bundle in order.
//!
//! # Design Principles
//!
//! - **Pure navigation**: `advance` / `retreat` map a cursor to the next cursor
//! - **Single gate**: only `Required` steps with no selection block `advance`
//! - **Ungated retreat**: going back is always allowed
//! - **No Global State**: a [`ShoppingSession`] owns its selections and cursor
//!
//! # Cursor Flow
//!
//! ```text
//! 0 ──advance (guarded)──▶ 1 ──▶ … ──▶ len-1
//!   ◀──retreat (free)────    ◀── …  ◀──
//! ```
//!
//! Reaching the last index disables further forward moves; there is no
//! terminal state beyond that.

use std::sync::Arc;

use crate::config::PricingConfig;
use crate::error::{EngineResult, InvalidArgument};
use crate::model::{Bundle, Product, Step};
use crate::pricing::Quote;
use crate::selection::SelectionState;
use crate::types::ProductId;

/// Index of the active step in `Bundle::steps`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct WizardCursor(usize);

impl WizardCursor {
    /// Cursor on the first step
    #[inline]
    pub const fn start() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Returns true on the first step
    #[inline]
    pub const fn is_first(self) -> bool {
        self.0 == 0
    }

    /// Returns true on the final step of `bundle`
    pub fn is_last(self, bundle: &Bundle) -> bool {
        self.0 + 1 >= bundle.steps.len()
    }
}

/// Whether the shopper may leave `step` going forward.
///
/// Required steps need at least one selection; Optional and Upsell steps can
/// always be skipped.
pub fn can_advance(state: &SelectionState, step: &Step) -> bool {
    if step.kind.is_required() {
        !state.selected(step.id).is_empty()
    } else {
        true
    }
}

/// Move one step forward, or stay put on the last step or when the current
/// step is not satisfied.
pub fn advance(cursor: WizardCursor, bundle: &Bundle, state: &SelectionState) -> WizardCursor {
    if cursor.is_last(bundle) {
        return cursor;
    }
    match bundle.steps.get(cursor.0) {
        Some(step) if can_advance(state, step) => WizardCursor(cursor.0 + 1),
        _ => cursor,
    }
}

/// Returns true unless the cursor is on the first step
pub fn can_retreat(cursor: WizardCursor) -> bool {
    !cursor.is_first()
}

/// Move one step back; no-op on the first step.
pub fn retreat(cursor: WizardCursor) -> WizardCursor {
    WizardCursor(cursor.0.saturating_sub(1))
}

/// `(cursor + 1) / len * 100`, rounded down
pub fn progress_percent(cursor: WizardCursor, bundle: &Bundle) -> u8 {
    let total = bundle.steps.len();
    if total == 0 {
        return 0;
    }
    let done = (cursor.0 + 1).min(total);
    (done * 100 / total) as u8
}

/// One shopper's pass through a bundle.
///
/// Owns the selection state and cursor exclusively; the bundle itself is a
/// shared read-only reference supplied by the catalog. Independent sessions
/// never share mutable state.
///
/// # Example
///
/// ```
/// use bundle_builder::{Catalog, CatalogProvider, ShoppingSession, BundleId, ProductId};
/// use std::sync::Arc;
///
/// let catalog = Catalog::demo();
/// let bundle = catalog.bundle(BundleId(1)).unwrap();
/// let mut session = ShoppingSession::start(Arc::new(bundle)).unwrap();
///
/// // First step is required: cannot move on empty-handed
/// assert!(!session.next());
///
/// session.toggle(ProductId(101)).unwrap();
/// assert!(session.next());
/// assert_eq!(session.cursor().index(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ShoppingSession {
    bundle: Arc<Bundle>,
    selection: SelectionState,
    cursor: WizardCursor,
}

impl ShoppingSession {
    /// Start a session on the first step with empty selections.
    ///
    /// # Errors
    ///
    /// - `EmptyBundle` if the bundle has no steps
    /// - any bundle validation error
    pub fn start(bundle: Arc<Bundle>) -> EngineResult<Self> {
        bundle.validate()?;
        if bundle.steps.is_empty() {
            return Err(InvalidArgument::EmptyBundle { bundle: bundle.id });
        }
        tracing::debug!(bundle = %bundle.id, steps = bundle.steps.len(), "shopping session started");
        Ok(Self {
            selection: SelectionState::for_bundle(&bundle),
            bundle,
            cursor: WizardCursor::start(),
        })
    }

    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn cursor(&self) -> WizardCursor {
        self.cursor
    }

    /// The active step
    pub fn current_step(&self) -> &Step {
        // Invariant: cursor < steps.len(), enforced by start() and the guards
        &self.bundle.steps[self.cursor.0]
    }

    /// Select or deselect a product of the current step.
    ///
    /// # Errors
    ///
    /// - `ProductNotInStep` if the current step does not offer the product
    pub fn toggle(&mut self, product: ProductId) -> EngineResult<()> {
        let step = &self.bundle.steps[self.cursor.0];
        let Some(product) = step.product(product).cloned() else {
            return Err(InvalidArgument::ProductNotInStep {
                product,
                step: step.id,
            });
        };
        self.selection = self.selection.toggled(step, &product)?;
        tracing::debug!(
            step = %step.id,
            product = %product.id,
            selected = self.selection.selected(step.id).len(),
            "selection toggled"
        );
        Ok(())
    }

    /// Returns true if the product is picked in the current step
    pub fn is_selected(&self, product: ProductId) -> bool {
        self.selection.is_selected(self.current_step().id, product)
    }

    /// Whether "Next" is enabled
    pub fn can_advance(&self) -> bool {
        !self.cursor.is_last(&self.bundle) && can_advance(&self.selection, self.current_step())
    }

    /// Whether "Previous" is enabled
    pub fn can_retreat(&self) -> bool {
        can_retreat(self.cursor)
    }

    /// Returns true on the final step
    pub fn is_last_step(&self) -> bool {
        self.cursor.is_last(&self.bundle)
    }

    /// Advance if permitted. Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        let next = advance(self.cursor, &self.bundle, &self.selection);
        let moved = next != self.cursor;
        if moved {
            tracing::debug!(from = self.cursor.0, to = next.0, "wizard advanced");
        } else {
            tracing::debug!(at = self.cursor.0, "wizard advance refused");
        }
        self.cursor = next;
        moved
    }

    /// Go back one step. Returns whether the cursor moved.
    pub fn back(&mut self) -> bool {
        let prev = retreat(self.cursor);
        let moved = prev != self.cursor;
        if moved {
            tracing::debug!(from = self.cursor.0, to = prev.0, "wizard retreated");
        }
        self.cursor = prev;
        moved
    }

    /// Wizard progress, 1..=100
    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.cursor, &self.bundle)
    }

    pub fn total_selected_items(&self) -> usize {
        self.selection.total_selected_items()
    }

    /// Required steps that still have no selection, in wizard order
    pub fn missing_required_steps(&self) -> Vec<&Step> {
        self.bundle
            .steps
            .iter()
            .filter(|s| !can_advance(&self.selection, s))
            .collect()
    }

    /// Returns true once every required step has a selection
    pub fn is_ready_for_checkout(&self) -> bool {
        self.missing_required_steps().is_empty()
    }

    /// Non-empty selections grouped by step, in wizard order
    pub fn summary(&self) -> Vec<(&Step, &[Product])> {
        self.bundle
            .steps
            .iter()
            .map(|s| (s, self.selection.selected(s.id)))
            .filter(|(_, picks)| !picks.is_empty())
            .collect()
    }

    /// Price the current selections
    pub fn quote(&self, config: &PricingConfig) -> Quote {
        Quote::compute(&self.bundle, &self.selection, config)
    }
}
