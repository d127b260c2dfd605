//! Bundle Builder Library
//!
//! Selection and pricing engine for multi-step product bundles, the authoring
//! operations that edit bundle definitions, a JSON catalog store and the
//! terminal storefront wizard.
//!
//! # Layers
//!
//! - **Engine** (`selection`, `wizard`, `pricing`, `authoring`): pure functions
//!   from the current state to the next, no I/O
//! - **Collaborators** (`catalog`, `config`): file-backed data and settings
//! - **Surfaces** (`cli`, `commands`, `ui`): the `bundle-builder` binary

pub mod authoring;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod error;
pub mod model;
pub mod pricing;
pub mod selection;
pub mod theme;
pub mod types;
pub mod ui;
pub mod wizard;

// Domain model
pub use model::{Bundle, DiscountRule, Product, Step, Tier};
pub use types::{BundleId, BundleStatus, MoveDirection, ProductId, RoundingMode, StepId, StepKind};

// Shopper-facing engine
pub use selection::{toggle_selection, SelectionState};
pub use wizard::{
    advance, can_advance, can_retreat, progress_percent, retreat, ShoppingSession, WizardCursor,
};
pub use pricing::{
    applicable_tier, applied_rate, compute_discount, compute_final_price, compute_subtotal, Quote,
};

// Authoring
pub use authoring::{
    add_step, move_step, remove_step, set_base_price, set_details, set_discount_rule,
    toggle_product_in_step, update_step, StepUpdate,
};

// Collaborators
pub use catalog::{BundleSummary, Catalog, CatalogEntry, CatalogProvider};
pub use config::{DisplayOptions, EngineConfig, PricingConfig, Rounding};
pub use error::{BuilderError, EngineResult, InvalidArgument};
