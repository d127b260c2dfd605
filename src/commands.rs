//! Command handlers behind the `bundle-builder` binary
//!
//! Each handler works on an already loaded [`Catalog`] and returns the text to
//! print, so the binary only does file and terminal plumbing.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use crate::authoring::{self, StepUpdate};
use crate::catalog::{Catalog, CatalogProvider};
use crate::cli::{AuthorCommands, Pick, UpdateStepArgs};
use crate::error::{BuilderError, EngineResult, InvalidArgument};
use crate::model::Bundle;
use crate::pricing::Quote;
use crate::selection::{toggle_selection, SelectionState};
use crate::types::{BundleId, BundleStatus};
use crate::ui::screens::money;

/// Write the sample catalog. Refuses to overwrite unless `force` is set.
pub fn init_catalog(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{:?} already exists (use --force to overwrite)", path);
    }
    Catalog::demo().save_to_file(path)
}

/// Load a catalog file and validate it
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let catalog = Catalog::load_from_file(path)?;
    catalog
        .validate()
        .with_context(|| format!("Catalog {:?} is invalid", path))?;
    Ok(catalog)
}

/// Bundle by id, or `UnknownBundle`
pub fn find_bundle(catalog: &impl CatalogProvider, id: BundleId) -> EngineResult<Bundle> {
    catalog
        .bundle(id)
        .ok_or(InvalidArgument::UnknownBundle { bundle: id })
}

/// A bundle a shopper may open. Drafts are not shoppable.
pub fn shoppable_bundle(catalog: &Catalog, id: BundleId) -> crate::error::Result<Bundle> {
    let bundle = find_bundle(&*catalog, id)?;
    match catalog.status(id) {
        Some(BundleStatus::Active) => Ok(bundle),
        _ => Err(BuilderError::catalog(format!(
            "bundle {} ('{}') is a draft and cannot be shopped",
            id, bundle.name
        ))),
    }
}

/// Apply `STEP:PRODUCT` picks in order, starting from empty selections
pub fn replay_picks(bundle: &Bundle, picks: &[Pick]) -> EngineResult<SelectionState> {
    let mut state = SelectionState::for_bundle(bundle);
    for pick in picks {
        let step = bundle
            .step(pick.step)
            .ok_or(InvalidArgument::UnknownStep { step: pick.step })?;
        let product = step
            .product(pick.product)
            .ok_or(InvalidArgument::ProductNotInStep {
                product: pick.product,
                step: pick.step,
            })?;
        state = toggle_selection(&state, step, product)?;
    }
    Ok(state)
}

/// Human readable price breakdown
pub fn render_quote(bundle: &Bundle, state: &SelectionState, quote: &Quote) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", bundle.name, bundle.discount.describe());
    for step in &bundle.steps {
        for product in state.selected(step.id) {
            let _ = writeln!(
                out,
                "  [{}] {:<28} {:>10}",
                step.title,
                product.name,
                money(product.price)
            );
        }
    }
    let _ = writeln!(out, "Items:     {}", quote.item_count);
    let _ = writeln!(out, "Subtotal:  {}", money(quote.subtotal));
    if let Some(base) = bundle.base_price {
        let _ = writeln!(out, "Base:      {}", money(base));
    }
    let _ = writeln!(out, "Discount: -{}", money(quote.discount));
    let _ = write!(out, "Total:     {}", money(quote.final_price));
    if quote.clamped {
        out.push_str(" (floored at zero)");
    }
    out
}

/// Dashboard table of all bundles
pub fn render_list(catalog: &Catalog) -> String {
    let mut out = format!(
        "{:>4}  {:<32} {:>5} {:>8}  {}\n",
        "ID", "NAME", "STEPS", "PRODUCTS", "STATUS"
    );
    for row in catalog.summaries() {
        let _ = writeln!(
            out,
            "{:>4}  {:<32} {:>5} {:>8}  {}",
            row.id.get(),
            row.name,
            row.steps,
            row.products,
            row.status
        );
    }
    out
}

/// Apply one authoring command to the catalog. Returns a confirmation line.
pub fn apply_author(catalog: &mut Catalog, id: BundleId, action: AuthorCommands) -> Result<String> {
    let (next, message) = match action {
        AuthorCommands::Create { name, description } => {
            if catalog.bundle(id).is_some() {
                return Err(InvalidArgument::DuplicateBundle { bundle: id }.into());
            }
            let mut bundle = Bundle::new(id.get(), name);
            if let Some(description) = description {
                bundle = bundle.with_description(description);
            }
            catalog.upsert_bundle(bundle);
            return Ok(format!("Created draft bundle {}", id));
        }
        AuthorCommands::Publish { draft } => {
            let status = if draft {
                BundleStatus::Draft
            } else {
                BundleStatus::Active
            };
            let mut staged = catalog.clone();
            if !staged.set_status(id, status) {
                return Err(InvalidArgument::UnknownBundle { bundle: id }.into());
            }
            // Activation must not leave an unshoppable bundle behind
            staged.validate()?;
            *catalog = staged;
            return Ok(format!("Bundle {} is now {}", id, status));
        }
        AuthorCommands::Delete => {
            catalog
                .delete_bundle(id)
                .ok_or(InvalidArgument::UnknownBundle { bundle: id })?;
            return Ok(format!("Deleted bundle {}", id));
        }
        AuthorCommands::SetDetails { name, description } => (
            authoring::set_details(&find_bundle(&*catalog, id)?, name, description),
            "Updated bundle details".to_string(),
        ),
        AuthorCommands::AddStep => {
            let next = authoring::add_step(&find_bundle(&*catalog, id)?)?;
            let added = next.steps.last().map(|s| s.id.get()).unwrap_or_default();
            (next, format!("Added step {}", added))
        }
        AuthorCommands::RemoveStep { step } => (
            authoring::remove_step(&find_bundle(&*catalog, id)?, step)?,
            format!("Removed step {}", step),
        ),
        AuthorCommands::MoveStep { step, direction } => (
            authoring::move_step(&find_bundle(&*catalog, id)?, step, direction)?,
            format!("Moved step {} {}", step, direction),
        ),
        AuthorCommands::ToggleProduct { step, product } => {
            let bundle = find_bundle(&*catalog, id)?;
            let next = authoring::toggle_product_in_step(&bundle, step, product, &*catalog)?;
            let verb = if next.step(step).is_some_and(|s| s.contains(product)) {
                "now offers"
            } else {
                "no longer offers"
            };
            (next, format!("Step {} {} product {}", step, verb, product))
        }
        AuthorCommands::UpdateStep(args) => {
            let step = args.step;
            (
                authoring::update_step(&find_bundle(&*catalog, id)?, step, step_update(args))?,
                format!("Updated step {}", step),
            )
        }
        AuthorCommands::SetDiscount { rule } => {
            let next = authoring::set_discount_rule(&find_bundle(&*catalog, id)?, rule.into_rule())?;
            let message = format!("Discount set to {}", next.discount.describe());
            (next, message)
        }
        AuthorCommands::SetBasePrice { price } => (
            authoring::set_base_price(&find_bundle(&*catalog, id)?, price)?,
            match price {
                Some(price) => format!("Base price set to {}", money(price)),
                None => "Base price cleared".to_string(),
            },
        ),
    };

    catalog.upsert_bundle(next);
    tracing::info!(bundle = %id, "{}", message);
    Ok(message)
}

fn step_update(args: UpdateStepArgs) -> StepUpdate {
    StepUpdate {
        title: args.title,
        description: args.description,
        kind: args.kind,
        max_selections: args.max_selections,
    }
}
