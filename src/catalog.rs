//! Bundle catalog
//!
//! The catalog is the collaborator that supplies bundles and products to the
//! engine and persists authored drafts. The engine only ever sees it through
//! [`CatalogProvider`]; the JSON file layout below is this crate's own store.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::InvalidArgument;
use crate::model::{Bundle, DiscountRule, Product, Step};
use crate::types::{BundleId, BundleStatus, ProductId, StepKind};

/// Read-only access to bundles and products.
pub trait CatalogProvider {
    /// Bundle definition by id
    fn bundle(&self, id: BundleId) -> Option<Bundle>;

    /// Catalog product by id
    fn product(&self, id: ProductId) -> Option<Product>;
}

/// A bundle with its publication state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub bundle: Bundle,
    #[serde(default)]
    pub status: BundleStatus,
}

/// Dashboard row describing one bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSummary {
    pub id: BundleId,
    pub name: String,
    pub steps: usize,
    pub products: usize,
    pub status: BundleStatus,
}

/// Products and bundles stored together in one JSON document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub bundles: Vec<CatalogEntry>,
}

impl Catalog {
    /// Save catalog to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize catalog to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write catalog to {:?}", path.as_ref()))?;

        tracing::info!(path = ?path.as_ref(), bundles = self.bundles.len(), "catalog saved");
        Ok(())
    }

    /// Load catalog from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog from {:?}", path.as_ref()))?;

        let catalog: Self =
            serde_json::from_str(&content).context("Failed to parse catalog JSON")?;

        tracing::debug!(
            path = ?path.as_ref(),
            products = catalog.products.len(),
            bundles = catalog.bundles.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Validate every bundle and the uniqueness of bundle and product ids
    pub fn validate(&self) -> Result<()> {
        let mut products = HashSet::new();
        for product in &self.products {
            if !products.insert(product.id) {
                anyhow::bail!("Product id {} is used more than once", product.id);
            }
            if product.price < Decimal::ZERO {
                anyhow::bail!("Product {} has a negative price", product.id);
            }
        }

        let mut bundles = HashSet::new();
        for entry in &self.bundles {
            let bundle = &entry.bundle;
            if !bundles.insert(bundle.id) {
                return Err(InvalidArgument::DuplicateBundle { bundle: bundle.id }.into());
            }
            bundle
                .validate()
                .with_context(|| format!("Bundle {} ('{}') is invalid", bundle.id, bundle.name))?;

            if entry.status == BundleStatus::Active && bundle.steps.is_empty() {
                anyhow::bail!("Active bundle {} has no steps", bundle.id);
            }
        }
        Ok(())
    }

    /// Dashboard rows in catalog order
    pub fn summaries(&self) -> Vec<BundleSummary> {
        self.bundles
            .iter()
            .map(|entry| BundleSummary {
                id: entry.bundle.id,
                name: entry.bundle.name.clone(),
                steps: entry.bundle.steps.len(),
                products: entry.bundle.product_count(),
                status: entry.status,
            })
            .collect()
    }

    /// Insert a bundle or replace the one with the same id
    pub fn upsert_bundle(&mut self, bundle: Bundle) {
        match self.bundles.iter_mut().find(|e| e.bundle.id == bundle.id) {
            Some(entry) => entry.bundle = bundle,
            None => self.bundles.push(CatalogEntry {
                bundle,
                status: BundleStatus::Draft,
            }),
        }
    }

    /// Remove a bundle. Returns the removed bundle.
    pub fn delete_bundle(&mut self, id: BundleId) -> Option<Bundle> {
        let index = self.bundles.iter().position(|e| e.bundle.id == id)?;
        Some(self.bundles.remove(index).bundle)
    }

    /// Publication state of a bundle
    pub fn status(&self, id: BundleId) -> Option<BundleStatus> {
        self.bundles
            .iter()
            .find(|e| e.bundle.id == id)
            .map(|e| e.status)
    }

    /// Change the publication state of a bundle. Returns false if unknown.
    pub fn set_status(&mut self, id: BundleId, status: BundleStatus) -> bool {
        match self.bundles.iter_mut().find(|e| e.bundle.id == id) {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => false,
        }
    }

    /// Sample catalog with the "Summer Essentials Bundle"
    pub fn demo() -> Self {
        let tees = vec![
            Product::new(101, "Classic White Tee", cents(1999)).with_image("/white-tshirt.png"),
            Product::new(102, "Graphic Print Tee", cents(2499)),
            Product::new(103, "Striped Tee", cents(2299)),
        ];
        let bottoms = vec![
            Product::new(201, "Denim Shorts", cents(3999)).with_image("/denim-shorts.png"),
            Product::new(202, "Chino Shorts", cents(3499)),
        ];
        let accessories = vec![
            Product::new(301, "Baseball Cap", cents(1499)).with_image("/baseball-cap.png"),
            Product::new(302, "Sunglasses", cents(2499)).with_image("/stylish-sunglasses.png"),
            Product::new(303, "Beach Tote", cents(2999)),
        ];
        let premium = vec![
            Product::new(401, "Premium Sandals", cents(4999)),
            Product::new(402, "Waterproof Watch", cents(7999)),
        ];

        let products = [&tees, &bottoms, &accessories, &premium]
            .into_iter()
            .flatten()
            .cloned()
            .collect();

        let summer = Bundle::new(1, "Summer Essentials Bundle")
            .with_description("Everything you need for the perfect summer look")
            .with_step(
                Step::new(1, "Select a T-Shirt", StepKind::Required)
                    .with_description("Choose your favorite style")
                    .with_products(tees),
            )
            .with_step(
                Step::new(2, "Add Bottoms", StepKind::Required)
                    .with_description("Complete your outfit")
                    .with_products(bottoms),
            )
            .with_step(
                Step::new(3, "Add Accessories", StepKind::Optional)
                    .with_description("Customize your look")
                    .with_products(accessories)
                    .with_max_selections(2),
            )
            .with_step(
                Step::new(4, "Complete Your Look", StepKind::Upsell)
                    .with_description("Add these premium items to your bundle")
                    .with_products(premium),
            )
            .with_discount(DiscountRule::Percentage {
                rate: Decimal::from(15),
            });

        Self {
            products,
            bundles: vec![CatalogEntry {
                bundle: summer,
                status: BundleStatus::Active,
            }],
        }
    }
}

impl CatalogProvider for Catalog {
    fn bundle(&self, id: BundleId) -> Option<Bundle> {
        self.bundles
            .iter()
            .find(|e| e.bundle.id == id)
            .map(|e| e.bundle.clone())
    }

    fn product(&self, id: ProductId) -> Option<Product> {
        self.products.iter().find(|p| p.id == id).cloned()
    }
}

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}
