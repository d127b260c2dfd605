//! Bundle data model
//!
//! Products, steps, bundles and discount rules as supplied by the catalog
//! collaborator. These values are read-only for a shopping session and are
//! only replaced wholesale by the authoring operations.
//!
//! Money is `rust_decimal::Decimal` throughout so sums of prices such as
//! `19.99 + 39.99` are exact.

use crate::error::{EngineResult, InvalidArgument};
use crate::types::{BundleId, ProductId, StepId, StepKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Upper bound for percentage rates
const MAX_RATE: Decimal = Decimal::ONE_HUNDRED;

/// A catalog product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    /// Image reference (path or URL), opaque to the engine
    #[serde(default)]
    pub image: String,
}

impl Product {
    pub fn new(id: u32, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: ProductId(id),
            name: name.into(),
            price,
            image: String::new(),
        }
    }

    /// Set the image reference
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// One stage of the bundle wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: StepKind,
    /// Products offered by this step, in display order
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default = "default_max_selections")]
    pub max_selections: u32,
}

fn default_max_selections() -> u32 {
    1
}

impl Step {
    /// Create an empty step accepting a single selection
    pub fn new(id: u32, title: impl Into<String>, kind: StepKind) -> Self {
        Self {
            id: StepId(id),
            title: title.into(),
            description: String::new(),
            kind,
            products: Vec::new(),
            max_selections: 1,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    pub fn with_max_selections(mut self, max_selections: u32) -> Self {
        self.max_selections = max_selections;
        self
    }

    /// Returns true if the step offers the product
    pub fn contains(&self, product: ProductId) -> bool {
        self.products.iter().any(|p| p.id == product)
    }

    /// Look up an offered product by id
    pub fn product(&self, product: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product)
    }

    /// Capacity as a length, checked to be at least one.
    pub(crate) fn capacity(&self) -> EngineResult<usize> {
        if self.max_selections < 1 {
            return Err(InvalidArgument::InvalidMaxSelections {
                step: self.id,
                value: self.max_selections,
            });
        }
        Ok(self.max_selections as usize)
    }

    /// Check the step invariants: capacity, unique products, non-negative prices.
    pub fn validate(&self) -> EngineResult<()> {
        self.capacity()?;

        let mut seen = HashSet::with_capacity(self.products.len());
        for product in &self.products {
            if !seen.insert(product.id) {
                return Err(InvalidArgument::DuplicateProduct {
                    step: self.id,
                    product: product.id,
                });
            }
            if product.price < Decimal::ZERO {
                return Err(InvalidArgument::NegativeAmount {
                    what: "product price",
                    value: product.price,
                });
            }
        }
        Ok(())
    }
}

/// One threshold of a tiered discount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Minimum number of selected items for the tier to apply
    pub min_items: u32,
    /// Percentage applied to the subtotal
    pub rate: Decimal,
}

impl Tier {
    pub fn new(min_items: u32, rate: Decimal) -> Self {
        Self { min_items, rate }
    }
}

/// Discount applied to a bundle. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountRule {
    /// Percentage of the subtotal, 0..=100
    Percentage { rate: Decimal },
    /// Flat amount off; may exceed the subtotal
    FixedAmount { amount: Decimal },
    /// Rate picked by the largest threshold not exceeding the item count
    Tiered { tiers: Vec<Tier> },
}

impl Default for DiscountRule {
    fn default() -> Self {
        Self::Percentage { rate: Decimal::TEN }
    }
}

impl DiscountRule {
    /// Check rates, amounts and tier ordering.
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            Self::Percentage { rate } => check_rate(*rate),
            Self::FixedAmount { amount } => {
                if *amount < Decimal::ZERO {
                    return Err(InvalidArgument::NegativeAmount {
                        what: "fixed discount",
                        value: *amount,
                    });
                }
                Ok(())
            }
            Self::Tiered { tiers } => {
                for tier in tiers {
                    check_rate(tier.rate)?;
                }
                for pair in tiers.windows(2) {
                    if pair[1].min_items <= pair[0].min_items {
                        return Err(InvalidArgument::NonIncreasingTiers {
                            previous: pair[0].min_items,
                            min_items: pair[1].min_items,
                        });
                    }
                }
                Ok(())
            }
        }
    }

    /// Short human-readable description, e.g. "15% off"
    pub fn describe(&self) -> String {
        match self {
            Self::Percentage { rate } => format!("{}% off", rate.normalize()),
            Self::FixedAmount { amount } => format!("${:.2} off", amount),
            Self::Tiered { tiers } => {
                let parts: Vec<String> = tiers
                    .iter()
                    .map(|t| format!("{}+ items: {}%", t.min_items, t.rate.normalize()))
                    .collect();
                format!("tiered ({})", parts.join(", "))
            }
        }
    }
}

fn check_rate(rate: Decimal) -> EngineResult<()> {
    if rate < Decimal::ZERO || rate > MAX_RATE {
        return Err(InvalidArgument::RateOutOfRange { rate });
    }
    Ok(())
}

/// An ordered collection of steps plus a discount rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub id: BundleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Wizard order; also the authoring display order
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub discount: DiscountRule,
    /// Replaces the product subtotal as the discounted amount when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<Decimal>,
}

impl Bundle {
    /// Create an empty draft bundle
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: BundleId(id),
            name: name.into(),
            description: String::new(),
            steps: Vec::new(),
            discount: DiscountRule::default(),
            base_price: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_discount(mut self, discount: DiscountRule) -> Self {
        self.discount = discount;
        self
    }

    /// Look up a step by id
    pub fn step(&self, id: StepId) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Position of a step in wizard order
    pub fn step_index(&self, id: StepId) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }

    /// Total products offered across all steps
    pub fn product_count(&self) -> usize {
        self.steps.iter().map(|s| s.products.len()).sum()
    }

    /// Check bundle invariants. An empty draft is valid.
    pub fn validate(&self) -> EngineResult<()> {
        let mut seen = HashSet::with_capacity(self.steps.len());
        for step in &self.steps {
            if !seen.insert(step.id) {
                return Err(InvalidArgument::DuplicateStep { step: step.id });
            }
            step.validate()?;
        }

        self.discount.validate()?;

        if let Some(base) = self.base_price {
            if base < Decimal::ZERO {
                return Err(InvalidArgument::NegativeAmount {
                    what: "base price",
                    value: base,
                });
            }
        }
        Ok(())
    }
}
