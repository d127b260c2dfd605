use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

use crate::model::{DiscountRule, Tier};
use crate::types::{BundleId, MoveDirection, ProductId, StepId, StepKind};

/// Bundle Builder - multi-step product bundles for a storefront
#[derive(Parser)]
#[command(name = "bundle-builder")]
#[command(about = "Author product bundles and walk shoppers through them in the terminal")]
#[command(version)]
pub struct Cli {
    /// Engine configuration file (pricing and display options)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the sample catalog to a file
    Init {
        /// Destination catalog file
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// List the bundles of a catalog
    List {
        #[arg(short, long)]
        catalog: PathBuf,
    },
    /// Validate a catalog file
    Validate {
        #[arg(short, long)]
        catalog: PathBuf,
    },
    /// Replay selections and print the bundle price
    Quote {
        #[arg(short, long)]
        catalog: PathBuf,

        #[arg(short, long)]
        bundle: BundleId,

        /// Selection as STEP:PRODUCT, applied in order (repeatable)
        #[arg(short, long = "pick")]
        picks: Vec<Pick>,
    },
    /// Run the interactive storefront wizard
    Shop {
        #[arg(short, long)]
        catalog: PathBuf,

        #[arg(short, long)]
        bundle: BundleId,
    },
    /// Edit a bundle and save the catalog
    Author {
        #[arg(short, long)]
        catalog: PathBuf,

        #[arg(short, long)]
        bundle: BundleId,

        #[command(subcommand)]
        action: AuthorCommands,
    },
}

#[derive(Subcommand)]
pub enum AuthorCommands {
    /// Create the bundle as an empty draft
    Create {
        /// Bundle name
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },
    /// Rename or re-describe the bundle
    SetDetails {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },
    /// Append a new optional step
    AddStep,
    /// Delete a step
    RemoveStep {
        #[arg(short, long)]
        step: StepId,
    },
    /// Swap a step with its neighbour
    MoveStep {
        #[arg(short, long)]
        step: StepId,

        /// up or down
        #[arg(short, long)]
        direction: MoveDirection,
    },
    /// Offer a catalog product in a step, or stop offering it
    ToggleProduct {
        #[arg(short, long)]
        step: StepId,

        #[arg(short, long)]
        product: ProductId,
    },
    /// Edit the fields of a step
    UpdateStep(UpdateStepArgs),
    /// Replace the discount rule
    SetDiscount {
        #[command(subcommand)]
        rule: DiscountCommands,
    },
    /// Set the bundle base price (omit the value to clear it)
    SetBasePrice {
        price: Option<Decimal>,
    },
    /// Mark the bundle active (visible to shoppers) or draft
    Publish {
        /// Set the bundle back to draft instead
        #[arg(long)]
        draft: bool,
    },
    /// Remove the bundle from the catalog
    Delete,
}

#[derive(Args)]
pub struct UpdateStepArgs {
    #[arg(short, long)]
    pub step: StepId,

    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    /// required, optional or upsell
    #[arg(short, long)]
    pub kind: Option<StepKind>,

    #[arg(short, long)]
    pub max_selections: Option<u32>,
}

#[derive(Subcommand)]
pub enum DiscountCommands {
    /// Percentage off the subtotal
    Percentage {
        #[arg(short, long)]
        rate: Decimal,
    },
    /// Fixed amount off the subtotal
    Fixed {
        #[arg(short, long)]
        amount: Decimal,
    },
    /// Percentage chosen by item count, as MIN_ITEMS:RATE (repeatable)
    Tiered {
        #[arg(short, long = "tier", required = true)]
        tiers: Vec<TierArg>,
    },
}

impl DiscountCommands {
    pub fn into_rule(self) -> DiscountRule {
        match self {
            Self::Percentage { rate } => DiscountRule::Percentage { rate },
            Self::Fixed { amount } => DiscountRule::FixedAmount { amount },
            Self::Tiered { tiers } => DiscountRule::Tiered {
                tiers: tiers.into_iter().map(|t| t.0).collect(),
            },
        }
    }
}

/// A `STEP:PRODUCT` selection argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick {
    pub step: StepId,
    pub product: ProductId,
}

impl FromStr for Pick {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (step, product) = s
            .split_once(':')
            .ok_or_else(|| format!("expected STEP:PRODUCT, got '{}'", s))?;
        Ok(Self {
            step: step.parse().map_err(|e| format!("bad step id '{}': {}", step, e))?,
            product: product
                .parse()
                .map_err(|e| format!("bad product id '{}': {}", product, e))?,
        })
    }
}

/// A `MIN_ITEMS:RATE` tier argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierArg(pub Tier);

impl FromStr for TierArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min_items, rate) = s
            .split_once(':')
            .ok_or_else(|| format!("expected MIN_ITEMS:RATE, got '{}'", s))?;
        let min_items = min_items
            .trim()
            .parse()
            .map_err(|e| format!("bad item count '{}': {}", min_items, e))?;
        let rate = Decimal::from_str(rate.trim()).map_err(|e| format!("bad rate '{}': {}", rate, e))?;
        Ok(Self(Tier::new(min_items, rate)))
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
