//! Type-safe vocabulary for bundles
//!
//! Closed enums and identifier newtypes used throughout the crate. Step kinds,
//! directions and statuses are exhaustive so gating and rendering logic is
//! checked by the compiler rather than by comparing strings.

use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Raw numeric value
            #[inline]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

id_type!(
    /// Identifier of a bundle in the catalog
    BundleId
);
id_type!(
    /// Identifier of a step, unique within its bundle
    StepId
);
id_type!(
    /// Identifier of a catalog product
    ProductId
);

/// How a step participates in the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StepKind {
    /// Shopper must pick at least one product before moving on
    Required,
    /// Shopper may skip the step
    #[default]
    Optional,
    /// Skippable step offering premium add-ons
    Upsell,
}

impl StepKind {
    /// True when the step gates forward navigation
    #[inline]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }

    /// Customer-facing label shown next to skippable steps
    pub const fn badge(self) -> Option<&'static str> {
        match self {
            Self::Required => None,
            Self::Optional => Some("Optional"),
            Self::Upsell => Some("Recommended"),
        }
    }
}

/// Direction for reordering steps while authoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Publication state shown on the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum BundleStatus {
    #[strum(serialize = "Active")]
    Active,
    #[default]
    #[strum(serialize = "Draft")]
    Draft,
}

/// Midpoint handling when rounding money amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoundingMode {
    /// 0.005 rounds to 0.01
    #[default]
    HalfUp,
    /// 0.005 rounds to the nearest even cent
    Bankers,
}

impl RoundingMode {
    /// Matching `rust_decimal` strategy
    pub const fn strategy(self) -> RoundingStrategy {
        match self {
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::Bankers => RoundingStrategy::MidpointNearestEven,
        }
    }
}
