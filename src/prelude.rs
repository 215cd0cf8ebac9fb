//! Prelude module for zakat-engine
//!
//! This module re-exports commonly used structs, traits, and types to allow
//! for easier usage of the library.
//!
//! # Usage
//!
//! ```rust
//! use zakat_engine::prelude::*;
//! ```

// Core exports
pub use crate::config::{EngineConfig, EngineConfigBuilder};
pub use crate::engine::{ObserverId, ZakatEngine};
pub use crate::types::{CalculationStep, Operation, ZakatError, ZakatResult};

// Inputs and the pure pipeline stages
pub use crate::aggregate::{WealthBreakdown, aggregate, try_aggregate};
pub use crate::assets::{AssetField, AssetPortfolio, ConditionFlag, DEFAULT_STOCKS_LIQUID_RATIO, LiabilityField, LiabilitySet};
pub use crate::builder::{Builder, Validate};
pub use crate::eligibility::{HawlPolicy, is_eligible};
pub use crate::hawl::HawlTracker;
pub use crate::inputs::{IntoZakatDecimal, normalize_amount};
pub use crate::nisab::{NISAB_GOLD_GRAMS, NISAB_SILVER_GRAMS, compute_nisab};
pub use crate::obligation::{ZAKAT_RATE, compute_zakat};
pub use crate::prefill::PrefillRecord;
pub use crate::pricing::{MarketPrices, StaticPriceProvider};
#[cfg(feature = "async")]
pub use crate::pricing::PriceProvider;
pub use crate::traits::FieldAccess;
