//! # zakat-engine
//!
//! A framework-independent Zakat calculation engine for live forms: every
//! field edit, price update or bulk import recomputes the Nisab, net
//! zakatable wealth, eligibility and the 2.5% obligation, and notifies the
//! host once.
//!
//! ```
//! use zakat_engine::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let config = EngineConfig::new(dec!(485.03), dec!(20.50)).unwrap();
//! let mut engine = ZakatEngine::new(config);
//! engine.update(AssetField::Cash, "20,000");
//!
//! assert!(engine.result().is_eligible);
//! assert_eq!(engine.result().total_zakat, dec!(500));
//! ```

pub mod macros;

pub mod aggregate;
pub mod assets;
pub mod builder;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod hawl;
pub mod inputs;
pub mod nisab;
pub mod obligation;
pub mod prefill;
pub mod prelude;
pub mod pricing;
pub mod traits;
pub mod types;

pub use config::EngineConfig;
pub use engine::ZakatEngine;
pub use types::{ZakatError, ZakatResult};
