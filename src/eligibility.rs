//! Eligibility: does the net wealth reach the Nisab?

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::assets::AssetPortfolio;

/// Whether the Hawl flag gates eligibility.
///
/// The flag is always captured; `Informational` records it in the trace
/// without letting it change the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HawlPolicy {
    #[default]
    Informational,
    /// Wealth held for less than a lunar year is never eligible.
    Required,
}

/// `net_wealth >= nisab_threshold`, with no rounding tolerance.
pub fn is_eligible(net_wealth: Decimal, nisab_threshold: Decimal) -> bool {
    net_wealth >= nisab_threshold
}

/// Outcome of the eligibility check, with the reason when not eligible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    pub is_eligible: bool,
    pub reason: Option<String>,
}

/// Applies the Nisab comparison and, under [`HawlPolicy::Required`], the Hawl gate.
pub fn evaluate(
    net_wealth: Decimal,
    nisab_threshold: Decimal,
    assets: &AssetPortfolio,
    policy: HawlPolicy,
) -> Eligibility {
    if policy == HawlPolicy::Required && !assets.hawl_completed {
        return Eligibility {
            is_eligible: false,
            reason: Some("Hawl (1 lunar year) not met".to_string()),
        };
    }

    if is_eligible(net_wealth, nisab_threshold) {
        Eligibility {
            is_eligible: true,
            reason: None,
        }
    } else {
        Eligibility {
            is_eligible: false,
            reason: Some("Net wealth below Nisab".to_string()),
        }
    }
}
