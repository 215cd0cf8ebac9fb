//! # Nisab: the minimum wealth threshold
//!
//! Two reference quantities exist: 85 grams of gold and 595 grams of silver.
//! The engine always takes the lower of the two values, which sets the more
//! inclusive bar for when the obligation becomes due. This is fixed policy,
//! not a per-user option.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::pricing::MarketPrices;

/// Grams of gold whose value forms the gold Nisab.
pub const NISAB_GOLD_GRAMS: Decimal = dec!(85);

/// Grams of silver whose value forms the silver Nisab.
pub const NISAB_SILVER_GRAMS: Decimal = dec!(595);

/// `min(85 × gold_price_per_gram, 595 × silver_price_per_gram)`.
///
/// A product too large for `Decimal` is an unbounded threshold, so the other
/// commodity wins; if both overflow nobody can reach the Nisab.
pub fn compute_nisab(gold_price_per_gram: Decimal, silver_price_per_gram: Decimal) -> Decimal {
    let gold = gold_price_per_gram
        .checked_mul(NISAB_GOLD_GRAMS)
        .unwrap_or(Decimal::MAX);
    let silver = silver_price_per_gram
        .checked_mul(NISAB_SILVER_GRAMS)
        .unwrap_or(Decimal::MAX);
    gold.min(silver)
}

impl MarketPrices {
    pub fn nisab_threshold(&self) -> Decimal {
        compute_nisab(self.gold_price_per_gram, self.silver_price_per_gram)
    }
}
