//! Market prices for the two reference commodities.
//!
//! Prices change rarely, so the engine caches the Nisab derived from them.
//! The `PriceProvider` trait lets hosts plug in any async source (a REST API,
//! a database, static test data) without the engine itself doing I/O.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::inputs::IntoZakatDecimal;
use crate::types::ZakatError;

/// Current market prices for the metals used to derive the Nisab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MarketPrices {
    /// Gold price per gram in the local currency.
    pub gold_price_per_gram: Decimal,
    /// Silver price per gram in the local currency.
    pub silver_price_per_gram: Decimal,
}

impl MarketPrices {
    /// Creates validated prices. Both must be non-negative.
    pub fn new(
        gold_price_per_gram: impl IntoZakatDecimal,
        silver_price_per_gram: impl IntoZakatDecimal,
    ) -> Result<Self, ZakatError> {
        let gold = gold_price_per_gram
            .into_zakat_decimal()
            .map_err(|e| e.with_field("gold_price_per_gram"))?;
        let silver = silver_price_per_gram
            .into_zakat_decimal()
            .map_err(|e| e.with_field("silver_price_per_gram"))?;

        let prices = Self {
            gold_price_per_gram: gold,
            silver_price_per_gram: silver,
        };
        prices.validate()?;
        Ok(prices)
    }

    pub fn validate(&self) -> Result<(), ZakatError> {
        if self.gold_price_per_gram < Decimal::ZERO {
            return Err(ZakatError::ConfigurationError(
                "Gold price must be non-negative".to_string(),
            ));
        }
        if self.silver_price_per_gram < Decimal::ZERO {
            return Err(ZakatError::ConfigurationError(
                "Silver price must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// True when both prices are known, i.e. the Nisab is meaningful.
    pub fn is_complete(&self) -> bool {
        self.gold_price_per_gram > Decimal::ZERO && self.silver_price_per_gram > Decimal::ZERO
    }
}

/// Trait for fetching current metal prices.
///
/// # Example
/// ```ignore
/// use zakat_engine::pricing::{PriceProvider, StaticPriceProvider};
///
/// let provider = StaticPriceProvider::new(485.03, 20.50)?;
/// let prices = provider.get_prices().await?;
/// ```
#[cfg(feature = "async")]
#[async_trait::async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches current metal prices.
    ///
    /// Returns `Err(ZakatError)` if prices cannot be fetched.
    async fn get_prices(&self) -> Result<MarketPrices, ZakatError>;
}

/// A static price provider for testing and for user-entered prices.
#[derive(Debug, Clone)]
pub struct StaticPriceProvider {
    prices: MarketPrices,
}

impl StaticPriceProvider {
    pub fn new(
        gold_per_gram: impl IntoZakatDecimal,
        silver_per_gram: impl IntoZakatDecimal,
    ) -> Result<Self, ZakatError> {
        Ok(Self {
            prices: MarketPrices::new(gold_per_gram, silver_per_gram)?,
        })
    }

    pub fn from_prices(prices: MarketPrices) -> Self {
        Self { prices }
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl PriceProvider for StaticPriceProvider {
    async fn get_prices(&self) -> Result<MarketPrices, ZakatError> {
        Ok(self.prices)
    }
}
