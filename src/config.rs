use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::str::FromStr;

use crate::assets::DEFAULT_STOCKS_LIQUID_RATIO;
use crate::builder::{Builder, Validate};
use crate::eligibility::HawlPolicy;
use crate::inputs::IntoZakatDecimal;
use crate::pricing::MarketPrices;
use crate::types::ZakatError;

/// Engine configuration: reference prices plus the modeling assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    pub prices: MarketPrices,
    /// Fraction of stock value considered zakatable; the portfolio starts
    /// with, and resets to, this value.
    pub stocks_liquid_ratio: Decimal,
    pub hawl_policy: HawlPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            prices: MarketPrices::default(),
            stocks_liquid_ratio: DEFAULT_STOCKS_LIQUID_RATIO,
            hawl_policy: HawlPolicy::default(),
        }
    }
}

impl FromStr for EngineConfig {
    type Err = ZakatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: EngineConfig = serde_json::from_str(s)
            .map_err(|e| ZakatError::ConfigurationError(format!("Failed to parse config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    pub fn new(gold_price: impl IntoZakatDecimal, silver_price: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        let config = Self {
            prices: MarketPrices::new(gold_price, silver_price)?,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for logical consistency.
    pub fn validate(&self) -> Result<(), ZakatError> {
        self.prices.validate()?;
        if self.stocks_liquid_ratio < Decimal::ZERO || self.stocks_liquid_ratio > Decimal::ONE {
            return Err(ZakatError::ConfigurationError(format!(
                "Stocks liquid ratio must be between 0 and 1, got {}",
                self.stocks_liquid_ratio
            )));
        }
        Ok(())
    }

    /// Loads configuration from environment variables.
    ///
    /// `ZAKAT_GOLD_PRICE` and `ZAKAT_SILVER_PRICE` are required;
    /// `ZAKAT_STOCKS_LIQUID_RATIO` and `ZAKAT_HAWL_POLICY` are optional.
    pub fn from_env() -> Result<Self, ZakatError> {
        let gold = required_env("ZAKAT_GOLD_PRICE")?;
        let silver = required_env("ZAKAT_SILVER_PRICE")?;

        let mut builder = Self::builder().gold_price(gold).silver_price(silver);

        if let Ok(ratio) = env::var("ZAKAT_STOCKS_LIQUID_RATIO") {
            let ratio = ratio
                .into_zakat_decimal()
                .map_err(|e| ZakatError::ConfigurationError(format!("Invalid ZAKAT_STOCKS_LIQUID_RATIO: {}", e)))?;
            builder = builder.stocks_liquid_ratio(ratio);
        }

        if let Ok(policy) = env::var("ZAKAT_HAWL_POLICY") {
            let policy = HawlPolicy::from_str(policy.trim())
                .map_err(|_| ZakatError::ConfigurationError(format!("Unknown ZAKAT_HAWL_POLICY '{}'", policy)))?;
            builder = builder.hawl_policy(policy);
        }

        builder.build()
    }

    /// Loads configuration from a JSON file.
    pub fn try_from_json(path: &str) -> Result<Self, ZakatError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ZakatError::ConfigurationError(format!("Failed to read config file: {}", e)))?;
        content.parse()
    }

    /// Creates a configuration from an async price source.
    #[cfg(feature = "async")]
    pub async fn from_provider<P: crate::pricing::PriceProvider + ?Sized>(provider: &P) -> Result<Self, ZakatError> {
        let prices = provider.get_prices().await?;
        let config = Self {
            prices,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn nisab_threshold(&self) -> Decimal {
        self.prices.nisab_threshold()
    }
}

fn required_env(name: &str) -> Result<Decimal, ZakatError> {
    let raw = env::var(name).map_err(|_| ZakatError::MissingConfig { field: name.to_string() })?;
    crate::inputs::parse_amount(&raw)
        .map_err(|e| ZakatError::ConfigurationError(format!("Invalid {}: {}", name, e)))
}

// ========== EngineConfigBuilder ==========

#[derive(Default)]
pub struct EngineConfigBuilder {
    gold_price: Option<Decimal>,
    silver_price: Option<Decimal>,
    stocks_liquid_ratio: Option<Decimal>,
    hawl_policy: Option<HawlPolicy>,
    rejected: Vec<ZakatError>,
}

impl EngineConfigBuilder {
    pub fn gold_price(mut self, price: impl IntoZakatDecimal) -> Self {
        match price.into_zakat_decimal() {
            Ok(p) => self.gold_price = Some(p),
            Err(e) => self.rejected.push(e.with_field("gold_price")),
        }
        self
    }

    pub fn silver_price(mut self, price: impl IntoZakatDecimal) -> Self {
        match price.into_zakat_decimal() {
            Ok(p) => self.silver_price = Some(p),
            Err(e) => self.rejected.push(e.with_field("silver_price")),
        }
        self
    }

    pub fn stocks_liquid_ratio(mut self, ratio: impl IntoZakatDecimal) -> Self {
        match ratio.into_zakat_decimal() {
            Ok(r) => self.stocks_liquid_ratio = Some(r),
            Err(e) => self.rejected.push(e.with_field("stocks_liquid_ratio")),
        }
        self
    }

    pub fn hawl_policy(mut self, policy: HawlPolicy) -> Self {
        self.hawl_policy = Some(policy);
        self
    }

    fn assemble(&self) -> EngineConfig {
        EngineConfig {
            prices: MarketPrices {
                gold_price_per_gram: self.gold_price.unwrap_or(Decimal::ZERO),
                silver_price_per_gram: self.silver_price.unwrap_or(Decimal::ZERO),
            },
            stocks_liquid_ratio: self.stocks_liquid_ratio.unwrap_or(DEFAULT_STOCKS_LIQUID_RATIO),
            hawl_policy: self.hawl_policy.unwrap_or_default(),
        }
    }
}

impl Validate for EngineConfigBuilder {
    fn validate(&self) -> Result<(), ZakatError> {
        if let Some(e) = self.rejected.first() {
            return Err(e.clone());
        }
        self.assemble().validate()
    }
}

impl Builder<EngineConfig> for EngineConfigBuilder {
    fn build(self) -> Result<EngineConfig, ZakatError> {
        self.validate()?;
        Ok(self.assemble())
    }
}
