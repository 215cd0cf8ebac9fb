//! # Recompute orchestration
//!
//! [`ZakatEngine`] owns the current portfolio, liabilities and market prices,
//! and keeps a [`ZakatResult`] consistent with them. Every mutating call runs
//! the whole pipeline (normalize, Nisab if prices changed, aggregate,
//! eligibility, obligation) and then notifies each observer exactly once.
//!
//! Mutations take `&mut self`, so a half-updated engine can never be observed
//! and hosts sharing an engine across threads must serialize writers, e.g.
//! behind a `Mutex`.

use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregate::try_aggregate;
use crate::assets::{AssetField, AssetPortfolio, ConditionFlag, FieldKind, LiabilityField, LiabilitySet, clamp_ratio};
use crate::config::EngineConfig;
use crate::eligibility::{HawlPolicy, evaluate};
use crate::hawl::HawlTracker;
use crate::inputs::{IntoZakatDecimal, non_negative};
use crate::obligation::{ZAKAT_RATE, compute_zakat};
use crate::prefill::{PrefillOutcome, PrefillRecord};
use crate::pricing::MarketPrices;
use crate::traits::FieldAccess;
use crate::types::{CalculationStep, ZakatError, ZakatResult};

/// Callback invoked with each new result snapshot.
pub type ResultObserver = Box<dyn FnMut(&ZakatResult) + Send + 'static>;

/// Handle returned by [`ZakatEngine::on_result_changed`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(Uuid);

pub struct ZakatEngine {
    config: EngineConfig,
    assets: AssetPortfolio,
    liabilities: LiabilitySet,
    prices: MarketPrices,
    nisab_threshold: Decimal,
    result: ZakatResult,
    warnings: Vec<ZakatError>,
    observers: Vec<(ObserverId, ResultObserver)>,
    subscribers: Vec<(ObserverId, mpsc::Sender<ZakatResult>)>,
}

impl std::fmt::Debug for ZakatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZakatEngine")
            .field("config", &self.config)
            .field("assets", &self.assets)
            .field("liabilities", &self.liabilities)
            .field("prices", &self.prices)
            .field("result", &self.result)
            .field("observers", &self.observers.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for ZakatEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ZakatEngine {
    /// Creates an engine with zero-valued inputs.
    ///
    /// Out-of-range configuration values are clamped rather than rejected; use
    /// [`EngineConfig::validate`] or the builder to reject them up front.
    pub fn new(mut config: EngineConfig) -> Self {
        config.stocks_liquid_ratio = clamp_ratio(config.stocks_liquid_ratio);
        let prices = MarketPrices {
            gold_price_per_gram: non_negative(config.prices.gold_price_per_gram).0,
            silver_price_per_gram: non_negative(config.prices.silver_price_per_gram).0,
        };
        config.prices = prices;

        let mut engine = Self {
            assets: AssetPortfolio::with_liquid_ratio(config.stocks_liquid_ratio),
            liabilities: LiabilitySet::default(),
            nisab_threshold: prices.nisab_threshold(),
            prices,
            config,
            result: ZakatResult::default(),
            warnings: Vec::new(),
            observers: Vec::new(),
            subscribers: Vec::new(),
        };
        engine.result = engine.compute();
        engine
    }

    // ========== Read-only accessors ==========

    /// The current result snapshot.
    pub fn result(&self) -> &ZakatResult {
        &self.result
    }

    /// Non-fatal warnings raised by the most recent mutating call.
    pub fn warnings(&self) -> &[ZakatError] {
        &self.warnings
    }

    pub fn assets(&self) -> &AssetPortfolio {
        &self.assets
    }

    pub fn liabilities(&self) -> &LiabilitySet {
        &self.liabilities
    }

    pub fn prices(&self) -> MarketPrices {
        self.prices
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn nisab_threshold(&self) -> Decimal {
        self.nisab_threshold
    }

    // ========== Observers ==========

    /// Registers a callback invoked exactly once per mutating call.
    pub fn on_result_changed<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&ZakatResult) + Send + 'static,
    {
        let id = ObserverId(Uuid::new_v4());
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Unregisters an observer or subscription. Returns `false` if it was not registered.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len() + self.subscribers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.observers.len() + self.subscribers.len() != before
    }

    /// Forwards every snapshot into a channel.
    ///
    /// Dropping the receiver ends the subscription at the next notification.
    pub fn subscribe(&mut self) -> (ObserverId, mpsc::Receiver<ZakatResult>) {
        let (tx, rx) = mpsc::channel();
        let id = ObserverId(Uuid::new_v4());
        self.subscribers.push((id, tx));
        (id, rx)
    }

    /// Number of registered observers and live subscriptions.
    pub fn observer_count(&self) -> usize {
        self.observers.len() + self.subscribers.len()
    }

    // ========== Mutations ==========

    /// Sets one numeric asset field from raw user input.
    ///
    /// Weight fields also re-derive their paired value field as
    /// `weight × price_per_gram`.
    pub fn update(&mut self, field: AssetField, raw: impl IntoZakatDecimal) {
        self.warnings.clear();
        let name = field.field_name();
        let value = self.coerce(name, raw);

        let value = match field.kind() {
            FieldKind::Money | FieldKind::Weight => self.non_negative_input(name, value),
            FieldKind::Ratio => {
                let clamped = clamp_ratio(value);
                if clamped != value {
                    warn!(field = name, "liquid ratio {} clamped to {}", value, clamped);
                    self.warnings.push(
                        ZakatError::invalid(value.to_string(), "must be between 0 and 1").with_field(name),
                    );
                }
                clamped
            }
        };
        self.assets.set(field, value);

        if let Some(paired) = field.paired_value() {
            self.derive_metal_value(field, paired);
        }

        self.commit(false);
    }

    /// Sets one liability field from raw user input.
    pub fn update_liability(&mut self, field: LiabilityField, raw: impl IntoZakatDecimal) {
        self.warnings.clear();
        let name = field.field_name();
        let value = self.coerce(name, raw);
        let value = self.non_negative_input(name, value);
        self.liabilities.set(field, value);
        self.commit(false);
    }

    /// Sets `is_gold_for_investment` or `hawl_completed`.
    pub fn update_condition(&mut self, flag: ConditionFlag, value: bool) {
        self.warnings.clear();
        self.assets.set(flag, value);
        self.commit(false);
    }

    /// Sets `hawl_completed` from a holding-period tracker.
    pub fn update_hawl_from_dates(&mut self, tracker: &HawlTracker) {
        self.update_condition(ConditionFlag::HawlCompleted, tracker.is_satisfied());
    }

    /// Replaces both market prices and recomputes the Nisab.
    ///
    /// Metal values backed by a weight are re-derived at the new price so they
    /// never lag behind it.
    pub fn set_market_prices(&mut self, gold_price_per_gram: impl IntoZakatDecimal, silver_price_per_gram: impl IntoZakatDecimal) {
        self.warnings.clear();
        let gold = self.coerce("gold_price_per_gram", gold_price_per_gram);
        let gold = self.non_negative_input("gold_price_per_gram", gold);
        let silver = self.coerce("silver_price_per_gram", silver_price_per_gram);
        let silver = self.non_negative_input("silver_price_per_gram", silver);
        self.apply_prices(MarketPrices {
            gold_price_per_gram: gold,
            silver_price_per_gram: silver,
        });
        self.commit(true);
    }

    /// Fetches prices from a provider and applies them in one transition.
    ///
    /// A failed fetch leaves the engine untouched and notifies nobody.
    #[cfg(feature = "async")]
    pub async fn refresh_prices<P: crate::pricing::PriceProvider + ?Sized>(&mut self, provider: &P) -> Result<(), ZakatError> {
        let prices = provider.get_prices().await?;
        prices.validate()?;
        self.set_market_prices(prices.gold_price_per_gram, prices.silver_price_per_gram);
        Ok(())
    }

    /// Bulk-imports an external record, replacing the portfolio and liabilities.
    pub fn import_prefilled_values(&mut self, record: &Value) {
        self.warnings.clear();
        let (record, error) = PrefillRecord::from_value(record);
        self.warnings.extend(error);
        self.apply_record(&record);
    }

    /// Like [`import_prefilled_values`](Self::import_prefilled_values), but
    /// takes the raw JSON text of an extractor response.
    pub fn import_prefilled_json(&mut self, text: &str) {
        self.warnings.clear();
        let (record, error) = PrefillRecord::from_json_text(text);
        self.warnings.extend(error);
        self.apply_record(&record);
    }

    /// Imports an already-deserialized record.
    pub fn import_record(&mut self, record: &PrefillRecord) {
        self.warnings.clear();
        self.apply_record(record);
    }

    /// Returns the portfolio and liabilities to their defaults.
    ///
    /// Market prices and observers are kept.
    pub fn reset(&mut self) {
        self.warnings.clear();
        info!("resetting zakat inputs");
        self.assets = AssetPortfolio::with_liquid_ratio(self.config.stocks_liquid_ratio);
        self.liabilities = LiabilitySet::default();
        self.commit(false);
    }

    // ========== Internals ==========

    fn apply_record(&mut self, record: &PrefillRecord) {
        let PrefillOutcome {
            assets,
            liabilities,
            prices,
            prices_changed,
            warnings,
        } = record.apply(self.prices, self.config.stocks_liquid_ratio);

        info!(warnings = warnings.len(), prices_changed, "importing prefilled values");
        self.assets = assets;
        self.liabilities = liabilities;
        self.warnings.extend(warnings);
        if prices_changed {
            self.prices = prices;
        }
        self.commit(prices_changed);
    }

    fn apply_prices(&mut self, prices: MarketPrices) {
        self.prices = prices;
        for weight in [AssetField::GoldWeight, AssetField::SilverWeight] {
            if let Some(paired) = weight.paired_value()
                && self.assets.get(weight) > Decimal::ZERO
            {
                self.derive_metal_value(weight, paired);
            }
        }
    }

    fn derive_metal_value(&mut self, weight_field: AssetField, value_field: AssetField) {
        let price = match weight_field {
            AssetField::SilverWeight => self.prices.silver_price_per_gram,
            _ => self.prices.gold_price_per_gram,
        };
        let value = match self.assets.get(weight_field).checked_mul(price) {
            Some(v) => v,
            None => {
                let err = ZakatError::overflow(format!("{} = weight × price", value_field.field_name()));
                warn!("{}", err);
                self.warnings.push(err);
                Decimal::ZERO
            }
        };
        self.assets.set(value_field, value);
    }

    fn coerce(&mut self, name: &str, raw: impl IntoZakatDecimal) -> Decimal {
        match raw.into_zakat_decimal() {
            Ok(value) => value,
            Err(e) => {
                let e = e.with_field(name);
                warn!(field = name, "malformed input treated as zero: {}", e);
                self.warnings.push(e);
                Decimal::ZERO
            }
        }
    }

    fn non_negative_input(&mut self, name: &str, value: Decimal) -> Decimal {
        let (value, clamped) = non_negative(value);
        if clamped {
            warn!(field = name, "negative input treated as zero");
            self.warnings
                .push(ZakatError::invalid("negative", "must be non-negative").with_field(name));
        }
        value
    }

    /// Recomputes the snapshot and notifies every observer once.
    fn commit(&mut self, prices_changed: bool) {
        if prices_changed {
            self.nisab_threshold = self.prices.nisab_threshold();
            self.config.prices = self.prices;
        }
        self.result = self.compute();
        debug!(
            nisab = %self.result.nisab_threshold,
            net = %self.result.total_zakatable_wealth,
            eligible = self.result.is_eligible,
            zakat = %self.result.total_zakat,
            "zakat recomputed"
        );

        let result = &self.result;
        for (_, observer) in self.observers.iter_mut() {
            observer(result);
        }
        self.subscribers.retain(|(id, tx)| {
            let open = tx.send(result.clone()).is_ok();
            if !open {
                debug!(subscriber = ?id, "receiver dropped, unsubscribing");
            }
            open
        });
    }

    fn compute(&mut self) -> ZakatResult {
        let breakdown = match try_aggregate(&self.assets, &self.liabilities) {
            Ok(b) => b,
            Err(e) => {
                warn!("aggregation failed closed: {}", e);
                self.warnings.push(e);
                return ZakatResult {
                    nisab_threshold: self.nisab_threshold,
                    status_reason: Some("Arithmetic overflow; no Zakat computed".to_string()),
                    calculation_trace: vec![CalculationStep::info("Aggregation overflowed - result withheld")],
                    ..Default::default()
                };
            }
        };

        let net_wealth = breakdown.net_wealth;
        let eligibility = evaluate(net_wealth, self.nisab_threshold, &self.assets, self.config.hawl_policy);
        let total_zakat = compute_zakat(net_wealth, eligibility.is_eligible);

        let mut trace = breakdown.trace(&self.assets, &self.liabilities);
        if !self.prices.is_complete() {
            trace.push(CalculationStep::info("Market prices incomplete - Nisab may be understated"));
        }
        trace.push(CalculationStep::compare("Nisab Threshold", self.nisab_threshold));
        if self.assets.is_gold_for_investment {
            trace.push(CalculationStep::info("Gold held for investment"));
        }
        match (self.config.hawl_policy, self.assets.hawl_completed) {
            (_, true) => trace.push(CalculationStep::info("Hawl completed")),
            (HawlPolicy::Informational, false) => {
                trace.push(CalculationStep::info("Hawl not confirmed (not enforced)"))
            }
            (HawlPolicy::Required, false) => {}
        }
        if eligibility.is_eligible {
            trace.push(CalculationStep::rate("Applied Rate (2.5%)", ZAKAT_RATE));
            trace.push(CalculationStep::result("Zakat Due", total_zakat));
        } else {
            trace.push(CalculationStep::info(
                eligibility.reason.clone().unwrap_or_else(|| "No Zakat Due".to_string()),
            ));
        }

        ZakatResult {
            total_zakatable_wealth: net_wealth,
            total_zakat,
            is_eligible: eligibility.is_eligible,
            nisab_threshold: self.nisab_threshold,
            gross_assets: breakdown.gross_assets,
            total_liabilities: breakdown.total_liabilities,
            status_reason: eligibility.reason,
            calculation_trace: trace,
        }
    }
}
