//! Bulk import of an externally extracted record (e.g. metrics pulled from a
//! financial statement) into the engine's inputs.
//!
//! Parsing is permissive. Missing values, `null` and the literal `"NaN"` the
//! extractor uses for "not found" all count as zero; anything else
//! unparseable also counts as zero but is reported as a warning. Unknown
//! fields are ignored and the import never rejects the whole record.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::assets::{AssetPortfolio, LiabilitySet, clamp_ratio};
use crate::inputs::{IntoZakatDecimal, non_negative};
use crate::pricing::MarketPrices;
use crate::types::ZakatError;

/// The recognised subset of an external record. Both snake_case and
/// camelCase keys are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PrefillRecord {
    pub cash: Option<Value>,
    #[serde(alias = "goldWeight")]
    pub gold_weight: Option<Value>,
    #[serde(alias = "goldValue")]
    pub gold_value: Option<Value>,
    #[serde(alias = "silverWeight")]
    pub silver_weight: Option<Value>,
    #[serde(alias = "silverValue")]
    pub silver_value: Option<Value>,
    #[serde(alias = "businessInventory")]
    pub business_inventory: Option<Value>,
    #[serde(alias = "businessCash")]
    pub business_cash: Option<Value>,
    #[serde(alias = "businessReceivables")]
    pub business_receivables: Option<Value>,
    #[serde(alias = "stocksValue")]
    pub stocks_value: Option<Value>,
    #[serde(alias = "stocksLiquidRatio")]
    pub stocks_liquid_ratio: Option<Value>,
    #[serde(alias = "agriculturalProduce")]
    pub agricultural_produce: Option<Value>,
    #[serde(alias = "shortTermLiabilities")]
    pub short_term_liabilities: Option<Value>,
    #[serde(alias = "businessLiabilities")]
    pub business_liabilities: Option<Value>,
    #[serde(alias = "personalLiabilities")]
    pub personal_liabilities: Option<Value>,
    /// Undeclared income, folded into cash on hand.
    pub income: Option<Value>,
    #[serde(alias = "goldForInvestment", alias = "is_gold_for_investment", alias = "isGoldForInvestment")]
    pub gold_for_investment: Option<Value>,
    #[serde(alias = "hawlCompleted")]
    pub hawl_completed: Option<Value>,
    #[serde(alias = "currentGoldPrice")]
    pub current_gold_price: Option<Value>,
    #[serde(alias = "currentSilverPrice")]
    pub current_silver_price: Option<Value>,
}

/// Everything an import produces; the engine applies it in one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefillOutcome {
    pub assets: AssetPortfolio,
    pub liabilities: LiabilitySet,
    pub prices: MarketPrices,
    pub prices_changed: bool,
    pub warnings: Vec<ZakatError>,
}

impl PrefillRecord {
    /// Reads the recognised fields from any JSON value. A value that is not an
    /// object imports as an empty record, with a warning.
    pub fn from_value(value: &Value) -> (Self, Option<ZakatError>) {
        match value {
            Value::Object(map) => match serde_json::from_value(Value::Object(canonical_keys(map))) {
                Ok(record) => (record, None),
                Err(e) => (Self::default(), Some(ZakatError::invalid(value.to_string(), e.to_string()).with_field("record"))),
            },
            Value::Null => (Self::default(), None),
            other => (
                Self::default(),
                Some(ZakatError::invalid(other.to_string(), "is not an object").with_field("record")),
            ),
        }
    }

    /// Parses the raw text of an extractor response. Markdown code fences
    /// and a leading `json` language tag are stripped first.
    pub fn from_json_text(text: &str) -> (Self, Option<ZakatError>) {
        let body = strip_code_fence(text);
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(e) => (
                Self::default(),
                Some(ZakatError::invalid(body.chars().take(64).collect::<String>(), e.to_string()).with_field("record")),
            ),
        }
    }

    /// Maps the record onto fresh inputs.
    ///
    /// `prices` are the engine's current prices, replaced by the record's
    /// `current_*_price` fields when those are present and positive.
    pub fn apply(&self, prices: MarketPrices, default_ratio: Decimal) -> PrefillOutcome {
        let mut warnings = Vec::new();
        let mut amount = |name: &str, raw: &Option<Value>| lenient_amount(name, raw, &mut warnings);

        let cash = amount("cash", &self.cash);
        let income = amount("income", &self.income);
        let gold_weight = amount("gold_weight", &self.gold_weight);
        let silver_weight = amount("silver_weight", &self.silver_weight);
        let business_inventory = amount("business_inventory", &self.business_inventory);
        let business_cash = amount("business_cash", &self.business_cash);
        let business_receivables = amount("business_receivables", &self.business_receivables);
        let stocks_value = amount("stocks_value", &self.stocks_value);
        let agricultural_produce = amount("agricultural_produce", &self.agricultural_produce);
        let liabilities = LiabilitySet {
            short_term_liabilities: amount("short_term_liabilities", &self.short_term_liabilities),
            business_liabilities: amount("business_liabilities", &self.business_liabilities),
            personal_liabilities: amount("personal_liabilities", &self.personal_liabilities),
        };

        let mut new_prices = prices;
        if let Some(gold) = optional_amount("current_gold_price", &self.current_gold_price, &mut warnings)
            && gold > Decimal::ZERO
        {
            new_prices.gold_price_per_gram = gold;
        }
        if let Some(silver) = optional_amount("current_silver_price", &self.current_silver_price, &mut warnings)
            && silver > Decimal::ZERO
        {
            new_prices.silver_price_per_gram = silver;
        }

        let gold_value = optional_amount("gold_value", &self.gold_value, &mut warnings)
            .unwrap_or_else(|| derive_value("gold_value", gold_weight, new_prices.gold_price_per_gram, &mut warnings));
        let silver_value = optional_amount("silver_value", &self.silver_value, &mut warnings)
            .unwrap_or_else(|| derive_value("silver_value", silver_weight, new_prices.silver_price_per_gram, &mut warnings));

        let stocks_liquid_ratio = optional_amount("stocks_liquid_ratio", &self.stocks_liquid_ratio, &mut warnings)
            .map(clamp_ratio)
            .unwrap_or(default_ratio);

        let cash = cash.checked_add(income).unwrap_or_else(|| {
            warnings.push(ZakatError::overflow("cash + income"));
            cash
        });

        let assets = AssetPortfolio {
            cash,
            gold_weight,
            gold_value,
            silver_weight,
            silver_value,
            business_inventory,
            business_cash,
            business_receivables,
            stocks_value,
            stocks_liquid_ratio,
            agricultural_produce,
            is_gold_for_investment: lenient_flag("gold_for_investment", &self.gold_for_investment, &mut warnings),
            hawl_completed: lenient_flag("hawl_completed", &self.hawl_completed, &mut warnings),
        };

        PrefillOutcome {
            assets,
            liabilities,
            prices_changed: new_prices != prices,
            prices: new_prices,
            warnings,
        }
    }
}

/// Accepted keys per field, snake_case name first.
const FIELD_KEYS: &[&[&str]] = &[
    &["cash"],
    &["gold_weight", "goldWeight"],
    &["gold_value", "goldValue"],
    &["silver_weight", "silverWeight"],
    &["silver_value", "silverValue"],
    &["business_inventory", "businessInventory"],
    &["business_cash", "businessCash"],
    &["business_receivables", "businessReceivables"],
    &["stocks_value", "stocksValue"],
    &["stocks_liquid_ratio", "stocksLiquidRatio"],
    &["agricultural_produce", "agriculturalProduce"],
    &["short_term_liabilities", "shortTermLiabilities"],
    &["business_liabilities", "businessLiabilities"],
    &["personal_liabilities", "personalLiabilities"],
    &["income"],
    &["gold_for_investment", "goldForInvestment", "is_gold_for_investment", "isGoldForInvestment"],
    &["hawl_completed", "hawlCompleted"],
    &["current_gold_price", "currentGoldPrice"],
    &["current_silver_price", "currentSilverPrice"],
];

/// Keeps one entry per recognised field under its snake_case name. When a
/// record spells the same field several ways, the first key in
/// [`FIELD_KEYS`] order wins; unknown keys are dropped.
fn canonical_keys(map: &Map<String, Value>) -> Map<String, Value> {
    FIELD_KEYS
        .iter()
        .filter_map(|keys| {
            keys.iter()
                .find_map(|key| map.get(*key))
                .map(|value| (keys[0].to_string(), value.clone()))
        })
        .collect()
}

fn strip_code_fence(text: &str) -> &str {
    let body = text.trim().trim_matches('`').trim();
    match body.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => body[4..].trim(),
        _ => body,
    }
}

fn is_missing_marker(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().eq_ignore_ascii_case("nan"),
        _ => false,
    }
}

/// A present, parseable, non-negative amount; `None` when absent or marked missing.
fn optional_amount(name: &str, raw: &Option<Value>, warnings: &mut Vec<ZakatError>) -> Option<Decimal> {
    let value = raw.as_ref().filter(|v| !is_missing_marker(v))?;
    match value.into_zakat_decimal() {
        Ok(amount) => {
            let (amount, clamped) = non_negative(amount);
            if clamped {
                warn!(field = name, "negative amount in prefill record treated as zero");
                warnings.push(ZakatError::invalid(value.to_string(), "must be non-negative").with_field(name));
            }
            Some(amount)
        }
        Err(e) => {
            warn!(field = name, "unparseable amount in prefill record: {}", e);
            warnings.push(e.with_field(name));
            None
        }
    }
}

fn lenient_amount(name: &str, raw: &Option<Value>, warnings: &mut Vec<ZakatError>) -> Decimal {
    optional_amount(name, raw, warnings).unwrap_or(Decimal::ZERO)
}

fn derive_value(name: &str, weight: Decimal, price_per_gram: Decimal, warnings: &mut Vec<ZakatError>) -> Decimal {
    weight.checked_mul(price_per_gram).unwrap_or_else(|| {
        warnings.push(ZakatError::overflow(format!("{} = weight × price", name)));
        Decimal::ZERO
    })
}

fn lenient_flag(name: &str, raw: &Option<Value>, warnings: &mut Vec<ZakatError>) -> bool {
    let Some(value) = raw else {
        return false;
    };
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => true,
            "false" | "no" | "n" | "0" | "" | "nan" => false,
            _ => {
                warnings.push(ZakatError::invalid(s.clone(), "is not a boolean").with_field(name));
                false
            }
        },
        other => {
            warnings.push(ZakatError::invalid(other.to_string(), "is not a boolean").with_field(name));
            false
        }
    }
}
