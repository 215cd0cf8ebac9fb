//! Input records: the zakatable asset portfolio and the deductible liabilities.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::zakat_fields;

/// Fraction of stock value treated as zakatable when nothing else is configured.
///
/// Only the liquid (cash-equivalent) portion of equity holdings is zakatable
/// under the modeled school of thought.
pub const DEFAULT_STOCKS_LIQUID_RATIO: Decimal = dec!(0.8);

/// Everything the user owns that may be subject to Zakat.
///
/// Monetary fields are in a single implicit currency; weights are in grams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AssetPortfolio {
    pub cash: Decimal,
    pub gold_weight: Decimal,
    pub gold_value: Decimal,
    pub silver_weight: Decimal,
    pub silver_value: Decimal,
    pub business_inventory: Decimal,
    pub business_cash: Decimal,
    pub business_receivables: Decimal,
    pub stocks_value: Decimal,
    /// Fraction of `stocks_value` considered zakatable, in `[0, 1]`.
    pub stocks_liquid_ratio: Decimal,
    pub agricultural_produce: Decimal,
    pub is_gold_for_investment: bool,
    /// Whether a full lunar year of continuous holding has passed.
    pub hawl_completed: bool,
}

impl Default for AssetPortfolio {
    fn default() -> Self {
        Self::with_liquid_ratio(DEFAULT_STOCKS_LIQUID_RATIO)
    }
}

impl AssetPortfolio {
    /// A zero-valued portfolio using the given stocks liquid ratio.
    pub fn with_liquid_ratio(stocks_liquid_ratio: Decimal) -> Self {
        Self {
            cash: Decimal::ZERO,
            gold_weight: Decimal::ZERO,
            gold_value: Decimal::ZERO,
            silver_weight: Decimal::ZERO,
            silver_value: Decimal::ZERO,
            business_inventory: Decimal::ZERO,
            business_cash: Decimal::ZERO,
            business_receivables: Decimal::ZERO,
            stocks_value: Decimal::ZERO,
            stocks_liquid_ratio,
            agricultural_produce: Decimal::ZERO,
            is_gold_for_investment: false,
            hawl_completed: false,
        }
    }
}

/// Debts deductible from gross assets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LiabilitySet {
    pub short_term_liabilities: Decimal,
    pub business_liabilities: Decimal,
    pub personal_liabilities: Decimal,
}

zakat_fields! {
    /// Selects one numeric field of an [`AssetPortfolio`].
    pub enum AssetField for AssetPortfolio: Decimal {
        Cash => cash,
        /// Updating the weight also re-derives `gold_value` from the gold price.
        GoldWeight => gold_weight,
        GoldValue => gold_value,
        /// Updating the weight also re-derives `silver_value` from the silver price.
        SilverWeight => silver_weight,
        SilverValue => silver_value,
        BusinessInventory => business_inventory,
        BusinessCash => business_cash,
        BusinessReceivables => business_receivables,
        StocksValue => stocks_value,
        StocksLiquidRatio => stocks_liquid_ratio,
        AgriculturalProduce => agricultural_produce,
    }
}

zakat_fields! {
    /// Selects one field of a [`LiabilitySet`].
    pub enum LiabilityField for LiabilitySet: Decimal {
        ShortTermLiabilities => short_term_liabilities,
        BusinessLiabilities => business_liabilities,
        PersonalLiabilities => personal_liabilities,
    }
}

zakat_fields! {
    /// Selects one condition flag of an [`AssetPortfolio`].
    pub enum ConditionFlag for AssetPortfolio: bool {
        IsGoldForInvestment => is_gold_for_investment,
        HawlCompleted => hawl_completed,
    }
}

/// How a numeric asset field is validated on update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A non-negative currency amount.
    Money,
    /// A non-negative weight in grams.
    Weight,
    /// A fraction clamped into `[0, 1]`.
    Ratio,
}

impl AssetField {
    pub fn kind(&self) -> FieldKind {
        match self {
            AssetField::GoldWeight | AssetField::SilverWeight => FieldKind::Weight,
            AssetField::StocksLiquidRatio => FieldKind::Ratio,
            _ => FieldKind::Money,
        }
    }

    /// The value field paired with a weight field.
    pub fn paired_value(&self) -> Option<AssetField> {
        match self {
            AssetField::GoldWeight => Some(AssetField::GoldValue),
            AssetField::SilverWeight => Some(AssetField::SilverValue),
            _ => None,
        }
    }
}

/// Clamps a liquid ratio into `[0, 1]`.
pub fn clamp_ratio(ratio: Decimal) -> Decimal {
    ratio.max(Decimal::ZERO).min(Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FieldAccess;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_default_portfolio_is_zero_with_default_ratio() {
        let p = AssetPortfolio::default();
        for field in AssetField::iter().filter(|f| *f != AssetField::StocksLiquidRatio) {
            assert_eq!(p.get(field), Decimal::ZERO, "{} should start at zero", field);
        }
        assert_eq!(p.stocks_liquid_ratio, dec!(0.8));
        assert!(!p.get(ConditionFlag::HawlCompleted));
        assert!(!p.get(ConditionFlag::IsGoldForInvestment));
    }

    #[test]
    fn test_field_names_parse_in_both_cases() {
        assert_eq!(AssetField::from_str("goldWeight").unwrap(), AssetField::GoldWeight);
        assert_eq!(AssetField::from_str("gold_weight").unwrap(), AssetField::GoldWeight);
        assert_eq!(AssetField::from_str(" CASH ").unwrap(), AssetField::Cash);
        assert_eq!(
            LiabilityField::from_str("shortTermLiabilities").unwrap(),
            LiabilityField::ShortTermLiabilities
        );
        assert_eq!(ConditionFlag::from_str("hawl_completed").unwrap(), ConditionFlag::HawlCompleted);
        assert!(AssetField::from_str("yachts").is_err());
    }

    #[test]
    fn test_field_display_is_camel_case() {
        assert_eq!(AssetField::BusinessReceivables.to_string(), "businessReceivables");
        assert_eq!(AssetField::BusinessReceivables.field_name(), "business_receivables");
        assert_eq!(
            serde_json::to_string(&LiabilityField::PersonalLiabilities).unwrap(),
            r#""personal_liabilities""#
        );
    }

    #[test]
    fn test_get_set_round_through_the_struct() {
        let mut p = AssetPortfolio::default();
        p.set(AssetField::StocksValue, dec!(10000));
        assert_eq!(p.stocks_value, dec!(10000));
        p.set(ConditionFlag::IsGoldForInvestment, true);
        assert!(p.is_gold_for_investment);

        let mut l = LiabilitySet::default();
        l.set(LiabilityField::BusinessLiabilities, dec!(250));
        assert_eq!(l.get(LiabilityField::BusinessLiabilities), dec!(250));
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(AssetField::GoldWeight.kind(), FieldKind::Weight);
        assert_eq!(AssetField::StocksLiquidRatio.kind(), FieldKind::Ratio);
        assert_eq!(AssetField::Cash.kind(), FieldKind::Money);
        assert_eq!(AssetField::SilverWeight.paired_value(), Some(AssetField::SilverValue));
        assert_eq!(AssetField::Cash.paired_value(), None);
    }

    #[test]
    fn test_clamp_ratio() {
        assert_eq!(clamp_ratio(dec!(1.5)), Decimal::ONE);
        assert_eq!(clamp_ratio(dec!(-0.2)), Decimal::ZERO);
        assert_eq!(clamp_ratio(dec!(0.35)), dec!(0.35));
    }
}
