//! # Wealth aggregation
//!
//! Gold, silver, cash, trade goods, receivables, the liquid part of stocks and
//! agricultural produce are combined into a single pool before comparing with
//! the Nisab, then liabilities due are deducted. A deficit is not carried: the
//! net figure floors at zero.

use rust_decimal::Decimal;
use tracing::warn;

use crate::assets::{AssetPortfolio, LiabilitySet, clamp_ratio};
use crate::types::{CalculationStep, ZakatError};

/// The intermediate figures behind a net wealth value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WealthBreakdown {
    pub gross_assets: Decimal,
    pub total_liabilities: Decimal,
    /// `max(0, gross_assets - total_liabilities)`
    pub net_wealth: Decimal,
    /// `stocks_value × stocks_liquid_ratio`
    pub zakatable_stocks: Decimal,
}

impl WealthBreakdown {
    /// Trace steps for this breakdown, one per non-zero category.
    pub fn trace(&self, assets: &AssetPortfolio, liabilities: &LiabilitySet) -> Vec<CalculationStep> {
        let categories = [
            ("Cash", assets.cash),
            ("Gold Value", assets.gold_value),
            ("Silver Value", assets.silver_value),
            ("Business Inventory", assets.business_inventory),
            ("Business Cash", assets.business_cash),
            ("Business Receivables", assets.business_receivables),
            ("Agricultural Produce", assets.agricultural_produce),
        ];

        let mut trace = Vec::new();
        trace.push(CalculationStep::initial("Zakatable Assets", Decimal::ZERO));
        for (label, amount) in categories {
            if !amount.is_zero() {
                trace.push(CalculationStep::add(label, amount));
            }
        }
        if !assets.stocks_value.is_zero() {
            trace.push(CalculationStep::initial("Stocks Market Value", assets.stocks_value));
            trace.push(CalculationStep::multiply(
                "Stocks Liquid Ratio",
                clamp_ratio(assets.stocks_liquid_ratio),
            ));
            trace.push(CalculationStep::add("Zakatable Stocks", self.zakatable_stocks));
        }
        trace.push(CalculationStep::result("Gross Assets", self.gross_assets));

        let debts = [
            ("Short-Term Liabilities", liabilities.short_term_liabilities),
            ("Business Liabilities", liabilities.business_liabilities),
            ("Personal Liabilities", liabilities.personal_liabilities),
        ];
        for (label, amount) in debts {
            if !amount.is_zero() {
                trace.push(CalculationStep::subtract(label, amount));
            }
        }
        trace.push(CalculationStep::result("Net Zakatable Wealth", self.net_wealth));
        trace
    }
}

/// Coerces a category to a usable amount: negative values count as zero.
fn category(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

fn sum<I: IntoIterator<Item = Decimal>>(amounts: I, operation: &str) -> Result<Decimal, ZakatError> {
    amounts
        .into_iter()
        .map(category)
        .try_fold(Decimal::ZERO, |acc, x| acc.checked_add(x))
        .ok_or_else(|| ZakatError::overflow(operation))
}

/// Sums weighted asset categories and subtracts liabilities.
///
/// Fails only on arithmetic overflow.
pub fn try_aggregate(
    assets: &AssetPortfolio,
    liabilities: &LiabilitySet,
) -> Result<WealthBreakdown, ZakatError> {
    let zakatable_stocks = category(assets.stocks_value)
        .checked_mul(clamp_ratio(assets.stocks_liquid_ratio))
        .ok_or_else(|| ZakatError::overflow("stocks_value × stocks_liquid_ratio"))?;

    let gross_assets = sum(
        [
            assets.cash,
            assets.gold_value,
            assets.silver_value,
            assets.business_inventory,
            assets.business_cash,
            assets.business_receivables,
            zakatable_stocks,
            assets.agricultural_produce,
        ],
        "sum of assets",
    )?;

    let total_liabilities = sum(
        [
            liabilities.short_term_liabilities,
            liabilities.business_liabilities,
            liabilities.personal_liabilities,
        ],
        "sum of liabilities",
    )?;

    // Both operands are non-negative, so the subtraction cannot overflow.
    let net_wealth = (gross_assets - total_liabilities).max(Decimal::ZERO);

    Ok(WealthBreakdown {
        gross_assets,
        total_liabilities,
        net_wealth,
        zakatable_stocks,
    })
}

/// Net zakatable wealth. Never fails: an overflow degrades to zero.
pub fn aggregate(assets: &AssetPortfolio, liabilities: &LiabilitySet) -> Decimal {
    match try_aggregate(assets, liabilities) {
        Ok(breakdown) => breakdown.net_wealth,
        Err(e) => {
            warn!("wealth aggregation failed closed: {}", e);
            Decimal::ZERO
        }
    }
}
