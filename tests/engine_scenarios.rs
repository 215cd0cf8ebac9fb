use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};
use zakat_engine::prelude::*;

fn selangor_engine() -> ZakatEngine {
    // Gold 485.03/g, silver 20.50/g.
    ZakatEngine::new(EngineConfig::new(dec!(485.03), dec!(20.50)).expect("valid prices"))
}

#[test]
fn test_scenario_a_nisab_takes_the_lower_metal() {
    let engine = selangor_engine();
    // min(85 × 485.03, 595 × 20.50) = min(41227.55, 12197.50)
    assert_eq!(engine.result().nisab_threshold, dec!(12197.50));
}

#[test]
fn test_scenario_b_cash_above_nisab() {
    let mut engine = selangor_engine();
    engine.update(AssetField::Cash, 20000);

    let result = engine.result();
    assert!(result.is_eligible);
    assert_eq!(result.total_zakatable_wealth, dec!(20000));
    assert_eq!(result.total_zakat, dec!(500.00));
    assert_eq!(result.format_amount(), "500.00");
}

#[test]
fn test_scenario_c_cash_below_nisab() {
    let mut engine = selangor_engine();
    engine.update(AssetField::Cash, "5,000");

    let result = engine.result();
    assert!(!result.is_eligible);
    assert_eq!(result.total_zakat, Decimal::ZERO);
    assert_eq!(result.status_reason.as_deref(), Some("Net wealth below Nisab"));
}

#[test]
fn test_scenario_d_stocks_use_liquid_ratio() {
    let mut engine = selangor_engine();
    engine.update(AssetField::StocksValue, 10000);
    assert_eq!(engine.result().total_zakatable_wealth, dec!(8000));
    assert!(!engine.result().is_eligible);

    // Stocks push otherwise-exempt cash over the Nisab.
    engine.update(AssetField::Cash, 5000);
    assert_eq!(engine.result().total_zakatable_wealth, dec!(13000));
    assert!(engine.result().is_eligible);
    assert_eq!(engine.result().total_zakat, dec!(325));
}

#[test]
fn test_mixed_portfolio_with_liabilities() {
    let mut engine = selangor_engine();
    engine.update(AssetField::Cash, 4000);
    engine.update(AssetField::GoldWeight, 10); // 4850.30
    engine.update(AssetField::BusinessInventory, 3000);
    engine.update(AssetField::BusinessReceivables, 1500);
    engine.update(AssetField::AgriculturalProduce, 800);
    engine.update_liability(LiabilityField::BusinessLiabilities, 1000);
    engine.update_liability(LiabilityField::PersonalLiabilities, 500);

    let result = engine.result();
    assert_eq!(result.gross_assets, dec!(14150.30));
    assert_eq!(result.total_liabilities, dec!(1500));
    assert_eq!(result.total_zakatable_wealth, dec!(12650.30));
    assert!(result.is_eligible);
    assert_eq!(result.total_zakat, dec!(316.2575));
}

#[test]
fn test_liabilities_can_drop_below_nisab() {
    let mut engine = selangor_engine();
    engine.update(AssetField::Cash, 13000);
    assert!(engine.result().is_eligible);

    engine.update_liability(LiabilityField::ShortTermLiabilities, 2000);
    assert!(!engine.result().is_eligible);
    assert_eq!(engine.result().total_zakat, Decimal::ZERO);
}

#[test]
fn test_deficit_is_not_negative() {
    let mut engine = selangor_engine();
    engine.update(AssetField::Cash, 100);
    engine.update_liability(LiabilityField::PersonalLiabilities, 10000);
    assert_eq!(engine.result().total_zakatable_wealth, Decimal::ZERO);
}

#[test]
fn test_price_update_recomputes_nisab_and_eligibility() {
    let mut engine = selangor_engine();
    engine.update(AssetField::Cash, 13000);
    assert!(engine.result().is_eligible);

    // Silver doubles: silver Nisab 24395, gold Nisab 41227.55.
    engine.set_market_prices(dec!(485.03), dec!(41.00));
    assert_eq!(engine.result().nisab_threshold, dec!(24395.00));
    assert!(!engine.result().is_eligible);
}

#[test]
fn test_observer_receives_consistent_snapshots() {
    let mut engine = selangor_engine();
    let seen: Arc<Mutex<Vec<ZakatResult>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    engine.on_result_changed(move |result| sink.lock().unwrap().push(result.clone()));

    engine.update(AssetField::Cash, 20000);
    engine.set_market_prices(1000, 100);
    engine.reset();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].total_zakat, dec!(500));
    // Nisab = min(85000, 59500)
    assert_eq!(seen[1].nisab_threshold, dec!(59500));
    assert!(!seen[1].is_eligible);
    assert_eq!(seen[2].total_zakatable_wealth, Decimal::ZERO);
    for snapshot in seen.iter() {
        let expected = if snapshot.is_eligible {
            snapshot.total_zakatable_wealth * ZAKAT_RATE
        } else {
            Decimal::ZERO
        };
        assert_eq!(snapshot.total_zakat, expected);
    }
}

#[test]
fn test_reset_law() {
    let mut engine = selangor_engine();
    engine.update(AssetField::Cash, 50000);
    engine.update(AssetField::StocksLiquidRatio, 0.5);
    engine.update_condition(ConditionFlag::HawlCompleted, true);
    engine.update_liability(LiabilityField::BusinessLiabilities, 10);
    engine.reset();

    let result = engine.result();
    assert_eq!(result.total_zakat, Decimal::ZERO);
    assert!(!result.is_eligible);
    assert_eq!(engine.assets(), &AssetPortfolio::default());
    assert_eq!(engine.liabilities(), &LiabilitySet::default());
    // Prices survive a reset.
    assert_eq!(result.nisab_threshold, dec!(12197.50));
}

#[test]
fn test_result_is_idempotent() {
    let mut engine = selangor_engine();
    engine.update(AssetField::Cash, "20,000.10");
    let first = engine.result().clone();
    let second = engine.result().clone();
    assert_eq!(first, second);

    // Re-entering the same value yields the identical snapshot.
    engine.update(AssetField::Cash, "20,000.10");
    assert_eq!(engine.result(), &first);
}

#[test]
fn test_every_keystroke_is_tolerated() {
    let mut engine = selangor_engine();
    for keystroke in ["", "1", "12", "12,", "12,3", "12,34", "12,345", "12,345.", "12,345.6", "-", "abc", "1e", "1e4"] {
        engine.update(AssetField::Cash, keystroke);
        let result = engine.result();
        assert!(result.total_zakatable_wealth >= Decimal::ZERO);
        assert_eq!(result.is_eligible, result.total_zakatable_wealth >= result.nisab_threshold);
    }
    assert_eq!(engine.assets().cash, dec!(10000));
}

#[test]
fn test_gold_for_investment_is_informational() {
    let mut engine = selangor_engine();
    engine.update(AssetField::GoldWeight, 30);
    let before = engine.result().total_zakat;
    engine.update_condition(ConditionFlag::IsGoldForInvestment, true);
    assert_eq!(engine.result().total_zakat, before);
    assert!(engine
        .result()
        .calculation_trace
        .iter()
        .any(|step| step.description == "Gold held for investment"));
}

#[test]
fn test_field_names_from_host_form() {
    let mut engine = selangor_engine();
    let field: AssetField = "businessCash".parse().unwrap();
    engine.update(field, "15000");
    assert_eq!(engine.assets().business_cash, dec!(15000));
    assert!(engine.result().is_eligible);
}

#[test]
fn test_explain_output() {
    let mut engine = selangor_engine();
    engine.update(AssetField::Cash, 20000);
    let text = engine.result().explain();
    assert!(text.contains("Cash"));
    assert!(text.contains("Nisab Threshold"));
    assert!(text.contains("Status: PAYABLE"));
    assert!(text.contains("Amount Due: 500.00"));
}
