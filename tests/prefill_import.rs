use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::{Arc, Mutex};
use zakat_engine::prelude::*;

fn engine() -> ZakatEngine {
    ZakatEngine::new(EngineConfig::new(dec!(485.03), dec!(20.50)).unwrap())
}

#[test]
fn test_import_extractor_record() {
    let mut engine = engine();
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    engine.on_result_changed(move |_| *counter.lock().unwrap() += 1);

    engine.import_prefilled_values(&json!({
        "cash": 8000.0,
        "gold_weight": "NaN",
        "gold_value": "NaN",
        "silver_weight": "NaN",
        "silver_value": "NaN",
        "business_cash": "NaN",
        "business_inventory": 2000,
        "business_receivables": "NaN",
        "business_liabilities": 500,
        "stocks_value": 5000,
        "stocks_liquid_ratio": "NaN",
        "agricultural_produce": "NaN",
        "short_term_liabilities": "NaN",
        "personal_liabilities": "NaN",
        "income": 1500,
        "hawl_completed": true,
        "gold_for_investment": false,
        "current_gold_price": "NaN",
        "current_silver_price": "NaN"
    }));

    // 8000 + 1500 income + 2000 inventory + 5000 × 0.8 - 500
    let result = engine.result();
    assert_eq!(engine.assets().cash, dec!(9500));
    assert_eq!(result.total_zakatable_wealth, dec!(15000));
    assert!(result.is_eligible);
    assert_eq!(result.total_zakat, dec!(375));
    assert!(engine.assets().hawl_completed);
    assert!(engine.warnings().is_empty());
    assert_eq!(*calls.lock().unwrap(), 1);
}

#[test]
fn test_import_replaces_previous_inputs() {
    let mut engine = engine();
    engine.update(AssetField::AgriculturalProduce, 99999);
    engine.update_liability(LiabilityField::PersonalLiabilities, 10);

    engine.import_prefilled_values(&json!({ "cash": 100 }));
    assert_eq!(engine.assets().agricultural_produce, Decimal::ZERO);
    assert_eq!(engine.liabilities().personal_liabilities, Decimal::ZERO);
    assert_eq!(engine.result().total_zakatable_wealth, dec!(100));
}

#[test]
fn test_import_with_prices_updates_nisab() {
    let mut engine = engine();
    engine.import_prefilled_values(&json!({
        "gold_weight": 100,
        "current_gold_price": 400,
        "current_silver_price": 5
    }));

    assert_eq!(engine.prices().gold_price_per_gram, dec!(400));
    // min(85 × 400, 595 × 5) = min(34000, 2975)
    assert_eq!(engine.result().nisab_threshold, dec!(2975));
    assert_eq!(engine.assets().gold_value, dec!(40000));
    assert_eq!(engine.result().total_zakat, dec!(1000));
}

#[test]
fn test_import_tolerates_junk() {
    let mut engine = engine();
    engine.import_prefilled_values(&json!({ "cash": { "nested": true }, "hawl_completed": "maybe" }));
    assert_eq!(engine.assets().cash, Decimal::ZERO);
    assert!(!engine.assets().hawl_completed);
    assert_eq!(engine.warnings().len(), 2);

    engine.import_prefilled_values(&json!("just a string"));
    assert_eq!(engine.warnings().len(), 1);
    assert_eq!(engine.result().total_zakat, Decimal::ZERO);
}

#[test]
fn test_import_fenced_json_text() {
    let mut engine = engine();
    engine.import_prefilled_json("```json\n{\"cash\": 20000, \"hawl_completed\": false}\n```");
    assert_eq!(engine.result().total_zakat, dec!(500));
    assert!(engine.warnings().is_empty());
}

#[test]
fn test_import_typed_record() {
    let mut engine = engine();
    let record = PrefillRecord {
        cash: Some(json!("20,000")),
        ..Default::default()
    };
    engine.import_record(&record);
    assert!(engine.result().is_eligible);
}
