use rust_decimal_macros::dec;
use zakat_engine::prelude::*;

// Environment variables are process-wide, so every env case lives in this one test.
#[test]
fn test_config_from_env() {
    let vars = ["ZAKAT_GOLD_PRICE", "ZAKAT_SILVER_PRICE", "ZAKAT_STOCKS_LIQUID_RATIO", "ZAKAT_HAWL_POLICY"];
    for var in vars {
        unsafe { std::env::remove_var(var) };
    }

    let missing = EngineConfig::from_env();
    assert!(matches!(missing, Err(ZakatError::MissingConfig { ref field }) if field == "ZAKAT_GOLD_PRICE"));

    unsafe {
        std::env::set_var("ZAKAT_GOLD_PRICE", "485.03");
        std::env::set_var("ZAKAT_SILVER_PRICE", "20.50");
    }
    let config = EngineConfig::from_env().unwrap();
    assert_eq!(config.nisab_threshold(), dec!(12197.50));
    assert_eq!(config.stocks_liquid_ratio, dec!(0.8));

    unsafe {
        std::env::set_var("ZAKAT_STOCKS_LIQUID_RATIO", "0.5");
        std::env::set_var("ZAKAT_HAWL_POLICY", "required");
    }
    let config = EngineConfig::from_env().unwrap();
    assert_eq!(config.stocks_liquid_ratio, dec!(0.5));
    assert_eq!(config.hawl_policy, HawlPolicy::Required);

    unsafe { std::env::set_var("ZAKAT_HAWL_POLICY", "whenever") };
    assert!(EngineConfig::from_env().is_err());

    for var in vars {
        unsafe { std::env::remove_var(var) };
    }
}

#[test]
fn test_engine_starts_with_configured_ratio() {
    let config = EngineConfig::builder()
        .gold_price(dec!(485.03))
        .silver_price(dec!(20.50))
        .stocks_liquid_ratio(dec!(0.5))
        .build()
        .unwrap();
    let mut engine = ZakatEngine::new(config);
    engine.update(AssetField::StocksValue, 10000);
    assert_eq!(engine.result().total_zakatable_wealth, dec!(5000));

    engine.update(AssetField::StocksLiquidRatio, 1);
    engine.reset();
    assert_eq!(engine.assets().stocks_liquid_ratio, dec!(0.5));
}

#[test]
fn test_engine_without_prices() {
    let mut engine = ZakatEngine::default();
    engine.update(AssetField::Cash, 100);
    let result = engine.result();
    assert_eq!(result.nisab_threshold, dec!(0));
    assert!(
        result
            .calculation_trace
            .iter()
            .any(|step| step.description.starts_with("Market prices incomplete"))
    );
}

#[test]
fn test_result_schema_is_generated() {
    let schema = schemars::schema_for!(ZakatResult);
    let json = serde_json::to_string(&schema).unwrap();
    assert!(json.contains("total_zakatable_wealth"));
    assert!(json.contains("nisab_threshold"));
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_refresh_prices_from_provider() {
    let mut engine = ZakatEngine::default();
    let (_, rx) = engine.subscribe();
    engine.update(AssetField::Cash, 20000);

    let provider = StaticPriceProvider::new(dec!(485.03), dec!(20.50)).unwrap();
    engine.refresh_prices(&provider).await.unwrap();

    assert_eq!(engine.result().nisab_threshold, dec!(12197.50));
    assert_eq!(engine.result().total_zakat, dec!(500));
    assert_eq!(rx.try_iter().count(), 2);

    let config = EngineConfig::from_provider(&provider).await.unwrap();
    assert_eq!(config.prices, engine.prices());
}
