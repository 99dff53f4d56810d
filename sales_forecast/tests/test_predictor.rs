mod common;

use approx::assert_relative_eq;
use chrono::Duration;
use common::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::{
    Confidence, FallbackReason, ForecastOutcome, MemoryStore, Method, Product, SalesPredictor,
};

fn varied(n: usize) -> Vec<f64> {
    (0..n).map(|i| 2.0 + (i % 4) as f64).collect()
}

#[test]
fn test_empty_catalogue_uses_no_products_fallback() {
    let store = MemoryStore::new().with_reference_date(today());
    let predictor = SalesPredictor::new(&store).with_today(today());

    let forecast = predictor.predict_sales(7, 30).unwrap();

    assert_eq!(forecast.product, Product::unknown(7));
    assert_eq!(
        forecast.outcome,
        ForecastOutcome::Fallback {
            reason: FallbackReason::NoProducts
        }
    );
    assert_eq!(forecast.daily.len(), 30);
    assert_eq!(forecast.daily[0].method.to_string(), "fallback_no_products");
    // This fallback still aggregates by month
    let monthly = forecast.monthly.unwrap();
    assert_eq!(monthly[0].year_month, "2024-04");
    assert_relative_eq!(monthly[0].total_quantity, 30.0);
}

#[test]
fn test_scenario_a_product_without_sales() {
    let (store, cement) = cement_store();
    let predictor = SalesPredictor::new(&store).with_today(today());

    let forecast = predictor.predict_sales(cement.id, 30).unwrap();

    assert_eq!(forecast.daily.len(), 30);
    assert_eq!(forecast.product, cement);
    assert!(forecast.monthly.is_none());
    assert_eq!(
        forecast.outcome,
        ForecastOutcome::Fallback {
            reason: FallbackReason::NoSalesData
        }
    );
    for point in &forecast.daily {
        assert!(point.method.to_string().starts_with("fallback_"));
        assert_eq!(point.confidence, Confidence::Low);
        assert_eq!(point.predicted_quantity, 1.0);
        assert_eq!(point.product_name, "Cement");
        assert_eq!(point.variant.as_deref(), Some("50kg"));
    }
    let dates: Vec<_> = forecast.daily.iter().map(|p| p.date).collect();
    assert_contiguous_after(&dates, today());
}

#[test]
fn test_other_products_sales_use_no_product_sales_fallback() {
    let (mut store, cement) = cement_store();
    let sand = store.add_product("Sand", None, None, 250_000).unwrap();
    add_daily_sales(&mut store, sand.id, &[3.0, 4.0]);

    let predictor = SalesPredictor::new(&store).with_today(today());
    let forecast = predictor.predict_sales(cement.id, 10).unwrap();

    assert_eq!(
        forecast.daily[0].method,
        Method::Fallback(FallbackReason::NoProductSales)
    );
    assert_eq!(forecast.daily[0].method.to_string(), "fallback_no_product_sales");
    assert!(forecast.daily.iter().all(|p| p.predicted_quantity == 1.0));
    assert!(forecast.monthly.is_none());
}

#[test]
fn test_scenario_b_constant_sales_regress_to_constant() {
    let (mut store, cement) = cement_store();
    add_daily_sales(&mut store, cement.id, &[5.0; 35]);

    let predictor = SalesPredictor::new(&store).with_today(today());
    let forecast = predictor.predict_sales(cement.id, 30).unwrap();

    assert_eq!(forecast.outcome, ForecastOutcome::Modeled);
    assert_eq!(forecast.daily.len(), 30);
    for point in &forecast.daily {
        assert_eq!(point.method, Method::LinearRegression);
        assert_eq!(point.method.to_string(), "regresi_linear");
        assert_eq!(point.confidence, Confidence::High);
        assert_relative_eq!(point.predicted_quantity, 5.0, epsilon = 0.01);
    }

    // Anchored on the last sale (yesterday), not on today
    let last_sale = today() - Duration::days(1);
    let dates: Vec<_> = forecast.daily.iter().map(|p| p.date).collect();
    assert_contiguous_after(&dates, last_sale);

    let monthly = forecast.monthly.unwrap();
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0].year_month, "2024-03");
    assert_eq!(monthly[0].days, 1);
    assert_eq!(monthly[1].year_month, "2024-04");
    assert_eq!(monthly[1].days, 29);
}

#[test]
fn test_scenario_c_short_history_uses_simple_average() {
    let today = date(2024, 1, 20);
    let mut store = MemoryStore::new().with_reference_date(today);
    let cement = store.add_product("Cement", None, None, 65_000).unwrap();
    let quantities = [3.0, 4.0, 3.0, 4.0, 3.0, 4.0, 3.0, 4.0, 3.0, 3.0];
    for (i, &q) in quantities.iter().enumerate() {
        store
            .add_sale(date(2024, 1, 5) + Duration::days(i as i64), cement.id, q, 65_000)
            .unwrap();
    }

    let predictor = SalesPredictor::new(&store).with_today(today);
    let forecast = predictor.predict_sales(cement.id, 30).unwrap();

    assert_eq!(forecast.daily.len(), 30);
    for point in &forecast.daily {
        assert_eq!(point.predicted_quantity, 3.4);
        assert_eq!(point.method.to_string(), "rata_rata_sederhana");
        assert_eq!(point.confidence, Confidence::Medium);
    }
    let dates: Vec<_> = forecast.daily.iter().map(|p| p.date).collect();
    assert_contiguous_after(&dates, today);

    // Jan 21..=31 and Feb 1..=19
    let monthly = forecast.monthly.unwrap();
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0].year_month, "2024-01");
    assert_relative_eq!(monthly[0].total_quantity, 3.4 * 11.0, epsilon = 1e-9);
    assert_eq!(monthly[1].year_month, "2024-02");
    assert_relative_eq!(monthly[1].total_quantity, 3.4 * 19.0, epsilon = 1e-9);
    assert_relative_eq!(monthly[1].average_daily_quantity, 3.4, epsilon = 1e-9);
}

#[test]
fn test_simple_average_is_floored_at_one() {
    let (mut store, cement) = cement_store();
    add_daily_sales(&mut store, cement.id, &[0.2, 0.4, 0.3]);

    let predictor = SalesPredictor::new(&store).with_today(today());
    let forecast = predictor.predict_sales(cement.id, 5).unwrap();

    assert!(forecast.daily.iter().all(|p| p.predicted_quantity == 1.0));
    assert_eq!(forecast.method(), Some(Method::SimpleAverage));
}

#[rstest]
#[case(29, Method::SimpleAverage)]
#[case(30, Method::LinearRegression)]
fn test_strategy_boundary(#[case] rows: usize, #[case] expected: Method) {
    let (mut store, cement) = cement_store();
    add_daily_sales(&mut store, cement.id, &varied(rows));

    let predictor = SalesPredictor::new(&store).with_today(today());
    let forecast = predictor.predict_sales(cement.id, 30).unwrap();

    assert_eq!(forecast.method(), Some(expected));
    assert_eq!(forecast.outcome, ForecastOutcome::Modeled);
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(30)]
#[case(45)]
fn test_horizon_length_and_contiguity(#[case] days_ahead: usize) {
    let (mut store, cement) = cement_store();
    let sand = store.add_product("Sand", None, None, 250_000).unwrap();
    let nails = store.add_product("Nails", None, None, 30_000).unwrap();
    add_daily_sales(&mut store, cement.id, &varied(40));
    add_daily_sales(&mut store, sand.id, &varied(12));

    let predictor = SalesPredictor::new(&store).with_today(today());
    for product in [&cement, &sand, &nails] {
        let forecast = predictor.predict_sales(product.id, days_ahead).unwrap();
        assert_eq!(forecast.daily.len(), days_ahead);

        let anchor = if forecast.method() == Some(Method::LinearRegression) {
            today() - Duration::days(1)
        } else {
            today()
        };
        let dates: Vec<_> = forecast.daily.iter().map(|p| p.date).collect();
        assert_contiguous_after(&dates, anchor);
    }
}

#[test]
fn test_regression_predictions_are_never_negative() {
    let (mut store, cement) = cement_store();
    let spiky: Vec<f64> = (0..60)
        .map(|i| if i % 2 == 0 { 0.1 } else { 50.0 })
        .collect();
    add_daily_sales(&mut store, cement.id, &spiky);

    let predictor = SalesPredictor::new(&store).with_today(today());
    let forecast = predictor.predict_sales(cement.id, 60).unwrap();

    assert_eq!(forecast.method(), Some(Method::LinearRegression));
    for point in &forecast.daily {
        assert!(point.predicted_quantity >= 0.0);
        assert!(point.predicted_quantity.is_sign_positive());
        // Two-decimal rounding
        let cents = point.predicted_quantity * 100.0;
        assert!((cents - cents.round()).abs() < 1e-6);
    }
}

#[test]
fn test_unknown_product_recovers_with_not_found_fallback() {
    let (mut store, cement) = cement_store();
    add_daily_sales(&mut store, cement.id, &[3.0; 5]);

    let predictor = SalesPredictor::new(&store).with_today(today());
    let forecast = predictor.predict_sales(99, 30).unwrap();

    assert_eq!(forecast.product, Product::unknown(99));
    assert!(forecast.monthly.is_none());
    assert!(matches!(forecast.outcome, ForecastOutcome::Recovered { .. }));
    assert_eq!(
        forecast.daily[0].method.to_string(),
        "fallback_produk_tidak_ditemukan"
    );
    assert_eq!(forecast.daily.len(), 30);
    assert!(forecast.daily.iter().all(|p| p.confidence == Confidence::Low));
}

#[test]
fn test_recovery_moving_average_after_repository_hiccup() {
    let (mut store, cement) = cement_store();
    add_daily_sales(
        &mut store,
        cement.id,
        &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
    );
    let repo = FlakySalesData { inner: store };

    let predictor = SalesPredictor::new(&repo).with_today(today());
    let forecast = predictor.predict_sales(cement.id, 14).unwrap();

    match &forecast.outcome {
        ForecastOutcome::Recovered { cause } => assert!(cause.contains("connection reset")),
        other => panic!("expected recovery, got {:?}", other),
    }
    assert!(forecast.monthly.is_none());
    assert_eq!(forecast.daily.len(), 14);
    for point in &forecast.daily {
        assert_eq!(point.method.to_string(), "rata_rata_bergerak");
        assert_eq!(point.confidence, Confidence::Medium);
        // Mean of the last seven: 4..=10
        assert_eq!(point.predicted_quantity, 7.0);
    }
    let dates: Vec<_> = forecast.daily.iter().map(|p| p.date).collect();
    assert_contiguous_after(&dates, today() - Duration::days(1));
}

#[test]
fn test_recovery_short_history_uses_low_confidence_average() {
    let (mut store, cement) = cement_store();
    add_daily_sales(&mut store, cement.id, &[2.0, 2.0, 3.0, 3.0, 5.0]);
    let repo = FlakySalesData { inner: store };

    let predictor = SalesPredictor::new(&repo).with_today(today());
    let forecast = predictor.predict_sales(cement.id, 30).unwrap();

    assert!(forecast.monthly.is_none());
    for point in &forecast.daily {
        assert_eq!(point.method, Method::SimpleAverage);
        assert_eq!(point.confidence, Confidence::Low);
        assert_eq!(point.predicted_quantity, 3.0);
    }
    let dates: Vec<_> = forecast.daily.iter().map(|p| p.date).collect();
    assert_contiguous_after(&dates, today());
}

#[test]
fn test_recovery_without_recent_history_falls_back() {
    let (mut store, cement) = cement_store();
    store
        .add_sale(today() - Duration::days(120), cement.id, 8.0, 65_000)
        .unwrap();
    let repo = FlakySalesData { inner: store };

    let predictor = SalesPredictor::new(&repo).with_today(today());
    let forecast = predictor.predict_sales(cement.id, 30).unwrap();

    assert_eq!(
        forecast.daily[0].method,
        Method::Fallback(FallbackReason::NoSalesHistory)
    );
    assert_eq!(
        forecast.daily[0].method.to_string(),
        "fallback_tidak_ada_data_penjualan"
    );
    assert!(forecast.daily.iter().all(|p| p.predicted_quantity == 1.0));
}

#[test]
fn test_malformed_rows_recover_to_error_fallback() {
    let product = Product {
        id: 1,
        name: "Cement".to_string(),
        variant: None,
        category: None,
        unit_price: 65_000,
    };
    let mut sales: Vec<_> = (1..=5)
        .map(|i| raw_sale(i, today() - Duration::days(i as i64), 1, 2.0))
        .collect();
    sales.push(raw_sale(6, today() - Duration::days(6), 1, f64::NAN));
    let store = MemoryStore::with_records(vec![product], sales).with_reference_date(today());

    let predictor = SalesPredictor::new(&store).with_today(today());
    let forecast = predictor.predict_sales(1, 30).unwrap();

    match &forecast.outcome {
        ForecastOutcome::Recovered { cause } => assert!(cause.contains("non-finite")),
        other => panic!("expected recovery, got {:?}", other),
    }
    assert_eq!(forecast.daily[0].method.to_string(), "fallback_error");
    // Fallback averages the finite quantities of the last 30 days
    assert!(forecast.daily.iter().all(|p| p.predicted_quantity == 2.0));
    assert!(forecast.daily.iter().all(|p| p.confidence == Confidence::Low));
}

#[test]
fn test_repository_failure_on_recovery_path_propagates() {
    let predictor = SalesPredictor::new(Offline).with_today(today());

    let err = predictor.predict_sales(1, 30).unwrap_err();
    assert!(err.is_repository());
}

#[test]
fn test_predict_demand_matches_predict_sales() {
    let (mut store, cement) = cement_store();
    add_daily_sales(&mut store, cement.id, &varied(33));

    let predictor = SalesPredictor::new(&store).with_today(today());
    assert_eq!(
        predictor.predict_demand(cement.id, 30).unwrap(),
        predictor.predict_sales(cement.id, 30).unwrap()
    );
    assert_eq!(predictor.predict_default(cement.id).unwrap().daily.len(), 30);
}

#[test]
fn test_zero_horizon_yields_no_points_and_no_monthly() {
    let (mut store, cement) = cement_store();
    add_daily_sales(&mut store, cement.id, &[4.0; 3]);

    let predictor = SalesPredictor::new(&store).with_today(today());
    let forecast = predictor.predict_sales(cement.id, 0).unwrap();

    assert!(forecast.daily.is_empty());
    assert!(forecast.monthly.is_none());
}

#[test]
fn test_forecast_serializes_method_tags() {
    let (store, cement) = cement_store();
    let predictor = SalesPredictor::new(&store).with_today(today());
    let forecast = predictor.predict_sales(cement.id, 2).unwrap();

    let json = serde_json::to_value(&forecast).unwrap();
    assert_eq!(json["daily"][0]["method"], "fallback_no_sales_data");
    assert_eq!(json["daily"][0]["confidence"], "low");
    assert_eq!(json["outcome"]["kind"], "fallback");
    assert_eq!(json["outcome"]["reason"], "no_sales_data");
    assert!(json["monthly"].is_null());
}
