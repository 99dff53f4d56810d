use chrono::{Duration, NaiveDate};
use sales_forecast::{logging, MemoryStore, SalesPredictor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let today = NaiveDate::from_ymd_opt(2024, 3, 31).ok_or("invalid date")?;
    let mut store = MemoryStore::new().with_reference_date(today);

    let cement = store.add_product("Cement", Some("50kg"), Some("Building"), 65_000)?;
    let sand = store.add_product("Sand", Some("1m3"), Some("Aggregate"), 250_000)?;
    let nails = store.add_product("Nails", Some("5cm"), Some("Hardware"), 30_000)?;

    // Sixty days of cement with a weekend bump, a few sand deliveries, no nails
    for day in 0..60 {
        let date = today - Duration::days(60 - day);
        let weekend_bump = if day % 7 >= 5 { 4.0 } else { 0.0 };
        store.add_sale(date, cement.id, 8.0 + weekend_bump, cement.unit_price)?;
    }
    for day in [3, 10, 17, 24] {
        store.add_sale(today - Duration::days(day), sand.id, 2.5, sand.unit_price)?;
    }

    let predictor = SalesPredictor::new(&store).with_today(today);

    for product in [&cement, &sand, &nails] {
        let forecast = predictor.predict_sales(product.id, 30)?;
        println!(
            "{:<8} {:<24} total {:>8.2}",
            product.name,
            forecast.method().map(|m| m.to_string()).unwrap_or_default(),
            forecast.total_quantity()
        );
    }

    println!();
    for rec in predictor.get_restock_recommendations()? {
        println!(
            "{:<8} order {:>5}  urgency {:<6} ({})",
            rec.product_name, rec.recommended_order, rec.urgency, rec.method
        );
    }

    Ok(())
}
