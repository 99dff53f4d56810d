#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use sales_forecast::{
    ForecastError, MemoryStore, Product, ProductId, Result, SaleDetail, SaleRecord,
    SalesRepository,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Fixed "today" shared by the scenario tests (a Sunday)
pub fn today() -> NaiveDate {
    date(2024, 3, 31)
}

/// Store with reference date `today()` holding a single cement product
pub fn cement_store() -> (MemoryStore, Product) {
    let mut store = MemoryStore::new().with_reference_date(today());
    let cement = store
        .add_product("Cement", Some("50kg"), Some("Building"), 65_000)
        .unwrap();
    (store, cement)
}

/// One sale per day ending yesterday, oldest first
pub fn add_daily_sales(store: &mut MemoryStore, product_id: ProductId, quantities: &[f64]) {
    let n = quantities.len() as i64;
    for (i, &quantity) in quantities.iter().enumerate() {
        let sale_date = today() - Duration::days(n - i as i64);
        store.add_sale(sale_date, product_id, quantity, 1_000).unwrap();
    }
}

pub fn raw_sale(id: u64, date: NaiveDate, product_id: ProductId, quantity: f64) -> SaleRecord {
    SaleRecord {
        id,
        date,
        product_id,
        quantity,
        unit_price: 1_000,
        total: 0,
    }
}

pub fn assert_contiguous_after(dates: &[NaiveDate], anchor: NaiveDate) {
    for (i, d) in dates.iter().enumerate() {
        assert_eq!(*d, anchor + Duration::days(i as i64 + 1));
    }
}

/// Repository whose joined sales query fails while everything else works
pub struct FlakySalesData {
    pub inner: MemoryStore,
}

impl SalesRepository for FlakySalesData {
    fn products(&self) -> Result<Vec<Product>> {
        self.inner.products()
    }

    fn product_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        self.inner.product_by_id(id)
    }

    fn sales_data(&self) -> Result<Vec<SaleDetail>> {
        Err(ForecastError::RepositoryError("connection reset".to_string()))
    }

    fn sales_history(
        &self,
        product_id: Option<ProductId>,
        days_back: Option<u32>,
    ) -> Result<Vec<SaleRecord>> {
        self.inner.sales_history(product_id, days_back)
    }
}

/// Repository that cannot reach its database at all
pub struct Offline;

impl SalesRepository for Offline {
    fn products(&self) -> Result<Vec<Product>> {
        Err(ForecastError::RepositoryError("offline".to_string()))
    }

    fn product_by_id(&self, _id: ProductId) -> Result<Option<Product>> {
        Err(ForecastError::RepositoryError("offline".to_string()))
    }

    fn sales_data(&self) -> Result<Vec<SaleDetail>> {
        Err(ForecastError::RepositoryError("offline".to_string()))
    }

    fn sales_history(
        &self,
        _product_id: Option<ProductId>,
        _days_back: Option<u32>,
    ) -> Result<Vec<SaleRecord>> {
        Err(ForecastError::RepositoryError("offline".to_string()))
    }
}
