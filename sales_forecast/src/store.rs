//! Concrete `SalesRepository` implementations
//!
//! `MemoryStore` keeps products and sales in memory and answers every query
//! the engine needs. `DataLoader` fills one from a directory holding
//! `products.csv` and `sales.csv`.

use crate::data::{Product, ProductId, SaleDetail, SaleRecord, SalesRepository};
use crate::error::{ForecastError, Result};
use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

/// In-memory products and sales tables
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    products: Vec<Product>,
    sales: Vec<SaleRecord>,
    /// Date that `days_back` windows are measured from; today when unset
    reference_date: Option<NaiveDate>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from existing rows without re-validating them
    pub fn with_records(products: Vec<Product>, sales: Vec<SaleRecord>) -> Self {
        Self {
            products,
            sales,
            reference_date: None,
        }
    }

    /// Measure history windows from a fixed date instead of today
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Add a product and return it with its assigned id
    pub fn add_product(
        &mut self,
        name: &str,
        variant: Option<&str>,
        category: Option<&str>,
        unit_price: u64,
    ) -> Result<Product> {
        if name.trim().is_empty() {
            return Err(ForecastError::ValidationError(
                "Product name must not be empty".to_string(),
            ));
        }

        let id = self.products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let product = Product {
            id,
            name: name.to_string(),
            variant: variant.map(str::to_string),
            category: category.map(str::to_string),
            unit_price,
        };
        self.products.push(product.clone());
        Ok(product)
    }

    /// Record a sale of an existing product
    pub fn add_sale(
        &mut self,
        date: NaiveDate,
        product_id: ProductId,
        quantity: f64,
        unit_price: u64,
    ) -> Result<SaleRecord> {
        if !self.products.iter().any(|p| p.id == product_id) {
            return Err(ForecastError::ProductNotFound(product_id));
        }

        if !(quantity.is_finite() && quantity > 0.0) {
            return Err(ForecastError::ValidationError(format!(
                "Quantity must be positive, got {}",
                quantity
            )));
        }

        let id = self.sales.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let sale = SaleRecord {
            id,
            date,
            product_id,
            quantity,
            unit_price,
            total: (quantity * unit_price as f64) as u64,
        };
        self.sales.push(sale.clone());
        Ok(sale)
    }

    /// Number of recorded sales
    pub fn sales_count(&self) -> usize {
        self.sales.len()
    }

    fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

impl SalesRepository for MemoryStore {
    fn products(&self) -> Result<Vec<Product>> {
        let mut products = self.products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    fn product_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    fn sales_data(&self) -> Result<Vec<SaleDetail>> {
        let mut details: Vec<SaleDetail> = self
            .sales
            .iter()
            .filter_map(|sale| {
                self.products
                    .iter()
                    .find(|p| p.id == sale.product_id)
                    .map(|product| SaleDetail::new(sale.clone(), product))
            })
            .collect();
        details.sort_by(|a, b| b.sale.date.cmp(&a.sale.date));
        Ok(details)
    }

    fn sales_history(
        &self,
        product_id: Option<ProductId>,
        days_back: Option<u32>,
    ) -> Result<Vec<SaleRecord>> {
        let since = days_back.map(|days| self.reference_date() - Duration::days(days as i64));

        let mut history: Vec<SaleRecord> = self
            .sales
            .iter()
            .filter(|sale| product_id.map_or(true, |id| sale.product_id == id))
            .filter(|sale| since.map_or(true, |since| sale.date >= since))
            .cloned()
            .collect();
        history.sort_by_key(|sale| sale.date);
        Ok(history)
    }
}

#[derive(Debug, Deserialize)]
struct SaleRow {
    id: u64,
    date: NaiveDate,
    product_id: ProductId,
    quantity: f64,
    unit_price: u64,
    #[serde(default)]
    total: Option<u64>,
}

/// Loader for CSV exports of the products and sales tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load `products.csv` and `sales.csv` from a directory
    pub fn from_csv_dir<P: AsRef<Path>>(dir: P) -> Result<MemoryStore> {
        let dir = dir.as_ref();
        let products = Self::products_from_csv(dir.join("products.csv"))?;
        let sales = Self::sales_from_csv(dir.join("sales.csv"))?;

        for sale in &sales {
            if !products.iter().any(|p| p.id == sale.product_id) {
                return Err(ForecastError::DataError(format!(
                    "Sale {} references unknown product {}",
                    sale.id, sale.product_id
                )));
            }
        }

        tracing::debug!(
            products = products.len(),
            sales = sales.len(),
            dir = %dir.display(),
            "loaded sales tables"
        );
        Ok(MemoryStore::with_records(products, sales))
    }

    /// Load products from a CSV file with an `id,name,variant,category,unit_price` header
    pub fn products_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Product>> {
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);

        let mut products = Vec::new();
        for row in reader.deserialize() {
            let product: Product = row?;
            products.push(product);
        }
        Ok(products)
    }

    /// Load sales from a CSV file with an `id,date,product_id,quantity,unit_price[,total]` header
    pub fn sales_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<SaleRecord>> {
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);

        let mut sales = Vec::new();
        for row in reader.deserialize() {
            let row: SaleRow = row?;
            let total = row
                .total
                .unwrap_or((row.quantity * row.unit_price as f64) as u64);
            sales.push(SaleRecord {
                id: row.id,
                date: row.date,
                product_id: row.product_id,
                quantity: row.quantity,
                unit_price: row.unit_price,
                total,
            });
        }
        Ok(sales)
    }
}
