//! Catalogue and sales records, and the data-access interface the engine reads them through

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable product identifier
pub type ProductId = u32;

/// Name given to products that cannot be resolved
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown";

/// A product in the retailer's catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Unit price in whole currency units
    pub unit_price: u64,
}

impl Product {
    /// Placeholder for an id that the catalogue does not know
    pub fn unknown(id: ProductId) -> Self {
        Self {
            id,
            name: UNKNOWN_PRODUCT_NAME.to_string(),
            variant: None,
            category: None,
            unit_price: 0,
        }
    }

    /// Name and variant, as shown in selection lists
    pub fn display_name(&self) -> String {
        match self.variant.as_deref() {
            Some(variant) if !variant.is_empty() => format!("{} - {}", self.name, variant),
            _ => self.name.clone(),
        }
    }
}

/// One sales transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: u64,
    pub date: NaiveDate,
    pub product_id: ProductId,
    /// Units sold; fractional units are allowed
    pub quantity: f64,
    /// Unit price at the time of sale
    pub unit_price: u64,
    /// `quantity * unit_price`, truncated to whole currency units
    pub total: u64,
}

/// A sale joined with the catalogue fields of its product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: SaleRecord,
    pub product_name: String,
    pub variant: Option<String>,
    pub category: Option<String>,
}

impl SaleDetail {
    /// Join a sale with its product
    pub fn new(sale: SaleRecord, product: &Product) -> Self {
        Self {
            sale,
            product_name: product.name.clone(),
            variant: product.variant.clone(),
            category: product.category.clone(),
        }
    }
}

/// Read access to products and sales
///
/// Implementations report connectivity or decoding problems as errors; an
/// empty catalogue or sales table is an empty `Vec`, never an error.
pub trait SalesRepository {
    /// All products, ordered by name
    fn products(&self) -> Result<Vec<Product>>;

    /// Look up a single product
    fn product_by_id(&self, id: ProductId) -> Result<Option<Product>>;

    /// All sales joined with product fields, newest first
    fn sales_data(&self) -> Result<Vec<SaleDetail>>;

    /// Sales restricted to one product and/or the last `days_back` days, oldest first
    fn sales_history(
        &self,
        product_id: Option<ProductId>,
        days_back: Option<u32>,
    ) -> Result<Vec<SaleRecord>>;
}

impl<T: SalesRepository + ?Sized> SalesRepository for &T {
    fn products(&self) -> Result<Vec<Product>> {
        (**self).products()
    }

    fn product_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        (**self).product_by_id(id)
    }

    fn sales_data(&self) -> Result<Vec<SaleDetail>> {
        (**self).sales_data()
    }

    fn sales_history(
        &self,
        product_id: Option<ProductId>,
        days_back: Option<u32>,
    ) -> Result<Vec<SaleRecord>> {
        (**self).sales_history(product_id, days_back)
    }
}
