//! Sales summaries for dashboards and reports
//!
//! These are plain aggregations over joined sales rows. `sales_trends` is the
//! only one that goes through the repository; the rest take rows the caller
//! already fetched.

use crate::data::{Product, ProductId, SaleDetail, SalesRepository};
use crate::error::Result;
use crate::monthly::MonthlyForecast;
use crate::predictor::SalesPredictor;
use crate::utils::{month_start, next_month_start, year_month_key};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Monthly quantity totals and best-selling products
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesTrends {
    /// (`YYYY-MM`, quantity sold), ascending by month
    pub monthly_quantity: Vec<(String, f64)>,
    /// (product id, quantity sold), largest first
    pub top_products: Vec<(ProductId, f64)>,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_products: usize,
    pub total_transactions: usize,
    pub total_revenue: u64,
}

/// Sales between two dates with their totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub rows: Vec<SaleDetail>,
    pub transactions: usize,
    pub revenue: u64,
    /// Whole-unit mean revenue per transaction, 0 without transactions
    pub average_per_transaction: u64,
}

/// ABC class of a product by cumulative revenue share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

/// Revenue contribution of one product variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPerformance {
    pub product_name: String,
    pub variant: Option<String>,
    pub revenue: u64,
    pub share: f64,
    pub cumulative_share: f64,
    pub class: AbcClass,
}

/// Flat projection for one future month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyProjection {
    pub year_month: String,
    pub quantity: i64,
}

/// Gross revenue implied by a monthly forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueProjection {
    pub year_month: String,
    pub total_quantity: f64,
    pub average_daily_quantity: f64,
    pub revenue: f64,
}

impl<R: SalesRepository> SalesPredictor<R> {
    /// Monthly totals and top products across all sales, `None` without sales
    pub fn sales_trends(&self) -> Result<Option<SalesTrends>> {
        let sales = self.repository().sales_data()?;
        if sales.is_empty() {
            return Ok(None);
        }

        let mut monthly: BTreeMap<String, f64> = BTreeMap::new();
        let mut per_product: Vec<(ProductId, f64)> = Vec::new();
        for detail in &sales {
            *monthly.entry(year_month_key(detail.sale.date)).or_insert(0.0) += detail.sale.quantity;

            match per_product.iter_mut().find(|(id, _)| *id == detail.sale.product_id) {
                Some((_, total)) => *total += detail.sale.quantity,
                None => per_product.push((detail.sale.product_id, detail.sale.quantity)),
            }
        }

        per_product.sort_by(|a, b| b.1.total_cmp(&a.1));
        per_product.truncate(self.config().top_products);

        Ok(Some(SalesTrends {
            monthly_quantity: monthly.into_iter().collect(),
            top_products: per_product,
        }))
    }
}

/// Product count, transaction count and total revenue
pub fn dashboard_summary(products: &[Product], sales: &[SaleDetail]) -> DashboardSummary {
    DashboardSummary {
        total_products: products.len(),
        total_transactions: sales.len(),
        total_revenue: sales.iter().map(|d| d.sale.total).sum(),
    }
}

/// Revenue per `YYYY-MM`, ascending by month
pub fn monthly_revenue(sales: &[SaleDetail]) -> Vec<(String, u64)> {
    let mut monthly: BTreeMap<String, u64> = BTreeMap::new();
    for detail in sales {
        *monthly.entry(year_month_key(detail.sale.date)).or_insert(0) += detail.sale.total;
    }
    monthly.into_iter().collect()
}

/// Best-selling product names by quantity, largest first
pub fn top_products_by_quantity(sales: &[SaleDetail], n: usize) -> Vec<(String, f64)> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for detail in sales {
        *totals.entry(detail.product_name.as_str()).or_insert(0.0) += detail.sale.quantity;
    }

    let mut ranked: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(name, quantity)| (name.to_string(), quantity))
        .collect();
    // Name breaks ties so the order does not depend on hashing
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

/// Sales dated within `from..=to` and their totals
pub fn sales_report(sales: &[SaleDetail], from: NaiveDate, to: NaiveDate) -> SalesReport {
    let rows: Vec<SaleDetail> = sales
        .iter()
        .filter(|d| d.sale.date >= from && d.sale.date <= to)
        .cloned()
        .collect();

    let transactions = rows.len();
    let revenue: u64 = rows.iter().map(|d| d.sale.total).sum();
    let average_per_transaction = if transactions > 0 {
        revenue / transactions as u64
    } else {
        0
    };

    SalesReport {
        from,
        to,
        rows,
        transactions,
        revenue,
        average_per_transaction,
    }
}

/// Revenue ranking with ABC classes over sales dated within `from..=to`
///
/// Classes follow cumulative share: A up to 80%, B up to 95%, C beyond.
pub fn product_performance(
    sales: &[SaleDetail],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<ProductPerformance> {
    let mut revenue: Vec<((String, Option<String>), u64)> = Vec::new();
    for detail in sales
        .iter()
        .filter(|d| d.sale.date >= from && d.sale.date <= to)
    {
        let key = (detail.product_name.clone(), detail.variant.clone());
        match revenue.iter_mut().find(|(k, _)| *k == key) {
            Some((_, total)) => *total += detail.sale.total,
            None => revenue.push((key, detail.sale.total)),
        }
    }
    revenue.sort_by(|a, b| b.1.cmp(&a.1));

    let grand_total: u64 = revenue.iter().map(|(_, total)| total).sum();
    let mut cumulative = 0.0;
    revenue
        .into_iter()
        .map(|((product_name, variant), total)| {
            let share = if grand_total > 0 {
                total as f64 / grand_total as f64
            } else {
                0.0
            };
            cumulative += share;
            let class = if cumulative <= 0.80 {
                AbcClass::A
            } else if cumulative <= 0.95 {
                AbcClass::B
            } else {
                AbcClass::C
            };

            ProductPerformance {
                product_name,
                variant,
                revenue: total,
                share,
                cumulative_share: cumulative,
                class,
            }
        })
        .collect()
}

/// Project the mean of the last three monthly totals over `horizon_months`
///
/// Months start after the last month with sales of `product_name`, or at the
/// month of `today` when the product has none.
pub fn monthly_average_projection(
    sales: &[SaleDetail],
    product_name: &str,
    horizon_months: usize,
    today: NaiveDate,
) -> Vec<MonthlyProjection> {
    let mut monthly: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for detail in sales.iter().filter(|d| d.product_name == product_name) {
        *monthly.entry(month_start(detail.sale.date)).or_insert(0.0) += detail.sale.quantity;
    }

    let recent: Vec<f64> = monthly.values().rev().take(3).copied().collect();
    let average = if recent.is_empty() {
        0.0
    } else {
        recent.iter().sum::<f64>() / recent.len() as f64
    };

    let mut month = match monthly.keys().next_back() {
        Some(last) => next_month_start(*last),
        None => month_start(today),
    };

    let mut projections = Vec::with_capacity(horizon_months);
    for _ in 0..horizon_months {
        projections.push(MonthlyProjection {
            year_month: year_month_key(month),
            quantity: average.round() as i64,
        });
        month = next_month_start(month);
    }
    projections
}

/// Gross revenue per forecast month at the product's current unit price
pub fn projected_revenue(monthly: &[MonthlyForecast], unit_price: u64) -> Vec<RevenueProjection> {
    monthly
        .iter()
        .map(|m| RevenueProjection {
            year_month: m.year_month.clone(),
            total_quantity: m.total_quantity,
            average_daily_quantity: m.average_daily_quantity,
            revenue: m.total_quantity * unit_price as f64,
        })
        .collect()
}
