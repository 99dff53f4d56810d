//! Data behind the history-plus-forecast chart

use crate::data::{ProductId, SalesRepository};
use crate::error::Result;
use crate::models::{Confidence, Method};
use crate::predictor::SalesPredictor;
use chrono::NaiveDate;
use serde::Serialize;

/// Display name used when the product cannot be looked up
const DEFAULT_CHART_TITLE: &str = "Product";

/// A single (date, quantity) point on the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub quantity: f64,
}

/// Recent sales and the forecast that follows them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesChartData {
    pub product_name: String,
    pub history: Vec<ChartPoint>,
    pub forecast: Vec<ChartPoint>,
    pub method: Method,
    pub method_label: String,
    pub confidence: Confidence,
}

impl<R: SalesRepository> SalesPredictor<R> {
    /// Chart data for a product, or `None` without recent history or forecast
    pub fn chart_data(
        &self,
        product_id: ProductId,
        days_ahead: usize,
    ) -> Result<Option<SalesChartData>> {
        let mut history = self
            .repository()
            .sales_history(Some(product_id), Some(self.config().chart_history_days))?;
        if history.is_empty() {
            return Ok(None);
        }
        history.sort_by_key(|sale| sale.date);

        let forecast = self.predict_sales(product_id, days_ahead)?;
        let first = match forecast.daily.first() {
            Some(point) => point,
            None => return Ok(None),
        };
        let (method, confidence) = (first.method, first.confidence);

        let product_name = self
            .repository()
            .product_by_id(product_id)?
            .map(|p| p.name)
            .unwrap_or_else(|| DEFAULT_CHART_TITLE.to_string());

        Ok(Some(SalesChartData {
            product_name,
            history: history
                .iter()
                .map(|sale| ChartPoint {
                    date: sale.date,
                    quantity: sale.quantity,
                })
                .collect(),
            forecast: forecast
                .daily
                .iter()
                .map(|point| ChartPoint {
                    date: point.date,
                    quantity: point.predicted_quantity,
                })
                .collect(),
            method,
            method_label: method.label().to_string(),
            confidence,
        }))
    }
}
