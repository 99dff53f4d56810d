//! Restock recommendations from 30-day demand forecasts

use crate::config::ForecastConfig;
use crate::data::{Product, SalesRepository};
use crate::error::Result;
use crate::models::{Confidence, DailyForecastPoint, Method};
use crate::predictor::SalesPredictor;
use sales_math::round_to;
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Priority of a restock recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Tier for an average daily demand
    pub fn from_daily_demand(average_daily: f64, config: &ForecastConfig) -> Self {
        if average_daily >= config.high_urgency_daily {
            Urgency::High
        } else if average_daily >= config.medium_urgency_daily {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    /// Sort rank, most urgent first
    fn rank(&self) -> u8 {
        match self {
            Urgency::High => 0,
            Urgency::Medium => 1,
            Urgency::Low => 2,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Urgency::High => "High",
            Urgency::Medium => "Medium",
            Urgency::Low => "Low",
        };
        f.write_str(label)
    }
}

/// Suggested reorder for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestockRecommendation {
    pub product_id: u32,
    pub product_name: String,
    pub variant: Option<String>,
    /// Predicted demand over the restock horizon, rounded to 2 decimals
    pub predicted_demand_30days: f64,
    /// Demand plus safety stock, in whole units
    pub recommended_order: u64,
    pub confidence: Confidence,
    pub method: Method,
    pub urgency: Urgency,
}

/// Build a recommendation from a product's demand forecast
///
/// Returns `None` when there is no forecast or no positive demand to cover.
pub fn recommend(
    product: &Product,
    points: &[DailyForecastPoint],
    config: &ForecastConfig,
) -> Option<RestockRecommendation> {
    let first = points.first()?;

    let total_predicted: f64 = points.iter().map(|p| p.predicted_quantity).sum();
    let safety_stock = total_predicted * config.safety_stock_ratio;
    let required_stock = total_predicted + safety_stock;
    if required_stock <= 0.0 {
        return None;
    }

    let average_daily = total_predicted / config.restock_horizon_days as f64;

    Some(RestockRecommendation {
        product_id: product.id,
        product_name: product.name.clone(),
        variant: product.variant.clone(),
        predicted_demand_30days: round_to(total_predicted, 2),
        recommended_order: required_stock.max(0.0).round() as u64,
        confidence: first.confidence,
        method: first.method,
        urgency: Urgency::from_daily_demand(average_daily, config),
    })
}

/// Most urgent first, then largest order; ties keep their input order
pub fn sort_recommendations(recommendations: &mut [RestockRecommendation]) {
    recommendations.sort_by(|a, b| {
        a.urgency
            .rank()
            .cmp(&b.urgency.rank())
            .then(b.recommended_order.cmp(&a.recommended_order))
    });
}

impl<R: SalesRepository> SalesPredictor<R> {
    /// Restock recommendations for every product with forecastable demand
    ///
    /// Products whose forecast fails or comes back empty are skipped.
    pub fn get_restock_recommendations(&self) -> Result<Vec<RestockRecommendation>> {
        let products = self.repository().products()?;
        let horizon = self.config().restock_horizon_days;

        let mut recommendations = Vec::new();
        for product in &products {
            let forecast = match self.predict_demand(product.id, horizon) {
                Ok(forecast) => forecast,
                Err(err) => {
                    warn!(product_id = product.id, error = %err, "skipping restock recommendation");
                    continue;
                }
            };

            if let Some(recommendation) = recommend(product, &forecast.daily, self.config()) {
                recommendations.push(recommendation);
            }
        }

        sort_recommendations(&mut recommendations);
        Ok(recommendations)
    }
}
