//! Vendor performance metrics derived from purchase orders.
//!
//! All four numbers are recomputed from a full scan of the vendor's orders;
//! nothing here touches the database.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{purchase_order::Model as PurchaseOrderModel, vendor};

/// The four metrics stored on a vendor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VendorPerformance {
    /// Share of completed orders delivered on or before `delivery_date` (0..=1)
    pub on_time_delivery_rate: f64,
    /// Mean quality rating of completed, rated orders (0..=5)
    pub quality_rating_avg: f64,
    /// Mean seconds between issue and acknowledgment
    pub average_response_time: f64,
    /// Share of all orders that reached `completed` (0..=1)
    pub fulfillment_rate: f64,
}

impl From<&vendor::Model> for VendorPerformance {
    fn from(vendor: &vendor::Model) -> Self {
        Self {
            on_time_delivery_rate: vendor.on_time_delivery_rate,
            quality_rating_avg: vendor.quality_rating_avg,
            average_response_time: vendor.average_response_time,
            fulfillment_rate: vendor.fulfillment_rate,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub fn compute_vendor_performance(orders: &[PurchaseOrderModel]) -> VendorPerformance {
    let completed: Vec<&PurchaseOrderModel> = orders.iter().filter(|o| o.is_completed()).collect();

    let on_time = completed
        .iter()
        .filter(|o| matches!(o.completed_at, Some(done) if done <= o.delivery_date))
        .count();

    let ratings: Vec<f64> = completed.iter().filter_map(|o| o.quality_rating).collect();

    let response_times: Vec<f64> = orders
        .iter()
        .filter_map(|o| {
            o.acknowledgment_date.map(|ack| {
                let millis = (ack - o.issue_date).num_milliseconds().max(0);
                millis as f64 / 1000.0
            })
        })
        .collect();

    VendorPerformance {
        on_time_delivery_rate: ratio(on_time, completed.len()),
        quality_rating_avg: mean(&ratings),
        average_response_time: mean(&response_times),
        fulfillment_rate: ratio(completed.len(), orders.len()),
    }
}
