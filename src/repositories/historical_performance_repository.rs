use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;

use crate::entities::historical_performance::{
    ActiveModel as HistoricalPerformanceActiveModel, Column, Entity as HistoricalPerformance,
    Model as HistoricalPerformanceModel,
};
use crate::errors::ServiceError;
use crate::repositories::Repository;
use crate::services::performance::VendorPerformance;

use super::BaseRepository;

/// Append-only store of vendor metric snapshots
#[derive(Debug, Clone)]
pub struct HistoricalPerformanceRepository {
    base: BaseRepository,
}

impl HistoricalPerformanceRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn append(
        &self,
        db: &impl ConnectionTrait,
        vendor_id: i32,
        date: DateTime<Utc>,
        performance: &VendorPerformance,
    ) -> Result<HistoricalPerformanceModel, ServiceError> {
        let snapshot = HistoricalPerformanceActiveModel {
            vendor_id: Set(vendor_id),
            date: Set(date),
            on_time_delivery_rate: Set(performance.on_time_delivery_rate),
            quality_rating_avg: Set(performance.quality_rating_avg),
            average_response_time: Set(performance.average_response_time),
            fulfillment_rate: Set(performance.fulfillment_rate),
            ..Default::default()
        };

        Ok(snapshot.insert(db).await?)
    }

    /// Snapshots for one vendor, oldest first
    pub async fn find_by_vendor(
        &self,
        vendor_id: i32,
    ) -> Result<Vec<HistoricalPerformanceModel>, ServiceError> {
        Ok(HistoricalPerformance::find()
            .filter(Column::VendorId.eq(vendor_id))
            .order_by_asc(Column::Date)
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await?)
    }
}
